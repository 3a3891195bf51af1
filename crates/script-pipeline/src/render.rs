/// Read-only projection of a [`ScriptResult`] into viewer sections.
///
/// Front ends draw the sections however they like; the text offered for
/// copying is decided here so every front end copies the same thing.
use crate::models::{ScriptResult, MAX_SCENE_SECONDS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultTab {
    #[default]
    Script,
    Characters,
    Scenes,
    Json,
}

impl ResultTab {
    pub const ALL: [ResultTab; 4] = [
        ResultTab::Script,
        ResultTab::Characters,
        ResultTab::Scenes,
        ResultTab::Json,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResultTab::Script => "Script",
            ResultTab::Characters => "Characters & Setting",
            ResultTab::Scenes => "Scenes & Prompts",
            ResultTab::Json => "JSON",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "script" => Some(ResultTab::Script),
            "characters" => Some(ResultTab::Characters),
            "scenes" => Some(ResultTab::Scenes),
            "json" => Some(ResultTab::Json),
            _ => None,
        }
    }
}

/// A copyable field inside a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewField {
    pub label: String,
    pub text: String,
    /// Text placed on the clipboard; `None` when the field has no copy action.
    pub copy_text: Option<String>,
    pub monospace: bool,
}

impl ViewField {
    fn copyable(label: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: label.into(),
            copy_text: Some(text.clone()),
            text,
            monospace: false,
        }
    }

    fn plain(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            copy_text: None,
            monospace: false,
        }
    }

    fn code(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            monospace: true,
            ..Self::copyable(label, text)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSection {
    pub title: String,
    /// Short badge next to the title, e.g. a scene duration.
    pub badge: Option<String>,
    /// Set for scenes longer than the per-scene limit.
    pub over_limit: bool,
    pub fields: Vec<ViewField>,
}

impl ViewSection {
    fn new(title: impl Into<String>, fields: Vec<ViewField>) -> Self {
        Self {
            title: title.into(),
            badge: None,
            over_limit: false,
            fields,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultView {
    pub tab: ResultTab,
    pub sections: Vec<ViewSection>,
}

impl ResultView {
    /// Plain-text rendering for terminals and logs.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("== {}", section.title));
            if let Some(badge) = &section.badge {
                out.push_str(&format!(" ({badge})"));
            }
            if section.over_limit {
                out.push_str(&format!(" [longer than {MAX_SCENE_SECONDS}s]"));
            }
            out.push('\n');
            for field in &section.fields {
                if field.label.is_empty() {
                    out.push_str(&field.text);
                } else {
                    out.push_str(&format!("{}:\n{}", field.label, field.text));
                }
                out.push_str("\n\n");
            }
        }
        out.trim_end().to_string()
    }
}

/// Project a result into one tab. Never mutates the result.
pub fn render(result: &ScriptResult, tab: ResultTab) -> ResultView {
    let sections = match tab {
        ResultTab::Script => vec![
            ViewSection::new("Hook", vec![ViewField::copyable("", &result.hook)]),
            ViewSection::new("Script", vec![ViewField::copyable("", &result.script)]),
        ],
        ResultTab::Characters => {
            let mut sections = vec![ViewSection::new(
                "Setting",
                vec![ViewField::copyable("", &result.setting)],
            )];
            sections.extend(result.characters.iter().map(|character| {
                ViewSection::new(
                    character.name.clone(),
                    vec![ViewField::copyable("Description", &character.description)],
                )
            }));
            sections
        }
        ResultTab::Scenes => result
            .scenes
            .iter()
            .map(|scene| {
                let mut fields = vec![ViewField::plain("Action", &scene.action)];
                if scene.has_dialogue() {
                    fields.push(ViewField::plain("Dialogue", format!("\"{}\"", scene.dialogue)));
                }
                fields.push(ViewField::copyable("Prompt", &scene.prompt));
                fields.push(ViewField::code(
                    "Scene JSON",
                    serde_json::to_string_pretty(scene).unwrap_or_default(),
                ));
                ViewSection {
                    title: format!("Scene {}", scene.scene_number),
                    badge: Some(format!("{}s", scene.duration)),
                    over_limit: scene.exceeds_limit(),
                    fields,
                }
            })
            .collect(),
        ResultTab::Json => vec![ViewSection::new(
            "JSON",
            vec![ViewField::code("", result.to_pretty_json())],
        )],
    };
    ResultView { tab, sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Character, Scene};

    fn sample() -> ScriptResult {
        ScriptResult {
            hook: "Wake up to this.".to_string(),
            script: "A barista prepares the perfect cup.".to_string(),
            setting: "Vintage cafe".to_string(),
            characters: vec![
                Character {
                    name: "Anna".to_string(),
                    description: "Red coat".to_string(),
                },
                Character {
                    name: "Minh".to_string(),
                    description: "White shirt".to_string(),
                },
            ],
            scenes: vec![
                Scene {
                    scene_number: 1,
                    duration: 8,
                    action: "Pour".to_string(),
                    dialogue: String::new(),
                    prompt: "P1".to_string(),
                },
                Scene {
                    scene_number: 2,
                    duration: 10,
                    action: "Sip".to_string(),
                    dialogue: "Perfect.".to_string(),
                    prompt: "P2".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_script_tab() {
        let view = render(&sample(), ResultTab::Script);
        assert_eq!(view.sections.len(), 2);
        assert_eq!(
            view.sections[0].fields[0].copy_text.as_deref(),
            Some("Wake up to this.")
        );
    }

    #[test]
    fn test_characters_tab() {
        let view = render(&sample(), ResultTab::Characters);
        let titles: Vec<_> = view.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Setting", "Anna", "Minh"]);
        assert_eq!(view.sections[2].fields[0].copy_text.as_deref(), Some("White shirt"));
    }

    #[test]
    fn test_scenes_tab() {
        let view = render(&sample(), ResultTab::Scenes);
        assert_eq!(view.sections.len(), 2);
        let first = &view.sections[0];
        assert_eq!(first.badge.as_deref(), Some("8s"));
        assert!(!first.over_limit);
        assert!(first.fields.iter().all(|f| f.label != "Dialogue"));

        let second = &view.sections[1];
        assert!(second.over_limit);
        let prompt = second.fields.iter().find(|f| f.label == "Prompt").unwrap();
        assert_eq!(prompt.copy_text.as_deref(), Some("P2"));
        let json = second.fields.iter().find(|f| f.label == "Scene JSON").unwrap();
        let parsed: Scene = serde_json::from_str(json.copy_text.as_deref().unwrap()).unwrap();
        assert_eq!(parsed, sample().scenes[1]);
    }

    #[test]
    fn test_json_tab_round_trips() {
        let view = render(&sample(), ResultTab::Json);
        let text = view.sections[0].fields[0].copy_text.clone().unwrap();
        let parsed: ScriptResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let result = sample();
        for tab in ResultTab::ALL {
            assert_eq!(render(&result, tab), render(&result, tab));
        }
        assert_eq!(result, sample());
    }

    #[test]
    fn test_plain_text() {
        let text = render(&sample(), ResultTab::Scenes).to_plain_text();
        assert!(text.starts_with("== Scene 1 (8s)"));
        assert!(text.contains("== Scene 2 (10s) [longer than 8s]"));
        assert!(text.contains("Dialogue:\n\"Perfect.\""));
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!(ResultTab::parse("JSON"), Some(ResultTab::Json));
        assert_eq!(ResultTab::parse("nope"), None);
    }
}
