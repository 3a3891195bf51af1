use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest scene the prompt asks the model to produce, in seconds.
pub const MAX_SCENE_SECONDS: u32 = 8;

/// Duration range offered by the form. The pipeline itself does not clamp.
pub const MIN_DURATION_SECONDS: u32 = 10;
pub const MAX_DURATION_SECONDS: u32 = 300;
pub const DEFAULT_DURATION_SECONDS: u32 = 60;

/// Visual style tag embedded into every scene prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoStyle {
    #[default]
    Cinematic,
    #[serde(rename = "3D")]
    ThreeD,
    Anime,
    Pixar,
    Disney,
}

impl VideoStyle {
    pub const ALL: [VideoStyle; 5] = [
        VideoStyle::Cinematic,
        VideoStyle::ThreeD,
        VideoStyle::Anime,
        VideoStyle::Pixar,
        VideoStyle::Disney,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStyle::Cinematic => "Cinematic",
            VideoStyle::ThreeD => "3D",
            VideoStyle::Anime => "Anime",
            VideoStyle::Pixar => "Pixar",
            VideoStyle::Disney => "Disney",
        }
    }

    /// Case-insensitive lookup of the style tag.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for VideoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VideoStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "unknown video style '{}', expected one of: Cinematic, 3D, Anime, Pixar, Disney",
                s.trim()
            )
        })
    }
}

/// A character in the generated roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    /// Appearance description in English (face, hair, outfit).
    pub description: String,
}

/// One bounded segment of the script.
/// Fields the model leaves out come back empty or zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub scene_number: i64,
    pub duration: i64,
    pub action: String,
    pub dialogue: String,
    /// Self-contained video generation prompt.
    pub prompt: String,
}

impl Scene {
    pub fn exceeds_limit(&self) -> bool {
        self.duration > i64::from(MAX_SCENE_SECONDS)
    }

    pub fn has_dialogue(&self) -> bool {
        !self.dialogue.trim().is_empty()
    }
}

/// Structured result returned by the generation service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub hook: String,
    pub script: String,
    pub setting: String,
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
}

impl ScriptResult {
    pub fn total_duration_seconds(&self) -> i64 {
        self.scenes.iter().map(|scene| scene.duration).sum()
    }

    /// Scenes the service returned longer than [`MAX_SCENE_SECONDS`].
    pub fn overlong_scenes(&self) -> Vec<&Scene> {
        self.scenes.iter().filter(|scene| scene.exceeds_limit()).collect()
    }

    /// Every scene prompt, one per paragraph, in scene order.
    pub fn all_prompts(&self) -> String {
        self.scenes
            .iter()
            .map(|scene| scene.prompt.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScriptResult {
        ScriptResult {
            hook: "H".to_string(),
            script: "S".to_string(),
            setting: "Set".to_string(),
            characters: vec![Character {
                name: "Anna".to_string(),
                description: "short black hair, red coat".to_string(),
            }],
            scenes: vec![
                Scene {
                    scene_number: 1,
                    duration: 8,
                    action: "A".to_string(),
                    dialogue: String::new(),
                    prompt: "P1".to_string(),
                },
                Scene {
                    scene_number: 2,
                    duration: 12,
                    action: "B".to_string(),
                    dialogue: "Hi".to_string(),
                    prompt: "P2".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_style_tags() {
        assert_eq!(VideoStyle::ThreeD.to_string(), "3D");
        assert_eq!(VideoStyle::parse("pixar"), Some(VideoStyle::Pixar));
        assert_eq!(" 3d ".parse::<VideoStyle>(), Ok(VideoStyle::ThreeD));
        assert!("Watercolor".parse::<VideoStyle>().is_err());
        assert_eq!(VideoStyle::default(), VideoStyle::Cinematic);
    }

    #[test]
    fn test_style_serializes_as_tag() {
        let json = serde_json::to_string(&VideoStyle::ThreeD).unwrap();
        assert_eq!(json, "\"3D\"");
    }

    #[test]
    fn test_scene_uses_camel_case_keys() {
        let value = serde_json::to_value(&sample().scenes[0]).unwrap();
        assert_eq!(value["sceneNumber"], 1);
        assert!(value.get("scene_number").is_none());
    }

    #[test]
    fn test_result_helpers() {
        let result = sample();
        assert_eq!(result.total_duration_seconds(), 20);
        let overlong = result.overlong_scenes();
        assert_eq!(overlong.len(), 1);
        assert_eq!(overlong[0].scene_number, 2);
        assert_eq!(result.all_prompts(), "P1\n\nP2");
        assert!(!result.scenes[0].has_dialogue());
        assert!(result.scenes[1].has_dialogue());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = serde_json::from_str::<ScriptResult>(r#"{"hook":"H","script":"S"}"#);
        assert!(err.is_err());
    }
}
