/// Instruction template and response schema for script generation
use crate::models::{VideoStyle, DEFAULT_DURATION_SECONDS, MAX_SCENE_SECONDS};
use serde_json::{json, Value};

/// Used when the user leaves the setting or characters blank.
pub const FREE_CREATIVE: &str = "Use a free creative choice that best fits the idea";
/// Used when there is no reference material at all.
pub const NO_REFERENCE: &str = "none";
pub const RESPONSE_MIME_TYPE: &str = "application/json";
pub const DEFAULT_NARRATIVE_LANGUAGE: &str = "Vietnamese";

/// Everything the template needs for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptInputs {
    pub idea: String,
    /// Typed reference text followed by any text extracted from documents.
    pub reference_text: String,
    pub target_duration_seconds: u32,
    pub user_setting: String,
    pub user_characters: String,
    pub video_style: VideoStyle,
    /// Language for hook, script, setting, action and dialogue.
    pub narrative_language: String,
}

impl Default for PromptInputs {
    fn default() -> Self {
        Self {
            idea: String::new(),
            reference_text: String::new(),
            target_duration_seconds: DEFAULT_DURATION_SECONDS,
            user_setting: String::new(),
            user_characters: String::new(),
            video_style: VideoStyle::default(),
            narrative_language: DEFAULT_NARRATIVE_LANGUAGE.to_string(),
        }
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Build the instruction text sent after any inline attachments.
pub fn compose_prompt(inputs: &PromptInputs) -> String {
    let style = inputs.video_style.as_str();
    let setting = or_fallback(&inputs.user_setting, FREE_CREATIVE);
    let characters = or_fallback(&inputs.user_characters, FREE_CREATIVE);
    let reference = or_fallback(&inputs.reference_text, NO_REFERENCE);
    let language = or_fallback(&inputs.narrative_language, DEFAULT_NARRATIVE_LANGUAGE);
    let duration = inputs.target_duration_seconds;
    let max_scene = MAX_SCENE_SECONDS;

    format!(
        r#"You are an expert video scriptwriter and AI prompt engineer.
Your tasks are:
1. Turn the idea and the reference material into a detailed script (with a hook) lasting about {duration} seconds.
2. Build the setting, the characters and each character's dialogue so they fit the idea as well as possible.
3. Split the script into scenes of at most {max_scene} seconds each.
4. Write an English video/image generation prompt for every scene.
Write the hook, script, setting, actions and dialogue in {language}. Write character descriptions and scene prompts in English.

IMPORTANT REQUIREMENTS FOR STYLE, SETTING AND CHARACTERS:
- Video style: {style}
- Desired setting from the user: {setting}
- Desired characters from the user: {characters}
If the user provided a setting or characters, you MUST use them and build on them instead of replacing them. Otherwise, create freely.

IMPORTANT REQUIREMENTS FOR PROMPTS (MANDATORY):
- Put ALL of the style, setting, characters, action and dialogue into ONE single English prompt for each scene.
- Repeat the full style, setting and character appearance description (face, hairstyle, outfit) VERBATIM in EVERY scene prompt so the video stays perfectly consistent. Never refer to another scene.
- A standard prompt is structured as: [Video style: {style}] + [Detailed setting description] + [Detailed character description: face, hairstyle, outfit] + [Specific action in the scene] + [State/expression while speaking the dialogue, if any].

Idea:
{idea}

Reference material:
{reference}
"#,
        idea = inputs.idea,
    )
}

/// Fixed response schema declared to the model. Identical for every request.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hook": {
                "type": "STRING",
                "description": "Opening hook line of the script that grabs the viewer's attention."
            },
            "script": {
                "type": "STRING",
                "description": "Detailed summary of the script content."
            },
            "setting": {
                "type": "STRING",
                "description": "Detailed description of the overall setting."
            },
            "characters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Character name" },
                        "description": {
                            "type": "STRING",
                            "description": "Extremely detailed description of the face, hairstyle and outfit, in English so it can be used in prompts."
                        }
                    }
                }
            },
            "scenes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "sceneNumber": { "type": "INTEGER" },
                        "duration": {
                            "type": "INTEGER",
                            "description": "Scene length in seconds (at most 8)."
                        },
                        "action": { "type": "STRING", "description": "What happens in the scene." },
                        "dialogue": { "type": "STRING", "description": "Dialogue spoken in the scene." },
                        "prompt": {
                            "type": "STRING",
                            "description": "English prompt for generating the scene video. It MUST merge the full setting description, character descriptions, action and dialogue, and must repeat the setting and characters in every prompt."
                        }
                    }
                }
            }
        },
        "required": ["hook", "script", "setting", "characters", "scenes"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee_ad() -> PromptInputs {
        PromptInputs {
            idea: "Morning coffee ad".to_string(),
            target_duration_seconds: 60,
            video_style: VideoStyle::Cinematic,
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_embeds_inputs() {
        let prompt = compose_prompt(&coffee_ad());
        assert!(prompt.contains("Morning coffee ad"));
        assert!(prompt.contains("about 60 seconds"));
        assert!(prompt.contains("Video style: Cinematic"));
        assert!(prompt.contains("[Video style: Cinematic]"));
        assert!(prompt.contains("at most 8 seconds"));
    }

    #[test]
    fn test_blank_fields_use_fallbacks() {
        let mut inputs = coffee_ad();
        inputs.user_setting = "   ".to_string();
        let prompt = compose_prompt(&inputs);
        assert!(prompt.contains(&format!("Desired setting from the user: {FREE_CREATIVE}")));
        assert!(prompt.contains(&format!("Desired characters from the user: {FREE_CREATIVE}")));
        assert!(prompt.contains("free creative"));
        assert!(prompt.contains("Reference material:\nnone\n"));
    }

    #[test]
    fn test_user_setting_and_characters_are_kept() {
        let mut inputs = coffee_ad();
        inputs.user_setting = "A vintage cafe in Da Lat, warm light".to_string();
        inputs.user_characters = "Man, 25, white shirt".to_string();
        inputs.reference_text = "Product: dark roast".to_string();
        let prompt = compose_prompt(&inputs);
        assert!(prompt.contains("Desired setting from the user: A vintage cafe in Da Lat, warm light"));
        assert!(prompt.contains("Desired characters from the user: Man, 25, white shirt"));
        assert!(prompt.contains("Reference material:\nProduct: dark roast\n"));
        assert!(!prompt.contains(FREE_CREATIVE));
    }

    #[test]
    fn test_duration_is_not_clamped() {
        let mut inputs = coffee_ad();
        inputs.target_duration_seconds = 5;
        assert!(compose_prompt(&inputs).contains("about 5 seconds"));
        inputs.target_duration_seconds = 900;
        assert!(compose_prompt(&inputs).contains("about 900 seconds"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(compose_prompt(&coffee_ad()), compose_prompt(&coffee_ad()));
    }

    #[test]
    fn test_schema_shape() {
        let schema = response_schema();
        assert_eq!(schema, response_schema());
        assert_eq!(
            schema["required"],
            json!(["hook", "script", "setting", "characters", "scenes"])
        );
        let scene = &schema["properties"]["scenes"]["items"]["properties"];
        for key in ["sceneNumber", "duration", "action", "dialogue", "prompt"] {
            assert!(scene.get(key).is_some(), "missing scene field {key}");
        }
        assert_eq!(scene["sceneNumber"]["type"], "INTEGER");
        let character = &schema["properties"]["characters"]["items"]["properties"];
        assert!(character.get("name").is_some());
        assert!(character.get("description").is_some());
    }
}
