use super::{
    ContentRequest, ContentResponse, GenerationProvider, ProviderError, ProviderKind,
    UsageTelemetry,
};
use crate::models::{Character, Scene, ScriptResult};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const MOCK_MODEL: &str = "scriptgen-mock";

/// What the mock answers for one call.
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    /// A response without any text payload.
    Empty,
    Fail(ProviderError),
}

impl MockReply {
    pub fn result(result: &ScriptResult) -> Self {
        MockReply::Text(serde_json::to_string(result).unwrap_or_default())
    }
}

/// Scripted provider that records every request it receives.
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ContentRequest>>,
}

impl MockProvider {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn next_reply(&self) -> Option<MockReply> {
        self.replies.lock().ok().and_then(|mut r| r.pop_front())
    }
}

/// Placeholder result used once the scripted replies run out.
pub fn placeholder_result(idea: &str) -> ScriptResult {
    let idea = idea.trim();
    ScriptResult {
        hook: format!("What if {idea}?"),
        script: format!("A short piece built around: {idea}."),
        setting: "A sunlit studio with soft, warm key light".to_string(),
        characters: vec![Character {
            name: "Host".to_string(),
            description: "Young woman, oval face, shoulder-length brown hair, cream knit sweater"
                .to_string(),
        }],
        scenes: vec![Scene {
            scene_number: 1,
            duration: 8,
            action: "The host looks into the camera and smiles.".to_string(),
            dialogue: String::new(),
            prompt: "A sunlit studio with soft, warm key light, young woman with an oval face, shoulder-length brown hair and a cream knit sweater looks into the camera and smiles".to_string(),
        }],
    }
}

#[async_trait::async_trait]
impl GenerationProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }

    async fn generate_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let reply = self.next_reply().unwrap_or_else(|| {
            let idea = request
                .instruction_text()
                .and_then(|text| text.split("Idea:\n").nth(1))
                .and_then(|rest| rest.split("\n\nReference material:").next())
                .unwrap_or("a new idea");
            MockReply::result(&placeholder_result(idea))
        });
        match reply {
            MockReply::Text(text) => Ok(ContentResponse {
                text: Some(text),
                usage: UsageTelemetry::default(),
            }),
            MockReply::Empty => Ok(ContentResponse::default()),
            MockReply::Fail(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn request(text: &str) -> ContentRequest {
        ContentRequest {
            model: MOCK_MODEL.to_string(),
            parts: vec![super::super::Part::Text(text.to_string())],
            response_mime_type: "application/json".to_string(),
            response_schema: Value::Null,
        }
    }

    #[tokio::test]
    async fn test_replays_in_order_then_falls_back() {
        let provider = MockProvider::new(vec![
            MockReply::Empty,
            MockReply::Fail(ProviderError::service("boom")),
        ]);
        let first = provider.generate_content(&request("x")).await.unwrap();
        assert_eq!(first.text, None);
        let second = provider.generate_content(&request("x")).await.unwrap_err();
        assert_eq!(second.to_string(), "boom");

        let third = provider
            .generate_content(&request("...\nIdea:\nRainy day\n\nReference material:\nnone\n"))
            .await
            .unwrap();
        let result: ScriptResult = serde_json::from_str(&third.text.unwrap()).unwrap();
        assert_eq!(result.hook, "What if Rainy day?");
        assert_eq!(provider.call_count(), 3);
    }
}
