//! The travel-assistant chatbot.

use serde::{Deserialize, Serialize};

use crate::{
    gateway::{ChatMessage, CompletionRequest, GatewayClient, GatewayError, Role},
    prelude::*,
};

const SYSTEM_PROMPT: &str = "You are a friendly and knowledgeable Nepal travel assistant. You help travelers with:
- Information about destinations in Nepal (Kathmandu, Pokhara, Everest, Annapurna, etc.)
- Trekking advice, routes, and difficulty levels
- Visa and permit requirements
- Best times to visit different regions
- Local customs, culture, and etiquette
- Food recommendations
- Accommodation suggestions
- Safety tips and altitude sickness prevention
- Budget planning and cost estimates

Be concise but helpful. If you don't know something specific, suggest they check official sources.";

const FALLBACK_REPLY: &str = "Sorry, I could not process your request.";

const MAX_TOKENS: u32 = 1000;

#[must_use]
#[derive(Deserialize)]
pub struct ChatbotRequest {
    /// The user's message. An empty message is still forwarded as-is.
    pub message: String,

    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[must_use]
#[derive(Serialize)]
pub struct ChatbotReply {
    pub success: bool,
    pub reply: String,
}

#[must_use]
#[derive(Clone)]
pub struct Chatbot(pub GatewayClient);

impl Chatbot {
    #[instrument(skip_all)]
    pub async fn reply(&self, request: ChatbotRequest) -> Result<ChatbotReply, GatewayError> {
        let completion = self
            .0
            .complete(
                &CompletionRequest::builder()
                    .messages(compose_messages(request))
                    .max_tokens(MAX_TOKENS)
                    .build(),
            )
            .await?;
        let reply = completion.into_content().unwrap_or_else(|| FALLBACK_REPLY.to_string());
        Ok(ChatbotReply { success: true, reply })
    }
}

/// System prompt, then the conversation history, then the new message.
fn compose_messages(request: ChatbotRequest) -> Vec<ChatMessage> {
    let mut messages =
        vec![ChatMessage::builder().role(Role::System).content(SYSTEM_PROMPT).build()];
    messages.extend(request.history);
    messages.push(ChatMessage::builder().role(Role::User).content(request.message).build());
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_messages_ok() {
        let messages = compose_messages(ChatbotRequest {
            message: "When should I trek Annapurna?".to_string(),
            history: vec![
                ChatMessage::builder().role(Role::User).content("Hi!").build(),
                ChatMessage::builder().role(Role::Assistant).content("Namaste!").build(),
            ],
        });
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "Hi!");
        assert_eq!(messages[3].content, "When should I trek Annapurna?");
    }

    #[test]
    fn empty_message_is_still_forwarded() {
        let messages =
            compose_messages(ChatbotRequest { message: String::new(), history: Vec::new() });
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "");
    }

    #[test]
    fn deserialize_request_without_history_ok() -> Result {
        let request: ChatbotRequest = serde_json::from_str(r#"{"message": "hello"}"#)?;
        assert!(request.history.is_empty());
        Ok(())
    }
}
