//! The AI trip planner.

use serde::{Deserialize, Serialize};

use crate::{
    gateway::{ChatMessage, CompletionRequest, GatewayClient, GatewayError, Role},
    prelude::*,
};

const SYSTEM_PROMPT: &str = "You are an expert Nepal travel planner with deep knowledge of Nepali destinations, culture, trekking routes, and local customs. Provide helpful, accurate, and engaging travel advice.";

const FALLBACK_ITINERARY: &str = "Unable to generate itinerary";

const MAX_TOKENS: u32 = 2000;

/// Trip preferences. Every field falls back to a sensible default.
#[must_use]
#[derive(Default, Deserialize)]
pub struct TripPreferences {
    #[serde(default)]
    pub interest: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub difficulty: Option<String>,

    #[serde(default)]
    pub budget: Option<String>,
}

impl TripPreferences {
    fn prompt(&self) -> String {
        format!(
            "You are an expert Nepal travel planner. Create a personalized trip itinerary based on these preferences:\n\
            \n\
            Interests: {}\n\
            Duration: {}\n\
            Difficulty Level: {}\n\
            Budget: {}\n\
            \n\
            Provide a detailed day-by-day itinerary with:\n\
            1. Destination name and brief description\n\
            2. Activities for each day\n\
            3. Recommended accommodations\n\
            4. Estimated costs in USD\n\
            5. Important tips for each location\n\
            6. Best time to visit recommendations\n\
            \n\
            Format the response in a clear, structured way with markdown formatting.",
            self.interest.as_deref().filter(|value| !value.is_empty()).unwrap_or("General exploration"),
            self.duration.as_deref().filter(|value| !value.is_empty()).unwrap_or("7 days"),
            self.difficulty.as_deref().filter(|value| !value.is_empty()).unwrap_or("Moderate"),
            self.budget.as_deref().filter(|value| !value.is_empty()).unwrap_or("Mid-range"),
        )
    }
}

#[must_use]
#[derive(Serialize)]
pub struct Itinerary {
    pub success: bool,
    pub itinerary: String,
}

#[must_use]
#[derive(Clone)]
pub struct TripPlanner(pub GatewayClient);

impl TripPlanner {
    #[instrument(skip_all)]
    pub async fn plan(&self, preferences: &TripPreferences) -> Result<Itinerary, GatewayError> {
        let completion = self
            .0
            .complete(
                &CompletionRequest::builder()
                    .messages(vec![
                        ChatMessage::builder().role(Role::System).content(SYSTEM_PROMPT).build(),
                        ChatMessage::builder().role(Role::User).content(preferences.prompt()).build(),
                    ])
                    .max_tokens(MAX_TOKENS)
                    .build(),
            )
            .await?;
        let itinerary =
            completion.into_content().unwrap_or_else(|| FALLBACK_ITINERARY.to_string());
        Ok(Itinerary { success: true, itinerary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_uses_defaults_for_missing_preferences() {
        let prompt = TripPreferences::default().prompt();
        assert!(prompt.contains("Interests: General exploration"));
        assert!(prompt.contains("Duration: 7 days"));
        assert!(prompt.contains("Difficulty Level: Moderate"));
        assert!(prompt.contains("Budget: Mid-range"));
    }

    #[test]
    fn prompt_uses_given_preferences() {
        let preferences = TripPreferences {
            interest: Some("Trekking".to_string()),
            duration: Some("14 days".to_string()),
            difficulty: Some(String::new()),
            budget: None,
        };
        let prompt = preferences.prompt();
        assert!(prompt.contains("Interests: Trekking"));
        assert!(prompt.contains("Duration: 14 days"));
        // Blank values fall back the same way as missing ones.
        assert!(prompt.contains("Difficulty Level: Moderate"));
    }
}
