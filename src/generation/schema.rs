use crate::session::{Activity, Mood};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Structured assessment returned by the summarization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAssessment {
    pub summary: String,
    pub key_topics: Vec<String>,
    pub mood_assessment: Mood,
    pub recommended_activities: Vec<SuggestedActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedActivity {
    pub activity: String,
    pub description: String,
}

impl From<SuggestedActivity> for Activity {
    fn from(s: SuggestedActivity) -> Self {
        Activity {
            title: s.activity,
            description: s.description,
        }
    }
}

/// JSON schema sent along with the summarization prompt
pub fn summary_schema() -> Value {
    let moods: Vec<&str> = Mood::ALL.iter().map(|m| m.label()).collect();

    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "key_topics": { "type": "array", "items": { "type": "string" } },
            "mood_assessment": { "type": "string", "enum": moods },
            "recommended_activities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "activity": { "type": "string" },
                        "description": { "type": "string" }
                    },
                    "required": ["activity", "description"]
                }
            }
        },
        "required": ["summary", "key_topics", "mood_assessment", "recommended_activities"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_every_mood() {
        let schema = summary_schema();
        let moods = schema["properties"]["mood_assessment"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(moods.len(), 5);
        assert_eq!(moods[0], "very_sad");
        assert_eq!(moods[4], "very_happy");
    }

    #[test]
    fn test_assessment_rejects_unknown_mood() {
        let value = json!({
            "summary": "ok",
            "key_topics": [],
            "mood_assessment": "ecstatic",
            "recommended_activities": []
        });
        assert!(serde_json::from_value::<SessionAssessment>(value).is_err());
    }
}
