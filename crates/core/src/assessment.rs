//! The structured skill assessment produced at the end of a session.

use crate::error::ConversationError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Five evaluation axes. Values are meant to be 0-100 but the bound is the
/// model's contract, not something this type enforces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub empathy: f64,
    pub logic: f64,
    pub clarity: f64,
    pub confidence: f64,
    pub persuasion: f64,
}

/// One of the five scored skills, in the fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Empathy,
    Logic,
    Clarity,
    Confidence,
    Persuasion,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Empathy,
        Axis::Logic,
        Axis::Clarity,
        Axis::Confidence,
        Axis::Persuasion,
    ];

    /// Short Japanese label used on the chart.
    pub fn label(self) -> &'static str {
        match self {
            Axis::Empathy => "共感力",
            Axis::Logic => "論理性",
            Axis::Clarity => "明瞭さ",
            Axis::Confidence => "自信",
            Axis::Persuasion => "説得力",
        }
    }
}

impl Scores {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Empathy => self.empathy,
            Axis::Logic => self.logic,
            Axis::Clarity => self.clarity,
            Axis::Confidence => self.confidence,
            Axis::Persuasion => self.persuasion,
        }
    }

    /// Scores paired with their axis, in display order.
    pub fn by_axis(&self) -> [(Axis, f64); 5] {
        Axis::ALL.map(|axis| (axis, self.get(axis)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub scores: Scores,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub advice: String,
}

impl AssessmentResult {
    /// Parses the model's structured payload.
    ///
    /// Every field is required, and both feedback lists must contain at
    /// least one entry.
    pub fn from_json(payload: &str) -> Result<Self, ConversationError> {
        let result: Self = serde_json::from_str(payload)
            .map_err(|e| ConversationError::MalformedAssessment(e.to_string()))?;
        if result.strengths.is_empty() {
            return Err(ConversationError::MalformedAssessment(
                "`strengths` is empty".to_string(),
            ));
        }
        if result.improvements.is_empty() {
            return Err(ConversationError::MalformedAssessment(
                "`improvements` is empty".to_string(),
            ));
        }
        Ok(result)
    }

    /// JSON schema the model's response is constrained to.
    ///
    /// Strict structured output requires every object to close
    /// `additionalProperties`.
    pub fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "scores": {
                    "type": "object",
                    "properties": {
                        "empathy": { "type": "number" },
                        "logic": { "type": "number" },
                        "clarity": { "type": "number" },
                        "confidence": { "type": "number" },
                        "persuasion": { "type": "number" }
                    },
                    "required": ["empathy", "logic", "clarity", "confidence", "persuasion"],
                    "additionalProperties": false
                },
                "overallFeedback": { "type": "string" },
                "strengths": { "type": "array", "items": { "type": "string" } },
                "improvements": { "type": "array", "items": { "type": "string" } },
                "advice": { "type": "string" }
            },
            "required": ["scores", "overallFeedback", "strengths", "improvements", "advice"],
            "additionalProperties": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "scores": { "empathy": 72, "logic": 65.5, "clarity": 80, "confidence": 58, "persuasion": 61 },
        "overallFeedback": "落ち着いて受け答えができていました。",
        "strengths": ["相手の話を最後まで聞けている", "結論から話せている"],
        "improvements": ["具体例が少ない"],
        "advice": "数字を使って成果を示しましょう。"
    }"#;

    #[test]
    fn test_from_json_accepts_full_payload() {
        let result = AssessmentResult::from_json(PAYLOAD).unwrap();
        assert_eq!(result.scores.logic, 65.5);
        assert_eq!(result.strengths.len(), 2);
        assert_eq!(result.improvements, vec!["具体例が少ない".to_string()]);
        assert_eq!(result.advice, "数字を使って成果を示しましょう。");
    }

    #[test]
    fn test_from_json_rejects_missing_score() {
        let payload = PAYLOAD.replace(r#""persuasion": 61"#, r#""extra": 1"#);
        let err = AssessmentResult::from_json(&payload).unwrap_err();
        assert!(matches!(err, ConversationError::MalformedAssessment(_)));
    }

    #[test]
    fn test_from_json_rejects_non_json() {
        let err = AssessmentResult::from_json("評価できませんでした").unwrap_err();
        assert!(matches!(err, ConversationError::MalformedAssessment(_)));
    }

    #[test]
    fn test_from_json_rejects_empty_lists() {
        let payload = PAYLOAD.replace(r#"["具体例が少ない"]"#, "[]");
        let err = AssessmentResult::from_json(&payload).unwrap_err();
        assert!(err.to_string().contains("improvements"));
    }

    #[test]
    fn test_by_axis_keeps_display_order() {
        let result = AssessmentResult::from_json(PAYLOAD).unwrap();
        let labels: Vec<&str> = result.scores.by_axis().iter().map(|(a, _)| a.label()).collect();
        assert_eq!(labels, vec!["共感力", "論理性", "明瞭さ", "自信", "説得力"]);
        assert_eq!(result.scores.by_axis()[2].1, 80.0);
    }

    #[test]
    fn test_response_schema_requires_every_field() {
        let schema = AssessmentResult::response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 5);
        assert_eq!(
            schema["properties"]["scores"]["required"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn test_response_schema_closes_every_object() {
        let schema = AssessmentResult::response_schema();
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["scores"]["additionalProperties"], json!(false));
    }
}
