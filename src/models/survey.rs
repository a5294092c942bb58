// src/models/survey.rs

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use validator::Validate;

use crate::store::Record;

/// Sheet name and header for the survey table.
pub const SURVEYS_SHEET: &str = "Surveys";
pub const SURVEY_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "deadline",
    "status",
    "createdAt",
    "pin",
    "questions",
    "startTime",
];

/// One survey definition as stored in the 'Surveys' sheet.
///
/// `questions` is kept structured in memory and JSON-encoded into its
/// cell only at the sheet boundary. `pin` is a string everywhere, never
/// a number; the client compares it byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub status: SurveyStatus,
    pub created_at: i64,
    pub pin: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    #[default]
    Active,
    Closed,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::Active => "ACTIVE",
            SurveyStatus::Closed => "CLOSED",
        }
    }

    /// Decodes a status cell; anything unrecognized reads as ACTIVE, the
    /// default rows were written with before the status column existed.
    pub fn parse(cell: &str) -> Self {
        match cell {
            "CLOSED" => SurveyStatus::Closed,
            _ => SurveyStatus::Active,
        }
    }
}

/// One question inside a survey's dynamic question list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: String,

    /// Wire values match the form builder: 'text' (free answer), 'radio'
    /// (single choice), 'checkbox' (multiple choice).
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub label: String,

    /// Choice labels; empty for text questions.
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "radio")]
    SingleChoice,
    #[serde(rename = "checkbox")]
    MultiChoice,
}

impl Survey {
    /// Decodes a sheet record. A missing or unparseable `questions` cell
    /// reads as the empty list (rows written before the question builder
    /// existed have no such column at all), and `createdAt` falls back to
    /// 0 rather than failing the whole listing.
    pub fn from_record(record: &Record) -> Self {
        let start_time = record.get("startTime");

        Survey {
            id: record.get("id").to_string(),
            title: record.get("title").to_string(),
            description: record.get("description").to_string(),
            deadline: record.get("deadline").to_string(),
            status: SurveyStatus::parse(record.get("status")),
            created_at: record.get("createdAt").parse().unwrap_or(0),
            pin: record.get("pin").to_string(),
            questions: serde_json::from_str(record.get("questions")).unwrap_or_default(),
            start_time: if start_time.is_empty() {
                None
            } else {
                Some(start_time.to_string())
            },
        }
    }

    /// Encodes into named cells for the sheet. Only here do the
    /// structured `questions` become JSON text.
    pub fn to_fields(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("id", self.id.clone()),
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("deadline", self.deadline.clone()),
            ("status", self.status.as_str().to_string()),
            ("createdAt", self.created_at.to_string()),
            ("pin", self.pin.clone()),
            ("questions", serde_json::to_string(&self.questions)?),
            ("startTime", self.start_time.clone().unwrap_or_default()),
        ])
    }
}

/// DTO for creating a survey.
///
/// The legacy client generates `id`, `createdAt` and `pin` itself and
/// sends them along; any of the three left out is filled in server-side.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    #[serde(default)]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Survey title is required."))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, message = "Survey deadline is required."))]
    pub deadline: String,

    #[serde(default)]
    pub status: Option<SurveyStatus>,

    #[serde(default)]
    pub created_at: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_pin")]
    pub pin: Option<String>,

    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default)]
    pub start_time: Option<String>,
}

/// DTO for updating a survey. Fields are optional; `status`, `pin`,
/// `createdAt` and `id` are not patchable and simply have no field here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSurveyRequest {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub start_time: Option<String>,
}

/// Accepts the PIN as either a JSON string or a bare number, always
/// landing on a string. Older clients sent it numeric.
fn deserialize_pin<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "pin must be a string or number, got {}",
            other
        ))),
    }
}
