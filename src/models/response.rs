// src/models/response.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Record;

/// Sheet name and header for the response table.
pub const RESPONSES_SHEET: &str = "Responses";
pub const RESPONSE_COLUMNS: &[&str] = &[
    "id",
    "surveyId",
    "studentName",
    "studentId",
    "studentClass",
    "parentName",
    "signatureDataUrl",
    "comments",
    "submittedAt",
    "securityMetadata",
    "answers",
];

/// One submitted permission slip, as stored in the 'Responses' sheet.
///
/// Immutable once appended. The uniqueness key is (surveyId, studentId)
/// with the student id trimmed and lowercased.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    pub survey_id: String,
    pub student_name: String,
    pub student_id: String,
    #[serde(default)]
    pub student_class: String,
    #[serde(default)]
    pub parent_name: String,

    /// The signature pad capture, as a data-URL string.
    #[serde(default)]
    pub signature_data_url: String,

    #[serde(default)]
    pub comments: String,
    pub submitted_at: i64,
    #[serde(default)]
    pub security_metadata: SecurityMetadata,

    /// Question label -> answer. Radio and text answers are single
    /// strings; checkbox answers keep their selection order as a list.
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

/// Client-attested submission context. `verifiedByPin` records that the
/// client showed the PIN screen; the server never re-checks the PIN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityMetadata {
    pub user_agent: String,
    pub device_type: DeviceType,
    pub ip_address: String,
    pub verified_by_pin: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    #[default]
    Desktop,
}

/// A single answer: one string, or an ordered list for checkbox
/// questions with more than one box ticked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Many(Vec<String>),
}

impl SurveyResponse {
    /// Decodes a sheet record, parsing the JSON-encoded `answers` and
    /// `securityMetadata` cells back into structured form. Empty cells
    /// (rows older than either column) decode to the defaults.
    pub fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        let metadata = record.get("securityMetadata");
        let answers = record.get("answers");

        Ok(SurveyResponse {
            id: record.get("id").to_string(),
            survey_id: record.get("surveyId").to_string(),
            student_name: record.get("studentName").to_string(),
            student_id: record.get("studentId").to_string(),
            student_class: record.get("studentClass").to_string(),
            parent_name: record.get("parentName").to_string(),
            signature_data_url: record.get("signatureDataUrl").to_string(),
            comments: record.get("comments").to_string(),
            submitted_at: record.get("submittedAt").parse().unwrap_or(0),
            security_metadata: if metadata.is_empty() {
                SecurityMetadata::default()
            } else {
                serde_json::from_str(metadata)?
            },
            answers: if answers.is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(answers)?
            },
        })
    }

    /// Encodes into named cells. Nested structures become JSON text here
    /// and nowhere else.
    pub fn to_fields(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("id", self.id.clone()),
            ("surveyId", self.survey_id.clone()),
            ("studentName", self.student_name.clone()),
            ("studentId", self.student_id.clone()),
            ("studentClass", self.student_class.clone()),
            ("parentName", self.parent_name.clone()),
            ("signatureDataUrl", self.signature_data_url.clone()),
            ("comments", self.comments.clone()),
            ("submittedAt", self.submitted_at.to_string()),
            (
                "securityMetadata",
                serde_json::to_string(&self.security_metadata)?,
            ),
            ("answers", serde_json::to_string(&self.answers)?),
        ])
    }
}

/// DTO for submitting a response. The legacy client generates `id` and
/// `submittedAt`; both are filled in server-side when absent.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponseRequest {
    #[serde(default)]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "surveyId is required."))]
    pub survey_id: String,

    #[validate(length(min = 1, message = "studentName is required."))]
    pub student_name: String,

    #[validate(length(min = 1, message = "studentId is required."))]
    pub student_id: String,

    #[serde(default)]
    pub student_class: String,

    #[serde(default)]
    pub parent_name: String,

    #[serde(default)]
    pub signature_data_url: String,

    #[serde(default)]
    pub comments: String,

    #[serde(default)]
    pub submitted_at: Option<i64>,

    #[serde(default)]
    pub security_metadata: SecurityMetadata,

    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

/// A response as returned by the student status check. Same record,
/// minus `securityMetadata`: that read path answers "have I already
/// submitted?" and must not leak submission context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatusRecord {
    pub id: String,
    pub survey_id: String,
    pub student_name: String,
    pub student_id: String,
    pub student_class: String,
    pub parent_name: String,
    pub signature_data_url: String,
    pub comments: String,
    pub submitted_at: i64,
    pub answers: BTreeMap<String, AnswerValue>,
}

impl From<SurveyResponse> for StudentStatusRecord {
    fn from(response: SurveyResponse) -> Self {
        StudentStatusRecord {
            id: response.id,
            survey_id: response.survey_id,
            student_name: response.student_name,
            student_id: response.student_id,
            student_class: response.student_class,
            parent_name: response.parent_name,
            signature_data_url: response.signature_data_url,
            comments: response.comments,
            submitted_at: response.submitted_at,
            answers: response.answers,
        }
    }
}
