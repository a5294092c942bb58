// src/handlers/responses.rs
//
// Submission happens in two phases on the client: validate and collect,
// then a PIN confirmation screen compared against the survey payload the
// client already holds, then the actual save. The PIN is a soft
// deterrent, not an auth boundary; the server stores `verifiedByPin` as
// client-attested metadata and never re-checks the digits. What the
// server does enforce is at-most-once submission per (survey, student).

use chrono::Utc;
use rand::Rng;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    error::AppError,
    models::response::{
        RESPONSE_COLUMNS, RESPONSES_SHEET, SaveResponseRequest, StudentStatusRecord,
        SurveyResponse,
    },
    store::Workbook,
};

/// Uniqueness is case- and whitespace-insensitive: ' A101 ' and 'a101'
/// are the same student.
pub fn normalize_student_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Records one submission, rejecting duplicates.
///
/// The duplicate scan is restricted to the candidate's own survey; the
/// same student may answer any number of different surveys. The whole
/// request holds the store lock, which is what makes this
/// check-then-append sequence atomic against concurrent submissions.
pub fn save_response(store: &mut Workbook, payload: Option<Value>) -> Result<Value, AppError> {
    let payload = super::require_body(payload)?;
    let req: SaveResponseRequest = serde_json::from_value(payload)?;

    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let sheet = store.ensure_sheet(RESPONSES_SHEET, RESPONSE_COLUMNS);

    let normalized = normalize_student_id(&req.student_id);
    let duplicate = sheet.records().iter().any(|record| {
        record.get("surveyId") == req.survey_id
            && normalize_student_id(record.get("studentId")) == normalized
    });

    if duplicate {
        tracing::warn!(
            "Rejected duplicate submission: survey={} student={}",
            req.survey_id,
            normalized
        );
        return Err(AppError::DuplicateSubmission);
    }

    let response = SurveyResponse {
        id: req
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(generate_response_id),
        survey_id: req.survey_id,
        student_name: req.student_name,
        student_id: req.student_id,
        student_class: req.student_class,
        parent_name: req.parent_name,
        signature_data_url: req.signature_data_url,
        comments: req.comments,
        submitted_at: req
            .submitted_at
            .unwrap_or_else(|| Utc::now().timestamp_millis()),
        security_metadata: req.security_metadata,
        answers: req.answers,
    };

    sheet.append(&response.to_fields().map_err(|e| {
        AppError::InternalServerError(format!("Failed to encode response: {}", e))
    })?);
    store.save()?;

    tracing::info!(
        "Saved response {} for survey {}",
        response.id,
        response.survey_id
    );
    Ok(json!({ "status": "success" }))
}

/// Lists responses, fully decoded, optionally filtered to one survey by
/// exact id match.
pub fn get_responses(store: &Workbook, survey_id: Option<&str>) -> Result<Value, AppError> {
    let records = store
        .sheet(RESPONSES_SHEET)
        .map(|sheet| sheet.records())
        .unwrap_or_default();

    let mut responses = Vec::with_capacity(records.len());
    for record in &records {
        responses.push(SurveyResponse::from_record(record).map_err(|e| {
            tracing::error!("Failed to decode stored response: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?);
    }

    if let Some(survey_id) = survey_id {
        responses.retain(|response| response.survey_id == survey_id);
    }

    Ok(serde_json::to_value(responses)?)
}

/// Looks up every submission a student has made, across ALL surveys.
///
/// This read path answers "what have I already signed?" on the student
/// status page, so the returned records carry no security metadata.
pub fn check_student_status(store: &Workbook, student_id: Option<&str>) -> Result<Value, AppError> {
    let normalized = normalize_student_id(student_id.unwrap_or(""));

    let records = store
        .sheet(RESPONSES_SHEET)
        .map(|sheet| sheet.records())
        .unwrap_or_default();

    let mut matches = Vec::new();
    for record in &records {
        if normalize_student_id(record.get("studentId")) != normalized {
            continue;
        }

        let response = SurveyResponse::from_record(record).map_err(|e| {
            tracing::error!("Failed to decode stored response: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;
        matches.push(StudentStatusRecord::from(response));
    }

    Ok(serde_json::to_value(matches)?)
}

/// Opaque random token for a stored response.
fn generate_response_id() -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}
