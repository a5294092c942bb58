// src/handlers/surveys.rs

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppError,
    models::survey::{
        CreateSurveyRequest, SURVEY_COLUMNS, SURVEYS_SHEET, Survey, UpdateSurveyRequest,
    },
    store::Workbook,
};

/// Lists every survey, newest first.
///
/// The reverse ordering is part of the UX contract: the admin list and
/// the student picker both show the most recent survey at the top. The
/// PIN rides along in the payload; the confirmation screen compares it
/// client-side.
pub fn get_surveys(store: &Workbook) -> Result<Value, AppError> {
    let mut surveys: Vec<Survey> = store
        .sheet(SURVEYS_SHEET)
        .map(|sheet| sheet.records())
        .unwrap_or_default()
        .iter()
        .map(Survey::from_record)
        .collect();

    surveys.reverse();

    Ok(serde_json::to_value(surveys)?)
}

/// Creates a survey and returns it as stored.
///
/// `id`, `createdAt` and `pin` are taken from the caller when present
/// (the legacy client generates all three) and filled in here otherwise.
pub fn create_survey(store: &mut Workbook, payload: Option<Value>) -> Result<Value, AppError> {
    let payload = super::require_body(payload)?;
    let req: CreateSurveyRequest = serde_json::from_value(payload)?;

    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let survey = Survey {
        id: req
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("s{}", Utc::now().timestamp_millis())),
        title: req.title,
        description: req.description,
        deadline: req.deadline,
        status: req.status.unwrap_or_default(),
        created_at: req
            .created_at
            .unwrap_or_else(|| Utc::now().timestamp_millis()),
        pin: req
            .pin
            .filter(|pin| !pin.is_empty())
            .unwrap_or_else(generate_pin),
        questions: req.questions,
        start_time: req.start_time,
    };

    let sheet = store.ensure_sheet(SURVEYS_SHEET, SURVEY_COLUMNS);
    sheet.append(&survey.to_fields()?);
    store.save()?;

    tracing::info!("Created survey {} '{}'", survey.id, survey.title);
    Ok(serde_json::to_value(&survey)?)
}

/// Patches a survey in place.
///
/// Only `title`, `description`, `deadline`, `questions` and `startTime`
/// are writable; each present field is written as a single cell by
/// column name, so `id`, `status`, `pin` and `createdAt` stay exactly as
/// created and unrelated columns survive header migrations.
pub fn update_survey(store: &mut Workbook, payload: Option<Value>) -> Result<Value, AppError> {
    let payload = super::require_body(payload)?;
    let req: UpdateSurveyRequest = serde_json::from_value(payload)?;

    let sheet = store.ensure_sheet(SURVEYS_SHEET, SURVEY_COLUMNS);

    let row_index = sheet
        .records()
        .iter()
        .position(|record| record.get("id") == req.id)
        .ok_or_else(|| AppError::NotFound(format!("Survey '{}' not found", req.id)))?;

    if let Some(title) = req.title {
        sheet.set_cell(row_index, "title", title);
    }

    if let Some(description) = req.description {
        sheet.set_cell(row_index, "description", description);
    }

    if let Some(deadline) = req.deadline {
        sheet.set_cell(row_index, "deadline", deadline);
    }

    if let Some(questions) = req.questions {
        sheet.set_cell(row_index, "questions", serde_json::to_string(&questions)?);
    }

    if let Some(start_time) = req.start_time {
        sheet.set_cell(row_index, "startTime", start_time);
    }

    let updated = Survey::from_record(&sheet.records()[row_index]);
    store.save()?;

    tracing::info!("Updated survey {}", updated.id);
    Ok(serde_json::to_value(updated)?)
}

/// Draws a uniform random 4-digit PIN, kept as a string end to end.
fn generate_pin() -> String {
    rand::rng().random_range(1000..10000).to_string()
}
