// src/handlers/mod.rs

pub mod announcement;
pub mod logs;
pub mod responses;
pub mod surveys;

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Map, Value};

use crate::{error::AppError, state::AppState};

/// Single entry point for every API call, GET and POST alike.
///
/// The `action` query parameter picks the operation; POST bodies carry
/// the JSON payload and extra GET parameters (`surveyId`, `studentId`)
/// ride in the query string. A malformed JSON body is treated as absent,
/// not as an error. Unrecognized actions answer with an empty object
/// rather than a 404.
pub async fn dispatch(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Result<Json<Value>, AppError> {
    let payload: Option<Value> = serde_json::from_str(&body).ok();

    // Whole-request lock: the duplicate check and the header migration
    // are both check-then-write sequences, so every request serializes
    // against every other for its full lifetime. The guard drops on all
    // exit paths. If the lock cannot be had within the bound, the
    // request fails instead of running unlocked.
    let mut store = tokio::time::timeout(
        Duration::from_secs(state.config.lock_timeout_secs),
        state.store.lock(),
    )
    .await
    .map_err(|_| AppError::LockTimeout)?;

    let action = params.get("action").map(String::as_str).unwrap_or("");

    let result = match action {
        "getSurveys" => surveys::get_surveys(&store)?,
        "createSurvey" => surveys::create_survey(&mut store, payload)?,
        "updateSurvey" => surveys::update_survey(&mut store, payload)?,
        "getResponses" => {
            responses::get_responses(&store, params.get("surveyId").map(String::as_str))?
        }
        "checkStudentStatus" => {
            responses::check_student_status(&store, params.get("studentId").map(String::as_str))?
        }
        "saveResponse" => responses::save_response(&mut store, payload)?,
        "getAnnouncement" => announcement::get_announcement(&store)?,
        "saveAnnouncement" => announcement::save_announcement(&mut store, payload)?,
        "logAction" => logs::log_action(&mut store, payload)?,
        "getSystemLogs" => logs::get_system_logs(&store)?,
        unknown => {
            tracing::debug!("Unrecognized action '{}', returning empty result", unknown);
            Value::Object(Map::new())
        }
    };

    Ok(Json(result))
}

/// Pulls the decoded POST body, failing the request when the action
/// needed one and none (or garbage) arrived.
fn require_body(payload: Option<Value>) -> Result<Value, AppError> {
    payload.ok_or_else(|| AppError::BadRequest("Missing request body".to_string()))
}
