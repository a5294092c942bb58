// tests/api_tests.rs

use serde_json::{Value, json};
use slipform::{config::Config, routes, state::AppState, store::Workbook};

/// Helper function to spawn the app on a random port with a throwaway
/// workbook file. Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let data_path = std::env::temp_dir()
        .join(format!("slipform_test_{}.json", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let config = Config {
        data_path: data_path.clone(),
        lock_timeout_secs: 30,
        rust_log: "error".to_string(),
    };

    let store = Workbook::open(&data_path).expect("Failed to open test workbook");
    let state = AppState::new(store, config);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn post_action(
    client: &reqwest::Client,
    address: &str,
    action: &str,
    body: &Value,
) -> reqwest::Response {
    client
        .post(format!("{}/exec?action={}", address, action))
        .json(body)
        .send()
        .await
        .expect("Failed to execute request")
}

async fn get_action(client: &reqwest::Client, address: &str, query: &str) -> Value {
    client
        .get(format!("{}/exec?{}", address, query))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response json")
}

#[tokio::test]
async fn unknown_action_returns_empty_object() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/exec?action=definitelyNotAnAction", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: permissive default, not a 404
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({}));

    // Missing action behaves the same
    let body = get_action(&client, &address, "").await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn get_surveys_lists_newest_first_with_string_pin() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let first = post_action(
        &client,
        &address,
        "createSurvey",
        &json!({ "title": "Field trip", "deadline": "2026-09-01" }),
    )
    .await
    .json::<Value>()
    .await
    .unwrap();

    post_action(
        &client,
        &address,
        "createSurvey",
        &json!({ "title": "Museum visit", "deadline": "2026-09-02" }),
    )
    .await
    .json::<Value>()
    .await
    .unwrap();

    // Act
    let surveys = get_action(&client, &address, "action=getSurveys").await;
    let surveys = surveys.as_array().expect("getSurveys should return an array");

    // Assert: reverse insertion order, newest first
    assert_eq!(surveys.len(), 2);
    assert_eq!(surveys[0]["title"], "Museum visit");
    assert_eq!(surveys[1]["title"], "Field trip");

    // Generated fields: 4-digit numeric string pin, ACTIVE status,
    // questions as a (possibly empty) array
    let pin = surveys[0]["pin"].as_str().expect("pin must be a string");
    assert_eq!(pin.len(), 4);
    assert!(pin.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(surveys[0]["status"], "ACTIVE");
    assert!(surveys[0]["questions"].is_array());

    // Caller-supplied fields survive as sent
    assert_eq!(surveys[1]["id"], first["id"]);
}

#[tokio::test]
async fn duplicate_submission_is_rejected_case_insensitively() {
    // Arrange: survey S1 with PIN 4821 and one single-choice question
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let survey = post_action(
        &client,
        &address,
        "createSurvey",
        &json!({
            "id": "S1",
            "title": "Permission slip",
            "deadline": "2026-08-09",
            "pin": "4821",
            "questions": [{
                "id": "q1",
                "type": "radio",
                "label": "Attend?",
                "options": ["Yes", "No"],
                "required": true
            }]
        }),
    )
    .await
    .json::<Value>()
    .await
    .unwrap();
    assert_eq!(survey["pin"], "4821");

    // Act 1: first submission for A101 succeeds
    let first = post_action(
        &client,
        &address,
        "saveResponse",
        &json!({
            "surveyId": "S1",
            "studentName": "Alice",
            "studentId": "A101",
            "parentName": "Alice Sr.",
            "signatureDataUrl": "data:image/png;base64,AAAA",
            "answers": { "Attend?": "Yes" },
            "securityMetadata": {
                "userAgent": "integration-test",
                "deviceType": "Mobile",
                "ipAddress": "127.0.0.1",
                "verifiedByPin": true
            }
        }),
    )
    .await;
    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(first.json::<Value>().await.unwrap()["status"], "success");

    let responses = get_action(&client, &address, "action=getResponses&surveyId=S1").await;
    let responses = responses.as_array().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["answers"]["Attend?"], "Yes");

    // Act 2: same student, different case and extra whitespace -> rejected
    // with the duplicate marker, not a generic error
    let second = post_action(
        &client,
        &address,
        "saveResponse",
        &json!({
            "surveyId": "S1",
            "studentName": "Alice again",
            "studentId": " a101 ",
            "parentName": "Alice Sr.",
            "signatureDataUrl": "data:image/png;base64,BBBB",
            "answers": { "Attend?": "No" }
        }),
    )
    .await;
    assert_eq!(second.status().as_u16(), 409);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Duplicate submission");

    // Act 3: a different student still goes through
    let third = post_action(
        &client,
        &address,
        "saveResponse",
        &json!({
            "surveyId": "S1",
            "studentName": "Ben",
            "studentId": "A102",
            "parentName": "Ben Sr.",
            "signatureDataUrl": "data:image/png;base64,CCCC",
            "answers": { "Attend?": "No" }
        }),
    )
    .await;
    assert_eq!(third.json::<Value>().await.unwrap()["status"], "success");

    let responses = get_action(&client, &address, "action=getResponses&surveyId=S1").await;
    assert_eq!(responses.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_check_is_scoped_to_one_survey() {
    // Arrange: two surveys
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for id in ["SA", "SB"] {
        post_action(
            &client,
            &address,
            "createSurvey",
            &json!({ "id": id, "title": format!("Survey {}", id), "deadline": "2026-09-01" }),
        )
        .await;
    }

    // Act: the same student answers both surveys
    for survey_id in ["SA", "SB"] {
        let response = post_action(
            &client,
            &address,
            "saveResponse",
            &json!({
                "surveyId": survey_id,
                "studentName": "Cara",
                "studentId": "C300",
                "parentName": "Cara Sr.",
                "signatureDataUrl": "data:image/png;base64,DDDD"
            }),
        )
        .await;

        // Assert: a submission to survey A must not block survey B
        assert_eq!(
            response.status().as_u16(),
            200,
            "submission to {} should succeed",
            survey_id
        );
    }
}

#[tokio::test]
async fn check_student_status_spans_surveys_and_strips_metadata() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for id in ["SA", "SB"] {
        post_action(
            &client,
            &address,
            "createSurvey",
            &json!({ "id": id, "title": format!("Survey {}", id), "deadline": "2026-09-01" }),
        )
        .await;
        post_action(
            &client,
            &address,
            "saveResponse",
            &json!({
                "surveyId": id,
                "studentName": "Dana",
                "studentId": "D400",
                "parentName": "Dana Sr.",
                "signatureDataUrl": "data:image/png;base64,EEEE",
                "securityMetadata": {
                    "userAgent": "secret-agent",
                    "deviceType": "Desktop",
                    "ipAddress": "10.0.0.1",
                    "verifiedByPin": true
                }
            }),
        )
        .await;
    }

    // Act: normalization applies to the query too
    let matches = get_action(&client, &address, "action=checkStudentStatus&studentId=%20d400%20").await;
    let matches = matches.as_array().unwrap();

    // Assert: both surveys found, and no security metadata anywhere
    assert_eq!(matches.len(), 2);
    for record in matches {
        assert_eq!(record["studentName"], "Dana");
        assert!(
            record.get("securityMetadata").is_none(),
            "status check must not leak security metadata"
        );
    }

    // The full read path still carries it, for the admin result view
    let responses = get_action(&client, &address, "action=getResponses&surveyId=SA").await;
    assert_eq!(
        responses.as_array().unwrap()[0]["securityMetadata"]["verifiedByPin"],
        true
    );
}

#[tokio::test]
async fn answers_round_trip_preserves_shape_and_order() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    post_action(
        &client,
        &address,
        "createSurvey",
        &json!({ "id": "SR", "title": "Round trip", "deadline": "2026-09-01" }),
    )
    .await;

    post_action(
        &client,
        &address,
        "saveResponse",
        &json!({
            "surveyId": "SR",
            "studentName": "Eve",
            "studentId": "E500",
            "parentName": "Eve Sr.",
            "signatureDataUrl": "data:image/png;base64,FFFF",
            "answers": { "Q1": "yes", "Q2": ["a", "b"] }
        }),
    )
    .await;

    // Act
    let responses = get_action(&client, &address, "action=getResponses&surveyId=SR").await;

    // Assert: string stays string, sequence stays sequence, order kept
    let answers = &responses.as_array().unwrap()[0]["answers"];
    assert_eq!(answers["Q1"], "yes");
    assert_eq!(answers["Q2"], json!(["a", "b"]));
}

#[tokio::test]
async fn update_survey_patches_only_mutable_fields() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let created = post_action(
        &client,
        &address,
        "createSurvey",
        &json!({
            "id": "SU",
            "title": "Old title",
            "deadline": "2026-09-01",
            "pin": "7777",
            "createdAt": 1700000000000i64
        }),
    )
    .await
    .json::<Value>()
    .await
    .unwrap();
    assert_eq!(created["pin"], "7777");

    // Act
    let updated = post_action(
        &client,
        &address,
        "updateSurvey",
        &json!({
            "id": "SU",
            "title": "New title",
            "questions": [{ "id": "q1", "type": "text", "label": "Notes?", "options": [], "required": false }],
            "startTime": "2026-08-20"
        }),
    )
    .await
    .json::<Value>()
    .await
    .unwrap();

    // Assert: patched fields changed, immutable fields untouched
    assert_eq!(updated["title"], "New title");
    assert_eq!(updated["startTime"], "2026-08-20");
    assert_eq!(updated["questions"][0]["label"], "Notes?");
    assert_eq!(updated["pin"], "7777");
    assert_eq!(updated["createdAt"], 1700000000000i64);
    assert_eq!(updated["status"], "ACTIVE");

    // Unknown id -> not found, in the uniform error shape
    let missing = post_action(
        &client,
        &address,
        "updateSurvey",
        &json!({ "id": "nope", "title": "x" }),
    )
    .await;
    assert_eq!(missing.status().as_u16(), 404);
    assert_eq!(missing.json::<Value>().await.unwrap()["status"], "error");
}

#[tokio::test]
async fn malformed_post_body_is_treated_as_absent() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: a read action with a garbage body still answers normally
    let response = client
        .post(format!("{}/exec?action=getSurveys", address))
        .header("content-type", "text/plain;charset=utf-8")
        .body("this is {{ not json")
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.json::<Value>().await.unwrap().is_array());

    // A write action without a usable body fails cleanly
    let response = client
        .post(format!("{}/exec?action=saveResponse", address))
        .header("content-type", "text/plain;charset=utf-8")
        .body("also {{ not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn announcement_round_trips_through_settings() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Fresh install: empty, inactive banner
    let empty = get_action(&client, &address, "action=getAnnouncement").await;
    assert_eq!(empty["title"], "");
    assert_eq!(empty["isActive"], false);

    // Act
    let saved = post_action(
        &client,
        &address,
        "saveAnnouncement",
        &json!({ "title": "Notice", "content": "School closed Friday", "isActive": true }),
    )
    .await
    .json::<Value>()
    .await
    .unwrap();
    assert_eq!(saved["status"], "success");

    // Assert
    let announcement = get_action(&client, &address, "action=getAnnouncement").await;
    assert_eq!(announcement["title"], "Notice");
    assert_eq!(announcement["content"], "School closed Friday");
    assert_eq!(announcement["isActive"], true);

    let updated_at = announcement["updatedAt"].as_str().unwrap();
    assert!(
        updated_at.parse::<i64>().is_ok(),
        "updatedAt should be an epoch-ms string, got '{}'",
        updated_at
    );
}

#[tokio::test]
async fn request_fails_when_lock_is_held_past_timeout() {
    // Arrange: an app with a 1 second lock bound, and the store lock
    // already held by someone else
    let data_path = std::env::temp_dir()
        .join(format!("slipform_test_{}.json", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let config = Config {
        data_path: data_path.clone(),
        lock_timeout_secs: 1,
        rust_log: "error".to_string(),
    };

    let store = Workbook::open(&data_path).expect("Failed to open test workbook");
    let state = AppState::new(store, config);
    let lock_holder = state.store.clone();

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let _guard = lock_holder.lock().await;

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/exec?action=getSurveys", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: the request fails instead of running unlocked
    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(response.json::<Value>().await.unwrap()["status"], "error");
}

#[tokio::test]
async fn system_logs_read_newest_first_truncated_to_fifty() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for i in 0..55 {
        post_action(
            &client,
            &address,
            "logAction",
            &json!({ "action": format!("action-{}", i), "user": "admin", "details": "" }),
        )
        .await;
    }

    // Act
    let logs = get_action(&client, &address, "action=getSystemLogs").await;
    let logs = logs.as_array().unwrap();

    // Assert: capped at 50, newest first, oldest five dropped
    assert_eq!(logs.len(), 50);
    assert_eq!(logs[0]["action"], "action-54");
    assert_eq!(logs[49]["action"], "action-5");
    assert!(!logs[0]["timestamp"].as_str().unwrap().is_empty());
}
