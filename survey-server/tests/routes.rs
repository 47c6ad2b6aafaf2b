use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use survey::{
    Catalog, ChoiceQuestion, MemoryCatalog, Question, QuestionKind, ResponseId, Survey,
    SurveyDefinition,
};
use survey_server::{AppState, router, routes::FRAGMENT_HEADER};
use tower::ServiceExt;

const TTL: Duration = Duration::from_secs(60);

fn catalog() -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog::new().with_survey(SurveyDefinition::new(
        Survey::new("s1", "Customer feedback"),
        vec![
            Question::new("name", "What is your name?", QuestionKind::Text)
                .required()
                .with_order(1),
            Question::new("age", "How old are you?", QuestionKind::Number).with_order(2),
            Question::new(
                "agree",
                "Do you agree?",
                QuestionKind::Radio(ChoiceQuestion::new(["Yes", "No"])),
            )
            .with_order(3),
        ],
    )))
}

fn app(catalog: Arc<dyn Catalog>) -> (Router, AppState) {
    let state = AppState::new(catalog, TTL);
    (router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str, fragment: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if fragment {
        builder = builder.header(FRAGMENT_HEADER, "1");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Pull the session id out of the form's action URL.
fn session_id(html: &str) -> String {
    let start = html.find("/sessions/").expect("page has a session") + "/sessions/".len();
    html[start..start + 36].to_string()
}

#[tokio::test]
async fn health() {
    let (app, _) = app(catalog());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn index_opens_a_session() {
    let (app, state) = app(catalog());

    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("What is your name?"));
    assert!(body.contains("disabled>Submit survey</button>"));
    assert_eq!(state.session_count(), 1);
    let session = session_id(&body);
    assert!(body.contains(&format!("data-live=\"/sessions/{session}/answers\"")));
}

#[tokio::test]
async fn missing_survey_renders_error_without_session() {
    let (app, state) = app(Arc::new(MemoryCatalog::new()));

    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No survey found"));
    assert!(!body.contains("<form"));
    assert_eq!(state.session_count(), 0);
}

#[tokio::test]
async fn answer_updates_validate_live() {
    let (app, _) = app(catalog());
    let (_, body) = send(&app, get("/")).await;
    let session = session_id(&body);

    let (status, fragment) = send(
        &app,
        post_form(&format!("/sessions/{session}/answers/age"), "value=abc", true),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(fragment.starts_with("<form"));
    assert!(fragment.contains("Enter a valid number."));
    assert!(fragment.contains("value=\"abc\""));

    let (_, fragment) = send(
        &app,
        post_form(&format!("/sessions/{session}/answers/age"), "value=", true),
    )
    .await;
    assert!(!fragment.contains("Enter a valid number."));
}

#[tokio::test]
async fn blocked_submit_shows_messages() {
    let catalog = catalog();
    let (app, state) = app(catalog.clone());
    let (_, body) = send(&app, get("/")).await;
    let session = session_id(&body);

    let (status, fragment) = send(
        &app,
        post_form(&format!("/sessions/{session}/submit"), "age=200", true),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(fragment.contains("This field is required."));
    assert!(fragment.contains("Enter a value between 0 and 150."));
    assert!(fragment.contains("Please fix the highlighted fields."));
    assert_eq!(catalog.create_calls(), 0);
    assert_eq!(state.session_count(), 1);
}

#[tokio::test]
async fn submit_with_fragment_returns_review() {
    let catalog = catalog();
    let (app, state) = app(catalog.clone());
    let (_, body) = send(&app, get("/")).await;
    let session = session_id(&body);

    let (status, fragment) = send(
        &app,
        post_form(
            &format!("/sessions/{session}/submit"),
            "name=Ada+Lovelace&age=36&agree=Yes",
            true,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(fragment.contains("Your submission"));
    assert!(fragment.contains("Ada Lovelace"));
    assert!(fragment.contains("<dd>Yes</dd>"));
    assert_eq!(catalog.response_count(), 1);
    assert_eq!(state.session_count(), 0);

    let (status, _) = send(
        &app,
        post_form(&format!("/sessions/{session}/submit"), "", true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plain_submit_redirects_to_review() {
    let (app, _) = app(catalog());
    let (_, body) = send(&app, get("/")).await;
    let session = session_id(&body);

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/sessions/{session}/submit"),
            "name=Ada&agree=No",
            false,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/responses/"));

    let (status, body) = send(&app, get(&location)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("What is your name?"));
    assert!(body.contains("<dd>No</dd>"));
}

#[tokio::test]
async fn untouched_fields_are_not_stored() {
    let catalog = catalog();
    let (app, _) = app(catalog.clone());
    let (_, body) = send(&app, get("/")).await;
    let session = session_id(&body);

    send(
        &app,
        post_form(&format!("/sessions/{session}/answers/name"), "value=Ada", true),
    )
    .await;
    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/sessions/{session}/submit"),
            "name=Ada&age=",
            false,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    let id = ResponseId::new(location.trim_start_matches("/responses/"));
    assert_eq!(
        catalog.stored_answers(&id).unwrap(),
        [("name".to_string(), "Ada".to_string())]
    );
}

#[tokio::test]
async fn failed_submit_keeps_session_for_retry() {
    let catalog = Arc::new(
        MemoryCatalog::new()
            .with_survey(SurveyDefinition::new(
                Survey::new("s1", "Customer feedback"),
                vec![Question::new("name", "What is your name?", QuestionKind::Text)],
            ))
            .failing_creates("service unavailable"),
    );
    let (app, state) = app(catalog.clone());
    let (_, body) = send(&app, get("/")).await;
    let session = session_id(&body);

    let (_, fragment) = send(
        &app,
        post_form(&format!("/sessions/{session}/submit"), "name=Ada", true),
    )
    .await;

    assert!(fragment.contains("service unavailable"));
    assert!(fragment.contains("value=\"Ada\""));
    assert_eq!(state.session_count(), 1);

    catalog.set_create_failure(None);
    let (_, fragment) = send(
        &app,
        post_form(&format!("/sessions/{session}/submit"), "name=Ada", true),
    )
    .await;
    assert!(fragment.contains("Your submission"));
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (app, _) = app(catalog());

    let (status, body) = send(
        &app,
        post_form("/sessions/not-a-session/answers/name", "value=x", true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Session not found"));

    let (status, _) = send(
        &app,
        post_form(
            "/sessions/7f1d3a52-33a4-4a8e-9b0e-3c6f3f1b2a10/submit",
            "name=x",
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_of_unknown_response_is_error_page() {
    let (app, _) = app(catalog());

    let (status, body) = send(&app, get("/responses/nope")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Not found: response nope"));
}
