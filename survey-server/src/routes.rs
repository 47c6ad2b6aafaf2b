use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use survey::{QuestionId, ResponseId, SubmitOutcome, SurveyPage};
use survey_html_document::{HtmlOptions, render_document};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{AppState, ServerError, session::SharedPage};

/// Request header asking for the page root's contents only.
pub const FRAGMENT_HEADER: &str = "x-survey-fragment";

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    value: String,
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let page = state.load_page().await;

    if page.is_terminal() {
        return Html(render(&page, None, &headers));
    }

    let (session, shared) = state.sessions.insert(page);
    info!(%session, "session opened");
    let page = shared.lock().await;
    Html(render(&page, Some(session), &headers))
}

pub async fn update_answer(
    State(state): State<AppState>,
    Path((session, question)): Path<(String, String)>,
    headers: HeaderMap,
    Form(answer): Form<AnswerForm>,
) -> Result<Html<String>, ServerError> {
    let (id, shared) = lookup(&state, &session)?;
    let mut page = shared.lock().await;

    if let Some(form) = page.form_mut() {
        form.on_change(&QuestionId::new(question), answer.value);
    } else {
        debug!(%id, state = page.state().name(), "answer for a page without a form");
    }

    Ok(Html(render(&page, Some(id), &headers)))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
    Form(values): Form<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    let (id, shared) = lookup(&state, &session)?;

    // Runs detached so a dropped connection cannot leave the form in flight.
    let catalog = state.catalog.clone();
    let task_page = shared.clone();
    let outcome = tokio::spawn(async move {
        let mut page = task_page.lock().await;
        // A form post carries every control; only edits count as answers.
        if let Some(form) = page.form_mut() {
            for (question, value) in values {
                let question = QuestionId::new(question);
                if form.value(&question) != value {
                    form.on_change(&question, value);
                }
            }
        }
        page.submit(catalog.as_ref()).await
    })
    .await
    .map_err(|err| ServerError::Internal(err.into()))?;

    let page = shared.lock().await;
    if page.is_terminal() {
        state.sessions.remove(&id);
    }

    match outcome {
        Some(SubmitOutcome::Submitted(response_id)) if !wants_fragment(&headers) => {
            info!(%id, %response_id, "redirecting to review");
            Ok(Redirect::to(&format!("/responses/{response_id}")).into_response())
        }
        Some(outcome) => {
            debug!(%id, ?outcome, "submit handled");
            let session = (!page.is_terminal()).then_some(id);
            Ok(Html(render(&page, session, &headers)).into_response())
        }
        None => {
            warn!(%id, state = page.state().name(), "submit for a page without a form");
            Ok(Html(render(&page, None, &headers)).into_response())
        }
    }
}

pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Html<String> {
    let page = SurveyPage::review(&ResponseId::new(id), state.catalog.as_ref()).await;
    Html(render(&page, None, &headers))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn lookup(state: &AppState, session: &str) -> Result<(Uuid, SharedPage), ServerError> {
    let not_found = || ServerError::SessionNotFound(session.to_string());
    let id = Uuid::parse_str(session).map_err(|_| not_found())?;
    let page = state.sessions.get(&id).ok_or_else(not_found)?;
    Ok((id, page))
}

fn wants_fragment(headers: &HeaderMap) -> bool {
    headers.contains_key(FRAGMENT_HEADER)
}

fn render(page: &SurveyPage, session: Option<Uuid>, headers: &HeaderMap) -> String {
    let mut options = HtmlOptions::new().full_document(!wants_fragment(headers));
    if let Some(session) = session {
        options = options
            .with_action(format!("/sessions/{session}/submit"))
            .with_live_url(format!("/sessions/{session}/answers"));
    }
    render_document(page, &options)
}
