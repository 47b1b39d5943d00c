//! Web front end for docqa
//!
//! A single page with a form. GET renders it empty, POST validates the
//! submission, runs the RAG engine and renders the answer (or the error
//! string) under the form.

mod form;
mod templates;


use axum::extract::rejection::FormRejection;
use axum::extract::{DefaultBodyLimit, Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use docqa_core::{RAGEngine, RAGQuery};

pub use form::{CleanedForm, UploadForm, ValidationError, REQUIRED_MESSAGE};
pub use templates::{render_errors, render_index, render_result};

/// Prefix of the result text when answering fails
pub const ERROR_PREFIX: &str = "An error occurred: ";

#[derive(Clone)]
pub struct AppState {
    engine: Arc<dyn RAGEngine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn RAGEngine>) -> Self {
        Self { engine }
    }
}

/// Build the application router
///
/// Request bodies are unbounded.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn index() -> Html<String> {
    Html(render_index(&UploadForm::default(), None, ""))
}

async fn submit(
    State(state): State<AppState>,
    form: Result<Form<UploadForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(FormRejection::InvalidFormContentType(rejection)) => {
            log::debug!("not a form submission: {}", rejection);
            UploadForm::default()
        }
        Err(rejection) => {
            log::warn!("unreadable form body: {}", rejection);
            let result = format!("{}{}", ERROR_PREFIX, rejection.body_text());
            return Html(render_index(&UploadForm::default(), None, &result));
        }
    };

    match form.validate() {
        Ok(cleaned) => {
            let result = answer_or_error(state.engine.as_ref(), cleaned.into_query()).await;
            Html(render_index(&form, None, &result))
        }
        Err(errors) => {
            log::debug!("{}", errors);
            Html(render_index(&form, Some(&errors), ""))
        }
    }
}

/// Run the engine and flatten every failure, panics included, into the
/// result text
pub async fn answer_or_error(engine: &dyn RAGEngine, query: RAGQuery) -> String {
    match AssertUnwindSafe(engine.answer(&query)).catch_unwind().await {
        Ok(Ok(result)) => result.answer,
        Ok(Err(err)) => {
            log::warn!("answering failed: {}", err);
            format!("{}{}", ERROR_PREFIX, err)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            log::error!("engine panicked: {}", message);
            format!("{}{}", ERROR_PREFIX, message)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
