#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use polyglot_chatbot::error::ServiceError;
use polyglot_chatbot::message::{ChatResponse, ModelStatus};
use polyglot_chatbot::routes::create_router;
use polyglot_chatbot::services::generator::TextGenerator;
use polyglot_chatbot::services::translator::TranslateBackend;
use polyglot_chatbot::state::AppState;
use tower::util::ServiceExt;

/// Fails every call.
pub struct FailingTranslator;

#[async_trait]
impl TranslateBackend for FailingTranslator {
    async fn translate(&self, _: &str, source: &str, _: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            detail: format!("unsupported language {source}"),
        })
    }
}

/// Prefixes text with `<target>` and records every call.
#[derive(Default)]
pub struct TaggingTranslator {
    pub calls: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl TranslateBackend for TaggingTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));
        Ok(format!("<{target}>{text}"))
    }
}

pub struct PanickingTranslator;

#[async_trait]
impl TranslateBackend for PanickingTranslator {
    async fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, ServiceError> {
        panic!("translator exploded");
    }
}

pub struct SlowTranslator;

#[async_trait]
impl TranslateBackend for SlowTranslator {
    async fn translate(&self, text: &str, _: &str, _: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(text.to_uppercase())
    }
}

/// Always returns the same text.
pub struct FixedGenerator(pub String);

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _: &str) -> Result<String, ServiceError> {
        Ok(self.0.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _: &str) -> Result<String, ServiceError> {
        Err(ServiceError::EmptyOutput)
    }
}

pub struct SlowGenerator;

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("This arrived far too late to matter.".to_string())
    }
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

pub fn app(state: AppState) -> Router {
    create_router(static_dir()).with_state(Arc::new(state))
}

pub async fn post_chat(app: Router, body: &str) -> ChatResponse {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

pub async fn get_model_status(app: Router) -> ModelStatus {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/model_status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}
