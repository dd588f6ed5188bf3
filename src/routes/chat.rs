use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, DEFAULT_LANG, ModelStatus},
    state::{AppState, SharedState},
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable chat body, treating as empty message");
            ChatRequest::default()
        }
    };

    let span = info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        input_lang = %request.input_lang(),
        output_lang = %request.output_lang(),
    );

    // Own task per request so a panic anywhere in the pipeline stays here.
    let reply = tokio::spawn(async move { respond(&state, &request).await }.instrument(span))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ChatResponse::success(reply)))
}

/// Translate in, resolve, translate out.
pub async fn respond(state: &AppState, request: &ChatRequest) -> String {
    let input_lang = request.input_lang();
    let output_lang = request.output_lang();

    let english = if input_lang == DEFAULT_LANG {
        request.message().to_string()
    } else {
        state
            .translator
            .translate(request.message(), &input_lang, DEFAULT_LANG)
            .await
            .into_text()
    };

    let reply = state.resolver.resolve(&english).await;

    let reply = if output_lang == DEFAULT_LANG {
        reply
    } else {
        state
            .translator
            .translate(&reply, DEFAULT_LANG, &output_lang)
            .await
            .into_text()
    };

    info!(chars = reply.chars().count(), "reply ready");
    reply
}

pub async fn model_status_handler(State(state): State<SharedState>) -> Json<ModelStatus> {
    Json(state.model_status())
}
