use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing,
};
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    jobs::chat_notifier::{self, NotifyOutcome},
    models::ChatMessage,
};

/// Defines all store-invoked trigger routes.
#[deprecated]
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/triggers",
        Router::new().route(
            "/chats/{chat_id}/messages/{message_id}",
            routing::post(chat_message_created),
        ),
    )
}

/// Defines routes with OpenAPI specs. Should be used over `routes()` where possible.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/triggers",
        OpenApiRouter::new().routes(utoipa_axum::routes!(chat_message_created)),
    )
}

/// Hook invoked by the document store once per created chat message.
#[utoipa::path(
    post,
    path = "/chats/{chat_id}/messages/{message_id}",
    tags = ["Triggers"],
    params(
        ("chat_id" = String, Path, description = "Chat the message was created under"),
        ("message_id" = String, Path, description = "Created message ID")
    ),
    request_body = ChatMessage,
    responses(
        (status = 200, description = "Message processed", body = StdResponse<NotifyOutcome, String>)
    )
)]
async fn chat_message_created(
    Path((chat_id, message_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(message): Json<ChatMessage>,
) -> Result<impl IntoResponse, AppError> {
    let outcome =
        chat_notifier::notify_new_message(&state, &chat_id, &message_id, &message).await?;

    Ok(StdResponse {
        data: Some(outcome),
        message: Some("Message processed successfully"),
    })
}
