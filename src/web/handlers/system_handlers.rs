// src/web/handlers/system_handlers.rs
use crate::app_log;
use crate::web::types::TextResponse;

use rocket::serde::json::Json;

pub async fn health_handler() -> Json<TextResponse> {
    app_log!(debug, "Health check");
    Json(TextResponse::success("OK".to_string()))
}
