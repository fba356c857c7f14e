//! Flash message drain endpoint.
//!
//! ```text
//! GET /api/v1/messages
//! ```

use actix_web::{HttpResponse, get, http::header};

use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::{Flash, FlashMessage};

/// Return and clear the queued flash messages.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses((status = 200, description = "Queued messages, oldest first", body = [FlashMessage])),
    tags = ["messages"],
    operation_id = "drainMessages"
)]
#[get("/messages")]
pub async fn drain_messages(flash: Flash) -> ApiResult<HttpResponse> {
    let messages = flash.drain()?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(messages))
}
