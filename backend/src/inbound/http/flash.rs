//! One-shot user messages queued in the cookie session.
//!
//! Handlers push messages as workflow outcomes become known; clients fetch and
//! clear the queue via `GET /api/v1/messages`.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

pub(crate) const FLASH_KEY: &str = "flash_messages";

/// Messages kept per session; the oldest are dropped first.
pub(crate) const MAX_QUEUED: usize = 8;

/// Longest message text stored in the session, in characters.
pub(crate) const MAX_MESSAGE_CHARS: usize = 240;

/// Severity shown alongside a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

/// A message displayed to the operator once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    fn clipped(mut self) -> Self {
        if let Some((cut, _)) = self.message.char_indices().nth(MAX_MESSAGE_CHARS) {
            self.message.truncate(cut);
            self.message.push_str("...");
        }
        self
    }
}

/// Session-backed flash queue extractor.
#[derive(Clone)]
pub struct Flash(Session);

impl Flash {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn queued(&self) -> Result<Vec<FlashMessage>, Error> {
        self.0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Append messages to the queue, preserving order.
    ///
    /// The session lives in a size-limited cookie, so long messages are
    /// clipped and only the newest [`MAX_QUEUED`] entries are kept.
    pub fn push_all(&self, messages: impl IntoIterator<Item = FlashMessage>) -> Result<(), Error> {
        let mut queue = self.queued()?;
        let before = queue.len();
        queue.extend(messages.into_iter().map(FlashMessage::clipped));
        if queue.len() == before {
            return Ok(());
        }
        let overflow = queue.len().saturating_sub(MAX_QUEUED);
        queue.drain(..overflow);
        self.0
            .insert(FLASH_KEY, queue)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    pub fn push(&self, message: FlashMessage) -> Result<(), Error> {
        self.push_all([message])
    }

    /// Return every queued message and clear the queue.
    pub fn drain(&self) -> Result<Vec<FlashMessage>, Error> {
        let queue = self.queued()?;
        self.0.remove(FLASH_KEY);
        Ok(queue)
    }
}

impl FromRequest for Flash {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Flash::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn messages_drain_once_in_order() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/push",
                    web::get().to(|flash: Flash| async move {
                        flash.push(FlashMessage::success("first"))?;
                        flash.push(FlashMessage::error("second"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/drain",
                    web::get().to(|flash: Flash| async move {
                        Ok::<_, Error>(HttpResponse::Ok().json(flash.drain()?))
                    }),
                ),
        )
        .await;

        let push =
            test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        let cookie = session_cookie(&push).expect("session cookie set");

        let drained = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/drain")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let cleared = session_cookie(&drained);
        let messages: Vec<FlashMessage> = test::read_body_json(drained).await;
        assert_eq!(
            messages,
            vec![FlashMessage::success("first"), FlashMessage::error("second")]
        );

        let mut again = test::TestRequest::get().uri("/drain");
        if let Some(cookie) = cleared {
            again = again.cookie(cookie);
        }
        let messages: Vec<FlashMessage> =
            test::read_body_json(test::call_service(&app, again.to_request()).await).await;
        assert!(messages.is_empty());
    }

    #[actix_web::test]
    async fn queue_keeps_newest_clipped_messages() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/push",
                    web::get().to(|flash: Flash| async move {
                        flash.push_all(
                            (0..MAX_QUEUED + 4)
                                .map(|n| FlashMessage::info(format!("{n}:{}", "x".repeat(1000)))),
                        )?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/drain",
                    web::get().to(|flash: Flash| async move {
                        Ok::<_, Error>(HttpResponse::Ok().json(flash.drain()?))
                    }),
                ),
        )
        .await;

        let push =
            test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        assert!(push.status().is_success());
        let cookie = session_cookie(&push).expect("session cookie set");

        let drained = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/drain")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let messages: Vec<FlashMessage> = test::read_body_json(drained).await;

        assert_eq!(messages.len(), MAX_QUEUED);
        assert!(messages[0].message.starts_with("4:"));
        assert!(messages[MAX_QUEUED - 1].message.starts_with("11:"));
        assert!(messages.iter().all(|m| m.message.ends_with("...")));
        assert!(
            messages
                .iter()
                .all(|m| m.message.chars().count() == MAX_MESSAGE_CHARS + 3)
        );
    }
}
