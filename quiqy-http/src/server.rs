//! Axum adapter for the gateway's webhook callbacks.
//!
//! [`webhook_router`] exposes `POST /callback` and feeds each raw request
//! body, together with the shared application context, to the core crate's
//! [`CallbackDispatcher`]. A `Signature` header, when present, is passed to
//! the (currently always-accepting) signature check first.
//!
//! Dispatch errors map to HTTP statuses the gateway understands: 400 for
//! bodies that never reached a handler, 500 for handler failures so the
//! gateway redelivers.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use quiqy::dispatcher::{CallbackDispatcher, WebhookError};

use crate::constants::SIGNATURE_HEADER;

/// Shared state behind the webhook route: the dispatcher plus the opaque
/// context value handed to every handler.
#[derive(Debug)]
pub struct WebhookState<C> {
    /// Dispatcher holding the registered handlers.
    pub dispatcher: CallbackDispatcher<C>,
    /// Context passed through to each handler invocation.
    pub context: C,
}

/// A [`WebhookError`] mapped onto an HTTP response.
///
/// Malformed or invalid payloads answer 400; handler failures answer 500,
/// prompting the gateway to redeliver the webhook.
#[derive(Debug)]
pub struct WebhookRejection(pub WebhookError);

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WebhookError::MalformedPayload(_) | WebhookError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Creates a router exposing the webhook endpoint at `POST /callback`.
pub fn webhook_router<C>(state: Arc<WebhookState<C>>) -> Router
where
    C: Send + Sync + 'static,
{
    Router::new()
        .route("/callback", post(post_callback::<C>))
        .with_state(state)
}

/// `POST /callback` - receives one payment-status notification.
async fn post_callback<C>(
    State(state): State<Arc<WebhookState<C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    C: Send + Sync + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if !state.dispatcher.verify_signature(&body, signature) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.dispatcher.handle_webhook(&body, &state.context).await {
        Ok(ack) => (StatusCode::OK, ack.into_body()).into_response(),
        Err(error) => WebhookRejection(error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use axum::body::Body;
    use http_body_util::BodyExt;
    use quiqy::PaymentCallback;
    use quiqy::dispatcher::{CallbackHandler, HandlerError};
    use tower::ServiceExt;

    use super::*;

    type Journal = Mutex<Vec<String>>;

    struct Recorder {
        label: &'static str,
    }

    impl CallbackHandler<Journal> for Recorder {
        fn handle<'a>(
            &'a self,
            payload: &'a PaymentCallback,
            context: &'a Journal,
        ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>> {
            Box::pin(async move {
                context
                    .lock()
                    .unwrap()
                    .push(format!("{}:{}", self.label, payload.client_order_id));
                Ok(())
            })
        }
    }

    struct Failing;

    impl CallbackHandler<Journal> for Failing {
        fn handle<'a>(
            &'a self,
            _payload: &'a PaymentCallback,
            _context: &'a Journal,
        ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>> {
            Box::pin(async { Err("handler exploded".into()) })
        }
    }

    fn callback_body() -> String {
        serde_json::json!({
            "amount_fiat": 100.5,
            "fiat_currency_id": 1,
            "client_order_id": "order-1",
            "payment_status": "confirmed",
            "payment_created_at": "2024-05-01T12:00:00Z",
            "planned_expiration_at": "2024-05-01T13:00:00Z",
        })
        .to_string()
    }

    fn post(body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/callback")
            .header("content-type", "application/json")
            .header(SIGNATURE_HEADER, "sig-ignored")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_webhook_answers_200_ok() {
        let state = Arc::new(WebhookState {
            dispatcher: CallbackDispatcher::new()
                .with_handler(Recorder { label: "h1" })
                .with_handler(Recorder { label: "h2" }),
            context: Journal::default(),
        });
        let router = webhook_router(Arc::clone(&state));

        let response = router.oneshot(post(&callback_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
        assert_eq!(
            *state.context.lock().unwrap(),
            vec!["h1:order-1", "h2:order-1"],
        );
    }

    #[tokio::test]
    async fn malformed_body_answers_400_without_running_handlers() {
        let state = Arc::new(WebhookState {
            dispatcher: CallbackDispatcher::new().with_handler(Recorder { label: "h1" }),
            context: Journal::default(),
        });
        let router = webhook_router(Arc::clone(&state));

        let response = router.oneshot(post("{not valid json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.context.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_callback_answers_400() {
        let state = Arc::new(WebhookState {
            dispatcher: CallbackDispatcher::<Journal>::new(),
            context: Journal::default(),
        });
        let router = webhook_router(state);

        let response = router
            .oneshot(post(r#"{"client_order_id": "order-1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].as_str().unwrap().contains("validation"));
    }

    #[tokio::test]
    async fn handler_failure_answers_500_so_the_gateway_redelivers() {
        let state = Arc::new(WebhookState {
            dispatcher: CallbackDispatcher::new()
                .with_handler(Recorder { label: "h1" })
                .with_handler(Failing),
            context: Journal::default(),
        });
        let router = webhook_router(Arc::clone(&state));

        let response = router.oneshot(post(&callback_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(*state.context.lock().unwrap(), vec!["h1:order-1"]);
    }
}
