//! Webhook callback dispatch.
//!
//! The gateway notifies merchants of payment-status changes by posting a
//! [`PaymentCallback`] to a URL the merchant exposes. The embedding web layer
//! hands the raw request body to [`CallbackDispatcher::handle_webhook`], which
//! parses and validates the payload and then invokes every registered
//! [`CallbackHandler`] in registration order.
//!
//! A handler failure aborts the remaining handlers and surfaces as
//! [`WebhookError::Handler`], so the web layer can answer non-2xx and the
//! gateway redelivers. Ordering is only guaranteed within a single webhook;
//! concurrent webhooks may interleave handler invocations.

use std::fmt::{self, Debug};
use std::future::Future;
use std::pin::Pin;

use crate::callback::{PaymentCallback, WebhookAck};

/// Error type a handler may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A handler invoked for every validated inbound webhook.
///
/// Handlers receive the parsed callback and an opaque context value supplied
/// by the embedding application (typically its shared state). The trait is
/// dyn-compatible for use in heterogeneous handler lists.
pub trait CallbackHandler<C>: Send + Sync {
    /// Processes one payment-status notification.
    fn handle<'a>(
        &'a self,
        payload: &'a PaymentCallback,
        context: &'a C,
    ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>>;
}

impl<C, F> CallbackHandler<C> for F
where
    F: for<'a> Fn(
            &'a PaymentCallback,
            &'a C,
        ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>>
        + Send
        + Sync,
{
    fn handle<'a>(
        &'a self,
        payload: &'a PaymentCallback,
        context: &'a C,
    ) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>> {
        self(payload, context)
    }
}

/// Errors produced while handling an inbound webhook.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The request body is not valid JSON. No handler has run.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(serde_json::Error),
    /// The body is JSON but not a valid callback. No handler has run.
    #[error("webhook payload failed validation: {0}")]
    Validation(serde_json::Error),
    /// A registered handler failed; later handlers were skipped.
    #[error("webhook handler failed: {0}")]
    Handler(HandlerError),
}

/// An ordered collection of webhook handlers.
///
/// `C` is the opaque context value passed through to every handler, usually
/// the embedding application's shared state.
pub struct CallbackDispatcher<C> {
    handlers: Vec<Box<dyn CallbackHandler<C>>>,
}

impl<C> Debug for CallbackDispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("handlers", &format!("[{} handlers]", self.handlers.len()))
            .finish()
    }
}

impl<C> Default for CallbackDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CallbackDispatcher<C> {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers a handler. Handlers run in registration order.
    pub fn register(&mut self, handler: impl CallbackHandler<C> + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Builder-style registration for fluent chains.
    #[must_use]
    pub fn with_handler(mut self, handler: impl CallbackHandler<C> + 'static) -> Self {
        self.register(handler);
        self
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Verifies the gateway's signature on a raw webhook body.
    ///
    /// Placeholder: the gateway's signing scheme is undocumented, so this
    /// accepts everything. Treat the webhook endpoint as unauthenticated
    /// until the scheme is published.
    #[must_use]
    pub fn verify_signature(&self, _raw_body: &[u8], _signature: Option<&str>) -> bool {
        true
    }

    /// Handles one inbound webhook request.
    ///
    /// Parses `raw_body`, validates it as a [`PaymentCallback`], and invokes
    /// every registered handler in order with the same payload and `context`.
    /// The first handler failure aborts the remainder.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::MalformedPayload`] if the body is not JSON.
    /// - [`WebhookError::Validation`] if it is not a valid callback.
    /// - [`WebhookError::Handler`] if a handler failed.
    pub async fn handle_webhook(
        &self,
        raw_body: &[u8],
        context: &C,
    ) -> Result<WebhookAck, WebhookError> {
        let value: serde_json::Value =
            serde_json::from_slice(raw_body).map_err(WebhookError::MalformedPayload)?;
        let payload: PaymentCallback =
            serde_json::from_value(value).map_err(WebhookError::Validation)?;

        for handler in &self.handlers {
            if let Err(error) = handler.handle(&payload, context).await {
                #[cfg(feature = "telemetry")]
                tracing::error!(
                    client_order_id = %payload.client_order_id,
                    status = %payload.payment_status,
                    error = %error,
                    "webhook handler failed",
                );
                return Err(WebhookError::Handler(error));
            }
        }

        Ok(WebhookAck::new())
    }
}
