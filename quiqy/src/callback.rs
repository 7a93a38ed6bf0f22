//! Webhook callback payload and acknowledgment.
//!
//! A [`PaymentCallback`] is the snapshot the gateway posts when a payment's
//! status changes. It is a flattened, read-only projection of the payment:
//! it carries no payment `id`, correlation happens via `client_order_id`.
//! Each inbound request is consumed exactly once by the dispatcher and never
//! persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{CryptoCurrency, FiatCurrency};
use crate::payment::{FeeSide, PaymentStatus};

/// Snapshot of a payment posted by the gateway on a status change.
///
/// Unlike [`Payment`](crate::payment::Payment), the fee is broken down into
/// separate fiat and crypto amounts, and the planned expiration is explicit.
/// TON may appear here even though it can never be selected for detailing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentCallback {
    /// Amount in fiat currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_fiat: Decimal,
    /// Fiat currency the amount is denominated in.
    pub fiat_currency_id: FiatCurrency,
    /// Caller-supplied idempotency key identifying the order.
    pub client_order_id: String,
    /// Amount in the selected crypto currency.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_crypto: Option<Decimal>,
    /// The selected crypto currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_currency_id: Option<CryptoCurrency>,
    /// Amount the payer has to send, fee included.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub payer_amount_crypto: Option<Decimal>,
    /// Fee denominated in the crypto currency.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_crypto: Option<Decimal>,
    /// Fee denominated in the fiat currency.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_fiat: Option<Decimal>,
    /// Which side the fee is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_side: Option<FeeSide>,
    /// Sender wallet address, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    /// Recipient wallet address, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    /// On-chain transaction hash, once detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Status the payment moved to.
    pub payment_status: PaymentStatus,
    /// When the payment was created.
    pub payment_created_at: DateTime<Utc>,
    /// When the status last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status_updated_at: Option<DateTime<Utc>>,
    /// When the payment is scheduled to expire.
    pub planned_expiration_at: DateTime<Utc>,
}

/// Acknowledgment returned to the gateway after a webhook is handled.
///
/// The gateway only requires a 2xx response; the body schema is unspecified,
/// so extra fields are carried as an open JSON object rather than a strict
/// shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WebhookAck {
    extensions: serde_json::Map<String, serde_json::Value>,
}

impl WebhookAck {
    /// HTTP status the gateway expects.
    pub const STATUS: u16 = 200;
    /// Fixed acknowledgment body.
    pub const TEXT: &'static str = "OK";

    /// Creates an acknowledgment with no extra fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an extra field to the acknowledgment.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Returns the HTTP status to answer with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        Self::STATUS
    }

    /// Returns the response body text.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        Self::TEXT
    }

    /// Returns any extra fields attached to the acknowledgment.
    #[must_use]
    pub const fn extensions(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extensions
    }

    /// Renders the response body for the wire.
    ///
    /// The fixed text when no extras are attached, otherwise the extras as a
    /// JSON object.
    #[must_use]
    pub fn into_body(self) -> String {
        if self.extensions.is_empty() {
            Self::TEXT.to_owned()
        } else {
            serde_json::Value::Object(self.extensions).to_string()
        }
    }
}
