//! Payment entity and the request/response types of the four gateway
//! operations.
//!
//! A payment is created in [`PaymentStatus::Detailing`] and moves to
//! [`PaymentStatus::Pending`] once a crypto currency is selected via the
//! detail-payment call. Every later transition is driven by the gateway and
//! only observed here, either by polling or through a callback notification.
//! This crate never mutates a payment's status locally.
//!
//! Monetary amounts travel as JSON numbers and are modeled as
//! [`Decimal`] so arithmetic stays exact. Optional fields decode to `None`
//! when absent: "not yet known" is never conflated with "known to be zero".

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{VecSkipError, serde_as};
use url::Url;

use crate::currency::{CryptoCurrency, FiatCurrency};
use crate::error::ValidationError;

/// Lifecycle status of a payment, as reported by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Created, waiting for a crypto currency to be selected.
    Detailing,
    /// Currency selected, waiting for funds.
    Pending,
    /// An incoming transaction was detected on-chain.
    Detected,
    /// The transaction reached enough confirmations.
    Confirmed,
    /// Expired before a currency was selected.
    Undetailed,
    /// Expired before a transaction was detected.
    Undetected,
    /// A transaction was detected but never confirmed.
    Unconfirmed,
}

impl PaymentStatus {
    /// Returns `true` once the gateway will no longer change this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Undetailed | Self::Undetected | Self::Unconfirmed
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Detailing => "detailing",
            Self::Pending => "pending",
            Self::Detected => "detected",
            Self::Confirmed => "confirmed",
            Self::Undetailed => "undetailed",
            Self::Undetected => "undetected",
            Self::Unconfirmed => "unconfirmed",
        };
        f.write_str(status)
    }
}

/// How a payment was initiated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Paid through the hosted payment form.
    Form,
}

/// Which party the gateway's fee is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeSide {
    /// The merchant absorbs the fee.
    Merchant,
    /// The payer covers the fee on top of the amount.
    Payer,
}

impl fmt::Display for FeeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merchant => "merchant",
            Self::Payer => "payer",
        })
    }
}

/// A payment tracked by the gateway.
///
/// The crypto-side fields (`amount_crypto`, `crypto_currency_id`, addresses,
/// fee) stay `None` until the currency-selection step has happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Opaque payment ID assigned by the gateway.
    pub id: String,
    /// Amount in fiat currency, fixed at creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_fiat: Decimal,
    /// Fiat currency the amount is denominated in.
    pub fiat_currency_id: FiatCurrency,
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
    /// Gateway fee amount.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee: Option<Decimal>,
    /// Which side the fee is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_toggle: Option<FeeSide>,
    /// Caller-supplied idempotency key, unique within the caller's orders.
    pub client_order_id: String,
    /// Current lifecycle status.
    pub status: PaymentStatus,
    /// How the payment was initiated.
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    /// Time to live in seconds.
    pub ttl: u64,
    /// Whether the payment was confirmed manually by the gateway's support.
    pub confirmed_manually: bool,
    /// Sender wallet address, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    /// Recipient wallet address, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    /// On-chain transaction hash, once detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// URL the gateway posts status notifications to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Redirect target after a successful payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    /// Redirect target after a failed payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
    /// When the payment was created.
    pub created_at: DateTime<Utc>,
    /// When the payment was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /payment`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount in fiat currency. Must be strictly positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_fiat: Decimal,
    /// URL to receive status notifications on.
    pub callback_url: String,
    /// Idempotency key unique within the caller's order space.
    pub client_order_id: String,
    /// Fiat currency to denominate the payment in.
    pub fiat_currency_id: FiatCurrency,
    /// Optional redirect target after a successful payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    /// Optional redirect target after a failed payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
}

impl CreatePaymentRequest {
    /// Checks the request before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the amount is not positive, the client
    /// order ID is empty, or any of the URL fields fails to parse.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_fiat <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount_fiat));
        }
        if self.client_order_id.is_empty() {
            return Err(ValidationError::EmptyClientOrderId);
        }
        check_url("callback_url", &self.callback_url)?;
        if let Some(url) = &self.success_url {
            check_url("success_url", url)?;
        }
        if let Some(url) = &self.fail_url {
            check_url("fail_url", url)?;
        }
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    Url::parse(value)
        .map(drop)
        .map_err(|source| ValidationError::InvalidUrl { field, source })
}

/// Request body for `POST /payment/{id}/detail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPaymentRequest {
    /// Crypto currency to settle the payment in.
    pub crypto_currency_id: CryptoCurrency,
}

impl DetailPaymentRequest {
    /// Checks that the selected currency can actually be paid with.
    ///
    /// The gateway accepts detailing only with the payment-supported subset;
    /// TON exists solely in callback notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedCryptoCurrency`] for a
    /// callback-only currency.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.crypto_currency_id.is_payment_supported() {
            return Err(ValidationError::UnsupportedCryptoCurrency(
                self.crypto_currency_id,
            ));
        }
        Ok(())
    }
}

/// Response body of `GET /payment/{id}`.
///
/// Crypto currency IDs the gateway added after this crate was published are
/// skipped rather than failing the whole response.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetPaymentResponse {
    /// Currencies the payment can currently be detailed with.
    #[serde_as(as = "VecSkipError<_>")]
    pub available_crypto_currency_ids: Vec<CryptoCurrency>,
    /// The payment itself.
    pub payment: Payment,
}

/// Response body of `POST /payment/{id}/detail`.
///
/// Structurally identical to [`GetPaymentResponse`] on the wire, but kept as
/// a distinct type so the compiler can prevent accidental misuse.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailPaymentResponse {
    /// Currencies the payment can currently be detailed with.
    #[serde_as(as = "VecSkipError<_>")]
    pub available_crypto_currency_ids: Vec<CryptoCurrency>,
    /// The payment, now in [`PaymentStatus::Pending`].
    pub payment: Payment,
}

/// Response body of `GET /payment/{id}/calculation`.
///
/// A rate quote for one candidate currency; computing it does not change the
/// payment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreCalculation {
    /// Amount in the candidate crypto currency at the current rate.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_crypto: Decimal,
    /// The candidate crypto currency.
    pub crypto_currency_id: CryptoCurrency,
    /// Gateway fee for this currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    /// Which side the fee would be attributed to.
    pub fee_toggle: FeeSide,
    /// Amount the payer would have to send, fee included.
    #[serde(with = "rust_decimal::serde::float")]
    pub payer_amount_crypto: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            amount_fiat: Decimal::new(10050, 2),
            callback_url: "https://merchant.example/callback".into(),
            client_order_id: "order-1".into(),
            fiat_currency_id: FiatCurrency::Usd,
            success_url: None,
            fail_url: None,
        }
    }

    #[test]
    fn valid_create_request_passes() {
        valid_request().validate().unwrap();
    }

    #[test]
    fn non_positive_amount_fails_validation() {
        let mut request = valid_request();
        request.amount_fiat = Decimal::ZERO;
        assert!(matches!(
            request.validate(),
            Err(ValidationError::NonPositiveAmount(_)),
        ));

        request.amount_fiat = Decimal::NEGATIVE_ONE;
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_client_order_id_fails_validation() {
        let mut request = valid_request();
        request.client_order_id = String::new();
        assert!(matches!(
            request.validate(),
            Err(ValidationError::EmptyClientOrderId),
        ));
    }

    #[test]
    fn malformed_urls_fail_validation() {
        let mut request = valid_request();
        request.callback_url = "not a url".into();
        assert!(matches!(
            request.validate(),
            Err(ValidationError::InvalidUrl {
                field: "callback_url",
                ..
            }),
        ));

        let mut request = valid_request();
        request.success_url = Some("also not a url".into());
        assert!(matches!(
            request.validate(),
            Err(ValidationError::InvalidUrl {
                field: "success_url",
                ..
            }),
        ));
    }

    #[test]
    fn detail_request_rejects_callback_only_currency() {
        let request = DetailPaymentRequest {
            crypto_currency_id: CryptoCurrency::Ton,
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::UnsupportedCryptoCurrency(CryptoCurrency::Ton)),
        ));

        let request = DetailPaymentRequest {
            crypto_currency_id: CryptoCurrency::Btc,
        };
        request.validate().unwrap();
    }

    #[test]
    fn create_request_serializes_without_absent_options() {
        let value = serde_json::to_value(valid_request()).unwrap();
        assert_eq!(value["amount_fiat"], serde_json::json!(100.5));
        assert_eq!(value["fiat_currency_id"], serde_json::json!(1));
        assert!(value.get("success_url").is_none());
        assert!(value.get("fail_url").is_none());
    }

    #[test]
    fn payment_decodes_absent_optionals_as_none() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "id": "pay-1",
            "amount_fiat": 100.5,
            "fiat_currency_id": 1,
            "client_order_id": "order-1",
            "status": "detailing",
            "type": "form",
            "ttl": 3600,
            "confirmed_manually": false,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z",
        }))
        .unwrap();

        assert_eq!(payment.status, PaymentStatus::Detailing);
        assert_eq!(payment.amount_crypto, None);
        assert_eq!(payment.crypto_currency_id, None);
        assert_eq!(payment.fee, None);
        assert_eq!(payment.tx_hash, None);
    }

    #[test]
    fn detailed_payment_decodes_crypto_fields() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "id": "pay-2",
            "amount_fiat": 50.0,
            "fiat_currency_id": 2,
            "amount_crypto": 0.0005,
            "crypto_currency_id": 5,
            "payer_amount_crypto": 0.000525,
            "fee": 0.000025,
            "fee_toggle": "payer",
            "client_order_id": "order-2",
            "status": "pending",
            "type": "form",
            "ttl": 3600,
            "confirmed_manually": false,
            "from_address": "bc1qsender",
            "to_address": "bc1qrecipient",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:05:00Z",
        }))
        .unwrap();

        assert_eq!(payment.crypto_currency_id, Some(CryptoCurrency::Btc));
        assert_eq!(payment.fee_toggle, Some(FeeSide::Payer));
        assert_eq!(payment.amount_crypto, Some("0.0005".parse().unwrap()));
    }

    #[test]
    fn unknown_available_currency_ids_are_skipped() {
        let response: GetPaymentResponse = serde_json::from_value(serde_json::json!({
            "available_crypto_currency_ids": [1, 5, 42, 2],
            "payment": {
                "id": "pay-3",
                "amount_fiat": 10.0,
                "fiat_currency_id": 3,
                "client_order_id": "order-3",
                "status": "detailing",
                "type": "form",
                "ttl": 900,
                "confirmed_manually": false,
                "created_at": "2024-05-01T12:00:00Z",
                "updated_at": "2024-05-01T12:00:00Z",
            },
        }))
        .unwrap();

        assert_eq!(
            response.available_crypto_currency_ids,
            vec![
                CryptoCurrency::Trx,
                CryptoCurrency::Btc,
                CryptoCurrency::UsdtTrc20,
            ],
        );
    }

    #[test]
    fn status_terminality() {
        assert!(!PaymentStatus::Detailing.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Detected.is_terminal());
        assert!(PaymentStatus::Confirmed.is_terminal());
        assert!(PaymentStatus::Undetected.is_terminal());
    }

    #[test]
    fn pre_calculation_decodes() {
        let calc: PreCalculation = serde_json::from_value(serde_json::json!({
            "amount_crypto": 95.2,
            "crypto_currency_id": 2,
            "fee": 1.9,
            "fee_toggle": "merchant",
            "payer_amount_crypto": 95.2,
        }))
        .unwrap();

        assert_eq!(calc.crypto_currency_id, CryptoCurrency::UsdtTrc20);
        assert_eq!(calc.fee_toggle, FeeSide::Merchant);
        assert_eq!(calc.fee, "1.9".parse().unwrap());
    }
}
