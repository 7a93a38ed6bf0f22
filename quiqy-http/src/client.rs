//! HTTP client for the Quiqy gateway.
//!
//! [`QuiqyClient`] wraps the gateway's four payment operations over a single
//! reusable `reqwest` session. The session is created lazily on first use,
//! shared by all concurrent calls from the same instance, and can be closed
//! explicitly; a closed client transparently opens a fresh session on its
//! next request.
//!
//! ## Error Handling
//!
//! Responses with status >= 400 are decoded as the gateway's `{msg, hint}`
//! error body and surface as a typed [`GatewayError`] keyed on the status
//! code. Transport failures and undecodable success bodies get their own
//! [`ClientError`] variants, and request models are validated locally before
//! anything is sent.

use std::fmt::{self, Debug};
use std::sync::Mutex;
use std::time::Duration;

use http::StatusCode;
use quiqy::payment::{
    CreatePaymentRequest, DetailPaymentRequest, DetailPaymentResponse, GetPaymentResponse, Payment,
    PreCalculation,
};
use quiqy::{CryptoCurrency, GatewayError, ValidationError};
use reqwest::Client;
use serde::Deserialize;

use crate::constants::{API_KEY_HEADER, MAIN_NET_URL};
use crate::error::ClientError;

/// Wire shape of the gateway's error responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// A client for the Quiqy payment gateway.
///
/// One instance owns one lazily created connection pool; clones of the pool
/// handed to in-flight requests survive [`QuiqyClient::close`], so closing
/// never aborts a request already underway.
pub struct QuiqyClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Merchant API key, sent as the `Api-Key` header on every request.
    api_key: String,
    /// Per-request timeout.
    timeout: Duration,
    /// Lazily created session. Locked only to fetch or drop the handle,
    /// never across an await.
    session: Mutex<Option<Client>>,
}

impl Debug for QuiqyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuiqyClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl QuiqyClient {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the gateway's main network.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: MAIN_NET_URL.to_owned(),
            api_key: api_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            session: Mutex::new(None),
        }
    }

    /// Overrides the gateway base URL. Trailing slashes are stripped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drops the underlying session and its connection pool.
    ///
    /// Idempotent: closing an already-closed client does nothing. The next
    /// request creates a fresh session.
    pub fn close(&self) {
        let mut guard = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }

    /// Returns the cached session, creating it on first use.
    fn session(&self) -> Client {
        let mut guard = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get_or_insert_with(Client::new).clone()
    }

    /// Creates a payment in the `detailing` state.
    ///
    /// `POST /payment`; see [`crate::constants::API_DOCS_URL`], operation
    /// `createPayment`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] before any network call if the
    /// request fails its local checks, otherwise the usual transport,
    /// decode, and gateway errors.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "quiqy.client.create_payment", skip_all, err)
    )]
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<Payment, ClientError> {
        request.validate()?;
        let url = format!("{}/payment", self.base_url);
        self.post_json(url, "POST /payment", request).await
    }

    /// Fetches a payment and the currencies it can be detailed with.
    ///
    /// `GET /payment/{payment_id}`; see [`crate::constants::API_DOCS_URL`],
    /// operation `getPayment`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for an empty `payment_id`,
    /// otherwise the usual transport, decode, and gateway errors.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "quiqy.client.get_payment", skip_all, err)
    )]
    pub async fn get_payment(&self, payment_id: &str) -> Result<GetPaymentResponse, ClientError> {
        check_payment_id(payment_id)?;
        let url = format!("{}/payment/{payment_id}", self.base_url);
        self.get_json(url, "GET /payment/{id}").await
    }

    /// Quotes the payer amount for one candidate crypto currency.
    ///
    /// `GET /payment/{payment_id}/calculation`; see
    /// [`crate::constants::API_DOCS_URL`], operation `preCalculatePayment`.
    /// Does not change the payment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for an empty `payment_id`,
    /// otherwise the usual transport, decode, and gateway errors.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "quiqy.client.pre_calculate_payment", skip_all, err)
    )]
    pub async fn pre_calculate_payment(
        &self,
        payment_id: &str,
        crypto_currency: CryptoCurrency,
    ) -> Result<PreCalculation, ClientError> {
        check_payment_id(payment_id)?;
        let url = format!(
            "{}/payment/{payment_id}/calculation?to_crypto_currency_id={}",
            self.base_url,
            crypto_currency.id(),
        );
        self.get_json(url, "GET /payment/{id}/calculation").await
    }

    /// Selects a crypto currency, moving the payment to `pending`.
    ///
    /// `POST /payment/{payment_id}/detail`; see
    /// [`crate::constants::API_DOCS_URL`], operation `detailPayment`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] before any network call for an
    /// empty `payment_id` or a callback-only currency, otherwise the usual
    /// transport, decode, and gateway errors.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "quiqy.client.detail_payment", skip_all, err)
    )]
    pub async fn detail_payment(
        &self,
        payment_id: &str,
        request: &DetailPaymentRequest,
    ) -> Result<DetailPaymentResponse, ClientError> {
        check_payment_id(payment_id)?;
        request.validate()?;
        let url = format!("{}/payment/{payment_id}/detail", self.base_url);
        self.post_json(url, "POST /payment/{id}/detail", request)
            .await
    }

    /// Generic POST helper handling headers, timeout, and error mapping.
    ///
    /// `context` is a human-readable identifier used in error messages.
    async fn post_json<T, R>(
        &self,
        url: String,
        context: &'static str,
        payload: &T,
    ) -> Result<R, ClientError>
    where
        T: serde::Serialize + Sync + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .session()
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|source| ClientError::Transport { context, source })?;
        decode_response(response, context).await
    }

    /// Generic GET helper handling headers, timeout, and error mapping.
    async fn get_json<R>(&self, url: String, context: &'static str) -> Result<R, ClientError>
    where
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .session()
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ClientError::Transport { context, source })?;
        decode_response(response, context).await
    }
}

fn check_payment_id(payment_id: &str) -> Result<(), ValidationError> {
    if payment_id.is_empty() {
        return Err(ValidationError::EmptyPaymentId);
    }
    Ok(())
}

/// Decodes a gateway response: JSON body below 400, typed error at or above.
///
/// An error body that is missing or unparseable still yields a
/// [`GatewayError`], with `msg` falling back to `"Unknown error"`.
async fn decode_response<R>(
    response: reqwest::Response,
    context: &'static str,
) -> Result<R, ClientError>
where
    R: serde::de::DeserializeOwned,
{
    let status = response.status();
    if status < StatusCode::BAD_REQUEST {
        return response
            .json::<R>()
            .await
            .map_err(|source| ClientError::Decode { context, source });
    }

    let body = response
        .text()
        .await
        .map_err(|source| ClientError::BodyRead { context, source })?;
    let wire: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
    Err(GatewayError::new(
        status.as_u16(),
        wire.msg.unwrap_or_else(|| "Unknown error".to_owned()),
        wire.hint,
    )
    .into())
}
