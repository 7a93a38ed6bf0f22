//! Error types for Quiqy gateway interactions.
//!
//! Two distinct failure families exist:
//!
//! - [`ValidationError`] - local structural failures, caught before a request
//!   leaves the process or immediately after an inbound payload arrives.
//! - [`GatewayError`] - the gateway rejected a request with an HTTP status
//!   code. Each observed code maps to a stable [`ErrorKind`], so callers can
//!   match on the kind instead of comparing raw integers.
//!
//! Transport failures (connection refused, TLS, timeouts) are a third family
//! owned by the HTTP crate; they never masquerade as either of the above.

use std::fmt;

use rust_decimal::Decimal;

use crate::currency::CryptoCurrency;

/// Stable discriminant for a gateway HTTP status code.
///
/// [`ErrorKind::from_status`] is total: well-known codes map to named
/// variants and anything else is carried verbatim in [`ErrorKind::Other`].
/// Two errors with the same status code therefore always compare kind-equal,
/// and two different codes never do, without a pre-registered list of every
/// code the gateway might ever return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request.
    BadRequest,
    /// 401 Unauthorized, typically a bad or missing API key.
    Unauthorized,
    /// 403 Forbidden.
    Forbidden,
    /// 404 Not Found, typically an unknown payment ID.
    NotFound,
    /// 405 Method Not Allowed.
    MethodNotAllowed,
    /// 409 Conflict, typically a duplicate `client_order_id`.
    Conflict,
    /// 422 Unprocessable Entity.
    UnprocessableEntity,
    /// 429 Too Many Requests.
    TooManyRequests,
    /// 500 Internal Server Error.
    InternalServerError,
    /// 502 Bad Gateway.
    BadGateway,
    /// 503 Service Unavailable.
    ServiceUnavailable,
    /// Any status code without a named variant, carried verbatim.
    Other(u16),
}

impl ErrorKind {
    /// Maps an HTTP status code to its kind.
    #[must_use]
    pub const fn from_status(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            409 => Self::Conflict,
            422 => Self::UnprocessableEntity,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            code => Self::Other(code),
        }
    }

    /// Returns the HTTP status code this kind stands for.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict => 409,
            Self::UnprocessableEntity => 422,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
            Self::BadGateway => 502,
            Self::ServiceUnavailable => 503,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// A typed rejection from the gateway.
///
/// Carries the HTTP status code, the gateway's error name (the `msg` field
/// of the wire body), and an optional hint. The kind is always derived from
/// the code via [`ErrorKind::from_status`], never supplied by the caller, so
/// kind identity and code identity cannot drift apart.
///
/// Renders as `[{code}] {name}`, with ` - {hint}` appended when a hint is
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: ErrorKind,
    code: u16,
    name: String,
    hint: Option<String>,
}

impl GatewayError {
    /// Builds a typed error for a status code.
    ///
    /// Empty hint strings are normalized to `None`.
    #[must_use]
    pub fn new(code: u16, name: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            kind: ErrorKind::from_status(code),
            code,
            name: name.into(),
            hint: hint.filter(|hint| !hint.is_empty()),
        }
    }

    /// Returns the stable kind for this error's status code.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status code the gateway answered with.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Returns the gateway's error name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the gateway's hint, if it sent one.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "[{}] {} - {}", self.code, self.name, hint),
            None => write!(f, "[{}] {}", self.code, self.name),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Local validation failure, raised before a request is sent or when an
/// inbound payload fails its structural checks.
///
/// Never retried and never confused with a gateway rejection: a value that
/// fails validation is guaranteed not to have left the process.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// `amount_fiat` must be strictly positive.
    #[error("amount_fiat must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// `client_order_id` must not be empty.
    #[error("client_order_id must not be empty")]
    EmptyClientOrderId,

    /// A URL field failed to parse.
    #[error("{field} is not a valid URL")]
    InvalidUrl {
        /// Name of the offending field.
        field: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The gateway defines no fiat currency with this ID.
    #[error("unknown fiat currency ID {0}")]
    UnknownFiatCurrency(u8),

    /// The gateway defines no crypto currency with this ID.
    #[error("unknown crypto currency ID {0}")]
    UnknownCryptoCurrency(u8),

    /// The currency cannot be selected when detailing a payment.
    #[error("{0} is not available for payment detailing")]
    UnsupportedCryptoCurrency(CryptoCurrency),

    /// A payment ID argument was empty.
    #[error("payment_id must not be empty")]
    EmptyPaymentId,
}
