#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Quiqy payment gateway.
//!
//! This crate models the gateway's payment entity and its status lifecycle,
//! validates the request bodies of the four REST operations, and dispatches
//! inbound webhook notifications to registered handlers. It carries no HTTP
//! dependency; the transport lives in the `quiqy-http` crate.
//!
//! # Overview
//!
//! A payment is created against a fiat amount, detailed with a crypto
//! currency, and then driven through its lifecycle by the gateway. Status
//! changes arrive asynchronously as webhook callbacks, which the
//! [`CallbackDispatcher`] validates and fans out to handlers in registration
//! order.
//!
//! # Modules
//!
//! - [`currency`] - Fiat and crypto currency IDs with their support subsets
//! - [`payment`] - Payment entity, statuses, request/response types
//! - [`callback`] - Webhook payload and acknowledgment
//! - [`dispatcher`] - Handler registration and webhook dispatch
//! - [`error`] - Validation errors and typed gateway errors
//! - [`exchange`] - Rate conversion, amount formatting, payment form URL
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod callback;
pub mod currency;
pub mod dispatcher;
pub mod error;
pub mod exchange;
pub mod payment;

pub use callback::{PaymentCallback, WebhookAck};
pub use currency::{CryptoCurrency, FiatCurrency};
pub use dispatcher::{CallbackDispatcher, CallbackHandler, WebhookError};
pub use error::{ErrorKind, GatewayError, ValidationError};
pub use payment::{
    CreatePaymentRequest, DetailPaymentRequest, DetailPaymentResponse, FeeSide,
    GetPaymentResponse, Payment, PaymentStatus, PaymentType, PreCalculation,
};
