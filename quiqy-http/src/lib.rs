#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport for the Quiqy payment gateway.
//!
//! Provides the gateway client (one reusable session, typed errors on
//! failure statuses) and a feature-gated axum adapter for the inbound
//! webhook endpoint. The data model and dispatch logic live in the `quiqy`
//! core crate.
//!
//! # Modules
//!
//! - [`constants`] - Gateway base URL, header names, docs URL
//! - [`error`] - Client error types
//! - [`client`] - [`QuiqyClient`] and the four payment operations
//! - [`server`] - Webhook router (feature: `server`)
//!
//! # Feature Flags
//!
//! - `server` - Enables the axum webhook adapter
//! - `telemetry` - Enables tracing instrumentation

pub mod client;
pub mod constants;
pub mod error;

#[cfg(feature = "server")]
pub mod server;

pub use client::QuiqyClient;
pub use error::ClientError;
