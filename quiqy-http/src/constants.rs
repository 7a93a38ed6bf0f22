//! HTTP constants for the Quiqy gateway.

/// Base URL of the gateway's main network.
pub const MAIN_NET_URL: &str = "https://external-api.quiqy.io";

/// Header carrying the merchant's API key (client → gateway).
pub const API_KEY_HEADER: &str = "Api-Key";

/// Header carrying the gateway's webhook signature (gateway → merchant).
///
/// Currently unverified; see
/// [`CallbackDispatcher::verify_signature`](quiqy::CallbackDispatcher::verify_signature).
pub const SIGNATURE_HEADER: &str = "Signature";

/// URL of the gateway's API documentation.
pub const API_DOCS_URL: &str = "https://external-api.quiqy.io/docs/doc.json";
