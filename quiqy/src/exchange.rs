//! Conversion and display helpers for payment amounts.
//!
//! The gateway quotes an exchange rate alongside each payment; the helpers
//! here apply that rate and render amounts for end users. None of them talk
//! to the network.

use rust_decimal::Decimal;

use crate::currency::CryptoCurrency;

/// Base URL of the hosted payment form.
pub const PAYMENT_FORM_BASE_URL: &str = "https://pay.quiqy.io";

/// Returns the hosted payment form URL for a payment.
///
/// Pure string construction; redirect end users here to complete a payment.
#[must_use]
pub fn payment_form_url(payment_id: &str) -> String {
    format!("{PAYMENT_FORM_BASE_URL}/{payment_id}")
}

/// Converts a fiat amount to crypto using the gateway's rate.
#[must_use]
pub fn crypto_amount(amount_fiat: Decimal, rate: Decimal) -> Decimal {
    amount_fiat * rate
}

/// Converts a crypto amount to fiat using the gateway's rate.
#[must_use]
pub fn fiat_amount(amount_crypto: Decimal, rate: Decimal) -> Decimal {
    amount_crypto * rate
}

/// Renders an amount with the currency's display precision and ticker symbol.
///
/// BTC and ETH use 8 decimal places, the USDT variants 2, everything else 6.
#[must_use]
pub fn format_amount(amount: Decimal, currency: CryptoCurrency) -> String {
    let places = currency.decimal_places();
    format!(
        "{:.precision$} {}",
        amount.round_dp(places),
        currency.symbol(),
        precision = places as usize,
    )
}
