//! Currency identifiers used by the Quiqy gateway.
//!
//! The gateway addresses currencies by small integer IDs, not by ticker
//! symbols. Both enums here serialize as those integers and refuse unknown
//! IDs at the deserialization boundary.
//!
//! Crypto currencies carry two overlapping support subsets: the currencies a
//! payment can be detailed with (excludes TON) and the currencies a callback
//! notification may reference (all of them). Every payment-supported currency
//! is also callback-supported, never the other way around.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A fiat currency the gateway can denominate a payment in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FiatCurrency {
    /// United States dollar (ID 1).
    Usd,
    /// Euro (ID 2).
    Eur,
    /// Russian ruble (ID 3).
    Rub,
}

/// All fiat currencies the gateway defines.
pub const FIAT_CURRENCIES: &[FiatCurrency] =
    &[FiatCurrency::Usd, FiatCurrency::Eur, FiatCurrency::Rub];

impl FiatCurrency {
    /// Returns the gateway's integer ID for this currency.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Usd => 1,
            Self::Eur => 2,
            Self::Rub => 3,
        }
    }

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Rub => "RUB",
        }
    }
}

impl TryFrom<u8> for FiatCurrency {
    type Error = ValidationError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Usd),
            2 => Ok(Self::Eur),
            3 => Ok(Self::Rub),
            other => Err(ValidationError::UnknownFiatCurrency(other)),
        }
    }
}

impl From<FiatCurrency> for u8 {
    fn from(currency: FiatCurrency) -> Self {
        currency.id()
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A crypto currency the gateway can settle a payment in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CryptoCurrency {
    /// Tron (ID 1).
    Trx,
    /// Tether on the TRC-20 network (ID 2).
    UsdtTrc20,
    /// Ethereum (ID 3).
    Eth,
    /// Tether on the ERC-20 network (ID 4).
    UsdtErc20,
    /// Bitcoin (ID 5).
    Btc,
    /// Toncoin (ID 6). Callback-only: cannot be selected when detailing.
    Ton,
}

/// Currencies a payment can be detailed with.
pub const PAYMENT_SUPPORTED: &[CryptoCurrency] = &[
    CryptoCurrency::Trx,
    CryptoCurrency::UsdtTrc20,
    CryptoCurrency::Eth,
    CryptoCurrency::UsdtErc20,
    CryptoCurrency::Btc,
];

/// Currencies a callback notification may reference.
pub const CALLBACK_SUPPORTED: &[CryptoCurrency] = &[
    CryptoCurrency::Trx,
    CryptoCurrency::UsdtTrc20,
    CryptoCurrency::Eth,
    CryptoCurrency::UsdtErc20,
    CryptoCurrency::Btc,
    CryptoCurrency::Ton,
];

impl CryptoCurrency {
    /// Returns the gateway's integer ID for this currency.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Trx => 1,
            Self::UsdtTrc20 => 2,
            Self::Eth => 3,
            Self::UsdtErc20 => 4,
            Self::Btc => 5,
            Self::Ton => 6,
        }
    }

    /// Returns the ticker symbol used for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Trx => "TRX",
            Self::UsdtTrc20 | Self::UsdtErc20 => "USDT",
            Self::Eth => "ETH",
            Self::Btc => "BTC",
            Self::Ton => "TON",
        }
    }

    /// Returns the number of decimal places used when formatting amounts.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Btc | Self::Eth => 8,
            Self::UsdtTrc20 | Self::UsdtErc20 => 2,
            Self::Trx | Self::Ton => 6,
        }
    }

    /// Returns `true` if this currency can be selected when detailing a payment.
    #[must_use]
    pub const fn is_payment_supported(self) -> bool {
        !matches!(self, Self::Ton)
    }

    /// Returns `true` if this currency may appear in a callback notification.
    #[must_use]
    pub const fn is_callback_supported(self) -> bool {
        true
    }
}

impl TryFrom<u8> for CryptoCurrency {
    type Error = ValidationError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Trx),
            2 => Ok(Self::UsdtTrc20),
            3 => Ok(Self::Eth),
            4 => Ok(Self::UsdtErc20),
            5 => Ok(Self::Btc),
            6 => Ok(Self::Ton),
            other => Err(ValidationError::UnknownCryptoCurrency(other)),
        }
    }
}

impl From<CryptoCurrency> for u8 {
    fn from(currency: CryptoCurrency) -> Self {
        currency.id()
    }
}

impl fmt::Display for CryptoCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiat_ids_round_trip() {
        for currency in FIAT_CURRENCIES {
            assert_eq!(FiatCurrency::try_from(currency.id()).unwrap(), *currency);
        }
    }

    #[test]
    fn unknown_fiat_id_is_rejected() {
        assert!(matches!(
            FiatCurrency::try_from(4),
            Err(ValidationError::UnknownFiatCurrency(4)),
        ));
    }

    #[test]
    fn crypto_ids_round_trip() {
        for currency in CALLBACK_SUPPORTED {
            assert_eq!(CryptoCurrency::try_from(currency.id()).unwrap(), *currency);
        }
    }

    #[test]
    fn unknown_crypto_id_is_rejected() {
        assert!(matches!(
            CryptoCurrency::try_from(7),
            Err(ValidationError::UnknownCryptoCurrency(7)),
        ));
    }

    #[test]
    fn payment_subset_is_contained_in_callback_subset() {
        for currency in PAYMENT_SUPPORTED {
            assert!(currency.is_callback_supported());
        }
    }

    #[test]
    fn ton_is_callback_only() {
        assert!(!CryptoCurrency::Ton.is_payment_supported());
        assert!(CryptoCurrency::Ton.is_callback_supported());
        assert!(!PAYMENT_SUPPORTED.contains(&CryptoCurrency::Ton));
        assert!(CALLBACK_SUPPORTED.contains(&CryptoCurrency::Ton));
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&FiatCurrency::Eur).unwrap(), "2");
        assert_eq!(serde_json::to_string(&CryptoCurrency::Btc).unwrap(), "5");
    }

    #[test]
    fn deserializes_from_integer() {
        assert_eq!(
            serde_json::from_str::<CryptoCurrency>("6").unwrap(),
            CryptoCurrency::Ton,
        );
        assert!(serde_json::from_str::<CryptoCurrency>("9").is_err());
    }

    #[test]
    fn usdt_variants_share_a_symbol() {
        assert_eq!(CryptoCurrency::UsdtTrc20.symbol(), "USDT");
        assert_eq!(CryptoCurrency::UsdtErc20.symbol(), "USDT");
        assert_ne!(CryptoCurrency::UsdtTrc20.id(), CryptoCurrency::UsdtErc20.id());
    }
}
