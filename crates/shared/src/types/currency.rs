//! Currency codes and fractional-digit metadata.
//!
//! A `Currency` is only an identifier. How many minor-unit digits it has is
//! answered by a [`CurrencyMetadata`] provider, normally the process-wide
//! [`CurrencyTable`] returned by [`metadata`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, MoneyError, MoneyResult};

/// Largest digit count accepted from a table; `10^18` still fits in `i64`.
pub const MAX_FRACTION_DIGITS: u32 = 18;

/// ISO 4217 style currency code: three ASCII letters, upper case.
///
/// Well-formed but unknown codes are valid identifiers; they only fail when
/// their fractional digits are looked up.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    /// US Dollar
    pub const USD: Self = Self::known(*b"USD");
    /// Euro
    pub const EUR: Self = Self::known(*b"EUR");
    /// Brazilian Real
    pub const BRL: Self = Self::known(*b"BRL");
    /// Pound Sterling
    pub const GBP: Self = Self::known(*b"GBP");
    /// Japanese Yen
    pub const JPY: Self = Self::known(*b"JPY");
    /// Indonesian Rupiah
    pub const IDR: Self = Self::known(*b"IDR");
    /// Singapore Dollar
    pub const SGD: Self = Self::known(*b"SGD");
    /// Kuwaiti Dinar
    pub const KWD: Self = Self::known(*b"KWD");
    /// Chilean Unidad de Fomento
    pub const CLF: Self = Self::known(*b"CLF");
    /// Gold (troy ounce); has no minor unit.
    pub const XAU: Self = Self::known(*b"XAU");

    const fn known(code: [u8; 3]) -> Self {
        assert!(
            code[0].is_ascii_uppercase() && code[1].is_ascii_uppercase() && code[2].is_ascii_uppercase(),
            "currency codes are three upper-case letters"
        );
        Self(code)
    }

    /// Parses a code, accepting lower case input.
    pub fn parse(code: &str) -> MoneyResult<Self> {
        let trimmed = code.trim();
        let bytes: [u8; 3] = trimmed
            .as_bytes()
            .try_into()
            .map_err(|_| MoneyError::UnsupportedCurrency(trimmed.to_string()))?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(MoneyError::UnsupportedCurrency(trimmed.to_string()));
        }
        Ok(Self(bytes.map(|b| b.to_ascii_uppercase())))
    }

    /// Returns the three-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Fractional digits according to the process-wide table.
    pub fn fraction_digits(self) -> MoneyResult<u32> {
        metadata().fraction_digits(self)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Currency {
    type Error = MoneyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

/// Source of minor-unit digit counts.
pub trait CurrencyMetadata: Send + Sync {
    /// Number of digits after the decimal point used by the minor unit.
    ///
    /// Fails with `UnsupportedCurrency` if the currency is unknown or its
    /// digit count is negative.
    fn fraction_digits(&self, currency: Currency) -> MoneyResult<u32>;
}

/// ISO 4217 digit counts; `-1` marks codes without a minor unit.
#[rustfmt::skip]
const ISO_4217: &[(&str, i8)] = &[
    ("AED", 2), ("AFN", 2), ("ALL", 2), ("AMD", 2), ("ANG", 2), ("AOA", 2),
    ("ARS", 2), ("AUD", 2), ("AWG", 2), ("AZN", 2), ("BAM", 2), ("BBD", 2),
    ("BDT", 2), ("BGN", 2), ("BHD", 3), ("BIF", 0), ("BMD", 2), ("BND", 2),
    ("BOB", 2), ("BRL", 2), ("BSD", 2), ("BTN", 2), ("BWP", 2), ("BYN", 2),
    ("BZD", 2), ("CAD", 2), ("CDF", 2), ("CHF", 2), ("CLF", 4), ("CLP", 0),
    ("CNY", 2), ("COP", 2), ("CRC", 2), ("CUP", 2), ("CVE", 2), ("CZK", 2),
    ("DJF", 0), ("DKK", 2), ("DOP", 2), ("DZD", 2), ("EGP", 2), ("ERN", 2),
    ("ETB", 2), ("EUR", 2), ("FJD", 2), ("FKP", 2), ("GBP", 2), ("GEL", 2),
    ("GHS", 2), ("GIP", 2), ("GMD", 2), ("GNF", 0), ("GTQ", 2), ("GYD", 2),
    ("HKD", 2), ("HNL", 2), ("HTG", 2), ("HUF", 2), ("IDR", 2), ("ILS", 2),
    ("INR", 2), ("IQD", 3), ("IRR", 2), ("ISK", 0), ("JMD", 2), ("JOD", 3),
    ("JPY", 0), ("KES", 2), ("KGS", 2), ("KHR", 2), ("KMF", 0), ("KPW", 2),
    ("KRW", 0), ("KWD", 3), ("KYD", 2), ("KZT", 2), ("LAK", 2), ("LBP", 2),
    ("LKR", 2), ("LRD", 2), ("LSL", 2), ("LYD", 3), ("MAD", 2), ("MDL", 2),
    ("MGA", 2), ("MKD", 2), ("MMK", 2), ("MNT", 2), ("MOP", 2), ("MRU", 2),
    ("MUR", 2), ("MVR", 2), ("MWK", 2), ("MXN", 2), ("MYR", 2), ("MZN", 2),
    ("NAD", 2), ("NGN", 2), ("NIO", 2), ("NOK", 2), ("NPR", 2), ("NZD", 2),
    ("OMR", 3), ("PAB", 2), ("PEN", 2), ("PGK", 2), ("PHP", 2), ("PKR", 2),
    ("PLN", 2), ("PYG", 0), ("QAR", 2), ("RON", 2), ("RSD", 2), ("RUB", 2),
    ("RWF", 0), ("SAR", 2), ("SBD", 2), ("SCR", 2), ("SDG", 2), ("SEK", 2),
    ("SGD", 2), ("SHP", 2), ("SLE", 2), ("SOS", 2), ("SRD", 2), ("SSP", 2),
    ("STN", 2), ("SVC", 2), ("SYP", 2), ("SZL", 2), ("THB", 2), ("TJS", 2),
    ("TMT", 2), ("TND", 3), ("TOP", 2), ("TRY", 2), ("TTD", 2), ("TWD", 2),
    ("TZS", 2), ("UAH", 2), ("UGX", 0), ("USD", 2), ("UYI", 0), ("UYU", 2),
    ("UYW", 4), ("UZS", 2), ("VES", 2), ("VND", 0), ("VUV", 0), ("WST", 2),
    ("XAF", 0), ("XCD", 2), ("XOF", 0), ("XPF", 0), ("YER", 2), ("ZAR", 2),
    ("ZMW", 2), ("ZWL", 2),
    ("XAG", -1), ("XAU", -1), ("XBA", -1), ("XBB", -1), ("XBC", -1),
    ("XBD", -1), ("XDR", -1), ("XPD", -1), ("XPT", -1), ("XSU", -1),
    ("XTS", -1), ("XUA", -1), ("XXX", -1),
];

/// Read-only map from currency to its signed digit count.
#[derive(Debug, Clone, Default)]
pub struct CurrencyTable {
    digits: HashMap<Currency, i8>,
}

impl CurrencyTable {
    /// Builds the built-in ISO 4217 table.
    #[must_use]
    pub fn iso4217() -> Self {
        let digits = ISO_4217
            .iter()
            .filter_map(|(code, digits)| Currency::parse(code).ok().map(|c| (c, *digits)))
            .collect();
        Self { digits }
    }

    /// Layers configured entries on top of the ISO 4217 table.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` if a key is not a three-letter code.
    pub fn with_overrides<'a, I>(overrides: I) -> MoneyResult<Self>
    where
        I: IntoIterator<Item = (&'a str, i8)>,
    {
        let mut table = Self::iso4217();
        for (code, digits) in overrides {
            table.digits.insert(Currency::parse(code)?, digits);
        }
        Ok(table)
    }

    /// Returns true if the table has an entry for `currency`, usable or not.
    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.digits.contains_key(&currency)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

impl CurrencyMetadata for CurrencyTable {
    fn fraction_digits(&self, currency: Currency) -> MoneyResult<u32> {
        let Some(&raw) = self.digits.get(&currency) else {
            debug!(%currency, "currency not present in metadata table");
            return Err(MoneyError::UnsupportedCurrency(currency.to_string()));
        };
        match u32::try_from(raw) {
            Ok(digits) if digits <= MAX_FRACTION_DIGITS => Ok(digits),
            _ => {
                debug!(%currency, digits = raw, "currency has no usable minor unit");
                Err(MoneyError::UnsupportedCurrency(currency.to_string()))
            }
        }
    }
}

static METADATA: OnceCell<CurrencyTable> = OnceCell::new();

/// Returns the process-wide table, defaulting to ISO 4217 on first use.
pub fn metadata() -> &'static CurrencyTable {
    METADATA.get_or_init(CurrencyTable::iso4217)
}

/// Installs the process-wide table. Must run before the first lookup.
///
/// # Errors
///
/// Returns `AppError::Configuration` if a table is already in use.
pub fn install(table: CurrencyTable) -> AppResult<()> {
    let entries = table.len();
    METADATA.set(table).map_err(|_| {
        AppError::Configuration("currency metadata table is already initialized".to_string())
    })?;
    info!(entries, "currency metadata table installed");
    Ok(())
}
