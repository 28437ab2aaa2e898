//! Phone number type for order shipping details.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a phone number fails validation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("phone number must be exactly 10 digits")]
pub struct PhoneNumberError;

/// A shipping contact phone number.
///
/// Orders require exactly 10 ASCII digits, no separators.
///
/// ```
/// use clementine_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("0712345678").is_ok());
/// assert!(PhoneNumber::parse("071234567").is_err());   // too short
/// assert!(PhoneNumber::parse("07123456789").is_err()); // too long
/// assert!(PhoneNumber::parse("07-1234567").is_err());  // separator
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Required number of digits.
    pub const LENGTH: usize = 10;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneNumberError`] unless the input is exactly 10 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if s.len() == Self::LENGTH && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(PhoneNumberError)
        }
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PhoneNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PhoneNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PhoneNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PhoneNumber::parse("0712345678").is_ok());
        assert!(PhoneNumber::parse("0000000000").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("071234567").is_err());
        assert!(PhoneNumber::parse("07123456789").is_err());
    }

    #[test]
    fn test_parse_non_digits() {
        assert!(PhoneNumber::parse("07-1234567").is_err());
        assert!(PhoneNumber::parse("07123456a8").is_err());
        assert!(PhoneNumber::parse("+401234567").is_err());
    }
}
