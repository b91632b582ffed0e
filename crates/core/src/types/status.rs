//! Invoice status enum.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an [`InvoiceStatus`] from a string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid invoice status: {0}")]
pub struct InvoiceStatusError(pub String);

/// Payment status of an invoice.
///
/// Stored as lowercase text in the database; only these two values are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued but not yet paid.
    #[default]
    Pending,
    /// Settled in full.
    Paid,
}

impl InvoiceStatus {
    /// All valid statuses, in form display order.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Paid];

    /// The lowercase wire/storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = InvoiceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(InvoiceStatusError(s.to_owned())),
        }
    }
}

// SQLx support (with postgres feature). The status column is plain TEXT with
// a CHECK constraint, so encode/decode delegate to the string impls.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for InvoiceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for InvoiceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<Self>().map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for InvoiceStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!("pending".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Pending);
        assert_eq!("paid".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
    }

    #[test]
    fn test_parse_rejects_other_values() {
        assert!("overdue".parse::<InvoiceStatus>().is_err());
        assert!("PAID".parse::<InvoiceStatus>().is_err());
        assert!("".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_display_matches_storage_form() {
        assert_eq!(InvoiceStatus::Pending.to_string(), "pending");
        assert_eq!(InvoiceStatus::Paid.to_string(), "paid");
    }

    #[test]
    fn test_labels() {
        assert_eq!(InvoiceStatus::Pending.label(), "Pending");
        assert_eq!(InvoiceStatus::Paid.label(), "Paid");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");

        let parsed: InvoiceStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, InvoiceStatus::Pending);
    }
}
