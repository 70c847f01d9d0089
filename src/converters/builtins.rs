//! Builtin converters for the XML-Schema scalar types
//!
//! Every builtin except [`Passthrough`] converts empty text to
//! [`Value::Null`]; the passthrough returns the trimmed text itself, so an
//! empty string stays an empty string.

use crate::error::{Error, Result};
use crate::values::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::SharedConverter;

/// Default conversion: trimmed input text, unchanged, as a string value
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl super::Converter for Passthrough {
    fn convert(&self, text: &str) -> Result<Value> {
        Ok(Value::Text(text.trim().to_string()))
    }
}

/// Converter for the XSD integer family
#[derive(Debug, Clone, Copy, Default)]
pub struct ToInteger;

impl super::Converter for ToInteger {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let i: i64 = text
            .parse()
            .map_err(|_| Error::conversion(format!("'{}' is not an integer", text)))?;
        Ok(Value::Integer(i))
    }
}

/// Converter for `xsd:decimal`
#[derive(Debug, Clone, Copy, Default)]
pub struct ToDecimal;

impl super::Converter for ToDecimal {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let d = text
            .parse()
            .map_err(|_| Error::conversion(format!("'{}' is not a decimal", text)))?;
        Ok(Value::Decimal(d))
    }
}

/// Converter for `xsd:float` and `xsd:double`
///
/// Accepts the XSD spellings `INF`, `-INF` and `NaN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToFloat;

impl super::Converter for ToFloat {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let v = match text {
            "INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            _ => text
                .parse()
                .map_err(|_| Error::conversion(format!("'{}' is not a float", text)))?,
        };
        Ok(Value::Float(v))
    }
}

/// Converter for `xsd:boolean`
///
/// Accepts `true`/`false` case-insensitively plus the XSD literals `1`/`0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToBoolean;

impl super::Converter for ToBoolean {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Boolean(true)),
            "false" | "0" => Ok(Value::Boolean(false)),
            _ => Err(Error::conversion(format!("'{}' is not a boolean", text))),
        }
    }
}

/// Converter for `xsd:date`
#[derive(Debug, Clone, Copy, Default)]
pub struct ToDate;

impl super::Converter for ToDate {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let d = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| Error::conversion(format!("'{}' is not a date", text)))?;
        Ok(Value::Date(d))
    }
}

/// Converter for `xsd:dateTime`
///
/// Accepts an RFC 3339 timestamp with offset; a naive timestamp without
/// one is taken as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToDateTime;

impl super::Converter for ToDateTime {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Value::DateTime(dt));
        }
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| Error::conversion(format!("'{}' is not a dateTime", text)))?;
        Ok(Value::DateTime(naive.and_utc().fixed_offset()))
    }
}

/// Converter for `xsd:time`
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTime;

impl super::Converter for ToTime {
    fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let t = NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .map_err(|_| Error::conversion(format!("'{}' is not a time", text)))?;
        Ok(Value::Time(t))
    }
}

/// Builtin pattern table, built once and never mutated afterward
pub(super) fn table() -> &'static [(&'static str, SharedConverter)] {
    static TABLE: Lazy<Vec<(&'static str, SharedConverter)>> = Lazy::new(|| {
        vec![
            (
                "byte|short|int|integer|long|negativeInteger|nonNegativeInteger\
                 |nonPositiveInteger|positiveInteger|unsignedByte|unsignedInt\
                 |unsignedLong|unsignedShort",
                Arc::new(ToInteger) as SharedConverter,
            ),
            ("decimal", Arc::new(ToDecimal) as SharedConverter),
            ("float|double", Arc::new(ToFloat) as SharedConverter),
            ("boolean", Arc::new(ToBoolean) as SharedConverter),
            ("date", Arc::new(ToDate) as SharedConverter),
            ("dateTime", Arc::new(ToDateTime) as SharedConverter),
            ("time", Arc::new(ToTime) as SharedConverter),
            (
                "string|normalizedString|token",
                Arc::new(Passthrough) as SharedConverter,
            ),
        ]
    });
    &TABLE
}

#[cfg(test)]
mod tests {
    use super::super::Converter;
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_passthrough_trims() {
        assert_eq!(
            Passthrough.convert("  hello  ").unwrap(),
            Value::Text("hello".to_string())
        );
        // Empty text stays an empty string, not nil
        assert_eq!(Passthrough.convert("").unwrap(), Value::Text(String::new()));
    }

    #[test]
    fn test_integer() {
        assert_eq!(ToInteger.convert(" -42 ").unwrap(), Value::Integer(-42));
        assert!(ToInteger.convert("forty-two").is_err());
    }

    #[test]
    fn test_integer_empty_is_null() {
        assert_eq!(ToInteger.convert("").unwrap(), Value::Null);
        assert_eq!(ToInteger.convert("   ").unwrap(), Value::Null);
    }

    #[test]
    fn test_decimal() {
        let expected = Value::Decimal("19.99".parse::<Decimal>().unwrap());
        assert_eq!(ToDecimal.convert("19.99").unwrap(), expected);
        assert!(ToDecimal.convert("nineteen").is_err());
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(ToFloat.convert("INF").unwrap(), Value::Float(f64::INFINITY));
        assert_eq!(ToFloat.convert("-INF").unwrap(), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(ToFloat.convert("NaN").unwrap(), Value::Float(v) if v.is_nan()));
        assert_eq!(ToFloat.convert("2.5").unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(ToBoolean.convert("true").unwrap(), Value::Boolean(true));
        assert_eq!(ToBoolean.convert("TRUE").unwrap(), Value::Boolean(true));
        assert_eq!(ToBoolean.convert("False").unwrap(), Value::Boolean(false));
        assert_eq!(ToBoolean.convert("1").unwrap(), Value::Boolean(true));
        assert_eq!(ToBoolean.convert("0").unwrap(), Value::Boolean(false));
        assert!(ToBoolean.convert("maybe").is_err());
    }

    #[test]
    fn test_date() {
        let expected = Value::Date(NaiveDate::from_ymd_opt(2012, 3, 4).unwrap());
        assert_eq!(ToDate.convert("2012-03-04").unwrap(), expected);
        assert_eq!(ToDate.convert("").unwrap(), Value::Null);
        assert!(ToDate.convert("2012-13-99").is_err());
    }

    #[test]
    fn test_datetime_with_offset() {
        let expected = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2012, 3, 4, 5, 6, 7)
            .unwrap();
        assert_eq!(
            ToDateTime.convert("2012-03-04T05:06:07+01:00").unwrap(),
            Value::DateTime(expected)
        );
    }

    #[test]
    fn test_datetime_naive_is_utc() {
        let expected = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2012, 3, 4, 5, 6, 7)
            .unwrap();
        assert_eq!(
            ToDateTime.convert("2012-03-04T05:06:07").unwrap(),
            Value::DateTime(expected)
        );
    }

    #[test]
    fn test_time() {
        let expected = Value::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(ToTime.convert("08:30:00").unwrap(), expected);
        assert!(ToTime.convert("25:00:00").is_err());
    }
}
