//! resolve::transforms
//!
//! Stock transforms shared by commands.
//!
//! Transforms run at the resolution boundary so commands only ever see
//! validated, typed values. Each constructor returns a [`TransformFn`]
//! ready to register on a [`ParameterSpec`](super::spec::ParameterSpec).

use std::sync::Arc;

use super::spec::{TransformError, TransformFn};
use super::value::Value;
use crate::api::types::ResourceName;

/// Parse a memory or disk quota into megabytes.
///
/// Accepts a plain megabyte count (`"1024"`), or a value suffixed with
/// `M`/`G` in either case (`"512M"`, `"2g"`). Gigabytes convert at 1024.
pub fn memory_limit() -> TransformFn {
    Arc::new(|raw: &str| {
        let raw = raw.trim();
        let (digits, unit) = match raw.char_indices().last() {
            Some((last, c)) if c.is_ascii_alphabetic() => (&raw[..last], Some(c)),
            _ => (raw, None),
        };

        let count: i64 = digits
            .parse()
            .map_err(|_| TransformError::new(format!("'{}' is not a valid size", raw)))?;
        if count <= 0 {
            return Err(TransformError::new("size must be positive"));
        }

        let megabytes = match unit {
            None | Some('m') | Some('M') => count,
            Some('g') | Some('G') => count
                .checked_mul(1024)
                .ok_or_else(|| TransformError::new("size is too large"))?,
            Some(other) => {
                return Err(TransformError::new(format!(
                    "unknown size unit '{}'; use M or G",
                    other
                )))
            }
        };
        Ok(Value::Int(megabytes))
    })
}

/// Parse a positive integer (e.g. an instance count).
pub fn positive_integer() -> TransformFn {
    Arc::new(|raw: &str| {
        let count: i64 = raw
            .trim()
            .parse()
            .map_err(|_| TransformError::new(format!("'{}' is not a number", raw)))?;
        if count <= 0 {
            return Err(TransformError::new("must be greater than zero"));
        }
        Ok(Value::Int(count))
    })
}

/// Parse a boolean answer (`true`/`false`/`yes`/`no`).
pub fn boolean() -> TransformFn {
    Arc::new(|raw: &str| match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Ok(Value::Bool(true)),
        "false" | "no" | "n" => Ok(Value::Bool(false)),
        _ => Err(TransformError::new(format!(
            "'{}' is not a yes/no value",
            raw
        ))),
    })
}

/// Validate a platform resource name (organization, space, or application).
pub fn resource_name() -> TransformFn {
    Arc::new(|raw: &str| {
        let name =
            ResourceName::new(raw.trim()).map_err(|e| TransformError::new(e.to_string()))?;
        Ok(Value::Str(name.into_string()))
    })
}

/// Minimal email shape check for the login and passwd commands.
pub fn email() -> TransformFn {
    Arc::new(|raw: &str| {
        let raw = raw.trim();
        let valid = raw
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(TransformError::new(format!(
                "'{}' is not an email address",
                raw
            )));
        }
        Ok(Value::Str(raw.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_limit_converts_gigabytes() {
        let t = memory_limit();
        assert_eq!(t("2G").unwrap(), Value::Int(2048));
        assert_eq!(t("1g").unwrap(), Value::Int(1024));
        assert_eq!(t("512M").unwrap(), Value::Int(512));
        assert_eq!(t("1024").unwrap(), Value::Int(1024));
    }

    #[test]
    fn memory_limit_rejects_garbage() {
        let t = memory_limit();
        assert!(t("abc").is_err());
        assert!(t("").is_err());
        assert!(t("-1G").is_err());
        assert!(t("0").is_err());
        assert!(t("2T").unwrap_err().cause.contains("unknown size unit"));
    }

    #[test]
    fn positive_integer_bounds() {
        let t = positive_integer();
        assert_eq!(t("5").unwrap(), Value::Int(5));
        assert!(t("0").is_err());
        assert!(t("five").is_err());
    }

    #[test]
    fn boolean_answers() {
        let t = boolean();
        assert_eq!(t("yes").unwrap(), Value::Bool(true));
        assert_eq!(t("FALSE").unwrap(), Value::Bool(false));
        assert!(t("maybe").is_err());
    }

    #[test]
    fn resource_name_validates() {
        let t = resource_name();
        assert_eq!(t("my-space").unwrap(), Value::Str("my-space".into()));
        assert!(t("").is_err());
        assert!(t("has spaces").is_err());
    }

    #[test]
    fn email_shape() {
        let t = email();
        assert!(t("dev@example.com").is_ok());
        assert!(t("dev@nodot").is_err());
        assert!(t("@example.com").is_err());
        assert!(t("not-an-email").is_err());
    }
}
