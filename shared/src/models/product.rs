//! Product Model

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of the short display name printed on a physical label.
///
/// The label has room for a single 20-character line next to the barcode;
/// anything longer is rejected at persistence time.
pub const MAX_SHORT_NAME_LEN: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("short name is too long ({0} chars, max {MAX_SHORT_NAME_LEN})")]
    ShortNameTooLong(usize),

    #[error("product code must not be empty")]
    EmptyProductCode,
}

/// Catalog product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Short catalog code entered by the operator (max 4 digits)
    pub product_code: String,
    pub name: String,
    /// Short display name used on the physical label (max 20 chars)
    pub name_short: String,
    /// Assigned EAN-13 string (13 digits)
    pub barcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Product {
    /// Validate invariants that must hold before a product is persisted.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.product_code.trim().is_empty() {
            return Err(ProductValidationError::EmptyProductCode);
        }
        let short_len = self.name_short.chars().count();
        if short_len > MAX_SHORT_NAME_LEN {
            return Err(ProductValidationError::ShortNameTooLong(short_len));
        }
        Ok(())
    }

    /// Derive the label short name from the full name.
    ///
    /// The catalog UI regenerates the short name from the full name on
    /// every rename, discarding manual edits to the short name. That is
    /// the observed legacy behavior and is reproduced as-is, for
    /// catalog tooling to call when it mirrors that rename flow; no
    /// server operation invokes it.
    pub fn derive_short_name(name: &str) -> String {
        name.trim().chars().take(MAX_SHORT_NAME_LEN).collect::<String>().trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name_short: &str) -> Product {
        Product {
            id: Some(1),
            product_code: "1001".to_string(),
            name: "Torneira Cromada 1/2".to_string(),
            name_short: name_short.to_string(),
            barcode: "7898465815771".to_string(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(product("Torneira 1/2").validate().is_ok());
    }

    #[test]
    fn test_short_name_at_limit_is_ok() {
        assert!(product(&"x".repeat(20)).validate().is_ok());
    }

    #[test]
    fn test_short_name_too_long() {
        assert_eq!(
            product(&"x".repeat(21)).validate(),
            Err(ProductValidationError::ShortNameTooLong(21))
        );
    }

    #[test]
    fn test_derive_short_name_truncates() {
        let derived = Product::derive_short_name("Torneira Cromada Monocomando 1/2");
        assert!(derived.chars().count() <= MAX_SHORT_NAME_LEN);
        assert_eq!(derived, "Torneira Cromada Mon");
    }

    #[test]
    fn test_derive_short_name_trims() {
        assert_eq!(Product::derive_short_name("  Registro 3/4  "), "Registro 3/4");
    }
}
