//! Printer identity and tunable parameters

use serde::{Deserialize, Serialize};

/// Tunable printer parameters
///
/// Units follow the device: 8 dots = 1mm at 203 DPI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Print density (1-15)
    pub darkness: u8,
    /// Label strip width in dots (105mm strip = 3 labels of 33mm + 2 gaps)
    pub width_dots: u32,
    /// Label height in dots
    pub height_dots: u32,
    /// Print speed (1-4)
    pub speed: u8,
    /// Connection port
    pub port: String,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            darkness: 8,
            width_dots: 840,
            height_dots: 176,
            speed: 2,
            port: "USB".to_string(),
        }
    }
}

/// Selected printer identity: a name plus its parameter set.
///
/// Created on first discovery or selection, mutated on re-selection or
/// parameter edit, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrinterIdentity {
    /// Device name as returned by enumeration
    pub name: String,
    pub config: PrinterConfig,
}

impl PrinterIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: PrinterConfig::default(),
        }
    }

    pub fn with_config(name: impl Into<String>, config: PrinterConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}
