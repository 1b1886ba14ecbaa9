//! Analysis configuration types
//!
//! This module defines the small set of knobs the engine exposes. Roster handling,
//! output paths and the like belong to the application layer.

use crate::types::{AgreementError, Millis, Result};
use serde::{Deserialize, Serialize};

/// Configuration for parsing and comparing annotation streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementConfig {
    /// Size of each comparison block in milliseconds (default: 1000ms)
    #[serde(default = "default_block_size")]
    pub block_size_ms: Millis,

    /// Number of header lines to skip at the top of an annotation file (default: 3)
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
}

fn default_block_size() -> Millis {
    1000
}

fn default_header_lines() -> usize {
    3
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            block_size_ms: default_block_size(),
            header_lines: default_header_lines(),
        }
    }
}

impl AgreementConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the block size
    pub fn with_block_size(mut self, block_size_ms: Millis) -> Self {
        self.block_size_ms = block_size_ms;
        self
    }

    /// Builder method: set the number of header lines
    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    /// Check that the configuration can drive a comparison
    pub fn validate(&self) -> Result<()> {
        if self.block_size_ms == 0 {
            return Err(AgreementError::InvalidConfig(
                "block_size_ms must be greater than zero".to_string(),
            ));
        }
        if usize::try_from(self.block_size_ms).is_err() {
            return Err(AgreementError::InvalidConfig(format!(
                "block_size_ms {} does not fit this platform",
                self.block_size_ms
            )));
        }
        Ok(())
    }
}
