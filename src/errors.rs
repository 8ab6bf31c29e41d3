//! Error types.
//!
//! Missing or invalid filter input never errors; the builder treats it as
//! a no-op. The only failures this crate produces itself come from its
//! bundled delegates; external delegates surface their own error type
//! through the terminal methods untouched.

use thiserror::Error;

/// Errors produced by the bundled delegates.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A stored row could not be converted to or from the item type.
    #[error("row conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),
}
