//! Catalog error model.

use thiserror::Error;

/// Result type used across the catalog layers.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Store-backed operation a failure happened in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Create,
    Update,
    Delete,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::List => "fetch products",
            StoreOperation::Create => "create product",
            StoreOperation::Update => "update product",
            StoreOperation::Delete => "delete product",
        }
    }
}

impl core::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog-level error.
///
/// Every failure a manager operation can surface is one of these kinds. The
/// `Display` output is what callers see; `StorageUnavailable::detail` is kept
/// for server-side logs only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// A required field was missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// An identifier was syntactically malformed.
    #[error("{0}")]
    InvalidIdentifier(String),

    /// A well-formed identifier matched no record.
    #[error("{0}")]
    NotFound(String),

    /// The store failed (connectivity, timeout, driver fault).
    #[error("Failed to {operation}")]
    StorageUnavailable {
        operation: StoreOperation,
        detail: String,
    },
}

impl CatalogError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage_unavailable(operation: StoreOperation, detail: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            operation,
            detail: detail.into(),
        }
    }
}
