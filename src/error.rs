//! Error types for ship packing.

use thiserror::Error;

/// Result type alias for packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing inventory or packing it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Inventory rows are missing columns or carry unusable values.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Configuration outside its documented domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chunk that no package could ever hold on its own.
    #[error(
        "cannot fit {count}x {item_type} (volume {total_volume}, value {total_value}) into any package"
    )]
    UnplaceableChunk {
        item_type: String,
        count: u64,
        total_volume: f64,
        total_value: f64,
    },
}

impl Error {
    /// Item type the error is attributed to, if any.
    pub fn item_type(&self) -> Option<&str> {
        match self {
            Error::UnplaceableChunk { item_type, .. } => Some(item_type),
            _ => None,
        }
    }
}
