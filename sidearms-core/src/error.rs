//! Error types for the sidearms core library.
//!
//! The weapon memory state machine itself never fails: stale references are
//! repaired and invariant violations are unrepresentable. Errors only come
//! out of the catalog, configuration loading and the save store.

use thiserror::Error;

/// Top-level error type for all sidearms operations.
#[derive(Error, Debug)]
pub enum SidearmsError {
    /// A weapon identity names a definition the catalog does not know.
    #[error("Unknown weapon definition: {0}")]
    UnknownWeaponDef(String),

    /// A weapon identity names a material its definition cannot be made from.
    #[error("Unknown material {material} for weapon definition {def}")]
    UnknownMaterial {
        /// The weapon definition key.
        def: String,
        /// The material key that failed to resolve.
        material: String,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SidearmsError>;
