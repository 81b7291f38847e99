//! Error types for building scheduling constraints.

use thiserror::Error;

/// Result type alias for affinity construction.
pub type AffinityResult<T> = Result<T, AffinityError>;

/// Errors raised while constructing or loading an affinity tree.
///
/// Materialization itself cannot fail; every check happens when a node is
/// built.
#[derive(Debug, Error)]
pub enum AffinityError {
    #[error("topology key must not be empty")]
    EmptyTopologyKey,

    #[error("requirement key must not be empty")]
    EmptyKey,

    #[error("failed to read affinity file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid affinity configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
