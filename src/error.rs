use thiserror::Error;

/// Top-level error type for coil geometry construction.
#[derive(Debug, Error)]
pub enum CoilError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Points are colinear or coincident, so no unique circle or arc exists.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    /// A fillet radius that cannot fit against the reference arc.
    #[error("invalid radius {radius}: must be positive and smaller than {limit}")]
    InvalidRadius { radius: f64, limit: f64 },

    /// The requested dimensions cannot be physically realized.
    #[error("infeasible geometry: {0}")]
    Infeasible(String),

    /// A structural precondition on the input dimensions was violated.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Errors related to generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Convenience type alias for results using [`CoilError`].
pub type Result<T> = std::result::Result<T, CoilError>;
