use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Polygon needs at least 3 distinct vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("Coordinate is not a finite number: ({lat}, {lon})")]
    NonFiniteCoordinate { lat: f64, lon: f64 },

    #[error("Coordinate cannot be projected: ({lat}, {lon})")]
    OutOfProjectionRange { lat: f64, lon: f64 },

    #[error("Polygon has zero area")]
    ZeroArea,

    #[error("Polygon is too small for an inset of {distance} m")]
    InsetTooLarge { distance: f64 },

    #[error("Waypoint spacing must be a positive distance, got {spacing}")]
    InvalidSpacing { spacing: f64 },
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{reason}")]
    Validation { reason: String },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unknown command")]
    UnknownCommand { command: Option<String> },

    #[error("Outbound channel error: {0}")]
    Channel(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
