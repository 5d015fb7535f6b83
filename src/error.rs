use thiserror::Error;

/// Input validation failures for the geometry and topic APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Latitude out of range [-90, 90]: {0}")]
    InvalidLatitude(f64),

    #[error("Longitude out of range [-180, 180]: {0}")]
    InvalidLongitude(f64),

    #[error("Radius must be a finite, non-negative number of meters: {0}")]
    InvalidRadius(f64),

    #[error("Sample distance must be a finite, positive number of meters: {0}")]
    InvalidSampleDistance(f64),

    #[error("Sample divisions must be at least 1: {0}")]
    InvalidSampleDivisions(u32),

    #[error("Circle needs at least {required} samples, budget is {limit}")]
    SampleBudgetExceeded { required: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, GeoError>;
