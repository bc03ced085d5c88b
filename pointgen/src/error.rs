//! Error types used by the crate.

use thiserror::Error;

/// Error returned by [`Generalizer::generalize`](crate::Generalizer::generalize).
///
/// All variants describe invalid requests and are returned before any work is done. Problems
/// with individual features (missing properties, missing samples at the requested time step)
/// are never reported as errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneralizeError {
    /// Primary property was not provided.
    #[error("primary property not provided")]
    MissingPrimaryProperty,
    /// Primary property is not a part of the property catalog.
    #[error("primary property `{0}` is not in the property catalog")]
    UnknownPrimaryProperty(String),
    /// Property catalog is empty.
    #[error("there are no properties in the property catalog")]
    EmptyCatalog,
    /// Map resolution was not provided.
    #[error("resolution not provided")]
    MissingResolution,
    /// Map resolution is not a finite positive number.
    #[error("resolution must be a finite positive number, got {0}")]
    InvalidResolution(f64),
    /// Requested value index is negative.
    #[error("value index must be >= 0, got {0}")]
    InvalidValueIndex(i64),
}
