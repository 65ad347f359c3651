//! Error types for component configuration.

use thiserror::Error;

/// Errors raised while resolving component options into usable geometry.
///
/// These are the only failures a component surfaces to its owner. Stale
/// pointer input and lock contention are not errors; see
/// [`IgnoreReason`](crate::IgnoreReason).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A width, height or thickness that is zero, negative or not finite
    #[error("invalid {name}: {value} (must be finite and greater than zero)")]
    InvalidDimension {
        /// Name of the offending option
        name: &'static str,
        /// The rejected value
        value: f32,
    },

    /// A handle radius, padding or border that is negative or not finite
    #[error("invalid {name}: {value} (must be finite and non-negative)")]
    InvalidInset {
        /// Name of the offending option
        name: &'static str,
        /// The rejected value
        value: f32,
    },

    /// Handle insets leave no room for a track
    #[error("{shape} track has no usable length: {length} minus insets of {inset}")]
    TrackTooShort {
        /// Shape being resolved
        shape: &'static str,
        /// Outer length along the track
        length: f32,
        /// Total inset consumed by handle, padding and border
        inset: f32,
    },

    /// Range minimum is not below its maximum
    #[error("inverted range for {channel}: min {min} must be below max {max}")]
    InvertedRange {
        /// Channel the range belongs to
        channel: &'static str,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// Temperature bounds outside what the kelvin conversion supports
    #[error("temperature bounds {min}..{max} must lie within 2000..40000 K")]
    TemperatureOutOfRange {
        /// Configured minimum temperature
        min: f32,
        /// Configured maximum temperature
        max: f32,
    },

    /// Angle offset is not finite
    #[error("invalid wheel angle: {0}")]
    InvalidAngle(f32),
}

impl ConfigError {
    /// Create a dimension error.
    pub fn dimension(name: &'static str, value: f32) -> Self {
        Self::InvalidDimension { name, value }
    }

    /// Create an inset error.
    pub fn inset(name: &'static str, value: f32) -> Self {
        Self::InvalidInset { name, value }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Wrong number of hex digits
    #[error("expected #rgb, #rrggbb or #rrggbbaa, got '{0}'")]
    Length(String),

    /// A character that is not a hex digit
    #[error("invalid hex digit in '{0}'")]
    Digit(String),
}
