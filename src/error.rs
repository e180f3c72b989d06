//! Error type shared by every stage of the icon pipeline.

use thiserror::Error;

/// Errors produced while laying out, rendering, or packaging the icon.
///
/// Every variant is terminal for the current invocation: the pipeline never
/// hands back a partially encoded container.
#[derive(Debug, Error)]
pub enum IconError {
    /// A requested pixel size was not positive.
    #[error("invalid icon size {0}: size must be positive")]
    InvalidSize(u32),

    /// No sizes were requested.
    #[error("cannot build an icon set from an empty size list")]
    EmptyIconSet,

    /// The icon set violates a container constraint or an encoder failed.
    #[error("failed to encode icon: {0}")]
    Encoding(String),

    /// A color string could not be parsed.
    #[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// A configuration value is out of range or could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for IconError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl From<image::ImageError> for IconError {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IconError>;
