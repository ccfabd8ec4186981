//! Media Attachment
//!
//! A node carries at most one media attachment. The engine stores an
//! opaque locator plus layout metadata; uploading and URL issuance happen
//! outside this crate.

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::models::node::ValidationError;

/// Placement of a media attachment relative to the node label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPosition {
    #[default]
    Above,
    Below,
    Left,
    Right,
}

/// Single media attachment with layout metadata.
///
/// `locator` is an opaque reference issued by the host's upload boundary;
/// the engine never dereferences it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttachment {
    /// Opaque reference/locator for the media blob
    pub locator: String,

    /// Placement relative to the node label
    #[serde(default)]
    pub position: MediaPosition,

    /// Display scale factor applied to the intrinsic size
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Intrinsic width, host units
    pub width: f64,

    /// Intrinsic height, host units
    pub height: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl MediaAttachment {
    /// Create an attachment at the default position and scale.
    pub fn new(locator: String, width: f64, height: f64) -> Self {
        Self {
            locator,
            position: MediaPosition::default(),
            scale: 1.0,
            width,
            height,
        }
    }

    /// The size the attachment occupies on the canvas.
    pub fn display_size(&self) -> Size {
        Size::new(self.width * self.scale, self.height * self.scale)
    }

    /// Validate layout metadata.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMedia` when the scale is
    /// non-positive or non-finite, or the intrinsic size is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ValidationError::InvalidMedia(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ValidationError::InvalidMedia(format!(
                "intrinsic size must be non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
