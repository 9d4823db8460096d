use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not load image properties: {0}")]
    DimensionProbe(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Drawing surface unavailable for {width}x{height}")]
    SurfaceUnavailable { width: u32, height: u32 },

    #[error("Failed to encode image as {mime_type}: {reason}")]
    Encode { mime_type: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No edit session is active")]
    NotEditing,

    #[error("No image loaded")]
    NoImage,

    #[error("Video results cannot be edited")]
    VideoNotEditable,
}

impl ReviveError {
    /// Failures that abort an apply without telling the user.
    ///
    /// A missing drawing surface leaves the session intact and is only logged;
    /// everything else is reported upward as a message.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable { .. })
    }

    /// Human-readable message for the status area.
    pub fn user_message(&self) -> String {
        match self {
            Self::DimensionProbe(_) => "Could not load image properties.".to_string(),
            Self::Decode(_) | Self::InvalidDataUrl(_) | Self::Base64(_) => {
                "Failed to load image for editing.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReviveError>;
