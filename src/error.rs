use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Failed to read image file: {0}")]
    ReadFailed(String),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Inference service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("Inference failed: {0}")]
    Rejected(String),

    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to load font: {0}")]
    FontError(String),

    #[error("No image selected")]
    NoImageSelected,

    #[error("Failed to write overlay: {0}")]
    OutputError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OverlayError {
    /// Message shown to the user when a submission fails
    pub fn notification(&self) -> String {
        match self {
            OverlayError::Rejected(message) => format!("Error: {}", message),
            OverlayError::Transport(_)
            | OverlayError::HttpStatus { .. }
            | OverlayError::InvalidResponse(_) => format!("Failed to upload image ({})", self),
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for OverlayError {
    fn from(err: reqwest::Error) -> Self {
        OverlayError::Transport(err.to_string())
    }
}
