use shared::error::SelectionError;
use thiserror::Error;

/// Every way a generation attempt can end without a result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// Caught locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] SelectionError),
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The request never completed, or the response body was unusable.
    #[error("An error occurred: {reason}")]
    Transport { reason: String },
}

impl GenerateError {
    pub fn transport(reason: impl ToString) -> Self {
        Self::Transport {
            reason: reason.to_string(),
        }
    }

    /// Server-side (5xx) rejections and transport failures may succeed on a
    /// second attempt; validation problems will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Rejected { status, .. } => *status >= 500,
            Self::Transport { .. } => true,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
