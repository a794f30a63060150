//! UI/backend events and error presentation state for the desktop GUI controller.

use client_core::GenerateError;
use shared::{domain::Category, protocol::MeditationResult};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    TagToggled {
        category: Category,
        label: String,
    },
    SubmitClicked,
    RetryClicked,
    GenerationSucceeded(MeditationResult),
    GenerationFailed(GenerateError),
    CopyClicked,
    CopySucceeded,
    CopyFailed(String),
    Tick,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info(_) => "info",
            Self::TagToggled { .. } => "tag_toggled",
            Self::SubmitClicked => "submit_clicked",
            Self::RetryClicked => "retry_clicked",
            Self::GenerationSucceeded(_) => "generation_succeeded",
            Self::GenerationFailed(_) => "generation_failed",
            Self::CopyClicked => "copy_clicked",
            Self::CopySucceeded => "copy_succeeded",
            Self::CopyFailed(_) => "copy_failed",
            Self::Tick => "tick",
        }
    }
}

/// The single visible error, with an optional retry affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    message: String,
    retryable: bool,
}

impl ErrorBanner {
    pub fn from_error(err: &GenerateError) -> Self {
        Self {
            message: err.user_message(),
            retryable: err.is_retryable(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn offers_retry(&self) -> bool {
        self.retryable
    }
}
