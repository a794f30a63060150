//! Form state and its transitions. Every user action and backend reply goes
//! through [`FormState::apply`], which returns the side effects to run.

use std::time::{Duration, Instant};

use client_core::GenerateError;
use shared::{
    domain::{Category, SelectionState, SelectionValidation},
    error::SelectionError,
    protocol::{GenerateMeditationRequest, MeditationResult},
};

use crate::controller::events::{ErrorBanner, UiEvent};

pub const COPY_COOLDOWN: Duration = Duration::from_secs(2);
pub const COPY_LABEL: &str = "Copy Script";
pub const COPIED_LABEL: &str = "Copied!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Generate(GenerateMeditationRequest),
    CopyToClipboard(String),
}

/// What the result panel shows. The script is plain text and is never
/// interpreted as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub script: String,
    pub audio_src: String,
    pub title: Option<String>,
    pub duration_label: Option<String>,
}

impl From<&MeditationResult> for ResultView {
    fn from(result: &MeditationResult) -> Self {
        Self {
            script: result.script.clone(),
            audio_src: result.audio_url.clone(),
            title: result.display_title().map(str::to_string),
            duration_label: result.duration_label(),
        }
    }
}

#[derive(Debug)]
pub struct FormState {
    selection: SelectionState,
    validation: SelectionValidation,
    request: RequestStatus,
    error: Option<ErrorBanner>,
    result: Option<ResultView>,
    copied_until: Option<Instant>,
    scroll_to_result: bool,
    scroll_to_error: bool,
    status: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        let selection = SelectionState::new();
        let validation = selection.validate();
        Self {
            selection,
            validation,
            request: RequestStatus::Idle,
            error: None,
            result: None,
            copied_until: None,
            scroll_to_result: false,
            scroll_to_error: false,
            status: String::new(),
        }
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) -> Vec<UiEffect> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::TagToggled { category, label } => {
                if self.selection.toggle(category, &label) {
                    self.validation = self.selection.validate();
                } else {
                    tracing::warn!(?category, %label, "ignoring toggle for unknown tag");
                }
                Vec::new()
            }
            UiEvent::SubmitClicked => self.submit(),
            UiEvent::RetryClicked => {
                self.hide_error();
                self.submit()
            }
            UiEvent::GenerationSucceeded(result) => {
                self.request = RequestStatus::Idle;
                self.result = Some(ResultView::from(&result));
                self.scroll_to_result = true;
                Vec::new()
            }
            UiEvent::GenerationFailed(err) => {
                self.request = RequestStatus::Idle;
                tracing::error!("error generating meditation: {err}");
                self.show_error(&err);
                Vec::new()
            }
            UiEvent::CopyClicked => match &self.result {
                Some(result) if self.copy_enabled(now) => {
                    vec![UiEffect::CopyToClipboard(result.script.clone())]
                }
                _ => Vec::new(),
            },
            UiEvent::CopySucceeded => {
                self.copied_until = Some(now + COPY_COOLDOWN);
                Vec::new()
            }
            UiEvent::CopyFailed(reason) => {
                tracing::warn!("failed to copy script: {reason}");
                Vec::new()
            }
            UiEvent::Tick => {
                if self.copied_until.is_some_and(|until| now >= until) {
                    self.copied_until = None;
                }
                Vec::new()
            }
        }
    }

    fn submit(&mut self) -> Vec<UiEffect> {
        if self.request == RequestStatus::InFlight {
            tracing::debug!("ignoring submit while a request is outstanding");
            return Vec::new();
        }

        self.validation = self.selection.validate();
        if !self.validation.is_valid() {
            let err = GenerateError::from(SelectionError::Incomplete {
                missing: self.validation.missing().to_vec(),
            });
            self.show_error(&err);
            return Vec::new();
        }

        let request = GenerateMeditationRequest::from_selection(&self.selection);
        self.request = RequestStatus::InFlight;
        self.hide_error();
        vec![UiEffect::Generate(request)]
    }

    /// Replaces any earlier banner, so at most one retry control exists.
    fn show_error(&mut self, err: &GenerateError) {
        self.error = Some(ErrorBanner::from_error(err));
        self.scroll_to_error = true;
    }

    fn hide_error(&mut self) {
        self.error = None;
        self.scroll_to_error = false;
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_category_invalid(&self, category: Category) -> bool {
        self.validation.is_category_invalid(category)
    }

    pub fn instructions(&self) -> Option<&'static str> {
        self.validation.instructions()
    }

    pub fn is_loading(&self) -> bool {
        self.request == RequestStatus::InFlight
    }

    pub fn submit_enabled(&self) -> bool {
        self.validation.submit_enabled() && !self.is_loading()
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn copy_enabled(&self, now: Instant) -> bool {
        self.result.is_some() && !self.copy_cooling_down(now)
    }

    pub fn copy_label(&self, now: Instant) -> &'static str {
        if self.copy_cooling_down(now) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    fn copy_cooling_down(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    pub fn take_scroll_to_result(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_result)
    }

    pub fn take_scroll_to_error(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(state: &mut FormState, category: Category, label: &str, now: Instant) {
        let effects = state.apply(
            UiEvent::TagToggled {
                category,
                label: label.to_string(),
            },
            now,
        );
        assert!(effects.is_empty());
    }

    fn complete_form(now: Instant) -> FormState {
        let mut state = FormState::new();
        toggle(&mut state, Category::Emotions, "Happy", now);
        toggle(&mut state, Category::Goals, "Focus", now);
        toggle(&mut state, Category::Outcomes, "Mental Clarity", now);
        state
    }

    fn succeeded(script: &str, audio_url: &str) -> UiEvent {
        UiEvent::GenerationSucceeded(MeditationResult {
            id: None,
            script: script.to_string(),
            audio_url: audio_url.to_string(),
            title: None,
            duration_seconds: None,
        })
    }

    #[test]
    fn starts_invalid_with_instructions_and_markers() {
        let state = FormState::new();
        assert!(!state.submit_enabled());
        assert!(state.instructions().is_some());
        for category in Category::ALL {
            assert!(state.is_category_invalid(category));
        }
    }

    #[test]
    fn toggles_drive_validity_and_markers() {
        let now = Instant::now();
        let mut state = FormState::new();
        toggle(&mut state, Category::Emotions, "Calm", now);
        assert!(!state.is_category_invalid(Category::Emotions));
        assert!(state.is_category_invalid(Category::Goals));
        assert!(!state.submit_enabled());

        toggle(&mut state, Category::Goals, "Relaxation", now);
        toggle(&mut state, Category::Outcomes, "Feeling Calm", now);
        assert!(state.submit_enabled());
        assert_eq!(state.instructions(), None);

        toggle(&mut state, Category::Goals, "Relaxation", now);
        assert!(!state.submit_enabled());
        assert!(state.is_category_invalid(Category::Goals));
    }

    #[test]
    fn invalid_submit_shows_error_and_sends_nothing() {
        let now = Instant::now();
        let mut state = FormState::new();
        toggle(&mut state, Category::Emotions, "Happy", now);

        let effects = state.apply(UiEvent::SubmitClicked, now);
        assert!(effects.is_empty());
        assert!(!state.is_loading());
        let banner = state.error().expect("error banner");
        assert_eq!(
            banner.message(),
            "Please select at least one emotion, goal, and outcome."
        );
        assert!(!banner.offers_retry());
        assert!(state.take_scroll_to_error());
        assert!(!state.take_scroll_to_error());
    }

    #[test]
    fn valid_submit_issues_exactly_one_request_and_locks_submit() {
        let now = Instant::now();
        let mut state = complete_form(now);

        let effects = state.apply(UiEvent::SubmitClicked, now);
        assert_eq!(
            effects,
            vec![UiEffect::Generate(GenerateMeditationRequest {
                emotions: vec!["Happy".to_string()],
                goals: vec!["Focus".to_string()],
                outcomes: vec!["Mental Clarity".to_string()],
            })]
        );
        assert!(state.is_loading());
        assert!(!state.submit_enabled());

        assert!(state.apply(UiEvent::SubmitClicked, now).is_empty());
        // Toggling while loading must not re-enable submit.
        toggle(&mut state, Category::Emotions, "Calm", now);
        assert!(!state.submit_enabled());
    }

    #[test]
    fn success_renders_script_and_audio_verbatim() {
        let now = Instant::now();
        let mut state = complete_form(now);
        state.apply(UiEvent::SubmitClicked, now);

        state.apply(succeeded("Breathe in...", "/a.mp3"), now);
        assert!(!state.is_loading());
        assert!(state.submit_enabled());
        let result = state.result().expect("result");
        assert_eq!(result.script, "Breathe in...");
        assert_eq!(result.audio_src, "/a.mp3");
        assert_eq!(result.title, None);
        assert_eq!(result.duration_label, None);
        assert!(state.take_scroll_to_result());
    }

    #[test]
    fn markup_in_script_is_kept_as_text() {
        let now = Instant::now();
        let mut state = complete_form(now);
        state.apply(UiEvent::SubmitClicked, now);
        state.apply(succeeded("<b>Breathe</b> **slowly**", "/a.mp3"), now);
        assert_eq!(
            state.result().expect("result").script,
            "<b>Breathe</b> **slowly**"
        );
    }

    #[test]
    fn title_and_duration_are_rendered_when_present() {
        let now = Instant::now();
        let mut state = complete_form(now);
        state.apply(UiEvent::SubmitClicked, now);
        state.apply(
            UiEvent::GenerationSucceeded(MeditationResult {
                id: None,
                script: "s".to_string(),
                audio_url: "/a.mp3".to_string(),
                title: Some("Happy Focus Meditation".to_string()),
                duration_seconds: Some(5),
            }),
            now,
        );
        let result = state.result().expect("result");
        assert_eq!(result.title.as_deref(), Some("Happy Focus Meditation"));
        assert_eq!(result.duration_label.as_deref(), Some("0:05"));
    }

    #[test]
    fn failure_releases_submit_and_shows_message() {
        let now = Instant::now();
        let mut state = complete_form(now);
        state.apply(UiEvent::SubmitClicked, now);

        state.apply(
            UiEvent::GenerationFailed(GenerateError::Rejected {
                status: 400,
                message: "Please fix the following issues: pick at least one goal".to_string(),
            }),
            now,
        );
        assert!(!state.is_loading());
        assert!(state.submit_enabled());
        let banner = state.error().expect("banner");
        assert_eq!(
            banner.message(),
            "Please fix the following issues: pick at least one goal"
        );
        assert!(!banner.offers_retry());
    }

    #[test]
    fn retry_clears_error_and_resubmits() {
        let now = Instant::now();
        let mut state = complete_form(now);
        state.apply(UiEvent::SubmitClicked, now);
        state.apply(
            UiEvent::GenerationFailed(GenerateError::Rejected {
                status: 500,
                message: "An unexpected error occurred. Please try again later.".to_string(),
            }),
            now,
        );
        assert!(state.error().expect("banner").offers_retry());

        let effects = state.apply(UiEvent::RetryClicked, now);
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], UiEffect::Generate(_)));
        assert!(state.error().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn repeated_failures_keep_a_single_banner() {
        let now = Instant::now();
        let mut state = complete_form(now);
        for _ in 0..3 {
            state.apply(UiEvent::SubmitClicked, now);
            state.apply(
                UiEvent::GenerationFailed(GenerateError::transport("connection reset")),
                now,
            );
        }
        let banner = state.error().expect("banner");
        assert_eq!(banner.message(), "An error occurred: connection reset");
        assert!(banner.offers_retry());
    }

    #[test]
    fn copy_places_script_on_clipboard_then_cools_down() {
        let start = Instant::now();
        let mut state = complete_form(start);
        assert!(state.apply(UiEvent::CopyClicked, start).is_empty());

        state.apply(UiEvent::SubmitClicked, start);
        state.apply(succeeded("Breathe in...", "/a.mp3"), start);

        let effects = state.apply(UiEvent::CopyClicked, start);
        assert_eq!(
            effects,
            vec![UiEffect::CopyToClipboard("Breathe in...".to_string())]
        );
        state.apply(UiEvent::CopySucceeded, start);
        assert_eq!(state.copy_label(start), COPIED_LABEL);
        assert!(!state.copy_enabled(start));
        assert!(state.apply(UiEvent::CopyClicked, start).is_empty());

        let later = start + COPY_COOLDOWN;
        state.apply(UiEvent::Tick, later);
        assert_eq!(state.copy_label(later), COPY_LABEL);
        assert!(state.copy_enabled(later));
    }

    #[test]
    fn copy_failure_is_not_shown_to_the_user() {
        let now = Instant::now();
        let mut state = complete_form(now);
        state.apply(UiEvent::SubmitClicked, now);
        state.apply(succeeded("s", "/a.mp3"), now);
        state.apply(UiEvent::CopyFailed("clipboard unavailable".to_string()), now);
        assert!(state.error().is_none());
        assert_eq!(state.copy_label(now), COPY_LABEL);
    }

    #[test]
    fn info_updates_status_line() {
        let mut state = FormState::new();
        state.apply(
            UiEvent::Info("Backend worker ready".to_string()),
            Instant::now(),
        );
        assert_eq!(state.status(), "Backend worker ready");
    }
}
