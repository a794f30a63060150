use serde::{Deserialize, Serialize};

use crate::domain::{Category, SelectionState};

pub const GENERATE_MEDITATION_PATH: &str = "/api/generate-meditation";
pub const MEDITATION_PATH_PREFIX: &str = "/api/meditation/";

/// Path of a stored meditation, e.g. `/api/meditation/7`.
pub fn meditation_path(id: i64) -> String {
    format!("{MEDITATION_PATH_PREFIX}{id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateMeditationRequest {
    pub emotions: Vec<String>,
    pub goals: Vec<String>,
    pub outcomes: Vec<String>,
}

impl GenerateMeditationRequest {
    pub fn from_selection(selection: &SelectionState) -> Self {
        Self {
            emotions: selection.selected(Category::Emotions),
            goals: selection.selected(Category::Goals),
            outcomes: selection.selected(Category::Outcomes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeditationResult {
    /// Storage id; present when the backend persisted the meditation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub script: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl MeditationResult {
    /// Names the first required field that is blank, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.script.trim().is_empty() {
            Some("script")
        } else if self.audio_url.trim().is_empty() {
            Some("audio_url")
        } else {
            None
        }
    }

    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }

    pub fn duration_label(&self) -> Option<String> {
        self.duration_seconds
            .filter(|seconds| *seconds > 0)
            .map(format_duration)
    }
}

/// `m:ss`, e.g. 125 -> "2:05".
pub fn format_duration(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations_as_minutes_and_padded_seconds() {
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(5), "0:05");
        assert_eq!(format_duration(600), "10:00");
    }

    #[test]
    fn request_lists_selected_labels_in_render_order() {
        let mut selection = SelectionState::new();
        selection.toggle(Category::Emotions, "Calm");
        selection.toggle(Category::Emotions, "Happy");
        selection.toggle(Category::Goals, "Focus");
        selection.toggle(Category::Outcomes, "Mental Clarity");

        let request = GenerateMeditationRequest::from_selection(&selection);
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            serde_json::json!({
                "emotions": ["Happy", "Calm"],
                "goals": ["Focus"],
                "outcomes": ["Mental Clarity"],
            })
        );
    }

    #[test]
    fn parses_minimal_and_full_results() {
        let minimal: MeditationResult =
            serde_json::from_str(r#"{"script":"Breathe in...","audio_url":"/a.mp3"}"#)
                .expect("minimal");
        assert_eq!(minimal.display_title(), None);
        assert_eq!(minimal.duration_label(), None);
        assert_eq!(minimal.missing_required_field(), None);
        assert_eq!(minimal.id, None);

        let full: MeditationResult = serde_json::from_str(
            r#"{"id":7,"script":"s","audio_url":"/b.mp3","title":"Calm Focus Meditation","duration_seconds":125,"created_at":"2024-01-01T00:00:00"}"#,
        )
        .expect("full");
        assert_eq!(full.id, Some(7));
        assert_eq!(full.display_title(), Some("Calm Focus Meditation"));
        assert_eq!(full.duration_label().as_deref(), Some("2:05"));
    }

    #[test]
    fn stored_meditation_path_includes_the_id() {
        assert_eq!(meditation_path(7), "/api/meditation/7");
    }

    #[test]
    fn zero_duration_and_empty_title_are_hidden() {
        let result = MeditationResult {
            id: None,
            script: "s".to_string(),
            audio_url: "/a.mp3".to_string(),
            title: Some(String::new()),
            duration_seconds: Some(0),
        };
        assert_eq!(result.display_title(), None);
        assert_eq!(result.duration_label(), None);
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let result = MeditationResult {
            id: None,
            script: "  ".to_string(),
            audio_url: "/a.mp3".to_string(),
            title: None,
            duration_seconds: None,
        };
        assert_eq!(result.missing_required_field(), Some("script"));
    }
}
