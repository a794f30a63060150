use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

pub const SELECTION_INSTRUCTIONS: &str =
    "Please select at least one option from each category to enable the Generate Meditation button.";

const EMOTIONS: &[&str] = &["Happy", "Sad", "Anxious", "Calm", "Angry", "Excited"];
const GOALS: &[&str] = &["Relaxation", "Focus", "Better Sleep", "Stress Relief"];
const OUTCOMES: &[&str] = &[
    "Feeling Calm",
    "Increased Energy",
    "Mental Clarity",
    "Emotional Balance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Emotions,
    Goals,
    Outcomes,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Emotions, Category::Goals, Category::Outcomes];

    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Self::Emotions => EMOTIONS,
            Self::Goals => GOALS,
            Self::Outcomes => OUTCOMES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Emotions => "Emotions",
            Self::Goals => "Goals",
            Self::Outcomes => "Outcomes",
        }
    }

    /// Singular noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Emotions => "emotion",
            Self::Goals => "goal",
            Self::Outcomes => "outcome",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Emotions => 0,
            Self::Goals => 1,
            Self::Outcomes => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub label: &'static str,
    pub selected: bool,
}

/// Toggle state for every tag of every category, kept in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    groups: [Vec<Tag>; 3],
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        let group = |category: Category| {
            category
                .vocabulary()
                .iter()
                .map(|label| Tag {
                    label: *label,
                    selected: false,
                })
                .collect::<Vec<_>>()
        };
        Self {
            groups: Category::ALL.map(group),
        }
    }

    pub fn tags(&self, category: Category) -> &[Tag] {
        &self.groups[category.index()]
    }

    /// Flips one tag. Returns `false` when the label is not part of the category.
    pub fn toggle(&mut self, category: Category, label: &str) -> bool {
        match self.groups[category.index()]
            .iter_mut()
            .find(|tag| tag.label == label)
        {
            Some(tag) => {
                tag.selected = !tag.selected;
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, category: Category, label: &str) -> bool {
        self.tags(category)
            .iter()
            .any(|tag| tag.label == label && tag.selected)
    }

    pub fn selected(&self, category: Category) -> Vec<String> {
        self.tags(category)
            .iter()
            .filter(|tag| tag.selected)
            .map(|tag| tag.label.to_string())
            .collect()
    }

    pub fn validate(&self) -> SelectionValidation {
        let missing = Category::ALL
            .into_iter()
            .filter(|category| !self.tags(*category).iter().any(|tag| tag.selected))
            .collect();
        SelectionValidation { missing }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionValidation {
    missing: Vec<Category>,
}

impl SelectionValidation {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn submit_enabled(&self) -> bool {
        self.is_valid()
    }

    pub fn is_category_invalid(&self, category: Category) -> bool {
        self.missing.contains(&category)
    }

    pub fn missing(&self) -> &[Category] {
        &self.missing
    }

    pub fn instructions(&self) -> Option<&'static str> {
        (!self.is_valid()).then_some(SELECTION_INSTRUCTIONS)
    }
}

/// Builds a selection from free-form labels, matching vocabulary entries
/// case-insensitively.
pub fn selection_from_labels(
    emotions: &[String],
    goals: &[String],
    outcomes: &[String],
) -> Result<SelectionState, SelectionError> {
    let mut state = SelectionState::new();
    for (category, labels) in [
        (Category::Emotions, emotions),
        (Category::Goals, goals),
        (Category::Outcomes, outcomes),
    ] {
        for raw in labels {
            let wanted = raw.trim();
            let Some(label) = category
                .vocabulary()
                .iter()
                .find(|label| label.eq_ignore_ascii_case(wanted))
            else {
                return Err(SelectionError::UnknownLabel {
                    category,
                    label: raw.clone(),
                    allowed: category.vocabulary().join(", "),
                });
            };
            if !state.is_selected(category, label) {
                state.toggle(category, label);
            }
        }
    }
    Ok(state)
}
