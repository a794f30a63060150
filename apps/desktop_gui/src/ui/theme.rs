use eframe::egui::{self, Color32};
use shared::domain::Category;

pub const INVALID_BORDER: Color32 = Color32::from_rgb(239, 68, 68);
pub const ERROR_FILL: Color32 = Color32::from_rgb(111, 53, 53);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(175, 96, 96);
pub const RETRY_FILL: Color32 = Color32::from_rgb(34, 197, 94);

#[derive(Debug, Clone, Copy)]
pub struct TagPalette {
    pub idle_fill: Color32,
    pub idle_text: Color32,
    pub selected_fill: Color32,
    pub selected_text: Color32,
}

pub fn tag_palette(category: Category) -> TagPalette {
    match category {
        Category::Emotions => TagPalette {
            idle_fill: Color32::from_rgb(224, 231, 255),
            idle_text: Color32::from_rgb(55, 48, 163),
            selected_fill: Color32::from_rgb(99, 102, 241),
            selected_text: Color32::WHITE,
        },
        Category::Goals => TagPalette {
            idle_fill: Color32::from_rgb(220, 252, 231),
            idle_text: Color32::from_rgb(22, 101, 52),
            selected_fill: Color32::from_rgb(34, 197, 94),
            selected_text: Color32::WHITE,
        },
        Category::Outcomes => TagPalette {
            idle_fill: Color32::from_rgb(243, 232, 255),
            idle_text: Color32::from_rgb(107, 33, 168),
            selected_fill: Color32::from_rgb(168, 85, 247),
            selected_text: Color32::WHITE,
        },
    }
}

pub fn group_stroke(invalid: bool, visuals: &egui::Visuals) -> egui::Stroke {
    if invalid {
        egui::Stroke::new(1.5, INVALID_BORDER)
    } else {
        egui::Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color)
    }
}
