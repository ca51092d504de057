//! Color key: one swatch + label per visible technique, plus a "Minimum" row.

use egui::Color32;

use crate::data::technique::Technique;
use crate::plot::surface::{ElementClass, Shape, Surface, TextAnchor};

/// Vertical distance between consecutive technique entries.
pub const LEGEND_PITCH: f32 = 40.0;
const LEGEND_TOP: f32 = 20.0;
const SWATCH: f32 = 18.0;
const RIGHT_INSET: f32 = 20.0;

pub struct LegendRenderer;

impl LegendRenderer {
    /// Top offset of the entry in `slot`, the position among visible techniques.
    pub fn slot_offset(slot: usize) -> f32 {
        LEGEND_TOP + slot as f32 * LEGEND_PITCH
    }

    /// Append the entry for `technique` in `slot`.
    pub fn draw(surface: &mut Surface, technique: Technique, slot: usize, text_color: Color32) {
        let x = surface.inner_width() - RIGHT_INSET;
        let y = Self::slot_offset(slot);
        let color = technique.color();

        surface.push(
            ElementClass::Legend,
            Shape::Rect {
                min: [x, y],
                size: [SWATCH, SWATCH],
                fill: color,
            },
        );
        surface.push(ElementClass::Legend, label(x, y, technique.label(), text_color));

        let y_min = y + LEGEND_PITCH / 2.0;
        surface.push(
            ElementClass::Legend,
            Shape::Circle {
                center: [x + SWATCH / 2.0, y_min + SWATCH / 2.0],
                radius: technique.look().marker_radius,
                fill: color,
            },
        );
        surface.push(ElementClass::Legend, label(x, y_min, "Minimum", text_color));
    }
}

fn label(x: f32, y: f32, text: &str, color: Color32) -> Shape {
    Shape::Text {
        pos: [x - 6.0, y + SWATCH / 2.0],
        text: text.to_string(),
        size: 12.0,
        anchor: TextAnchor::End,
        color,
        rotation: 0.0,
    }
}
