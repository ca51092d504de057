//! Color scheme definitions for the plot chrome.
//!
//! Technique colors are fixed (see [`Technique::color`](crate::data::technique::Technique::color));
//! the scheme only covers background, axes, text and tooltip colors, used by
//! both the egui painter and the SVG export.

use egui::{Color32, Context, Visuals};
use serde::{Deserialize, Serialize};

/// Visual theme for the viewer and exported plots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// White background, dark axes. Matches the exported figures.
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn all() -> &'static [ColorScheme] {
        &[ColorScheme::Light, ColorScheme::Dark]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Light => "Light",
            ColorScheme::Dark => "Dark",
        }
    }

    pub fn background(&self) -> Color32 {
        match self {
            ColorScheme::Light => Color32::WHITE,
            ColorScheme::Dark => Color32::from_rgb(27, 27, 27),
        }
    }

    /// Axis lines, ticks and all text.
    pub fn foreground(&self) -> Color32 {
        match self {
            ColorScheme::Light => Color32::from_rgb(17, 17, 17),
            ColorScheme::Dark => Color32::from_rgb(220, 220, 220),
        }
    }

    pub fn tooltip_fill(&self) -> Color32 {
        match self {
            ColorScheme::Light => Color32::from_rgba_unmultiplied(176, 196, 222, 230),
            ColorScheme::Dark => Color32::from_rgba_unmultiplied(60, 70, 90, 230),
        }
    }

    pub fn tooltip_text(&self) -> Color32 {
        self.foreground()
    }

    /// Apply this scheme's visuals to an egui context.
    pub fn apply(&self, ctx: &Context) {
        match self {
            ColorScheme::Light => {
                let mut v = Visuals::light();
                v.extreme_bg_color = self.background();
                ctx.set_visuals(v);
            }
            ColorScheme::Dark => {
                let mut v = Visuals::dark();
                v.extreme_bg_color = self.background();
                ctx.set_visuals(v);
            }
        }
    }
}

/// `#rrggbb`, or `#rrggbbaa` when not opaque.
pub fn to_hex(c: Color32) -> String {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}
