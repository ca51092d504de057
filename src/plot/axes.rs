//! Axis lines, ticks, tick labels, axis titles and the plot title.

use egui::Color32;

use crate::data::scale::{Scale, ScaleKind};
use crate::plot::surface::{ElementClass, Shape, Surface, TextAnchor};

const TICK: f32 = 6.0;
const X_TICKS: usize = 10;
const Y_TICKS: usize = 8;

/// Texts drawn around the plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    pub title: String,
    pub x: String,
    pub y: String,
}

/// Replace the axis and title elements of `surface` with ones drawn from `x` and `y`.
pub fn draw_axes(surface: &mut Surface, x: &Scale, y: &Scale, labels: &AxisLabels, color: Color32) {
    surface.remove(&[ElementClass::Axis, ElementClass::Title]);
    let w = surface.inner_width();
    let h = surface.inner_height();
    let margin = surface.margin();

    surface.push(ElementClass::Axis, line([0.0, h], [w, h], color));
    for t in x.ticks(X_TICKS) {
        let px = x.map(t);
        if !(-0.5..=w + 0.5).contains(&px) {
            continue;
        }
        surface.push(ElementClass::Axis, line([px, h], [px, h + TICK], color));
        surface.push(
            ElementClass::Axis,
            text([px, h + TICK + 9.0], format_tick(t), 11.0, TextAnchor::Middle, color, 0.0),
        );
    }

    surface.push(ElementClass::Axis, line([0.0, 0.0], [0.0, h], color));
    let y_ticks = y.ticks(Y_TICKS);
    let sparse = y.kind == ScaleKind::Log && log_decades(y) > 6.0;
    for t in y_ticks {
        let py = y.map(t);
        if !(-0.5..=h + 0.5).contains(&py) {
            continue;
        }
        surface.push(ElementClass::Axis, line([-TICK, py], [0.0, py], color));
        if y.kind == ScaleKind::Linear || labels_log_tick(t, sparse) {
            surface.push(
                ElementClass::Axis,
                text([-TICK - 3.0, py], format_tick(t), 11.0, TextAnchor::End, color, 0.0),
            );
        }
    }

    surface.push(
        ElementClass::Axis,
        text([w / 2.0, h + margin.bottom - 10.0], labels.x.clone(), 13.0, TextAnchor::Middle, color, 0.0),
    );
    surface.push(
        ElementClass::Axis,
        text([-margin.left + 12.0, h / 2.0], labels.y.clone(), 13.0, TextAnchor::Middle, color, -90.0),
    );
    surface.push(
        ElementClass::Title,
        text([w / 2.0, -margin.top / 2.0], labels.title.clone(), 18.0, TextAnchor::Middle, color, 0.0),
    );
}

fn log_decades(y: &Scale) -> f64 {
    let (a, b) = y.domain();
    (b / a).abs().log10().abs()
}

/// Log ticks are labelled at mantissas 1, 2 and 5, or only at decades when sparse.
fn labels_log_tick(t: f64, sparse: bool) -> bool {
    let mantissa = (t / 10f64.powf(t.log10().floor())).round() as i64;
    if sparse {
        mantissa == 1
    } else {
        matches!(mantissa, 1 | 2 | 5)
    }
}

/// Compact tick label: trailing zeros trimmed, scientific outside `[1e-3, 1e5)`.
pub fn format_tick(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if !(1e-3..1e5).contains(&a) {
        return format!("{:e}", v);
    }
    let s = format!("{:.6}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn line(from: [f32; 2], to: [f32; 2], color: Color32) -> Shape {
    Shape::Line {
        from,
        to,
        color,
        width: 1.0,
    }
}

fn text(pos: [f32; 2], text: String, size: f32, anchor: TextAnchor, color: Color32, rotation: f32) -> Shape {
    Shape::Text {
        pos,
        text,
        size,
        anchor,
        color,
        rotation,
    }
}
