//! Paints a retained [`Surface`] with an egui [`Painter`].

use eframe::egui::{
    self, emath::Rot2, Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2,
};

use crate::color_scheme::ColorScheme;
use crate::plot::annotation::AnnotationLayer;
use crate::plot::surface::{ElementClass, Shape, Surface, TextAnchor};

/// Screen placement of a surface: outer rect plus uniform scale.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub outer: Rect,
    pub inner_origin: Pos2,
    pub scale: f32,
}

impl Placement {
    pub fn new(origin: Pos2, surface: &Surface, scale: f32) -> Self {
        let m = surface.margin();
        Self {
            outer: Rect::from_min_size(origin, Vec2::new(surface.width(), surface.height()) * scale),
            inner_origin: origin + Vec2::new(m.left, m.top) * scale,
            scale,
        }
    }

    pub fn inner_rect(&self, surface: &Surface) -> Rect {
        Rect::from_min_size(
            self.inner_origin,
            Vec2::new(surface.inner_width(), surface.inner_height()) * self.scale,
        )
    }

    pub fn to_screen(&self, p: [f32; 2]) -> Pos2 {
        self.inner_origin + Vec2::new(p[0], p[1]) * self.scale
    }

    /// Screen position back to inner-area coordinates; `None` outside the surface.
    pub fn to_surface(&self, pos: Pos2) -> Option<[f32; 2]> {
        if !self.outer.contains(pos) {
            return None;
        }
        let v = (pos - self.inner_origin) / self.scale;
        Some([v.x, v.y])
    }
}

pub fn paint_surface(painter: &Painter, placement: &Placement, surface: &Surface, scheme: ColorScheme) {
    painter.rect_filled(placement.outer, CornerRadius::ZERO, scheme.background());
    let clipped = painter.with_clip_rect(placement.inner_rect(surface).intersect(painter.clip_rect()));
    for el in surface.elements() {
        let target = if el.class == ElementClass::Series {
            &clipped
        } else {
            painter
        };
        paint_shape(target, placement, &el.shape);
    }
}

fn paint_shape(painter: &Painter, pl: &Placement, shape: &Shape) {
    let s = pl.scale;
    match shape {
        Shape::Polyline { points, color, width } => {
            if points.len() < 2 {
                return;
            }
            let pts: Vec<Pos2> = points.iter().map(|p| pl.to_screen(*p)).collect();
            painter.add(egui::Shape::line(pts, Stroke::new(width * s, *color)));
        }
        Shape::Circle { center, radius, fill } => {
            painter.circle_filled(pl.to_screen(*center), radius * s, *fill);
        }
        Shape::Rect { min, size, fill } => {
            let rect = Rect::from_min_size(pl.to_screen(*min), Vec2::new(size[0], size[1]) * s);
            painter.rect_filled(rect, CornerRadius::ZERO, *fill);
        }
        Shape::Line { from, to, color, width } => {
            painter.line_segment([pl.to_screen(*from), pl.to_screen(*to)], Stroke::new(width * s, *color));
        }
        Shape::Text {
            pos,
            text,
            size,
            anchor,
            color,
            rotation,
        } => {
            let font = FontId::proportional(size * s);
            let at = pl.to_screen(*pos);
            if *rotation == 0.0 {
                let align = match anchor {
                    TextAnchor::Start => Align2::LEFT_CENTER,
                    TextAnchor::Middle => Align2::CENTER_CENTER,
                    TextAnchor::End => Align2::RIGHT_CENTER,
                };
                painter.text(at, align, text, font, *color);
            } else {
                let galley = painter.layout_no_wrap(text.clone(), font, *color);
                let ax = match anchor {
                    TextAnchor::Start => 0.0,
                    TextAnchor::Middle => 0.5,
                    TextAnchor::End => 1.0,
                };
                let angle = rotation.to_radians();
                let offset = Rot2::from_angle(angle) * Vec2::new(galley.size().x * ax, galley.size().y / 2.0);
                painter.add(egui::epaint::TextShape::new(at - offset, galley, *color).with_angle(angle));
            }
        }
    }
}

/// Shown tooltips, stacked from the top-left corner of the surface.
pub fn paint_tooltips(painter: &Painter, placement: &Placement, layer: &AnnotationLayer, scheme: ColorScheme) {
    let mut y = 0.0;
    for marker in layer.shown_tooltips() {
        let Some(text) = marker.tooltip.text() else {
            continue;
        };
        let [ox, oy] = marker.tooltip.offset;
        let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(12.0), scheme.tooltip_text());
        let pos = placement.outer.min + Vec2::new(ox, oy + y);
        let rect = Rect::from_min_size(pos, galley.size() + Vec2::splat(8.0));
        painter.rect(
            rect,
            CornerRadius::same(4),
            scheme.tooltip_fill(),
            Stroke::new(1.0, marker.color),
            StrokeKind::Inside,
        );
        painter.galley(pos + Vec2::splat(4.0), galley, Color32::PLACEHOLDER);
        y += rect.height() + 4.0;
    }
}
