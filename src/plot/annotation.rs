//! Minimum markers and their hover tooltips.
//!
//! Every update tears the layer down and rebuilds it, so a tooltip can only
//! ever describe the extremum of the last completed update.

use egui::Color32;

use crate::data::extremum::ExtremumPoint;
use crate::data::scale::ScaleEngine;
use crate::data::technique::{Technique, TechniqueLook};
use crate::plot::surface::{ElementClass, Shape, Surface};

/// Where a shown tooltip sits inside the tooltip overlay.
pub const TOOLTIP_OFFSET: [f32; 2] = [10.0, 10.0];

/// Visibility of one marker's tooltip.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipState {
    Hidden,
    Shown { text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    state: TooltipState,
    pub offset: [f32; 2],
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            state: TooltipState::Hidden,
            offset: TOOLTIP_OFFSET,
        }
    }
}

impl Tooltip {
    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, TooltipState::Shown { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match &self.state {
            TooltipState::Shown { text } => Some(text),
            TooltipState::Hidden => None,
        }
    }

    fn show(&mut self, text: String) {
        self.state = TooltipState::Shown { text };
    }

    fn hide(&mut self) {
        self.state = TooltipState::Hidden;
    }
}

/// A drawn minimum with its own tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumMarker {
    pub point: ExtremumPoint,
    /// Inner-area pixel position.
    pub center: [f32; 2],
    pub radius: f32,
    pub color: Color32,
    pub tooltip: Tooltip,
}

impl MinimumMarker {
    pub fn contains(&self, pos: [f32; 2]) -> bool {
        let dx = pos[0] - self.center[0];
        let dy = pos[1] - self.center[1];
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Literal extremum coordinates, one per line.
    pub fn tooltip_text(&self) -> String {
        format!("x: {}\ny: {}", self.point.x, self.point.y)
    }
}

/// Pointer crossed a marker boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverChange {
    pub technique: Technique,
    pub point: ExtremumPoint,
    pub entered: bool,
}

#[derive(Debug, Default)]
pub struct AnnotationLayer {
    markers: Vec<MinimumMarker>,
}

impl AnnotationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all markers together with their tooltips.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Place a marker for `point` on `surface` and register its tooltip.
    pub fn draw(&mut self, surface: &mut Surface, scales: &ScaleEngine, point: ExtremumPoint, look: &TechniqueLook) {
        let center = [scales.x.map(point.x), scales.y.map(point.y)];
        surface.push(
            ElementClass::Marker,
            Shape::Circle {
                center,
                radius: look.marker_radius,
                fill: look.color,
            },
        );
        self.markers.push(MinimumMarker {
            point,
            center,
            radius: look.marker_radius,
            color: look.color,
            tooltip: Tooltip::default(),
        });
    }

    pub fn markers(&self) -> &[MinimumMarker] {
        &self.markers
    }

    pub fn marker(&self, technique: Technique) -> Option<&MinimumMarker> {
        self.markers.iter().find(|m| m.point.technique == technique)
    }

    /// Pointer entered marker `index`: reveal its tooltip.
    pub fn pointer_enter(&mut self, index: usize) -> Option<HoverChange> {
        let marker = self.markers.get_mut(index)?;
        if marker.tooltip.is_shown() {
            return None;
        }
        let text = marker.tooltip_text();
        marker.tooltip.show(text);
        Some(HoverChange {
            technique: marker.point.technique,
            point: marker.point,
            entered: true,
        })
    }

    /// Pointer left marker `index`: hide and clear its tooltip.
    pub fn pointer_leave(&mut self, index: usize) -> Option<HoverChange> {
        let marker = self.markers.get_mut(index)?;
        if !marker.tooltip.is_shown() {
            return None;
        }
        marker.tooltip.hide();
        Some(HoverChange {
            technique: marker.point.technique,
            point: marker.point,
            entered: false,
        })
    }

    /// Hit-test every marker against the pointer (`None` = pointer outside the
    /// plot) and apply the resulting enter/leave transitions.
    pub fn pointer_moved(&mut self, pos: Option<[f32; 2]>) -> Vec<HoverChange> {
        let mut changes = Vec::new();
        for i in 0..self.markers.len() {
            let inside = pos.is_some_and(|p| self.markers[i].contains(p));
            let change = if inside {
                self.pointer_enter(i)
            } else {
                self.pointer_leave(i)
            };
            changes.extend(change);
        }
        changes
    }

    /// Markers whose tooltip is currently shown.
    pub fn shown_tooltips(&self) -> impl Iterator<Item = &MinimumMarker> {
        self.markers.iter().filter(|m| m.tooltip.is_shown())
    }
}
