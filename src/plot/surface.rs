//! Retained drawing surface shared by the egui painter and the SVG writer.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Space reserved around the inner plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 20.0,
            bottom: 45.0,
            left: 60.0,
        }
    }
}

/// Horizontal text alignment relative to the anchor point; text is always
/// vertically centered on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polyline {
        points: Vec<[f32; 2]>,
        color: Color32,
        width: f32,
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        fill: Color32,
    },
    Rect {
        min: [f32; 2],
        size: [f32; 2],
        fill: Color32,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
        color: Color32,
        width: f32,
    },
    Text {
        pos: [f32; 2],
        text: String,
        size: f32,
        anchor: TextAnchor,
        color: Color32,
        /// Rotation in degrees, clockwise, around `pos`.
        rotation: f32,
    },
}

/// Group an element belongs to; updates clear whole groups at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    Axis,
    Title,
    Series,
    Marker,
    Legend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub class: ElementClass,
    pub shape: Shape,
}

/// A fixed-size drawing target.
///
/// Element coordinates are relative to the inner area, i.e. offset by the
/// top-left margin; y grows downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: f32,
    height: f32,
    margin: Margin,
    elements: Vec<Element>,
}

impl Surface {
    pub fn new(width: f32, height: f32, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
            elements: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn inner_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn push(&mut self, class: ElementClass, shape: Shape) {
        self.elements.push(Element { class, shape });
    }

    /// Drop every element in any of `classes`.
    pub fn remove(&mut self, classes: &[ElementClass]) {
        self.elements.retain(|e| !classes.contains(&e.class));
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn of_class(&self, class: ElementClass) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.class == class)
    }

    pub fn count(&self, class: ElementClass) -> usize {
        self.of_class(class).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_size_subtracts_margins() {
        let s = Surface::new(960.0, 500.0, Margin::default());
        assert_eq!(s.inner_width(), 880.0);
        assert_eq!(s.inner_height(), 425.0);
    }

    #[test]
    fn remove_only_named_classes() {
        let mut s = Surface::new(100.0, 100.0, Margin::default());
        let dot = Shape::Circle {
            center: [0.0, 0.0],
            radius: 1.0,
            fill: Color32::RED,
        };
        s.push(ElementClass::Axis, dot.clone());
        s.push(ElementClass::Marker, dot.clone());
        s.push(ElementClass::Legend, dot);
        s.remove(&[ElementClass::Marker, ElementClass::Legend]);
        assert_eq!(s.elements().len(), 1);
        assert_eq!(s.count(ElementClass::Axis), 1);
    }
}
