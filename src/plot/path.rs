//! Draws a technique's series as a straight-segment polyline.

use crate::data::scale::ScaleEngine;
use crate::data::technique::TechniqueLook;
use crate::plot::surface::{ElementClass, Shape, Surface};

pub struct PathRenderer;

impl PathRenderer {
    /// Project `points` through `scales` and append the curve to `surface`.
    ///
    /// Fewer than two points still produce an element so the technique stays
    /// present on the surface; backends draw nothing for it.
    pub fn draw(surface: &mut Surface, scales: &ScaleEngine, points: &[[f64; 2]], look: &TechniqueLook) {
        let projected = points
            .iter()
            .map(|&[x, y]| [scales.x.map(x), scales.y.map(y)])
            .collect();
        surface.push(
            ElementClass::Series,
            Shape::Polyline {
                points: projected,
                color: look.color,
                width: look.width,
            },
        );
    }
}
