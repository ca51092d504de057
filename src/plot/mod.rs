//! Retained plot model: surfaces, their renderers and the per-metric view.

pub mod annotation;
pub mod axes;
pub mod legend;
pub mod path;
pub mod surface;
pub mod view;

pub use annotation::{AnnotationLayer, HoverChange, MinimumMarker, Tooltip, TooltipState};
pub use axes::AxisLabels;
pub use legend::LegendRenderer;
pub use path::PathRenderer;
pub use surface::{Element, ElementClass, Margin, Shape, Surface, TextAnchor};
pub use view::{PlotView, UpdateReport, ViewState};
