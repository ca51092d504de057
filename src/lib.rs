//! drplot: comparative metric plots for dimensionality-reduction techniques.
//!
//! For every dataset a JSON file records, per metric (stress, KL divergence),
//! how MDS, t-SNE and a random baseline score across a sweep of scale values.
//! This crate loads that file and draws one plot per metric:
//!
//! - `data`: loading, series materialization, minima, scales, selection state
//! - `plot`: the retained surface model and its renderers
//! - `container`: wires the selection controller to a stack of plot views
//! - `export`: SVG and PNG output of plot surfaces
//! - `app`: the native egui viewer

pub mod app;
pub mod color_scheme;
pub mod config;
pub mod container;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod plot;

pub use app::run_viewer;
pub use color_scheme::ColorScheme;
pub use config::{PlotConfig, SurfaceSize, ViewerConfig};
pub use container::ViewContainer;
pub use data::dataset::{DatasetCollection, MetricSeriesSet};
pub use data::scale::{Scale, ScaleEngine, ScaleKind};
pub use data::selection::{SelectionController, SelectionObserver, SelectionState};
pub use data::series::{DomainTriple, SeriesTransformer};
pub use data::technique::Technique;
pub use error::{PlotError, PlotResult};
pub use events::{EventController, EventFilter, EventKind, PlotEvent};
pub use export::ExportFormat;
pub use plot::{PlotView, UpdateReport, ViewState};
