//! Native egui viewer.
//!
//! | Sub-module     | Responsibility |
//! | -------------- | -------------- |
//! | [`painter`]    | Painting retained surfaces and tooltips with egui |
//! | [`viewer_app`] | [`ViewerApp`]: controls side panel and the stacked plots |
//! | [`run`]        | [`run_viewer()`] entry point and icon rendering |

pub mod painter;
mod run;
mod viewer_app;

pub use run::run_viewer;
pub use viewer_app::ViewerApp;
