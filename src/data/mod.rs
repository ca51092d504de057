//! Data model: datasets, techniques, derived series and shared selection.

pub mod dataset;
pub mod debounce;
pub mod extremum;
pub mod ranking;
pub mod scale;
pub mod selection;
pub mod series;
pub mod technique;
