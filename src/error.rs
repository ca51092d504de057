//! Error type shared by loading, configuration, plotting and export.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::technique::Technique;

/// Everything that can go wrong in drplot.
///
/// Inside a plot update only [`PlotError::MissingDataset`],
/// [`PlotError::MissingMetric`] and [`PlotError::InvalidDomain`] reach the
/// caller; the per-technique variants are collected into an
/// [`UpdateReport`](crate::plot::UpdateReport) instead.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("no such dataset: {0}")]
    MissingDataset(String),

    #[error("dataset {dataset} has no metric {metric}")]
    MissingMetric { dataset: String, metric: String },

    #[error("{technique} has no series for this metric")]
    MissingSeries { technique: Technique },

    #[error("{technique}: expected {expected} values, found {actual}")]
    LengthMismatch {
        technique: Technique,
        expected: usize,
        actual: usize,
    },

    #[error("{technique}: series is empty")]
    EmptySeries { technique: Technique },

    #[error("invalid domain triple: {0}")]
    InvalidDomain(String),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("render error: {0}")]
    Render(String),
}

impl PlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The technique this error is about, if it is a per-technique problem.
    pub fn technique(&self) -> Option<Technique> {
        match self {
            PlotError::MissingSeries { technique }
            | PlotError::LengthMismatch { technique, .. }
            | PlotError::EmptySeries { technique } => Some(*technique),
            _ => None,
        }
    }
}

pub type PlotResult<T> = Result<T, PlotError>;
