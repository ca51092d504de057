//! Viewer configuration, loadable from YAML.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color_scheme::ColorScheme;
use crate::data::dataset::display_name;
use crate::data::scale::ScaleKind;
use crate::error::{PlotError, PlotResult};
use crate::plot::surface::Margin;

/// Pixel size of each plot surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
        }
    }
}

/// One plot: which metric it shows and how its vertical axis behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub metric: String,
    pub title: Option<String>,
    /// Vertical policy; when unset it follows [`ScaleKind::for_metric`].
    pub y_scale: Option<ScaleKind>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::for_metric("stress")
    }
}

impl PlotConfig {
    pub fn for_metric(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            title: None,
            y_scale: None,
            x_label: None,
            y_label: None,
        }
    }

    pub fn y_scale(&self) -> ScaleKind {
        self.y_scale.unwrap_or_else(|| ScaleKind::for_metric(&self.metric))
    }

    pub fn title(&self) -> String {
        if let Some(t) = &self.title {
            return t.clone();
        }
        match self.metric.as_str() {
            "stress" => "Stress".to_string(),
            "KL" | "kl" => "KL-Divergence".to_string(),
            other => display_name(other),
        }
    }

    pub fn x_label(&self) -> String {
        self.x_label.clone().unwrap_or_else(|| "Scale value".to_string())
    }

    pub fn y_label(&self) -> String {
        if let Some(l) = &self.y_label {
            return l.clone();
        }
        match self.y_scale() {
            ScaleKind::Log => format!("log(Normalized {})", self.metric),
            ScaleKind::Linear => self.title(),
        }
    }
}

/// Everything the viewer needs besides the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window title.
    pub title: String,
    /// Dataset selected at startup; the first dataset when unset or unknown.
    pub default_dataset: Option<String>,
    /// Axis transition duration in milliseconds.
    pub transition_ms: u64,
    /// Quiet window of the x-range control in milliseconds.
    pub debounce_ms: u64,
    pub surface: SurfaceSize,
    pub margin: Margin,
    pub plots: Vec<PlotConfig>,
    pub color_scheme: ColorScheme,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "DR metric comparison".to_string(),
            default_dataset: None,
            transition_ms: 750,
            debounce_ms: 200,
            surface: SurfaceSize::default(),
            margin: Margin::default(),
            plots: vec![PlotConfig::for_metric("stress"), PlotConfig::for_metric("KL")],
            color_scheme: ColorScheme::default(),
        }
    }
}

impl ViewerConfig {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_yaml_str(s: &str) -> PlotResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn to_yaml_string(&self) -> PlotResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PlotResult<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|e| PlotError::io(path, e))?;
        let cfg = Self::from_yaml_str(&s)?;
        info!(path = %path.display(), plots = cfg.plots.len(), "loaded viewer config");
        Ok(cfg)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> PlotResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| PlotError::io(dir, e))?;
        }
        fs::write(path, self.to_yaml_string()?).map_err(|e| PlotError::io(path, e))
    }

    /// `~/.drplot/config.yaml`, when `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".drplot").join("config.yaml"))
    }

    /// Load from [`default_path`](Self::default_path) if the file exists.
    pub fn load_from_default_path() -> PlotResult<Option<Self>> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn save_to_default_path(&self) -> PlotResult<()> {
        let path = Self::default_path()
            .ok_or_else(|| PlotError::Render("HOME env var not set".to_string()))?;
        self.save(path)
    }
}
