//! Dataset collection: dataset name → metric name → sampled technique series.

use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::data::series::DomainTriple;
use crate::data::technique::Technique;
use crate::error::{PlotError, PlotResult};

/// One metric of one dataset: the sampling triple plus a value array per technique.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeriesSet {
    pub scales: DomainTriple,
    series: [Option<Vec<f64>>; 3],
}

impl MetricSeriesSet {
    pub fn new(scales: DomainTriple) -> Self {
        Self {
            scales,
            series: [None, None, None],
        }
    }

    pub fn with_series(mut self, technique: Technique, values: Vec<f64>) -> Self {
        self.series[technique.index()] = Some(values);
        self
    }

    /// Values for `technique`, if the file provided them.
    pub fn series(&self, technique: Technique) -> Option<&[f64]> {
        self.series[technique.index()].as_deref()
    }

    /// Techniques with a stored value array, in enumeration order.
    pub fn techniques(&self) -> impl Iterator<Item = Technique> + '_ {
        Technique::ALL
            .into_iter()
            .filter(|t| self.series[t.index()].is_some())
    }
}

#[derive(Deserialize)]
struct RawMetric {
    scales: DomainTriple,
    #[serde(flatten)]
    rest: IndexMap<String, serde_json::Value>,
}

impl<'de> Deserialize<'de> for MetricSeriesSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let mut raw = RawMetric::deserialize(deserializer)?;
        let mut set = MetricSeriesSet::new(raw.scales);
        for t in Technique::ALL {
            if let Some(v) = raw.rest.swap_remove(t.key()) {
                let values: Vec<f64> = serde_json::from_value(v)
                    .map_err(|e| D::Error::custom(format!("{}: {}", t.key(), e)))?;
                set.series[t.index()] = Some(values);
            }
        }
        Ok(set)
    }
}

/// All metrics recorded for one dataset, in file order.
pub type Dataset = IndexMap<String, MetricSeriesSet>;

/// Every dataset available in a session. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DatasetCollection {
    datasets: IndexMap<String, Dataset>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> PlotResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a data file such as `output.json`.
    pub fn load<P: AsRef<Path>>(path: P) -> PlotResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| PlotError::io(path, e))?;
        let data = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), datasets = data.len(), "loaded dataset collection");
        Ok(data)
    }

    pub fn insert(&mut self, name: impl Into<String>, metric: impl Into<String>, set: MetricSeriesSet) {
        self.datasets
            .entry(name.into())
            .or_default()
            .insert(metric.into(), set);
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Dataset names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.names().next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Resolve `dataset[metric]`, naming whichever key is missing.
    pub fn metric(&self, dataset: &str, metric: &str) -> PlotResult<&MetricSeriesSet> {
        let ds = self
            .datasets
            .get(dataset)
            .ok_or_else(|| PlotError::MissingDataset(dataset.to_string()))?;
        ds.get(metric).ok_or_else(|| PlotError::MissingMetric {
            dataset: dataset.to_string(),
            metric: metric.to_string(),
        })
    }
}

/// Selector label for a dataset key: first character upper-cased.
pub fn display_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
