//! Series materialization: x-ranges derived from domain triples, and pairing with values.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::data::technique::Technique;
use crate::error::{PlotError, PlotResult};

/// How a metric's x-range was sampled: `count` evenly spaced values from
/// `start` (inclusive) toward `stop` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct DomainTriple {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl DomainTriple {
    pub fn new(start: f64, stop: f64, count: usize) -> Self {
        Self { start, stop, count }
    }

    /// Distance between consecutive samples.
    pub fn step(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.stop - self.start) / self.count as f64
        }
    }

    /// Both ends must be finite for the range to be drawable.
    pub fn validate(&self) -> PlotResult<()> {
        if self.start.is_finite() && self.stop.is_finite() {
            Ok(())
        } else {
            Err(PlotError::InvalidDomain(format!(
                "[{}, {}, {}]",
                self.start, self.stop, self.count
            )))
        }
    }

    fn cache_key(&self) -> (u64, u64, usize) {
        (self.start.to_bits(), self.stop.to_bits(), self.count)
    }
}

impl From<[f64; 3]> for DomainTriple {
    fn from(v: [f64; 3]) -> Self {
        // Sample counts arrive as JSON numbers; negative or NaN counts collapse to zero.
        let count = if v[2].is_finite() && v[2] > 0.0 {
            v[2].round() as usize
        } else {
            0
        };
        Self::new(v[0], v[1], count)
    }
}

impl From<DomainTriple> for [f64; 3] {
    fn from(d: DomainTriple) -> Self {
        [d.start, d.stop, d.count as f64]
    }
}

/// Turns domain triples into x-sequences and pairs them with metric values.
///
/// Materialized ranges are memoized by the exact triple; repeated requests
/// hand out the same shared sequence.
#[derive(Debug, Default)]
pub struct SeriesTransformer {
    cache: HashMap<(u64, u64, usize), Rc<[f64]>>,
}

impl SeriesTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` values `start + i * step`, `i in 0..count`.
    pub fn materialize(&mut self, domain: &DomainTriple) -> Rc<[f64]> {
        let key = domain.cache_key();
        if let Some(xs) = self.cache.get(&key) {
            trace!(?domain, "range cache hit");
            return xs.clone();
        }
        let step = domain.step();
        let xs: Rc<[f64]> = (0..domain.count)
            .map(|i| domain.start + i as f64 * step)
            .collect();
        self.cache.insert(key, xs.clone());
        xs
    }

    /// Number of memoized ranges.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Pair `values` with `xs` positionally.
///
/// Lengths must agree; a mismatch is reported against `technique` so the
/// caller can skip just that curve.
pub fn zip(technique: Technique, values: &[f64], xs: &[f64]) -> PlotResult<Vec<[f64; 2]>> {
    if values.len() != xs.len() {
        return Err(PlotError::LengthMismatch {
            technique,
            expected: xs.len(),
            actual: values.len(),
        });
    }
    Ok(xs.iter().zip(values).map(|(&x, &y)| [x, y]).collect())
}
