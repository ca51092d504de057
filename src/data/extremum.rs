//! Minimum search over a technique's series.

use crate::data::technique::Technique;

/// The minimum-value sample of a technique's series for the active dataset/metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumPoint {
    pub x: f64,
    pub y: f64,
    pub technique: Technique,
}

impl ExtremumPoint {
    /// Locate the minimum of `values` and attach its x from `xs`.
    ///
    /// `None` when the series is empty (or all NaN) or the index has no x.
    pub fn locate(technique: Technique, values: &[f64], xs: &[f64]) -> Option<Self> {
        let (index, y) = find_minimum(values)?;
        let x = *xs.get(index)?;
        Some(Self { x, y, technique })
    }
}

/// Index and value of the smallest element; the left-most one wins ties.
///
/// NaN entries never compare smaller and are skipped. Empty input yields `None`.
pub fn find_minimum(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}
