//! Ordering of techniques by their metric value at a probe position.

use crate::data::dataset::MetricSeriesSet;
use crate::data::technique::Technique;

/// A technique's value at the sample nearest to its probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub technique: Technique,
    pub x: f64,
    pub value: f64,
}

/// Index of the sample in the ascending `xs` closest to `x`.
///
/// Bisects left, then steps back when the left neighbour is strictly closer.
pub fn nearest_index(xs: &[f64], x: f64) -> Option<usize> {
    if xs.is_empty() {
        return None;
    }
    let mut idx = xs.partition_point(|&v| v < x);
    if idx == xs.len() {
        idx -= 1;
    }
    if idx > 0 && (x - xs[idx - 1]) < (xs[idx] - x) {
        idx -= 1;
    }
    Some(idx)
}

/// Rank techniques ascending by value at their probe positions.
///
/// Techniques without a usable series are left out. Fewer than two ranked
/// techniques yield `None`: there is no ordering to show.
pub fn rank_at(set: &MetricSeriesSet, xs: &[f64], probes: &[(Technique, f64)]) -> Option<Vec<Ranked>> {
    let mut ranked: Vec<Ranked> = probes
        .iter()
        .filter_map(|&(technique, probe)| {
            let values = set.series(technique)?;
            if values.len() != xs.len() {
                return None;
            }
            let i = nearest_index(xs, probe)?;
            Some(Ranked {
                technique,
                x: xs[i],
                value: values[i],
            })
        })
        .collect();
    if ranked.len() < 2 {
        return None;
    }
    ranked.sort_by(|a, b| a.value.total_cmp(&b.value));
    Some(ranked)
}

/// `"TSNE < MDS < RANDOM"`.
pub fn format_ranking(ranked: &[Ranked]) -> String {
    ranked
        .iter()
        .map(|r| r.technique.label())
        .collect::<Vec<_>>()
        .join(" < ")
}
