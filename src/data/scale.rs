//! Scales: data domain → pixel range, with linear and logarithmic policies.
//!
//! A [`Scale`] maps the closed domain `[min, max]` onto the pixel interval
//! `(start, end)`; `min` lands on `start`. Vertical scales are usually built
//! with `start` at the bottom of the plot so larger values move up.
//!
//! [`ScaleEngine`] owns the x/y pair of one plot together with a
//! [`DomainTransition`] per axis: the scales jump to new domains immediately,
//! while the axis decorations ease toward them.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Projection policy of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    /// Base-10 logarithmic. Domain and mapped values must be strictly positive;
    /// this is a precondition on the data source and is not checked.
    Log,
}

impl ScaleKind {
    /// Default vertical policy for a metric: stress values span several
    /// orders of magnitude and are log-scaled, everything else is linear.
    pub fn for_metric(metric: &str) -> Self {
        if metric.eq_ignore_ascii_case("stress") {
            ScaleKind::Log
        } else {
            ScaleKind::Linear
        }
    }

    fn forward(self, v: f64) -> f64 {
        match self {
            ScaleKind::Linear => v,
            ScaleKind::Log => v.log10(),
        }
    }

    fn inverse(self, v: f64) -> f64 {
        match self {
            ScaleKind::Linear => v,
            ScaleKind::Log => 10f64.powf(v),
        }
    }
}

/// One axis mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub kind: ScaleKind,
    domain: (f64, f64),
    range: (f32, f32),
}

impl Scale {
    pub fn new(kind: ScaleKind, range: (f32, f32)) -> Self {
        let domain = match kind {
            ScaleKind::Linear => (0.0, 1.0),
            ScaleKind::Log => (1.0, 10.0),
        };
        Self {
            kind,
            domain,
            range,
        }
    }

    pub fn linear(range: (f32, f32)) -> Self {
        Self::new(ScaleKind::Linear, range)
    }

    pub fn log(range: (f32, f32)) -> Self {
        Self::new(ScaleKind::Log, range)
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.set_domain(min, max);
        self
    }

    pub fn set_domain(&mut self, min: f64, max: f64) {
        self.domain = (min, max);
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Project a data value to pixels.
    ///
    /// A degenerate domain (`min == max`) maps everything to the range start.
    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = (self.kind.forward(self.domain.0), self.kind.forward(self.domain.1));
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return self.range.0;
        }
        let t = (self.kind.forward(value) - d0) / span;
        self.range.0 + (t as f32) * (self.range.1 - self.range.0)
    }

    /// Pixel back to data space. Degenerate domains return the domain minimum.
    pub fn invert(&self, px: f32) -> f64 {
        let r = (self.range.1 - self.range.0) as f64;
        let (d0, d1) = (self.kind.forward(self.domain.0), self.kind.forward(self.domain.1));
        if r == 0.0 || d0 == d1 {
            return self.domain.0;
        }
        let t = (px - self.range.0) as f64 / r;
        self.kind.inverse(d0 + t * (d1 - d0))
    }

    /// Tick positions inside the domain, roughly `count` of them for linear scales.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        match self.kind {
            ScaleKind::Linear => linear_ticks(lo, hi, count),
            ScaleKind::Log => log_ticks(lo, hi),
        }
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Step of 1, 2 or 5 × 10^k giving about `count` intervals over `span`.
pub fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span / count.max(1) as f64;
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let err = raw / mag;
    let mult = if err >= 7.07 {
        10.0
    } else if err >= 3.16 {
        5.0
    } else if err >= 1.41 {
        2.0
    } else {
        1.0
    };
    mult * mag
}

fn linear_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    if lo == hi {
        return vec![lo];
    }
    let step = nice_step(hi - lo, count);
    if step == 0.0 {
        return Vec::new();
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn log_ticks(lo: f64, hi: f64) -> Vec<f64> {
    if !(lo > 0.0) || !hi.is_finite() {
        return Vec::new();
    }
    let k0 = lo.log10().floor() as i32;
    let k1 = hi.log10().ceil() as i32;
    let mut out = Vec::new();
    for k in k0..=k1 {
        let base = 10f64.powi(k);
        for m in 1..10 {
            let v = base * m as f64;
            // Relative tolerance keeps endpoints like 0.001 that do not round-trip exactly.
            if v >= lo * (1.0 - 1e-9) && v <= hi * (1.0 + 1e-9) {
                out.push(v);
            }
        }
    }
    out
}

/// Eased interpolation of an axis domain toward its newest target.
///
/// Retargeting while a transition runs starts from whatever domain is
/// currently displayed; only the latest target matters.
#[derive(Debug, Clone, Copy)]
pub struct DomainTransition {
    kind: ScaleKind,
    from: (f64, f64),
    to: (f64, f64),
    started: Option<Instant>,
    duration: Duration,
}

impl DomainTransition {
    pub fn settled(kind: ScaleKind, domain: (f64, f64), duration: Duration) -> Self {
        Self {
            kind,
            from: domain,
            to: domain,
            started: None,
            duration,
        }
    }

    pub fn target(&self) -> (f64, f64) {
        self.to
    }

    pub fn retarget(&mut self, to: (f64, f64), now: Instant) {
        self.from = self.current(now);
        self.to = to;
        self.started = Some(now);
    }

    fn progress(&self, now: Instant) -> f64 {
        match self.started {
            None => 1.0,
            Some(_) if self.duration.is_zero() => 1.0,
            Some(t0) => {
                let dt = now.saturating_duration_since(t0).as_secs_f64();
                (dt / self.duration.as_secs_f64()).clamp(0.0, 1.0)
            }
        }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.progress(now) < 1.0
    }

    /// Jump to the target, ending any running transition.
    pub fn finish(&mut self) {
        self.from = self.to;
        self.started = None;
    }

    /// Domain to draw at `now`.
    pub fn current(&self, now: Instant) -> (f64, f64) {
        let p = self.progress(now);
        if p >= 1.0 {
            return self.to;
        }
        let e = ease_cubic_in_out(p);
        let lerp = |a: f64, b: f64| {
            let (fa, fb) = (self.kind.forward(a), self.kind.forward(b));
            self.kind.inverse(fa + (fb - fa) * e)
        };
        (lerp(self.from.0, self.to.0), lerp(self.from.1, self.to.1))
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// The x/y scale pair of one plot.
///
/// Pixel ranges are fixed at construction from the inner plot size; the x
/// axis is always linear, the y policy is chosen once.
#[derive(Debug, Clone)]
pub struct ScaleEngine {
    pub x: Scale,
    pub y: Scale,
    x_anim: DomainTransition,
    y_anim: DomainTransition,
}

impl ScaleEngine {
    pub fn new(width: f32, height: f32, y_kind: ScaleKind, transition: Duration) -> Self {
        let x = Scale::linear((0.0, width));
        let y = Scale::new(y_kind, (height, 0.0));
        Self {
            x_anim: DomainTransition::settled(ScaleKind::Linear, x.domain(), transition),
            y_anim: DomainTransition::settled(y_kind, y.domain(), transition),
            x,
            y,
        }
    }

    pub fn set_x_domain(&mut self, min: f64, max: f64, now: Instant) {
        self.x.set_domain(min, max);
        self.x_anim.retarget((min, max), now);
    }

    pub fn set_y_domain(&mut self, min: f64, max: f64, now: Instant) {
        self.y.set_domain(min, max);
        self.y_anim.retarget((min, max), now);
    }

    /// The x scale as the axis should currently be drawn.
    pub fn displayed_x(&self, now: Instant) -> Scale {
        let (a, b) = self.x_anim.current(now);
        self.x.with_domain(a, b)
    }

    pub fn displayed_y(&self, now: Instant) -> Scale {
        let (a, b) = self.y_anim.current(now);
        self.y.with_domain(a, b)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.x_anim.is_running(now) || self.y_anim.is_running(now)
    }

    pub fn finish_transitions(&mut self) {
        self.x_anim.finish();
        self.y_anim.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_endpoints() {
        let s = Scale::linear((0.0, 100.0)).with_domain(0.0, 10.0);
        assert_eq!(s.map(0.0), 0.0);
        assert_eq!(s.map(10.0), 100.0);
        assert!((s.map(2.5) - 25.0).abs() < 1e-4);
        assert!((s.invert(50.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let s = Scale::linear((400.0, 0.0)).with_domain(3.0, 3.0);
        assert_eq!(s.map(3.0), 400.0);
        assert_eq!(s.map(7.0), 400.0);
        let l = Scale::log((400.0, 0.0)).with_domain(2.0, 2.0);
        assert_eq!(l.map(2.0), 400.0);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0, 10), 1.0);
        assert_eq!(nice_step(12.0, 10), 1.0);
        assert_eq!(nice_step(1.0, 4), 0.2);
        assert_eq!(nice_step(0.0, 10), 0.0);
    }

    #[test]
    fn linear_ticks_stay_inside_domain() {
        let t = Scale::linear((0.0, 1.0)).with_domain(0.0, 12.0).ticks(10);
        assert_eq!(t.first(), Some(&0.0));
        assert_eq!(t.last(), Some(&12.0));
        assert_eq!(t.len(), 13);
    }

    #[test]
    fn log_ticks_cover_decades() {
        let t = Scale::log((0.0, 1.0)).with_domain(0.001, 100.0).ticks(10);
        assert!((t[0] - 0.001).abs() < 1e-12);
        assert!(t.contains(&1.0));
        assert!(t.contains(&100.0));
        assert!(t.iter().all(|&v| v >= 0.001 * (1.0 - 1e-9) && v <= 100.0 * (1.0 + 1e-9)));
    }

    #[test]
    fn transition_reaches_target_and_retargets_from_current() {
        let t0 = Instant::now();
        let mut tr = DomainTransition::settled(ScaleKind::Linear, (0.0, 10.0), Duration::from_millis(100));
        assert!(!tr.is_running(t0));
        tr.retarget((0.0, 20.0), t0);
        assert!(tr.is_running(t0 + Duration::from_millis(50)));
        let mid = tr.current(t0 + Duration::from_millis(50));
        assert!(mid.1 > 10.0 && mid.1 < 20.0);
        tr.retarget((0.0, 5.0), t0 + Duration::from_millis(50));
        assert_eq!(tr.current(t0 + Duration::from_millis(50)), mid);
        assert_eq!(tr.current(t0 + Duration::from_millis(500)), (0.0, 5.0));
    }

    #[test]
    fn engine_applies_domain_immediately() {
        let now = Instant::now();
        let mut e = ScaleEngine::new(100.0, 50.0, ScaleKind::Linear, Duration::from_millis(750));
        e.set_x_domain(0.0, 4.0, now);
        assert_eq!(e.x.map(4.0), 100.0);
        assert!(e.is_animating(now + Duration::from_millis(10)));
        assert!(!e.is_animating(now + Duration::from_secs(1)));
        assert_eq!(e.displayed_x(now + Duration::from_secs(1)).domain(), (0.0, 4.0));
    }
}
