//! One metric plot: owns its surface, scales and markers, and redraws them on
//! every selection change.

use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::color_scheme::ColorScheme;
use crate::config::{PlotConfig, SurfaceSize};
use crate::data::dataset::{DatasetCollection, MetricSeriesSet};
use crate::data::extremum::ExtremumPoint;
use crate::data::ranking::{rank_at, Ranked};
use crate::data::scale::ScaleEngine;
use crate::data::selection::{SelectionObserver, SelectionState};
use crate::data::series::{zip, DomainTriple, SeriesTransformer};
use crate::data::technique::Technique;
use crate::error::{PlotError, PlotResult};
use crate::events::{EventController, EventKind, PlotEvent};
use crate::plot::annotation::{AnnotationLayer, HoverChange};
use crate::plot::axes::{draw_axes, AxisLabels};
use crate::plot::legend::LegendRenderer;
use crate::plot::path::PathRenderer;
use crate::plot::surface::{ElementClass, Margin, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Axes drawn, no data yet.
    Uninitialized,
    Idle,
    Updating,
}

/// Outcome of one successful update.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub dataset: String,
    /// Techniques drawn, in legend order.
    pub drawn: Vec<Technique>,
    /// Visible techniques that could not be drawn, with the reason.
    pub skipped: Vec<PlotError>,
    /// No drawable series: the y-domain kept its previous value.
    pub y_domain_retained: bool,
}

pub struct PlotView {
    metric: String,
    labels: AxisLabels,
    data: Rc<DatasetCollection>,
    scales: ScaleEngine,
    transformer: SeriesTransformer,
    surface: Surface,
    annotations: AnnotationLayer,
    scheme: ColorScheme,
    state: ViewState,
    dataset: Option<String>,
    last_report: Option<UpdateReport>,
    events: Option<EventController>,
}

impl PlotView {
    pub fn new(
        data: Rc<DatasetCollection>,
        config: &PlotConfig,
        size: SurfaceSize,
        margin: Margin,
        transition: Duration,
    ) -> Self {
        let surface = Surface::new(size.width, size.height, margin);
        let scales = ScaleEngine::new(
            surface.inner_width(),
            surface.inner_height(),
            config.y_scale(),
            transition,
        );
        let mut view = Self {
            metric: config.metric.clone(),
            labels: AxisLabels {
                title: config.title(),
                x: config.x_label(),
                y: config.y_label(),
            },
            data,
            scales,
            transformer: SeriesTransformer::new(),
            surface,
            annotations: AnnotationLayer::new(),
            scheme: ColorScheme::default(),
            state: ViewState::Uninitialized,
            dataset: None,
            last_report: None,
            events: None,
        };
        view.refresh_axes(Instant::now());
        view
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.set_color_scheme(scheme);
        self
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        if self.scheme == scheme {
            return;
        }
        self.scheme = scheme;
        self.refresh_axes(Instant::now());
        if let Some(report) = &self.last_report {
            let drawn = report.drawn.clone();
            self.surface.remove(&[ElementClass::Legend]);
            for (slot, t) in drawn.into_iter().enumerate() {
                LegendRenderer::draw(&mut self.surface, t, slot, scheme.foreground());
            }
        }
    }

    pub fn set_event_controller(&mut self, events: Option<EventController>) {
        self.events = events;
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Dataset of the last successful update; `None` once an update found no data.
    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn last_report(&self) -> Option<&UpdateReport> {
        self.last_report.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn scales(&self) -> &ScaleEngine {
        &self.scales
    }

    pub fn annotations(&self) -> &AnnotationLayer {
        &self.annotations
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn update(&mut self, dataset: &str, selection: &SelectionState) -> PlotResult<&UpdateReport> {
        self.update_at(dataset, selection, Instant::now())
    }

    /// Redraw for `dataset` under `selection`, starting axis transitions at `now`.
    ///
    /// A missing dataset or metric, or a non-finite domain, clears the curves
    /// of the previous dataset and is returned as an error; the axes stay.
    /// Techniques that cannot be drawn are skipped and listed in the report.
    pub fn update_at(
        &mut self,
        dataset: &str,
        selection: &SelectionState,
        now: Instant,
    ) -> PlotResult<&UpdateReport> {
        let data = Rc::clone(&self.data);
        let set = match data
            .metric(dataset, &self.metric)
            .and_then(|set| set.scales.validate().map(|()| set))
        {
            Ok(set) => set,
            Err(e) => {
                warn!(metric = %self.metric, dataset, error = %e, "plot update failed");
                self.clear_data();
                return Err(e);
            }
        };
        self.state = ViewState::Updating;

        let (x0, x1) = x_domain(&set.scales, selection.x_limit());
        self.scales.set_x_domain(x0, x1, now);

        let mut report = UpdateReport {
            dataset: dataset.to_string(),
            ..UpdateReport::default()
        };
        // Lengths are checked against the declared count before the x-range is built.
        let mut checked: Vec<(Technique, &[f64])> = Vec::new();
        for technique in selection.visible_techniques() {
            match checked_series(set, technique) {
                Ok(values) => checked.push((technique, values)),
                Err(e) => self.skip(dataset, technique, e, &mut report),
            }
        }
        let xs: Rc<[f64]> = if checked.is_empty() {
            Rc::from(Vec::new())
        } else {
            self.transformer.materialize(&set.scales)
        };
        let mut drawable: Vec<(Technique, &[f64], Vec<[f64; 2]>)> = Vec::new();
        for (technique, values) in checked {
            match zip(technique, values, &xs) {
                Ok(points) => drawable.push((technique, values, points)),
                Err(e) => self.skip(dataset, technique, e, &mut report),
            }
        }

        match y_domain(drawable.iter().map(|(_, v, _)| *v)) {
            Some((lo, hi)) => self.scales.set_y_domain(lo, hi, now),
            None => report.y_domain_retained = true,
        }
        self.refresh_axes(now);

        self.surface
            .remove(&[ElementClass::Series, ElementClass::Marker, ElementClass::Legend]);
        self.annotations.clear();
        let fg = self.scheme.foreground();
        for (slot, (technique, values, points)) in drawable.iter().enumerate() {
            let look = technique.look();
            PathRenderer::draw(&mut self.surface, &self.scales, points, &look);
            // Minima cut off by the x-limit get no marker.
            if let Some(point) = ExtremumPoint::locate(*technique, values, &xs)
                .filter(|p| p.x >= x0 && p.x <= x1)
            {
                self.annotations
                    .draw(&mut self.surface, &self.scales, point, &look);
            }
            LegendRenderer::draw(&mut self.surface, *technique, slot, fg);
            report.drawn.push(*technique);
        }

        debug!(
            metric = %self.metric,
            dataset,
            drawn = report.drawn.len(),
            skipped = report.skipped.len(),
            "plot updated"
        );
        self.emit(
            PlotEvent::new(EventKind::VIEW_UPDATED)
                .with_dataset(dataset)
                .with_detail(format!("{} drawn", report.drawn.len())),
        );
        self.state = ViewState::Idle;
        self.dataset = Some(dataset.to_string());
        Ok(&*self.last_report.insert(report))
    }

    fn skip(&self, dataset: &str, technique: Technique, e: PlotError, report: &mut UpdateReport) {
        warn!(metric = %self.metric, dataset, error = %e, "skipping technique");
        self.emit(
            PlotEvent::new(EventKind::TECHNIQUE_SKIPPED)
                .with_dataset(dataset)
                .with_technique(technique)
                .with_detail(e.to_string()),
        );
        report.skipped.push(e);
    }

    /// Drop curves, markers and legend so nothing of an earlier dataset stays on screen.
    fn clear_data(&mut self) {
        self.surface
            .remove(&[ElementClass::Series, ElementClass::Marker, ElementClass::Legend]);
        self.annotations.clear();
        self.dataset = None;
        self.last_report = None;
    }

    /// Redraw axes and title from the currently displayed (possibly mid-transition) domains.
    pub fn refresh_axes(&mut self, now: Instant) {
        let x = self.scales.displayed_x(now);
        let y = self.scales.displayed_y(now);
        draw_axes(&mut self.surface, &x, &y, &self.labels, self.scheme.foreground());
    }

    /// End running transitions and draw the axes at their target domains.
    pub fn settle(&mut self) {
        self.scales.finish_transitions();
        self.refresh_axes(Instant::now());
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.scales.is_animating(now)
    }

    /// Advance axis transitions; returns whether another frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.is_animating(now) {
            return false;
        }
        self.refresh_axes(now);
        self.is_animating(now)
    }

    /// Hit-test markers at an inner-area position and report tooltip transitions.
    pub fn pointer_moved(&mut self, pos: Option<[f32; 2]>) -> Vec<HoverChange> {
        let changes = self.annotations.pointer_moved(pos);
        for change in &changes {
            let kind = if change.entered {
                EventKind::MARKER_HOVER
            } else {
                EventKind::MARKER_LEAVE
            };
            let mut event = PlotEvent::new(kind)
                .with_metric(self.metric.clone())
                .with_technique(change.technique)
                .with_point([change.point.x, change.point.y]);
            if let Some(d) = &self.dataset {
                event = event.with_dataset(d.clone());
            }
            self.emit(event);
        }
        changes
    }

    /// Order the visible techniques by value at each one's probe position.
    pub fn ranking(&mut self, dataset: &str, probes: &[(Technique, f64)]) -> PlotResult<Option<Vec<Ranked>>> {
        let data = Rc::clone(&self.data);
        let set = data.metric(dataset, &self.metric)?;
        set.scales.validate()?;
        let usable = probes
            .iter()
            .filter(|(t, _)| checked_series(set, *t).is_ok())
            .count();
        if usable < 2 {
            return Ok(None);
        }
        let xs = self.transformer.materialize(&set.scales);
        Ok(rank_at(set, &xs, probes))
    }

    fn emit(&self, event: PlotEvent) {
        if let Some(events) = &self.events {
            events.emit(event.with_metric(self.metric.clone()));
        }
    }
}

impl SelectionObserver for PlotView {
    fn selection_changed(&mut self, selection: &SelectionState) {
        if let Err(e) = self.update(selection.dataset(), selection) {
            debug!(metric = %self.metric, error = %e, "selection not applied");
        }
    }
}

/// `[start, stop]`, with the upper end cut at `limit` when it lies above `start`.
pub fn x_domain(scales: &DomainTriple, limit: Option<f64>) -> (f64, f64) {
    let stop = match limit {
        Some(l) if l > scales.start => scales.stop.min(l),
        _ => scales.stop,
    };
    (scales.start, stop)
}

/// Union extent of the given series, ignoring NaN. `None` when nothing is finite.
pub fn y_domain<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    series
        .into_iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Vertical extent over the drawable series of `techniques`.
pub fn visible_y_domain(
    set: &MetricSeriesSet,
    techniques: impl IntoIterator<Item = Technique>,
) -> Option<(f64, f64)> {
    let series: Vec<&[f64]> = techniques
        .into_iter()
        .filter_map(|t| checked_series(set, t).ok())
        .collect();
    y_domain(series)
}

fn checked_series(set: &MetricSeriesSet, technique: Technique) -> PlotResult<&[f64]> {
    let values = set
        .series(technique)
        .ok_or(PlotError::MissingSeries { technique })?;
    if values.is_empty() {
        return Err(PlotError::EmptySeries { technique });
    }
    if values.len() != set.scales.count {
        return Err(PlotError::LengthMismatch {
            technique,
            expected: set.scales.count,
            actual: values.len(),
        });
    }
    Ok(values)
}
