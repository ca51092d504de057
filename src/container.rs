//! Top-level container: one selection controller driving a stack of plot views.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::color_scheme::ColorScheme;
use crate::config::ViewerConfig;
use crate::data::dataset::DatasetCollection;
use crate::data::debounce::Debouncer;
use crate::data::ranking::Ranked;
use crate::data::selection::{SelectionController, SelectionObserver, SelectionState};
use crate::data::technique::Technique;
use crate::error::{PlotError, PlotResult};
use crate::events::{EventController, EventKind, PlotEvent};
use crate::export::{self, ExportFormat};
use crate::plot::annotation::HoverChange;
use crate::plot::view::PlotView;

pub struct ViewContainer {
    data: Rc<DatasetCollection>,
    config: ViewerConfig,
    views: Vec<Rc<RefCell<PlotView>>>,
    selection: SelectionController,
    x_limit: Debouncer<Option<f64>>,
    events: EventController,
}

impl ViewContainer {
    /// Build one view per configured plot, register them and draw the initial selection.
    pub fn new(data: Rc<DatasetCollection>, config: ViewerConfig) -> PlotResult<Self> {
        let mut selection = SelectionController::for_collection(&data, config.default_dataset.as_deref())?;
        let events = EventController::new();
        selection.set_event_controller(Some(events.clone()));

        let mut views = Vec::with_capacity(config.plots.len());
        for plot in &config.plots {
            let mut view = PlotView::new(
                Rc::clone(&data),
                plot,
                config.surface,
                config.margin,
                config.transition(),
            )
            .with_color_scheme(config.color_scheme);
            view.set_event_controller(Some(events.clone()));
            let view = Rc::new(RefCell::new(view));
            let observer: Rc<RefCell<dyn SelectionObserver>> = view.clone();
            selection.register(observer);
            views.push(view);
        }

        info!(
            datasets = data.len(),
            plots = views.len(),
            dataset = %selection.state().dataset(),
            "view container ready"
        );
        let mut container = Self {
            x_limit: Debouncer::new(config.debounce()),
            data,
            config,
            views,
            selection,
            events,
        };
        container.selection.refresh();
        for view in &container.views {
            view.borrow_mut().settle();
        }
        Ok(container)
    }

    pub fn data(&self) -> &DatasetCollection {
        &self.data
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn events(&self) -> &EventController {
        &self.events
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn views(&self) -> &[Rc<RefCell<PlotView>>] {
        &self.views
    }

    pub fn view(&self, metric: &str) -> Option<Rc<RefCell<PlotView>>> {
        self.views.iter().find(|v| v.borrow().metric() == metric).cloned()
    }

    /// Union of the sampled x-ranges of every plotted metric in the selected dataset.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let dataset = self.selection.state().dataset();
        self.config
            .plots
            .iter()
            .filter_map(|p| self.data.metric(dataset, &p.metric).ok())
            .filter(|set| set.scales.validate().is_ok())
            .map(|set| (set.scales.start, set.scales.stop))
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
    }

    pub fn select_dataset(&mut self, name: &str) {
        self.selection.select_dataset(name);
    }

    pub fn toggle_technique(&mut self, technique: Technique) -> bool {
        self.selection.toggle_technique(technique)
    }

    pub fn set_technique_visible(&mut self, technique: Technique, visible: bool) {
        self.selection.set_technique_visible(technique, visible);
    }

    /// Raw x-range control input; applied once the control has been quiet long enough.
    pub fn input_x_limit(&mut self, limit: Option<f64>, now: Instant) {
        self.x_limit.push(limit, now);
    }

    /// The x-limit that will be applied next, if one is waiting.
    pub fn pending_x_limit(&self) -> Option<Option<f64>> {
        self.x_limit.pending().copied()
    }

    /// Apply a settled x-limit and advance axis transitions.
    ///
    /// Returns whether the host should schedule another frame.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(limit) = self.x_limit.poll(now) {
            debug!(?limit, "x-limit settled");
            self.selection.set_x_limit(limit);
        }
        let mut animating = false;
        for view in &self.views {
            animating |= view.borrow_mut().tick(now);
        }
        animating || self.x_limit.is_pending()
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.config.color_scheme = scheme;
        for view in &self.views {
            view.borrow_mut().set_color_scheme(scheme);
        }
    }

    pub fn pointer_moved(&self, view_index: usize, pos: Option<[f32; 2]>) -> Vec<HoverChange> {
        match self.views.get(view_index) {
            Some(view) => view.borrow_mut().pointer_moved(pos),
            None => Vec::new(),
        }
    }

    /// Visible techniques of view `view_index` ranked by value near `x`.
    pub fn ranking_at(&self, view_index: usize, x: f64) -> PlotResult<Option<Vec<Ranked>>> {
        self.ranking_with(view_index, |_| x)
    }

    /// Like [`ranking_at`](Self::ranking_at), with a separate probe position per technique.
    pub fn ranking_with(
        &self,
        view_index: usize,
        probe: impl Fn(Technique) -> f64,
    ) -> PlotResult<Option<Vec<Ranked>>> {
        let Some(view) = self.views.get(view_index) else {
            return Ok(None);
        };
        let state = self.selection.state();
        let probes: Vec<(Technique, f64)> = state.visible_techniques().map(|t| (t, probe(t))).collect();
        view.borrow_mut().ranking(state.dataset(), &probes)
    }

    /// Write every view as `{dataset}_{metric}.{ext}` into `dir`.
    ///
    /// Views without data for the selected dataset are left out.
    pub fn export_all<P: AsRef<Path>>(&self, dir: P, format: ExportFormat) -> PlotResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| PlotError::io(dir, e))?;
        let dataset = self.selection.state().dataset();
        let mut written = Vec::with_capacity(self.views.len());
        for view in &self.views {
            view.borrow_mut().settle();
            let view = view.borrow();
            if view.dataset() != Some(dataset) {
                warn!(dataset, metric = %view.metric(), "no data to export");
                continue;
            }
            let path = dir.join(format!("{}_{}.{}", dataset, view.metric(), format.extension()));
            export::save(view.surface(), &view.color_scheme(), &path, format)?;
            self.events.emit(
                PlotEvent::new(EventKind::EXPORT)
                    .with_dataset(dataset)
                    .with_metric(view.metric())
                    .with_detail(path.display().to_string()),
            );
            written.push(path);
        }
        info!(count = written.len(), dir = %dir.display(), "exported plots");
        Ok(written)
    }

    /// Export every dataset in turn, then restore the original selection.
    pub fn export_datasets<P: AsRef<Path>>(&mut self, dir: P, format: ExportFormat) -> PlotResult<Vec<PathBuf>> {
        let original = self.selection.state().dataset().to_string();
        let names: Vec<String> = self.data.names().map(str::to_string).collect();
        let mut written = Vec::new();
        let mut result = Ok(());
        for name in names {
            self.selection.select_dataset(&name);
            match self.export_all(dir.as_ref(), format) {
                Ok(paths) => written.extend(paths),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        self.selection.select_dataset(&original);
        result.map(|()| written)
    }
}
