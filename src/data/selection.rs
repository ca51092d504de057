//! Shared selection state and the controller that fans changes out to plots.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::data::dataset::DatasetCollection;
use crate::data::technique::Technique;
use crate::error::{PlotError, PlotResult};
use crate::events::{EventController, EventKind, PlotEvent};

/// Which dataset and which techniques are active.
///
/// Owned by [`SelectionController`]; every plot reads it during its update.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    dataset: String,
    visible: [bool; 3],
    x_limit: Option<f64>,
}

impl SelectionState {
    /// `dataset` selected, every technique visible, no x-limit.
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            visible: [true; 3],
            x_limit: None,
        }
    }

    pub fn with_visible(mut self, technique: Technique, visible: bool) -> Self {
        self.visible[technique.index()] = visible;
        self
    }

    pub fn with_x_limit(mut self, limit: Option<f64>) -> Self {
        self.x_limit = limit.filter(|v| v.is_finite());
        self
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn is_visible(&self, technique: Technique) -> bool {
        self.visible[technique.index()]
    }

    /// Visible techniques in enumeration order.
    pub fn visible_techniques(&self) -> impl Iterator<Item = Technique> + '_ {
        Technique::ALL.into_iter().filter(|t| self.is_visible(*t))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Upper bound applied to every plot's x-domain.
    pub fn x_limit(&self) -> Option<f64> {
        self.x_limit
    }
}

/// Receives the selection after every change.
pub trait SelectionObserver {
    fn selection_changed(&mut self, selection: &SelectionState);
}

/// Sole mutator of [`SelectionState`].
///
/// Each operation finishes writing the state, then notifies every registered
/// observer synchronously in registration order.
pub struct SelectionController {
    state: SelectionState,
    observers: Vec<Rc<RefCell<dyn SelectionObserver>>>,
    events: Option<EventController>,
}

impl SelectionController {
    pub fn new(initial: SelectionState) -> Self {
        Self {
            state: initial,
            observers: Vec::new(),
            events: None,
        }
    }

    /// Start on `preferred` when the collection has it, else on its first dataset.
    pub fn for_collection(data: &DatasetCollection, preferred: Option<&str>) -> PlotResult<Self> {
        let name = preferred
            .filter(|p| data.contains(p))
            .or_else(|| data.first_name())
            .ok_or_else(|| PlotError::MissingDataset("<empty collection>".to_string()))?;
        Ok(Self::new(SelectionState::new(name)))
    }

    pub fn set_event_controller(&mut self, events: Option<EventController>) {
        self.events = events;
    }

    pub fn register(&mut self, observer: Rc<RefCell<dyn SelectionObserver>>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn select_dataset(&mut self, name: &str) {
        self.state.dataset = name.to_string();
        self.emit(PlotEvent::new(EventKind::DATASET_SELECTED).with_dataset(name));
        self.notify();
    }

    /// Flip a technique's visibility; returns the new visibility.
    pub fn toggle_technique(&mut self, technique: Technique) -> bool {
        let visible = !self.state.is_visible(technique);
        self.set_technique_visible(technique, visible);
        visible
    }

    pub fn set_technique_visible(&mut self, technique: Technique, visible: bool) {
        self.state.visible[technique.index()] = visible;
        let kind = if visible {
            EventKind::TECHNIQUE_SHOWN
        } else {
            EventKind::TECHNIQUE_HIDDEN
        };
        self.emit(
            PlotEvent::new(kind)
                .with_dataset(self.state.dataset.clone())
                .with_technique(technique),
        );
        self.notify();
    }

    /// Limit (or with `None`, unlimit) the upper end of every x-domain.
    pub fn set_x_limit(&mut self, limit: Option<f64>) {
        self.state.x_limit = limit.filter(|v| v.is_finite());
        let detail = match self.state.x_limit {
            Some(v) => v.to_string(),
            None => "none".to_string(),
        };
        self.emit(PlotEvent::new(EventKind::X_LIMIT_CHANGED).with_detail(detail));
        self.notify();
    }

    /// Re-run every observer against the unchanged state.
    pub fn refresh(&mut self) {
        self.notify();
    }

    fn notify(&self) {
        debug!(
            dataset = %self.state.dataset,
            visible = self.state.visible_count(),
            observers = self.observers.len(),
            "selection changed"
        );
        for observer in &self.observers {
            observer.borrow_mut().selection_changed(&self.state);
        }
    }

    fn emit(&self, event: PlotEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}
