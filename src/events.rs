//! Event notifications for code embedding the viewer.
//!
//! Callers subscribe via [`EventController`] with an [`EventFilter`].  Each
//! event carries a set of [`EventKind`] flags so a single occurrence can match
//! several categories (hiding a technique is both `TECHNIQUE_HIDDEN` and a
//! selection change that triggers `VIEW_UPDATED` events later on).
//!
//! The filter is a simple OR mask: an event is delivered when
//! `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use crate::data::technique::Technique;

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the categories an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u64);

impl EventKind {
    // ── Selection ───────────────────────────────────────────────────────
    /// The active dataset changed.
    pub const DATASET_SELECTED: Self = Self(1 << 0);
    /// A technique was toggled on.
    pub const TECHNIQUE_SHOWN: Self = Self(1 << 1);
    /// A technique was toggled off.
    pub const TECHNIQUE_HIDDEN: Self = Self(1 << 2);
    /// The x-range limit changed (after debouncing).
    pub const X_LIMIT_CHANGED: Self = Self(1 << 3);

    // ── Rendering ───────────────────────────────────────────────────────
    /// A plot finished redrawing.
    pub const VIEW_UPDATED: Self = Self(1 << 4);
    /// A technique could not be drawn during an update.
    pub const TECHNIQUE_SKIPPED: Self = Self(1 << 5);

    // ── Pointer ─────────────────────────────────────────────────────────
    /// The pointer entered a minimum marker; its tooltip is shown.
    pub const MARKER_HOVER: Self = Self(1 << 6);
    /// The pointer left a minimum marker; its tooltip is hidden.
    pub const MARKER_LEAVE: Self = Self(1 << 7);

    // ── Export ──────────────────────────────────────────────────────────
    /// A plot was written to disk.
    pub const EXPORT: Self = Self(1 << 8);

    /// Wildcard: matches every event kind.
    pub const ALL: Self = Self(u64::MAX);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// At least one bit in common.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let pairs: &[(EventKind, &str)] = &[
            (EventKind::DATASET_SELECTED, "DATASET_SELECTED"),
            (EventKind::TECHNIQUE_SHOWN, "TECHNIQUE_SHOWN"),
            (EventKind::TECHNIQUE_HIDDEN, "TECHNIQUE_HIDDEN"),
            (EventKind::X_LIMIT_CHANGED, "X_LIMIT_CHANGED"),
            (EventKind::VIEW_UPDATED, "VIEW_UPDATED"),
            (EventKind::TECHNIQUE_SKIPPED, "TECHNIQUE_SKIPPED"),
            (EventKind::MARKER_HOVER, "MARKER_HOVER"),
            (EventKind::MARKER_LEAVE, "MARKER_LEAVE"),
            (EventKind::EXPORT, "EXPORT"),
        ];

        let mut names = Vec::new();
        let mut known_bits: u64 = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }
        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlotEvent
// ─────────────────────────────────────────────────────────────────────────────

/// An event emitted by the selection controller, a plot view or the host.
#[derive(Debug, Clone)]
pub struct PlotEvent {
    pub kinds: EventKind,
    /// Seconds since the controller was created.
    pub timestamp: f64,
    pub dataset: Option<String>,
    /// Metric of the plot the event concerns.
    pub metric: Option<String>,
    pub technique: Option<Technique>,
    /// Data-space point, e.g. the hovered minimum.
    pub point: Option<[f64; 2]>,
    /// Free-form detail: skip reason, export path, new x-limit.
    pub detail: Option<String>,
}

impl PlotEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            dataset: None,
            metric: None,
            technique: None,
            point: None,
            detail: None,
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }

    pub fn with_point(mut self, point: [f64; 2]) -> Self {
        self.point = Some(point);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask selecting which event categories a subscriber receives.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &PlotEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<PlotEvent>,
}

/// Collects and distributes events to subscribers over `mpsc` channels.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    /// Subscribe to events whose kinds intersect `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<PlotEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<PlotEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Deliver `event` to matching subscribers; subscribers whose receiver
    /// was dropped are pruned when an event reaches them.
    pub fn emit(&self, mut event: PlotEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).subscribers.len()
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}
