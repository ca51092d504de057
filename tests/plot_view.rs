use std::rc::Rc;
use std::time::{Duration, Instant};

use drplot::plot::{ElementClass, Margin, Shape};
use drplot::{
    DatasetCollection, DomainTriple, MetricSeriesSet, PlotConfig, PlotError, PlotView, ScaleKind, SelectionState,
    SurfaceSize, Technique, ViewState,
};

const DATA: &str = r#"{
    "alpha": {
        "stress": {"scales": [0, 3, 3], "MDS": [3, 1, 2], "TSNE": [0.5, 0.7, 9], "RANDOM": [4, 4, 4]},
        "KL": {"scales": [0, 3, 3], "MDS": [0.3, 0.2, 0.1], "TSNE": [0.2, 0.1, 0.05], "RANDOM": [1, 1]}
    },
    "beta": {
        "stress": {"scales": [0, 4, 4], "MDS": [2, 2, 0.5, 1], "TSNE": [3, 2, 1, 1], "RANDOM": [5, 5, 5, 5]}
    }
}"#;

fn view(metric: &str) -> PlotView {
    view_of(DatasetCollection::from_json_str(DATA).unwrap(), metric)
}

fn view_of(data: DatasetCollection, metric: &str) -> PlotView {
    let data = Rc::new(data);
    PlotView::new(
        data,
        &PlotConfig::for_metric(metric),
        SurfaceSize::default(),
        Margin::default(),
        Duration::from_millis(750),
    )
}

fn legend_rows(view: &PlotView) -> Vec<f32> {
    view.surface()
        .of_class(ElementClass::Legend)
        .filter_map(|e| match &e.shape {
            Shape::Rect { min, .. } => Some(min[1]),
            _ => None,
        })
        .collect()
}

#[test]
fn construction_draws_axes_only() {
    let v = view("stress");
    assert_eq!(v.state(), ViewState::Uninitialized);
    assert_eq!(v.surface().count(ElementClass::Title), 1);
    assert_eq!(v.surface().count(ElementClass::Series), 0);
    assert_eq!(v.scales().y.kind, ScaleKind::Log);
}

#[test]
fn y_domain_spans_only_visible_techniques() {
    let mut v = view("stress");
    let sel = SelectionState::new("alpha")
        .with_visible(Technique::Tsne, false)
        .with_visible(Technique::Random, false);
    v.update_at("alpha", &sel, Instant::now()).unwrap();
    assert_eq!(v.scales().y.domain(), (1.0, 3.0));
    assert_eq!(v.scales().x.domain(), (0.0, 3.0));
    assert_eq!(v.state(), ViewState::Idle);
}

#[test]
fn hiding_everything_keeps_previous_y_domain() {
    let mut v = view("stress");
    let now = Instant::now();
    v.update_at("alpha", &SelectionState::new("alpha"), now).unwrap();
    assert_eq!(v.scales().y.domain(), (0.5, 9.0));

    let none = Technique::ALL
        .iter()
        .fold(SelectionState::new("alpha"), |s, t| s.with_visible(*t, false));
    let report = v.update_at("alpha", &none, now).unwrap();
    assert!(report.y_domain_retained);
    assert!(report.drawn.is_empty());
    assert_eq!(v.scales().y.domain(), (0.5, 9.0));
    assert_eq!(v.surface().count(ElementClass::Series), 0);
    assert_eq!(v.surface().count(ElementClass::Marker), 0);
    assert_eq!(v.surface().count(ElementClass::Legend), 0);
}

#[test]
fn markers_sit_on_leftmost_minimum() {
    let mut v = view("stress");
    v.update("alpha", &SelectionState::new("alpha")).unwrap();
    let mds = v.annotations().marker(Technique::Mds).unwrap();
    assert_eq!((mds.point.x, mds.point.y), (1.0, 1.0));
    let random = v.annotations().marker(Technique::Random).unwrap();
    assert_eq!((random.point.x, random.point.y), (0.0, 4.0));
    assert_eq!(v.surface().count(ElementClass::Marker), 3);
}

#[test]
fn switching_back_reproduces_extremum() {
    let mut v = view("stress");
    let now = Instant::now();
    v.update_at("alpha", &SelectionState::new("alpha"), now).unwrap();
    let first = v.annotations().marker(Technique::Mds).unwrap().point;

    v.update_at("beta", &SelectionState::new("beta"), now).unwrap();
    let beta = v.annotations().marker(Technique::Mds).unwrap().point;
    assert_eq!((beta.x, beta.y), (2.0, 0.5));
    assert_eq!(v.dataset(), Some("beta"));

    v.update_at("alpha", &SelectionState::new("alpha"), now).unwrap();
    assert_eq!(v.annotations().marker(Technique::Mds).unwrap().point, first);
    assert_eq!(v.annotations().markers().len(), 3);
}

#[test]
fn legend_has_no_gaps() {
    let mut v = view("stress");
    let sel = SelectionState::new("alpha").with_visible(Technique::Mds, false);
    let report = v.update("alpha", &sel).unwrap();
    assert_eq!(report.drawn, vec![Technique::Tsne, Technique::Random]);
    assert_eq!(legend_rows(&v), vec![20.0, 60.0]);
}

#[test]
fn missing_dataset_clears_previous_curves() {
    let mut v = view("stress");
    v.update("alpha", &SelectionState::new("alpha")).unwrap();
    let err = v.update("gamma", &SelectionState::new("gamma")).unwrap_err();
    assert!(matches!(err, PlotError::MissingDataset(ref d) if d == "gamma"));
    assert_eq!(v.surface().count(ElementClass::Series), 0);
    assert_eq!(v.surface().count(ElementClass::Marker), 0);
    assert_eq!(v.surface().count(ElementClass::Legend), 0);
    assert_eq!(v.surface().count(ElementClass::Title), 1);
    assert!(v.annotations().markers().is_empty());
    assert_eq!(v.dataset(), None);
    assert!(v.last_report().is_none());
}

#[test]
fn missing_metric_drops_stale_plot() {
    let mut v = view("KL");
    v.update("alpha", &SelectionState::new("alpha")).unwrap();
    assert_eq!(v.surface().count(ElementClass::Series), 2);

    let err = v.update("beta", &SelectionState::new("beta")).unwrap_err();
    assert!(matches!(err, PlotError::MissingMetric { ref metric, .. } if metric == "KL"));
    assert_eq!(v.surface().count(ElementClass::Series), 0);
    assert!(v.annotations().markers().is_empty());
    assert_eq!(v.dataset(), None);

    v.update("alpha", &SelectionState::new("alpha")).unwrap();
    assert_eq!(v.surface().count(ElementClass::Series), 2);
    assert_eq!(v.dataset(), Some("alpha"));
}

#[test]
fn empty_series_is_skipped() {
    let data = DatasetCollection::from_json_str(
        r#"{"a": {"stress": {"scales": [0, 3, 3], "MDS": [], "TSNE": [2, 1, 3], "RANDOM": [4, 4, 4]}}}"#,
    )
    .unwrap();
    let mut v = view_of(data, "stress");
    let report = v.update("a", &SelectionState::new("a")).unwrap();
    assert_eq!(report.drawn, vec![Technique::Tsne, Technique::Random]);
    assert!(matches!(
        report.skipped[..],
        [PlotError::EmptySeries { technique: Technique::Mds }]
    ));
    assert_eq!(v.scales().y.domain(), (1.0, 4.0));
    assert!(v.annotations().marker(Technique::Mds).is_none());
    assert_eq!(legend_rows(&v), vec![20.0, 60.0]);
}

#[test]
fn oversized_sample_count_is_a_length_mismatch() {
    let data = DatasetCollection::from_json_str(
        r#"{"a": {"stress": {"scales": [0, 1, 1e19], "MDS": [1, 2, 3], "TSNE": [1, 2, 3]}}}"#,
    )
    .unwrap();
    let mut v = view_of(data, "stress");
    let report = v.update("a", &SelectionState::new("a")).unwrap();
    assert!(report.drawn.is_empty());
    assert!(report.y_domain_retained);
    assert_eq!(report.skipped.len(), 3);
    assert!(matches!(
        report.skipped[0],
        PlotError::LengthMismatch { technique: Technique::Mds, actual: 3, .. }
    ));
    let positions = [(Technique::Mds, 0.5), (Technique::Tsne, 0.5)];
    assert!(v.ranking("a", &positions).unwrap().is_none());
}

#[test]
fn non_finite_domain_is_rejected() {
    let mut data = DatasetCollection::new();
    data.insert(
        "a",
        "stress",
        MetricSeriesSet::new(DomainTriple::new(0.0, f64::INFINITY, 2))
            .with_series(Technique::Mds, vec![1.0, 2.0]),
    );
    let mut v = view_of(data, "stress");
    let err = v.update("a", &SelectionState::new("a")).unwrap_err();
    assert!(matches!(err, PlotError::InvalidDomain(_)));
    assert_eq!(v.surface().count(ElementClass::Series), 0);
}

#[test]
fn marker_outside_x_limit_is_hidden() {
    let mut v = view("stress");
    let sel = SelectionState::new("alpha").with_x_limit(Some(0.5));
    let report = v.update("alpha", &sel).unwrap();
    assert_eq!(report.drawn.len(), 3);
    assert!(v.annotations().marker(Technique::Mds).is_none());
    assert!(v.annotations().marker(Technique::Tsne).is_some());
    assert_eq!(v.surface().count(ElementClass::Marker), 2);
}

#[test]
fn mismatched_series_is_skipped_not_fatal() {
    let mut v = view("KL");
    let report = v.update("alpha", &SelectionState::new("alpha")).unwrap();
    assert_eq!(report.drawn, vec![Technique::Mds, Technique::Tsne]);
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(
        report.skipped[0],
        PlotError::LengthMismatch {
            technique: Technique::Random,
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(v.scales().y.domain(), (0.05, 0.3));
}

#[test]
fn x_limit_narrows_domain() {
    let mut v = view("stress");
    let sel = SelectionState::new("alpha").with_x_limit(Some(2.0));
    v.update("alpha", &sel).unwrap();
    assert_eq!(v.scales().x.domain(), (0.0, 2.0));
}

#[test]
fn hover_shows_tooltip_with_extremum() {
    let mut v = view("stress");
    v.update("alpha", &SelectionState::new("alpha")).unwrap();
    let center = v.annotations().marker(Technique::Mds).unwrap().center;
    let changes = v.pointer_moved(Some(center));
    assert!(changes.iter().any(|c| c.technique == Technique::Mds && c.entered));
    let marker = v.annotations().marker(Technique::Mds).unwrap();
    assert_eq!(marker.tooltip.text(), Some("x: 1\ny: 1"));

    v.pointer_moved(None);
    assert_eq!(v.annotations().shown_tooltips().count(), 0);
}

#[test]
fn axes_transition_then_settle() {
    let mut v = view("stress");
    let t0 = Instant::now();
    v.update_at("alpha", &SelectionState::new("alpha"), t0).unwrap();
    assert!(v.is_animating(t0 + Duration::from_millis(100)));
    assert!(!v.is_animating(t0 + Duration::from_millis(800)));
    v.settle();
    assert!(!v.is_animating(t0));
}

#[test]
fn ranking_orders_by_value() {
    let mut v = view("stress");
    let probes = [(Technique::Mds, 1.0), (Technique::Tsne, 1.0), (Technique::Random, 1.0)];
    let ranked = v.ranking("alpha", &probes).unwrap().unwrap();
    let order: Vec<Technique> = ranked.iter().map(|r| r.technique).collect();
    assert_eq!(order, vec![Technique::Tsne, Technique::Mds, Technique::Random]);
}
