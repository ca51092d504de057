use std::rc::Rc;
use std::time::{Duration, Instant};

use drplot::plot::ElementClass;
use drplot::{DatasetCollection, EventFilter, EventKind, ExportFormat, Technique, ViewContainer, ViewerConfig};

const DATA: &str = r#"{
    "iris": {
        "stress": {"scales": [0, 4, 4], "MDS": [3, 1, 2, 2], "TSNE": [0.5, 0.7, 0.9, 1], "RANDOM": [4, 4, 4, 4]},
        "KL": {"scales": [0, 4, 4], "MDS": [0.3, 0.2, 0.1, 0.1], "TSNE": [0.2, 0.1, 0.05, 0.04], "RANDOM": [1, 1, 1, 1]}
    },
    "wine": {
        "stress": {"scales": [0, 2, 2], "MDS": [2, 1], "TSNE": [3, 2], "RANDOM": [5, 5]},
        "KL": {"scales": [0, 2, 2], "MDS": [0.5, 0.4], "TSNE": [0.6, 0.1], "RANDOM": [2, 2]}
    }
}"#;

fn container(config: ViewerConfig) -> ViewContainer {
    let data = Rc::new(DatasetCollection::from_json_str(DATA).unwrap());
    ViewContainer::new(data, config).unwrap()
}

#[test]
fn initial_selection_draws_every_view() {
    let c = container(ViewerConfig::default());
    assert_eq!(c.selection().dataset(), "iris");
    assert_eq!(c.views().len(), 2);
    for view in c.views() {
        let v = view.borrow();
        assert_eq!(v.last_report().unwrap().drawn.len(), 3);
        assert_eq!(v.surface().count(ElementClass::Series), 3);
    }
}

#[test]
fn default_dataset_is_honored() {
    let config = ViewerConfig {
        default_dataset: Some("wine".into()),
        ..ViewerConfig::default()
    };
    let c = container(config);
    assert_eq!(c.selection().dataset(), "wine");
    assert_eq!(c.view("KL").unwrap().borrow().dataset(), Some("wine"));
}

#[test]
fn selection_changes_reach_all_views() {
    let mut c = container(ViewerConfig::default());
    assert!(!c.toggle_technique(Technique::Random));
    c.select_dataset("wine");
    for view in c.views() {
        let v = view.borrow();
        assert_eq!(v.dataset(), Some("wine"));
        assert_eq!(v.last_report().unwrap().drawn, vec![Technique::Mds, Technique::Tsne]);
    }
}

#[test]
fn x_limit_is_debounced() {
    let mut c = container(ViewerConfig::default());
    let t0 = Instant::now();
    let stress = c.view("stress").unwrap();

    c.input_x_limit(Some(3.0), t0);
    c.poll(t0 + Duration::from_millis(100));
    assert_eq!(stress.borrow().scales().x.domain(), (0.0, 4.0));

    c.input_x_limit(Some(2.5), t0 + Duration::from_millis(150));
    assert!(c.poll(t0 + Duration::from_millis(300)));
    assert_eq!(stress.borrow().scales().x.domain(), (0.0, 4.0));
    assert_eq!(c.pending_x_limit(), Some(Some(2.5)));

    c.poll(t0 + Duration::from_millis(360));
    assert_eq!(stress.borrow().scales().x.domain(), (0.0, 2.5));
    assert_eq!(c.selection().x_limit(), Some(2.5));
    assert_eq!(c.pending_x_limit(), None);
}

#[test]
fn ranking_uses_visible_techniques() {
    let mut c = container(ViewerConfig::default());
    c.set_technique_visible(Technique::Random, false);
    let ranked = c.ranking_at(0, 1.0).unwrap().unwrap();
    let order: Vec<Technique> = ranked.iter().map(|r| r.technique).collect();
    assert_eq!(order, vec![Technique::Tsne, Technique::Mds]);
}

#[test]
fn events_are_published() {
    let mut c = container(ViewerConfig::default());
    let rx = c.events().subscribe(EventFilter::only(EventKind::TECHNIQUE_HIDDEN | EventKind::VIEW_UPDATED));
    c.toggle_technique(Technique::Mds);
    let kinds: Vec<EventKind> = rx.try_iter().map(|e| e.kinds).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds[0].contains(EventKind::TECHNIQUE_HIDDEN));
    assert!(kinds[1..].iter().all(|k| k.contains(EventKind::VIEW_UPDATED)));
}

#[test]
fn export_all_writes_one_file_per_view() {
    let c = container(ViewerConfig::default());
    let dir = std::env::temp_dir().join(format!("drplot_export_test_{}", std::process::id()));
    let written = c.export_all(&dir, ExportFormat::Svg).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["iris_stress.svg", "iris_KL.svg"]);
    let svg = std::fs::read_to_string(&written[0]).unwrap();
    assert!(svg.contains("Stress"));
    assert!(svg.contains("#a40000"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn export_datasets_covers_every_dataset_and_restores_selection() {
    let mut c = container(ViewerConfig::default());
    let dir = std::env::temp_dir().join(format!("drplot_export_all_test_{}", std::process::id()));
    let written = c.export_datasets(&dir, ExportFormat::Svg).unwrap();
    assert_eq!(written.len(), 4);
    assert!(written.iter().any(|p| p.ends_with("wine_KL.svg")));
    assert_eq!(c.selection().dataset(), "iris");
    let _ = std::fs::remove_dir_all(&dir);
}

const PARTIAL: &str = r#"{
    "alpha": {
        "stress": {"scales": [0, 3, 3], "MDS": [3, 1, 2], "TSNE": [0.5, 0.7, 0.9], "RANDOM": [4, 4, 4]},
        "KL": {"scales": [0, 3, 3], "MDS": [0.3, 0.2, 0.1], "TSNE": [0.2, 0.1, 0.05], "RANDOM": [1, 1, 1]}
    },
    "beta": {
        "stress": {"scales": [0, 2, 2], "MDS": [2, 1], "TSNE": [3, 2], "RANDOM": [5, 5]}
    }
}"#;

#[test]
fn dataset_without_metric_blanks_that_plot() {
    let data = Rc::new(DatasetCollection::from_json_str(PARTIAL).unwrap());
    let mut c = ViewContainer::new(data, ViewerConfig::default()).unwrap();
    c.select_dataset("beta");

    let stress = c.view("stress").unwrap();
    assert_eq!(stress.borrow().dataset(), Some("beta"));
    assert_eq!(stress.borrow().surface().count(ElementClass::Series), 3);

    let kl = c.view("KL").unwrap();
    let kl = kl.borrow();
    assert_eq!(kl.dataset(), None);
    assert_eq!(kl.surface().count(ElementClass::Series), 0);
    assert_eq!(kl.surface().count(ElementClass::Marker), 0);
    assert_eq!(kl.surface().count(ElementClass::Legend), 0);
    assert!(kl.annotations().markers().is_empty());
}

#[test]
fn export_leaves_out_plots_without_data() {
    let data = Rc::new(DatasetCollection::from_json_str(PARTIAL).unwrap());
    let mut c = ViewContainer::new(data, ViewerConfig::default()).unwrap();
    let dir = std::env::temp_dir().join(format!("drplot_export_partial_test_{}", std::process::id()));
    let written = c.export_datasets(&dir, ExportFormat::Svg).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha_stress.svg", "alpha_KL.svg", "beta_stress.svg"]);
    assert!(!dir.join("beta_KL.svg").exists());
    let beta = std::fs::read_to_string(dir.join("beta_stress.svg")).unwrap();
    assert!(beta.contains("<polyline"));
    assert_eq!(c.view("KL").unwrap().borrow().dataset(), Some("alpha"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ranking_positions_can_differ_per_technique() {
    let c = container(ViewerConfig::default());
    let same = c.ranking_at(1, 3.0).unwrap().unwrap();
    assert_eq!(same[0].technique, Technique::Tsne);

    let ranked = c
        .ranking_with(1, |t| if t == Technique::Mds { 3.0 } else { 0.0 })
        .unwrap()
        .unwrap();
    let order: Vec<Technique> = ranked.iter().map(|r| r.technique).collect();
    assert_eq!(order, vec![Technique::Mds, Technique::Tsne, Technique::Random]);
    assert_eq!((ranked[0].x, ranked[0].value), (3.0, 0.1));
}
