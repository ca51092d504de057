use std::rc::Rc;
use std::time::Duration;

use drplot::export::{save_png, surface_to_svg};
use drplot::plot::Margin;
use drplot::{ColorScheme, DatasetCollection, PlotConfig, PlotView, SelectionState, SurfaceSize};

fn drawn_view() -> PlotView {
    let data = DatasetCollection::from_json_str(
        r#"{"iris": {"stress": {"scales": [0, 3, 3], "MDS": [3, 1, 2], "TSNE": [2, 2, 2]}}}"#,
    )
    .unwrap();
    let mut view = PlotView::new(
        Rc::new(data),
        &PlotConfig::for_metric("stress"),
        SurfaceSize {
            width: 320.0,
            height: 200.0,
        },
        Margin::default(),
        Duration::ZERO,
    );
    view.update("iris", &SelectionState::new("iris")).unwrap();
    view
}

#[test]
fn svg_carries_series_markers_and_legend() {
    let view = drawn_view();
    let svg = surface_to_svg(view.surface(), &ColorScheme::Light);
    assert_eq!(svg.matches("<polyline").count(), 2);
    assert!(svg.contains(">Minimum</text>"));
    assert!(svg.contains(">log(Normalized stress)</text>"));
    assert!(svg.contains(r#"transform="rotate(-90"#));
}

#[test]
fn png_has_surface_dimensions() {
    let view = drawn_view();
    let path = std::env::temp_dir().join(format!("drplot_png_test_{}.png", std::process::id()));
    save_png(view.surface(), &ColorScheme::Dark, &path).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (320, 200));
    let _ = std::fs::remove_file(&path);
}
