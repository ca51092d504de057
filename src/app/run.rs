//! Top-level entry point for running the viewer as a native window.

use eframe::egui;

use crate::container::ViewContainer;
use crate::data::technique::Technique;
use crate::export::svg_to_image;

use super::ViewerApp;

/// Open a native window showing `container` and block until it is closed.
pub fn run_viewer(container: ViewContainer) -> eframe::Result<()> {
    let title = container.config().title.clone();
    let size = container.config().surface;
    let plots = container.views().len().max(1) as f32;
    let app = ViewerApp::new(container);

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(size.width + 300.0, (size.height * plots + 40.0).min(1000.0)));
    if let Some(icon) = app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let opts = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

/// Three technique-colored polylines, rasterized to window icon pixels.
fn app_icon() -> Option<egui::IconData> {
    let paths: String = Technique::ALL
        .iter()
        .zip(["M6 10 L20 40 L34 30 L58 54", "M6 30 L22 20 L40 44 L58 24", "M6 52 L24 50 L42 12 L58 8"])
        .map(|(t, d)| {
            let c = t.color();
            format!(
                r#"<path d="{d}" fill="none" stroke="rgb({},{},{})" stroke-width="5" stroke-linecap="round"/>"#,
                c.r(),
                c.g(),
                c.b()
            )
        })
        .collect();
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><rect width="64" height="64" fill="white"/>{paths}</svg>"#
    );
    let img = svg_to_image(&svg).ok()?;
    Some(egui::IconData {
        width: img.width(),
        height: img.height(),
        rgba: img.into_raw(),
    })
}
