//! [`ViewerApp`]: the eframe application around a [`ViewContainer`].

use std::sync::mpsc::Receiver;
use std::time::Instant;

use eframe::egui;
use egui_phosphor::regular::{CHART_LINE, EXPORT, FLOPPY_DISK, IMAGE};

use crate::color_scheme::ColorScheme;
use crate::container::ViewContainer;
use crate::data::dataset::display_name;
use crate::data::ranking::format_ranking;
use crate::data::technique::Technique;
use crate::events::{EventFilter, EventKind, PlotEvent};
use crate::export::ExportFormat;

use super::painter::{paint_surface, paint_tooltips, Placement};

pub struct ViewerApp {
    container: ViewContainer,
    events: Receiver<PlotEvent>,
    /// Slider position of the x-range control.
    x_limit: f64,
    limit_x: bool,
    /// Ranking probe position per technique, indexed by [`Technique::index`].
    probes: [f64; 3],
    status: Option<String>,
    color_scheme_applied: bool,
}

impl ViewerApp {
    pub fn new(container: ViewContainer) -> Self {
        let events = container.events().subscribe(EventFilter::only(
            EventKind::EXPORT | EventKind::TECHNIQUE_SKIPPED | EventKind::DATASET_SELECTED,
        ));
        let (lo, hi) = container.x_extent().unwrap_or((0.0, 1.0));
        Self {
            container,
            events,
            x_limit: hi,
            limit_x: false,
            probes: [(lo + hi) / 2.0; 3],
            status: None,
            color_scheme_applied: false,
        }
    }

    pub fn container(&self) -> &ViewContainer {
        &self.container
    }

    fn drain_events(&mut self) {
        while let Ok(ev) = self.events.try_recv() {
            let msg = if ev.kinds.contains(EventKind::EXPORT) {
                ev.detail.map(|p| format!("Saved {p}"))
            } else if ev.kinds.contains(EventKind::TECHNIQUE_SKIPPED) {
                match (ev.technique, ev.detail) {
                    (Some(t), Some(d)) => Some(format!("{t} skipped: {d}")),
                    _ => None,
                }
            } else {
                // A new dataset clears stale skip messages.
                Some(String::new())
            };
            if let Some(m) = msg {
                self.status = (!m.is_empty()).then_some(m);
            }
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.heading(format!("{CHART_LINE} Techniques"));
        ui.add_space(4.0);

        let current = self.container.selection().dataset().to_string();
        let names: Vec<String> = self.container.data().names().map(str::to_string).collect();
        let mut chosen = None;
        egui::ComboBox::from_label("Dataset")
            .selected_text(display_name(&current))
            .show_ui(ui, |ui| {
                for name in &names {
                    if ui.selectable_label(*name == current, display_name(name)).clicked() && *name != current {
                        chosen = Some(name.clone());
                    }
                }
            });
        if let Some(name) = chosen {
            self.container.select_dataset(&name);
            self.clamp_sliders();
        }

        ui.separator();
        for t in Technique::ALL {
            let mut visible = self.container.selection().is_visible(t);
            let label = egui::RichText::new(t.label()).color(t.color()).strong();
            if ui.checkbox(&mut visible, label).changed() {
                self.container.set_technique_visible(t, visible);
            }
        }

        ui.separator();
        let (lo, hi) = self.container.x_extent().unwrap_or((0.0, 1.0));
        let mut input = None;
        if ui.checkbox(&mut self.limit_x, "Limit scale range").changed() {
            input = Some(self.limit_x.then_some(self.x_limit));
        }
        let slider = ui.add_enabled(
            self.limit_x,
            egui::Slider::new(&mut self.x_limit, lo..=hi).text("max scale"),
        );
        if slider.changed() {
            input = Some(Some(self.x_limit));
        }
        if let Some(limit) = input {
            self.container.input_x_limit(limit, now);
        }

        ui.separator();
        ui.label("Order at scale value");
        for t in Technique::ALL {
            if !self.container.selection().is_visible(t) {
                continue;
            }
            let label = egui::RichText::new(t.label()).color(t.color());
            ui.add(egui::Slider::new(&mut self.probes[t.index()], lo..=hi).text(label));
        }
        let probes = self.probes;
        for (i, view) in self.container.views().iter().enumerate() {
            let title = view.borrow().labels().title.clone();
            let order = match self.container.ranking_with(i, |t| probes[t.index()]) {
                Ok(Some(ranked)) => format_ranking(&ranked),
                Ok(None) => "-".to_string(),
                Err(e) => e.to_string(),
            };
            ui.label(format!("{title}: {order}"));
        }

        ui.separator();
        let mut scheme = self.container.config().color_scheme;
        egui::ComboBox::from_label("Theme")
            .selected_text(scheme.label())
            .show_ui(ui, |ui| {
                for s in ColorScheme::all() {
                    ui.selectable_value(&mut scheme, *s, s.label());
                }
            });
        if scheme != self.container.config().color_scheme {
            self.container.set_color_scheme(scheme);
            scheme.apply(ui.ctx());
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(format!("{EXPORT} SVG")).clicked() {
                self.export(ExportFormat::Svg);
            }
            if ui.button(format!("{IMAGE} PNG")).clicked() {
                self.export(ExportFormat::Png);
            }
        });
        if ui
            .button(format!("{FLOPPY_DISK} Save settings"))
            .on_hover_text("Write the current settings to ~/.drplot/config.yaml")
            .clicked()
        {
            self.status = Some(match self.container.config().save_to_default_path() {
                Ok(()) => "Settings saved".to_string(),
                Err(e) => format!("Failed to save settings: {e}"),
            });
        }

        if let Some(status) = &self.status {
            ui.add_space(8.0);
            ui.small(status);
        }
    }

    fn clamp_sliders(&mut self) {
        if let Some((lo, hi)) = self.container.x_extent() {
            self.x_limit = self.x_limit.clamp(lo, hi);
            for p in &mut self.probes {
                *p = p.clamp(lo, hi);
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let Some(dir) = rfd::FileDialog::new()
            .set_title(format!("Export plots ({})", format.extension()))
            .pick_folder()
        else {
            return;
        };
        let dir = dir.join(format!("drplot_{stamp}"));
        if let Err(e) = self.container.export_all(&dir, format) {
            tracing::error!(error = %e, "export failed");
            self.status = Some(format!("Export failed: {e}"));
        }
    }

    fn plots_ui(&mut self, ui: &mut egui::Ui) {
        let scheme = self.container.config().color_scheme;
        let dataset = self.container.selection().dataset().to_string();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for i in 0..self.container.views().len() {
                let view = self.container.views()[i].clone();
                let (w, h) = {
                    let v = view.borrow();
                    (v.surface().width(), v.surface().height())
                };
                let scale = (ui.available_width() / w).clamp(0.25, 1.0);
                let (rect, response) = ui.allocate_exact_size(egui::vec2(w, h) * scale, egui::Sense::hover());
                let placement = Placement::new(rect.min, view.borrow().surface(), scale);
                let pos = response.hover_pos().and_then(|p| placement.to_surface(p));
                self.container.pointer_moved(i, pos);

                let v = view.borrow();
                let painter = ui.painter_at(rect);
                paint_surface(&painter, &placement, v.surface(), scheme);
                paint_tooltips(&painter, &placement, v.annotations(), scheme);
                if v.dataset() != Some(dataset.as_str()) {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("No {} data for {}", v.labels().title, display_name(&dataset)),
                        egui::FontId::proportional(14.0 * scale.max(0.75)),
                        scheme.foreground(),
                    );
                }
            }
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.color_scheme_applied {
            self.container.config().color_scheme.apply(ctx);
            self.color_scheme_applied = true;
        }
        let now = Instant::now();
        let busy = self.container.poll(now);
        self.drain_events();

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| self.controls_ui(ui, now));
        egui::CentralPanel::default().show(ctx, |ui| self.plots_ui(ui));

        if busy {
            ctx.request_repaint();
        }
    }
}
