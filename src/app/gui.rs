use crate::app::{JobRecord, PrintLog};
use crate::client::{Dispatcher, HttpTransport, PanelState};
use crate::models::PrintKind;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::watch;

fn input_label(kind: PrintKind) -> &'static str {
    match kind {
        PrintKind::Text => "Text:",
        PrintKind::Qr => "QR data:",
        PrintKind::ImageUrl => "Image URL:",
        PrintKind::Barcode => "Barcode data:",
    }
}

pub struct PrintPanel {
    state: PanelState,
    dispatcher: Dispatcher<HttpTransport, PanelState>,
    runtime: Handle,
    print_log: Arc<Mutex<PrintLog>>,
    serving: watch::Receiver<bool>,
}

impl PrintPanel {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dispatcher: Dispatcher<HttpTransport, PanelState>,
        runtime: Handle,
        print_log: Arc<Mutex<PrintLog>>,
        serving: watch::Receiver<bool>,
    ) -> Self {
        Self {
            state: dispatcher.surface().clone(),
            dispatcher,
            runtime,
            print_log,
            serving,
        }
    }

    fn render_actions_panel(&mut self, ui: &mut egui::Ui) {
        let mut clicked = Vec::new();

        egui::Frame::group(ui.style())
            .fill(ui.style().visuals.window_fill)
            .show(ui, |ui| {
                ui.heading("Print");
                ui.add_space(8.0);

                // Field guard is released before anything is dispatched.
                let mut fields = self.state.fields();
                egui::Grid::new("print_actions_grid")
                    .num_columns(3)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        for kind in PrintKind::ALL {
                            ui.label(input_label(kind));
                            ui.text_edit_singleline(
                                fields.entry(kind.input_id().to_string()).or_default(),
                            );
                            if ui.button(kind.button_text()).clicked() {
                                clicked.push(kind);
                            }
                            ui.end_row();
                        }
                    });
            });

        for kind in clicked {
            match kind {
                PrintKind::Text => self.runtime.spawn(self.dispatcher.print_text()),
                PrintKind::Qr => self.runtime.spawn(self.dispatcher.print_qr()),
                PrintKind::ImageUrl => self.runtime.spawn(self.dispatcher.print_image()),
                PrintKind::Barcode => self.runtime.spawn(self.dispatcher.print_barcode()),
            };
        }
    }

    fn render_result_panel(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .fill(ui.style().visuals.window_fill)
            .show(ui, |ui| {
                ui.heading("Result");
                ui.add_space(4.0);

                let result = self.state.result();
                if result.is_empty() {
                    ui.label(egui::RichText::new("Nothing printed yet").italics().weak());
                } else if result.starts_with("Error: ") {
                    ui.label(egui::RichText::new(result).color(egui::Color32::from_rgb(200, 100, 100)));
                } else {
                    ui.label(result);
                }
            });
    }

    fn render_history_panel(&self, ui: &mut egui::Ui) {
        ui.collapsing("Job history", |ui| {
            let log = self.print_log.lock().unwrap_or_else(|e| e.into_inner());
            if log.is_empty() {
                ui.label(egui::RichText::new("No jobs received").weak());
                return;
            }

            egui::ScrollArea::vertical()
                .max_height(220.0)
                .show(ui, |ui| {
                    egui::Grid::new("job_history_grid")
                        .num_columns(4)
                        .striped(true)
                        .show(ui, |ui| {
                            for record in log.recent() {
                                history_row(ui, record);
                            }
                        });
                });
        });
    }
}

fn history_row(ui: &mut egui::Ui, record: &JobRecord) {
    let status_color = if record.succeeded() {
        egui::Color32::from_rgb(100, 200, 100)
    } else {
        egui::Color32::from_rgb(200, 100, 100)
    };

    ui.monospace(record.at.format("%H:%M:%S").to_string());
    ui.label(egui::RichText::new(record.http_status.to_string()).color(status_color));
    ui.monospace(&record.endpoint);
    let detail = ui.label(&record.detail);
    if let Some(error) = &record.error {
        detail.on_hover_text(error);
    }
    ui.end_row();
}

impl eframe::App for PrintPanel {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Results arrive from tokio tasks
        ctx.request_repaint_after(std::time::Duration::from_millis(100));

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("ESC/POS Print Panel");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if *self.serving.borrow() {
                        ui.label(
                            egui::RichText::new("\u{25CF} Serving")
                                .color(egui::Color32::from_rgb(0, 200, 0)),
                        );
                    } else {
                        ui.label(
                            egui::RichText::new("\u{25CF} Stopped")
                                .color(egui::Color32::from_rgb(200, 0, 0)),
                        );
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.label(format!("API: {}", self.dispatcher.transport().base_url()));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_actions_panel(ui);
            ui.add_space(8.0);
            self.render_result_panel(ui);
            ui.add_space(8.0);
            self.render_history_panel(ui);
        });
    }
}
