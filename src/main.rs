#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod client;
mod error;
mod handlers;
mod models;
mod routes;
mod server;
mod services;

use crate::app::file_logger::{init_console_logging, init_file_logging};
use crate::app::{AppConfig, PrintLog, PrintPanel};
use crate::client::{Dispatcher, HttpTransport, PanelState};
use crate::handlers::PrintContext;
use crate::services::{PrinterService, PrinterTarget};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();

    if !config.logging.to_file || init_file_logging(&config.logging.level).is_err() {
        init_console_logging(&config.logging.level);
    }

    let target = PrinterTarget::from(&config.printer);
    log::info!("Printer type: {}, target: {:?}", config.printer.kind, target);

    let print_log = Arc::new(Mutex::new(PrintLog::open(
        PrintLog::history_path(),
        config.ui.max_log_entries,
    )));
    let ctx = PrintContext::new(
        PrinterService::new(target)?,
        print_log.clone(),
        config.upload_folder.0.clone(),
        config.ui.notifications,
    );
    let addr = config.server_addr()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let (serving_tx, serving_rx) = watch::channel(false);

    if !config.ui.show_panel {
        runtime.block_on(server::run(ctx, addr, serving_tx));
        return Ok(());
    }

    runtime.spawn(server::run(ctx, addr, serving_tx));

    let transport = HttpTransport::new(
        config.client_base_url(),
        config.client.timeout_secs.map(Duration::from_secs),
    )?;
    let dispatcher =
        Dispatcher::new(transport, PanelState::new()).with_ordering(config.client.ordering);
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 560.0])
            .with_min_inner_size([420.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ESC/POS Print Panel",
        options,
        Box::new(move |cc| {
            Ok(Box::new(PrintPanel::new(
                cc,
                dispatcher,
                handle,
                print_log,
                serving_rx,
            )))
        }),
    )?;

    Ok(())
}
