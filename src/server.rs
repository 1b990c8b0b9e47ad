use std::net::SocketAddr;

use tokio::sync::watch;

use crate::handlers::PrintContext;
use crate::routes::routes;

/// Serves the print API until the process exits. `serving` reports whether
/// the listener is up.
pub async fn run(ctx: PrintContext, addr: SocketAddr, serving: watch::Sender<bool>) {
    if let Err(e) = tokio::fs::create_dir_all(&ctx.upload_folder).await {
        log::warn!(
            "Failed to create upload folder {:?}: {}",
            ctx.upload_folder,
            e
        );
    }

    let routes = routes(ctx);
    match warp::serve(routes).try_bind_ephemeral(addr) {
        Ok((bound, server)) => {
            log::info!("Serving the print API on http://{}", bound);
            let _ = serving.send(true);
            server.await;
        }
        Err(e) => {
            log::error!("Failed to bind the print API on {}: {}", addr, e);
        }
    }

    let _ = serving.send(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::app::PrintLog;
    use crate::client::{Dispatcher, HttpTransport, PanelState};
    use crate::models::PrintKind;
    use crate::services::{PrinterService, PrinterTarget};

    #[tokio::test]
    async fn test_panel_prints_through_running_server() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        let ctx = PrintContext::new(
            PrinterService::new(PrinterTarget::Console).unwrap(),
            Arc::new(Mutex::new(PrintLog::new(10))),
            std::env::temp_dir(),
            false,
        );

        let (serving_tx, mut serving_rx) = watch::channel(false);
        tokio::spawn(run(ctx, addr, serving_tx));
        tokio::time::timeout(Duration::from_secs(5), serving_rx.wait_for(|up| *up))
            .await
            .unwrap()
            .unwrap();

        let state = PanelState::new();
        state.set_field(PrintKind::Text.input_id(), "Hello from the panel");
        let transport = HttpTransport::new(format!("http://{}", addr), None).unwrap();
        let dispatcher = Dispatcher::new(transport, state.clone());

        dispatcher.print_text().await;
        assert_eq!(state.result(), "Text printing result: Text printed successfully");

        // Empty input is still sent; the server answers with its validation message.
        dispatcher.print_qr().await;
        assert_eq!(
            state.result(),
            "QR code printing result: 'data' field is required for QR"
        );
    }
}
