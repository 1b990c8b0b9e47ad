use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::client::surface::ResultSurface;
use crate::client::transport::PrintTransport;
use crate::error::RequestFailure;
use crate::models::{PrintKind, PrintRequest, PrintResult};

/// Which response is allowed to reach the result display when several
/// dispatches are in flight.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrdering {
    /// Only the response of the most recently issued dispatch is shown.
    #[default]
    LatestIssued,
    /// Every response is shown as it resolves; the last one to resolve wins.
    LastResolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub sequence: u64,
    pub text: String,
    /// False when the response was stale and not written to the display.
    pub applied: bool,
}

/// Turns a print action into one request and one displayed outcome.
pub struct Dispatcher<T, S> {
    transport: Arc<T>,
    surface: Arc<S>,
    latest: Arc<Mutex<u64>>,
    ordering: ResultOrdering,
}

impl<T, S> Clone for Dispatcher<T, S> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            surface: self.surface.clone(),
            latest: self.latest.clone(),
            ordering: self.ordering,
        }
    }
}

impl<T: PrintTransport, S: ResultSurface> Dispatcher<T, S> {
    pub fn new(transport: T, surface: S) -> Self {
        Self {
            transport: Arc::new(transport),
            surface: Arc::new(surface),
            latest: Arc::new(Mutex::new(0)),
            ordering: ResultOrdering::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: ResultOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Reads the input for `kind` and claims a sequence number right away;
    /// the returned future performs the request and writes the outcome.
    pub fn dispatch(
        &self,
        kind: PrintKind,
    ) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        let request = PrintRequest::new(kind, self.surface.read_field(kind.input_id()));
        let sequence = self.issue();
        let this = self.clone();

        async move {
            log::debug!(
                "Dispatch #{}: {} -> {}",
                sequence,
                request.kind().label(),
                request.kind().path()
            );

            let text = match this.send(&request).await {
                Ok(result) => format!("{} printing result: {}", kind.label(), result.message),
                Err(e) => {
                    log::warn!("Dispatch #{} failed: {}", sequence, e);
                    format!("Error: {}", e)
                }
            };

            let applied = this.apply(sequence, &text);
            DispatchOutcome {
                sequence,
                text,
                applied,
            }
        }
    }

    pub fn print_text(&self) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        self.dispatch(PrintKind::Text)
    }

    pub fn print_qr(&self) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        self.dispatch(PrintKind::Qr)
    }

    pub fn print_image(&self) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        self.dispatch(PrintKind::ImageUrl)
    }

    pub fn print_barcode(&self) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        self.dispatch(PrintKind::Barcode)
    }

    /// One request, no retry.
    pub async fn send(&self, request: &PrintRequest) -> Result<PrintResult, RequestFailure> {
        let body = request.body();
        let reply = self
            .transport
            .post_json(request.kind().path(), &body)
            .await?;
        Ok(serde_json::from_str(&reply)?)
    }

    fn issue(&self) -> u64 {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *latest += 1;
        *latest
    }

    fn apply(&self, sequence: u64, text: &str) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if self.ordering == ResultOrdering::LatestIssued && *latest != sequence {
            log::debug!(
                "Dropping stale result #{} (latest is #{})",
                sequence,
                *latest
            );
            return false;
        }
        self.surface.write_result(text);
        true
    }
}
