use std::sync::Arc;
use std::time::Duration;

use escpos::driver::{ConsoleDriver, Driver, NetworkDriver, UsbDriver};
use escpos::errors::PrinterError;
use escpos::printer::Printer;
use escpos::utils::{BitImageOption, BitImageSize, Protocol};
use tokio::sync::Mutex;

use crate::app::config::{PrinterConfig, PrinterKind};
use crate::error::AppError;
use crate::services::image_fetch::ImageFetcher;

/// Widest bit image an 80mm roll takes.
pub const MAX_IMAGE_WIDTH: u32 = 576;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where jobs are sent. A connection is opened per job and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    Network { host: String, port: u16 },
    Usb { vendor_id: u16, product_id: u16 },
    Console,
}

impl PrinterTarget {
    pub fn kind(&self) -> PrinterKind {
        match self {
            PrinterTarget::Network { .. } => PrinterKind::Network,
            PrinterTarget::Usb { .. } => PrinterKind::Usb,
            PrinterTarget::Console => PrinterKind::Console,
        }
    }
}

impl From<&PrinterConfig> for PrinterTarget {
    fn from(config: &PrinterConfig) -> Self {
        match config.kind {
            PrinterKind::Network => PrinterTarget::Network {
                host: config.network.ip_address.clone(),
                port: config.network.port,
            },
            PrinterKind::Usb => PrinterTarget::Usb {
                vendor_id: config.usb.vendor_id,
                product_id: config.usb.product_id,
            },
            PrinterKind::Console => PrinterTarget::Console,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintJob {
    Text(String),
    Qr(String),
    Barcode(String),
    Image(Vec<u8>),
}

impl PrintJob {
    /// Short description for the print log.
    pub fn summary(&self) -> String {
        match self {
            PrintJob::Text(text) => format!("Text: {}", shorten(text)),
            PrintJob::Qr(data) => format!("QR: {}", shorten(data)),
            PrintJob::Barcode(data) => format!("Barcode: {}", data),
            PrintJob::Image(bytes) => format!("Image ({} bytes)", bytes.len()),
        }
    }
}

fn shorten(text: &str) -> String {
    const MAX_CHARS: usize = 32;
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > MAX_CHARS || line.len() < text.len() {
        let head: String = line.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

#[derive(Clone)]
pub struct PrinterService {
    target: PrinterTarget,
    lock: Arc<Mutex<()>>,
    fetcher: ImageFetcher,
}

impl PrinterService {
    pub fn new(target: PrinterTarget) -> Result<Self, AppError> {
        Ok(Self {
            target,
            lock: Arc::new(Mutex::new(())),
            fetcher: ImageFetcher::new()?,
        })
    }

    pub fn target(&self) -> &PrinterTarget {
        &self.target
    }

    /// Prints one job. Jobs never overlap on the device.
    pub async fn print(&self, job: PrintJob) -> Result<(), AppError> {
        let target = self.target.clone();
        self.exclusive(move || Self::print_blocking(&target, &job)).await
    }

    /// Runs `work` on the blocking pool while holding the device lock. The
    /// guard lives inside the blocking task, so a dropped caller cannot free
    /// the device before `work` returns.
    async fn exclusive<F, R>(&self, work: F) -> Result<R, AppError>
    where
        F: FnOnce() -> Result<R, AppError> + Send + 'static,
        R: Send + 'static,
    {
        let guard = self.lock.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            work()
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn print_image_url(&self, url: &str) -> Result<(), AppError> {
        let bytes = self.fetcher.fetch(url).await?;
        self.print(PrintJob::Image(bytes)).await?;
        log::info!("Image printed from URL: {}", url);
        Ok(())
    }

    fn print_blocking(target: &PrinterTarget, job: &PrintJob) -> Result<(), AppError> {
        match target {
            PrinterTarget::Network { host, port } => {
                let driver = NetworkDriver::open(host, *port, Some(CONNECT_TIMEOUT))
                    .map_err(connection_error)?;
                log::info!("Connected to network printer at {}:{}", host, port);
                Self::render(driver, job)?;
            }
            PrinterTarget::Usb {
                vendor_id,
                product_id,
            } => {
                let driver = UsbDriver::open(*vendor_id, *product_id, None, None)
                    .map_err(connection_error)?;
                log::info!(
                    "Connected to USB printer, VID: 0x{:04X}, PID: 0x{:04X}",
                    vendor_id,
                    product_id
                );
                Self::render(driver, job)?;
            }
            PrinterTarget::Console => {
                Self::render(ConsoleDriver::open(true), job)?;
            }
        }

        log::info!("{} printed", job.summary());
        Ok(())
    }

    fn render<D: Driver>(driver: D, job: &PrintJob) -> Result<(), PrinterError> {
        let mut printer = Printer::new(driver, Protocol::default(), None);
        printer.init()?;

        match job {
            PrintJob::Text(text) => {
                printer.writeln(text)?;
            }
            PrintJob::Qr(data) => {
                printer.qrcode(data)?;
            }
            PrintJob::Barcode(data) => {
                printer.ean13(data)?;
            }
            PrintJob::Image(bytes) => {
                let option = BitImageOption::new(Some(MAX_IMAGE_WIDTH), None, BitImageSize::Normal)?;
                printer.bit_image_from_bytes_option(bytes, option)?;
            }
        }

        printer.print_cut()?;
        Ok(())
    }
}

fn connection_error(e: PrinterError) -> AppError {
    let detail = match e {
        PrinterError::Input(msg) | PrinterError::InvalidResponse(msg) | PrinterError::Io(msg) => msg,
    };
    log::error!("Error connecting to printer: {}", detail);
    AppError::PrinterError(format!("Connection error: {}", detail))
}

#[cfg(test)]
pub(crate) fn one_pixel_png() -> Vec<u8> {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    STANDARD
        .decode("iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==")
        .unwrap()
}
