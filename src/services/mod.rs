mod image_fetch;
mod printer;

pub use printer::{PrintJob, PrinterService, PrinterTarget};
#[cfg(test)]
pub(crate) use printer::one_pixel_png;
