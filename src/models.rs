mod kind;
mod request;
mod response;

pub use kind::PrintKind;
pub use request::{
    BarcodePrintSchema, ImageDataSchema, ImageUrlSchema, PrintRequest, QrPrintSchema,
    TextPrintSchema,
};
pub use response::{PrintResponse, PrintResult};
