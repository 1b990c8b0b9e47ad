use std::fmt;

use serde::{Deserialize, Serialize};

/// The four print actions exposed by the panel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrintKind {
    Text,
    Qr,
    ImageUrl,
    Barcode,
}

impl PrintKind {
    pub const ALL: [PrintKind; 4] = [
        PrintKind::Text,
        PrintKind::Qr,
        PrintKind::ImageUrl,
        PrintKind::Barcode,
    ];

    /// Endpoint path on the print API.
    pub fn path(self) -> &'static str {
        match self {
            PrintKind::Text => "/print",
            PrintKind::Qr => "/print/qr",
            PrintKind::ImageUrl => "/print/image-url",
            PrintKind::Barcode => "/print/barcode",
        }
    }

    /// Name of the single JSON field carried by the request body.
    pub fn field(self) -> &'static str {
        match self {
            PrintKind::Text => "message",
            PrintKind::Qr => "data",
            PrintKind::ImageUrl => "image_url",
            PrintKind::Barcode => "data",
        }
    }

    /// Prefix used when displaying a result.
    pub fn label(self) -> &'static str {
        match self {
            PrintKind::Text => "Text",
            PrintKind::Qr => "QR code",
            PrintKind::ImageUrl => "Image",
            PrintKind::Barcode => "Barcode",
        }
    }

    /// Id of the panel input the value is read from.
    pub fn input_id(self) -> &'static str {
        match self {
            PrintKind::Text => "print-text",
            PrintKind::Qr => "qr-data",
            PrintKind::ImageUrl => "image-url",
            PrintKind::Barcode => "barcode-data",
        }
    }

    pub fn button_text(self) -> &'static str {
        match self {
            PrintKind::Text => "Print Text",
            PrintKind::Qr => "Print QR",
            PrintKind::ImageUrl => "Print Image",
            PrintKind::Barcode => "Print Barcode",
        }
    }
}

impl fmt::Display for PrintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
