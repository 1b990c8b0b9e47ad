use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::PrintKind;

/// A single print action, built from the current input value at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRequest {
    kind: PrintKind,
    value: String,
}

impl PrintRequest {
    pub fn new(kind: PrintKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> PrintKind {
        self.kind
    }

    /// JSON body `{"<field>": "<value>"}` with no other keys.
    pub fn body(&self) -> Value {
        let mut map = Map::with_capacity(1);
        map.insert(self.kind.field().to_string(), Value::String(self.value.clone()));
        Value::Object(map)
    }
}

// Server-side bodies. Fields are optional so a missing field can be answered
// with the same message as an empty one.

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TextPrintSchema {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QrPrintSchema {
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BarcodePrintSchema {
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ImageUrlSchema {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ImageDataSchema {
    #[serde(default)]
    pub image_data: Option<String>,
}
