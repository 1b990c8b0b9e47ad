use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Where the dispatcher reads its input and writes its outcome.
pub trait ResultSurface: Send + Sync + 'static {
    fn read_field(&self, id: &str) -> String;
    fn write_result(&self, text: &str);
}

/// Input fields and result text shared between the panel and the dispatcher.
#[derive(Clone, Default)]
pub struct PanelState {
    fields: Arc<Mutex<HashMap<String, String>>>,
    result: Arc<Mutex<String>>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the input fields for editing. The guard must be dropped before dispatching.
    pub fn fields(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.fields.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    pub fn set_field(&self, id: &str, value: impl Into<String>) {
        self.fields().insert(id.to_string(), value.into());
    }

    pub fn result(&self) -> String {
        self.result.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ResultSurface for PanelState {
    fn read_field(&self, id: &str) -> String {
        self.fields().get(id).cloned().unwrap_or_default()
    }

    fn write_result(&self, text: &str) {
        let mut result = self.result.lock().unwrap_or_else(|e| e.into_inner());
        *result = text.to_string();
    }
}
