pub mod config;
pub mod file_logger;
pub mod gui;
pub mod notifications;
pub mod print_log;

pub use config::AppConfig;
pub use gui::PrintPanel;
pub use notifications::notify_job;
pub use print_log::{JobRecord, PrintLog};
