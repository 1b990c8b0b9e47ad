use log::{LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

const LOG_FILENAME: &str = "print-panel.log";

struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    fn new(file: File, level: LevelFilter) -> Self {
        Self {
            file: Mutex::new(file),
            level,
        }
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Skip GUI and HTTP stack internals
        let target = metadata.target();
        if target.starts_with("winit")
            || target.starts_with("wgpu")
            || target.starts_with("naga")
            || target.starts_with("hyper")
            || target.starts_with("reqwest")
        {
            return false;
        }
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let log_line = format!(
                "[{}] [{}] [{}] {}\n",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );

            if let Ok(mut file) = self.file.lock() {
                let _ = file.write_all(log_line.as_bytes());
                let _ = file.flush();
            }

            eprint!("{}", log_line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Log file path (next to executable)
pub fn log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILENAME)
}

/// Unknown level names fall back to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or(LevelFilter::Info)
}

/// Creates/truncates the log file and installs the file logger.
pub fn init_file_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = log_path();
    let level = parse_level(level);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .map_err(|e| {
            eprintln!("Failed to create log file at {:?}: {}", path, e);
            e
        })?;

    log::set_boxed_logger(Box::new(FileLogger::new(file, level)))?;
    log::set_max_level(level);

    log::info!("=== ESC/POS Print Panel Started ===");
    log::info!("Log file: {:?}", path);
    Ok(())
}

/// Console-only logging; `RUST_LOG` wins over the configured level.
pub fn init_console_logging(level: &str) {
    let _ = env_logger::Builder::new()
        .filter_level(parse_level(level))
        .parse_default_env()
        .try_init();
}
