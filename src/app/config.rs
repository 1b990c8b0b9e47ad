use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::client::ResultOrdering;

const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_NETWORK_PORT: u16 = 9100;
pub const DEFAULT_VENDOR_ID: u16 = 0x04b8;
pub const DEFAULT_PRODUCT_ID: u16 = 0x0e15;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upload_folder: UploadFolder,
    pub printer: PrinterConfig,
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterKind {
    #[default]
    Network,
    Usb,
    Console,
}

impl PrinterKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "network" => Some(PrinterKind::Network),
            "usb" => Some(PrinterKind::Usb),
            "console" => Some(PrinterKind::Console),
            _ => None,
        }
    }
}

impl fmt::Display for PrinterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterKind::Network => f.write_str("network"),
            PrinterKind::Usb => f.write_str("usb"),
            PrinterKind::Console => f.write_str("console"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    #[serde(rename = "type")]
    pub kind: PrinterKind,
    pub network: NetworkConfig,
    pub usb: UsbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub ip_address: String,
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ip_address: "localhost".to_string(),
            port: DEFAULT_NETWORK_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbConfig {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Print API the panel talks to. Defaults to the local server.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub ordering: ResultOrdering,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_panel: bool,
    pub max_log_entries: usize,
    pub notifications: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_panel: true,
            max_log_entries: 100,
            notifications: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub to_file: bool,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            to_file: true,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadFolder(pub PathBuf);

impl Default for UploadFolder {
    fn default() -> Self {
        UploadFolder(PathBuf::from("./uploads"))
    }
}

/// Accepts `0x04b8` style hex or plain decimal.
fn parse_id(value: &str) -> Option<u16> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILENAME)
    }

    /// Reads `config.toml` (writing defaults when absent) and applies
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    fn load_file() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Failed to parse config: {}", e),
                },
                Err(e) => eprintln!("Failed to read config: {}", e),
            }
            return Self::default();
        }

        let config = Self::default();
        let _ = config.save();
        config
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path();
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("PRINTER_TYPE").and_then(|v| PrinterKind::parse(&v)) {
            self.printer.kind = kind;
        }
        if let Some(ip) = lookup("NETWORK_IP") {
            self.printer.network.ip_address = ip;
        }
        if let Some(port) = lookup("NETWORK_PORT").and_then(|v| v.trim().parse().ok()) {
            self.printer.network.port = port;
        }
        if let Some(vendor_id) = lookup("USB_VENDOR").and_then(|v| parse_id(&v)) {
            self.printer.usb.vendor_id = vendor_id;
        }
        if let Some(product_id) = lookup("USB_PRODUCT").and_then(|v| parse_id(&v)) {
            self.printer.usb.product_id = product_id;
        }
        if let Some(folder) = lookup("UPLOAD_FOLDER") {
            self.upload_folder = UploadFolder(PathBuf::from(folder));
        }
    }

    /// Bind address; `server.host` may be an IP literal or a host name.
    pub fn server_addr(&self) -> io::Result<SocketAddr> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no address for server host {}", self.server.host),
                )
            })
    }

    /// Address the panel posts to.
    pub fn client_base_url(&self) -> String {
        if let Some(url) = &self.client.base_url {
            return url.clone();
        }
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "" => "127.0.0.1",
            host => host,
        };
        format!("http://{}:{}", host, self.server.port)
    }
}
