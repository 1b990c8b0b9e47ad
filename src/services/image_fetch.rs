use std::time::Duration;

use reqwest::StatusCode;

use crate::error::AppError;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads images for `/print/image-url`.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        log::debug!("ImageFetcher: GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            log::error!("Failed to download image from URL: {} (status={})", url, status);
            return Err(AppError::Download(format!(
                "Failed to download image from URL: {} (status {})",
                url, status
            )));
        }

        let bytes = response.bytes().await?;
        log::debug!("ImageFetcher: {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
