use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::error::RequestFailure;

/// Sends a JSON body to a path on the print API and yields the raw reply body.
pub trait PrintTransport: Send + Sync + 'static {
    fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<String, RequestFailure>> + Send;
}

/// `reqwest` backed transport used by the panel.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RequestFailure> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        log::info!("HttpTransport initialized: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PrintTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, RequestFailure> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("HttpTransport: POST {} body={}", url, body);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::debug!("HttpTransport: {} answered status={}", url, status);
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use warp::Filter;

    type Captured = Arc<Mutex<Vec<(String, String, Value)>>>;

    /// Starts a stub API that records path, content type and decoded body.
    async fn stub_server(captured: Captured) -> std::net::SocketAddr {
        let route = warp::post()
            .and(warp::path::full())
            .and(warp::header::<String>("content-type"))
            .and(warp::body::json::<Value>())
            .map(move |path: warp::path::FullPath, content_type: String, body: Value| {
                captured
                    .lock()
                    .unwrap()
                    .push((path.as_str().to_string(), content_type, body));
                warp::reply::json(&json!({ "status": "success", "message": "OK" }))
            });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    #[tokio::test]
    async fn test_posts_json_to_path() {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let addr = stub_server(captured.clone()).await;
        let transport = HttpTransport::new(format!("http://{}/", addr), None).unwrap();

        let reply = transport
            .post_json("/print/qr", &json!({ "data": "abc" }))
            .await
            .unwrap();
        assert!(reply.contains("\"OK\""));

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].0, "/print/qr");
        assert_eq!(captured[0].1, "application/json");
        assert_eq!(captured[0].2, json!({ "data": "abc" }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{}", addr), None).unwrap();
        let result = transport.post_json("/print", &json!({ "message": "x" })).await;
        assert!(result.is_err());
    }
}
