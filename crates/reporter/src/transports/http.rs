//! HttpTransport - JSON POST to the collector

use std::time::Duration;

use contracts::{ContractError, ReportPayload, ReportTransport};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::ReporterError;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// POSTs each payload to a fixed endpoint
///
/// The timeout covers the whole request, connect through body.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ReporterError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReporterError::ClientBuild {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        debug!(endpoint = %endpoint, timeout_ms = timeout.as_millis() as u64, "HTTP transport ready");
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ReportTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(
        name = "http_transport_deliver",
        skip(self, payload),
        fields(endpoint = %self.endpoint, mac_address = %payload.mac_address)
    )]
    async fn deliver(&self, payload: &ReportPayload) -> Result<(), ContractError> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| ContractError::report_transport(&self.endpoint, e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await
            .map_err(|e| ContractError::report_transport(&self.endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::ReportStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "Report delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DeviceId;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn payload() -> ReportPayload {
        ReportPayload {
            mac_address: DeviceId::from("60:98:66:32:98:58"),
            rssi: -61,
            device_id: "phone-01".to_string(),
            azimuth: Some(97),
        }
    }

    /// Accept one connection, capture the raw request, answer with `status`
    async fn one_shot_server(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/current_rssi", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8(raw).unwrap()
        });

        (url, server)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_posts_json_payload() {
        let (url, server) = one_shot_server("200 OK").await;
        let transport = HttpTransport::new(&url, Duration::from_secs(5)).unwrap();

        transport.deliver(&payload()).await.unwrap();

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /api/current_rssi HTTP/1.1"));
        assert!(lower.contains("content-type: application/json; charset=utf-8"));

        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["macAddress"], "60:98:66:32:98:58");
        assert_eq!(json["rssi"], -61);
        assert_eq!(json["deviceId"], "phone-01");
        assert_eq!(json["azimuth"], 97);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (url, server) = one_shot_server("503 Service Unavailable").await;
        let transport = HttpTransport::new(&url, Duration::from_secs(5)).unwrap();

        let err = transport.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, ContractError::ReportStatus { status: 503, .. }), "{err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let transport =
            HttpTransport::new(format!("http://{addr}/api/current_rssi"), Duration::from_secs(2))
                .unwrap();

        let err = transport.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, ContractError::ReportTransport { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        // Accepts but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/slow", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(stream);
        });

        let transport = HttpTransport::new(url, Duration::from_millis(200)).unwrap();
        let err = transport.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, ContractError::ReportTransport { .. }), "{err}");
    }
}
