use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy for a single HTTP call. `Timeout` is kept distinct
/// from server-side errors: the health monitor folds both into
/// "offline", but screens word them differently.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("service unreachable")]
    NetworkUnreachable,
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed response body")]
    MalformedResponse,
}

impl FetchError {
    /// User-facing banner text.
    pub fn humanize(&self) -> String {
        match self {
            FetchError::Timeout => "The governance service took too long to respond.".to_string(),
            FetchError::NetworkUnreachable => {
                "Cannot reach the governance service. Is the backend running?".to_string()
            }
            FetchError::HttpStatus { status, body } => {
                let detail = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));
                match detail {
                    Some(d) => format!("Service error ({status}): {d}"),
                    None => format!("Service error ({status})."),
                }
            }
            FetchError::MalformedResponse => {
                "The service returned a response the console could not parse.".to_string()
            }
        }
    }
}

/// Thin adapter over `reqwest::blocking`: exactly one network request
/// per call, an explicit per-call timeout, no retries. Retry is a
/// manual user action handled upstream.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str, timeout: Duration) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.get(&url).timeout(timeout);
        Self::execute(path, request)
    }

    pub fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url).timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::execute(path, request)
    }

    fn execute(path: &str, request: reqwest::blocking::RequestBuilder) -> Result<Value, FetchError> {
        let response = request.send().map_err(classify_transport)?;
        let status = response.status();
        let text = response.text().map_err(classify_transport)?;

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let value = serde_json::from_str(&text).map_err(|_| {
            tracing::warn!(path, "unparseable response body");
            FetchError::MalformedResponse
        })?;
        tracing::debug!(path, "request ok");
        Ok(value)
    }
}

fn classify_transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkUnreachable
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, FetchError};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    /// One-shot HTTP stub: answer the first connection with `response`
    /// and exit.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn non_2xx_surfaces_status_and_body() {
        let base = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 19\r\nConnection: close\r\n\r\n{\"detail\":\"boom!!\"}",
        );
        let client = ApiClient::new(&base).expect("client");
        let err = client
            .get("/health", Duration::from_secs(5))
            .expect_err("should fail");
        match err {
            FetchError::HttpStatus { status, ref body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert!(err.humanize().contains("boom"));
    }

    #[test]
    fn invalid_json_is_malformed_not_http_error() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 12\r\nConnection: close\r\n\r\nnot json at ",
        );
        let client = ApiClient::new(&base).expect("client");
        let err = client
            .get("/health", Duration::from_secs(5))
            .expect_err("should fail");
        assert!(matches!(err, FetchError::MalformedResponse));
    }

    #[test]
    fn connection_refused_is_unreachable() {
        // Bind then drop to get a port with nothing listening.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr")
        };
        let client = ApiClient::new(&format!("http://{addr}")).expect("client");
        let err = client
            .get("/health", Duration::from_secs(5))
            .expect_err("should fail");
        assert!(matches!(err, FetchError::NetworkUnreachable));
    }
}
