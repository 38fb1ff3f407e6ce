use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::{AppError, Result};
use crate::domain::{CharterNumber, Website};
use crate::fetcher::config::ApiConfig;
use crate::fetcher::response::decode_details;
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        // Reject a malformed base URL up front
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, charter: CharterNumber) -> String {
        format!("{}/{}", self.base_url, charter)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, charter: CharterNumber) -> Result<Website> {
        let url = self.endpoint(charter);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let body = response.bytes().await?;

        // An `isError` body wins over the status so the API's message surfaces;
        // any other body on a non-2xx reply is a failed lookup, never `Unknown`.
        match (decode_details(charter, &body), status_error) {
            (Err(AppError::MalformedResponse(msg)), Some(_)) => Err(
                AppError::MalformedResponse(format!("HTTP {}: {}", status, msg)),
            ),
            (Ok(_), Some(e)) => Err(AppError::Http(e)),
            (decoded, _) => decoded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with `status` and `body`; returns the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/details", addr)
    }

    fn fetcher_for(base_url: String) -> HttpFetcher {
        let config = ApiConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_lowercases_website() {
        let base = serve_once("200 OK", r#"{"isError":false,"creditUnionWebsite":"WWW.Five.ORG"}"#).await;
        let website = fetcher_for(base)
            .fetch(CharterNumber::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(website, Website::Known("www.five.org".into()));
    }

    #[tokio::test]
    async fn test_fetch_server_error_with_json_body_is_error() {
        let base = serve_once("503 Service Unavailable", r#"{"message":"Service Unavailable"}"#).await;
        let result = fetcher_for(base).fetch(CharterNumber::new(5).unwrap()).await;
        assert!(matches!(result, Err(AppError::Http(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_fetch_rate_limited_is_error() {
        let base = serve_once("429 Too Many Requests", r#"{"creditUnionWebsite":null}"#).await;
        let result = fetcher_for(base).fetch(CharterNumber::new(5).unwrap()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_error_status_keeps_api_message() {
        let base = serve_once("404 Not Found", r#"{"isError":true,"errorMessage":"Charter not found"}"#).await;
        match fetcher_for(base).fetch(CharterNumber::new(5).unwrap()).await {
            Err(AppError::Api(msg)) => assert_eq!(msg, "Charter not found"),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_status_with_html_body() {
        let base = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
        match fetcher_for(base).fetch(CharterNumber::new(5).unwrap()).await {
            Err(AppError::MalformedResponse(msg)) => assert!(msg.starts_with("HTTP 502")),
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_appends_charter() {
        let fetcher = HttpFetcher::new(&ApiConfig::default()).unwrap();
        let charter = CharterNumber::new(5536).unwrap();
        assert_eq!(
            fetcher.endpoint(charter),
            "https://mapping.ncua.gov/api/CreditUnionDetails/GetCreditUnionDetails/5536"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/details/".into(),
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let charter = CharterNumber::new(1).unwrap();
        assert_eq!(fetcher.endpoint(charter), "http://localhost:8080/details/1");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ApiConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(AppError::InvalidUrl(_))
        ));
    }
}
