//! Fetching remote result images on behalf of the editor.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::services::error::ServiceError;

/// Largest image body relayed.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Local path that relays `url` through the proxy endpoint.
pub fn proxy_path(url: &str) -> String {
    format!("/api/proxy-image?url={}", utf8_percent_encode(url, URI_COMPONENT))
}

/// A fetched image and the content type the host reported.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ImageProxy {
    http: reqwest::Client,
    max_bytes: usize,
}

impl ImageProxy {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetch an `http` or `https` URL.
    pub async fn fetch(&self, url: &str) -> Result<ProxiedImage, ServiceError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ServiceError::InvalidUrl(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let mut response = ServiceError::check(self.http.get(parsed).send().await?).await?;
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(ServiceError::TooLarge {
                max: self.max_bytes,
            });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Content-Length may be absent or wrong; count what actually arrives.
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(ServiceError::TooLarge {
                    max: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(url = %url, bytes = bytes.len(), "Proxied image");
        Ok(ProxiedImage {
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_proxy_path_encodes_like_uri_component() {
        assert_eq!(
            proxy_path("https://a.b/c d.png?x=1&y=(2)"),
            "/api/proxy-image?url=https%3A%2F%2Fa.b%2Fc%20d.png%3Fx%3D1%26y%3D(2)"
        );
    }

    #[tokio::test]
    async fn test_fetch_keeps_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/out.webp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![1u8, 2, 3])
                    .insert_header("content-type", "image/webp"),
            )
            .mount(&server)
            .await;

        let proxy = ImageProxy::new(reqwest::Client::new());
        let image = proxy.fetch(&format!("{}/out.webp", server.uri())).await.unwrap();
        assert_eq!(image.content_type.as_deref(), Some("image/webp"));
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_rejects_other_schemes() {
        let proxy = ImageProxy::new(reqwest::Client::new());
        for url in ["file:///etc/passwd", "not a url"] {
            let err = proxy.fetch(url).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidUrl(_)), "{url}");
        }
    }

    #[tokio::test]
    async fn test_fetch_enforces_size_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;
        let proxy = ImageProxy::new(reqwest::Client::new()).with_max_bytes(16);
        let err = proxy.fetch(&format!("{}/big.png", server.uri())).await.unwrap_err();
        assert!(matches!(err, ServiceError::TooLarge { max: 16 }));
    }

    /// Serve one response with a chunked body and no Content-Length.
    async fn chunked_server(chunks: usize, chunk_len: usize) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            let head = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\
                        Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n";
            if stream.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            let body = vec![b'x'; chunk_len];
            for _ in 0..chunks {
                let frame = format!("{chunk_len:x}\r\n");
                if stream.write_all(frame.as_bytes()).await.is_err()
                    || stream.write_all(&body).await.is_err()
                    || stream.write_all(b"\r\n").await.is_err()
                {
                    return;
                }
            }
            let _ = stream.write_all(b"0\r\n\r\n").await;
        });
        format!("http://{addr}/stream.png")
    }

    #[tokio::test]
    async fn test_fetch_caps_chunked_body_without_length() {
        let url = chunked_server(64, 1024).await;
        let proxy = ImageProxy::new(reqwest::Client::new()).with_max_bytes(4096);
        let err = proxy.fetch(&url).await.unwrap_err();
        assert!(matches!(err, ServiceError::TooLarge { max: 4096 }));
    }

    #[tokio::test]
    async fn test_fetch_reads_chunked_body_under_cap() {
        let url = chunked_server(3, 100).await;
        let proxy = ImageProxy::new(reqwest::Client::new()).with_max_bytes(4096);
        let image = proxy.fetch(&url).await.unwrap();
        assert_eq!(image.bytes.len(), 300);
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_fetch_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let proxy = ImageProxy::new(reqwest::Client::new());
        let err = proxy.fetch(&format!("{}/gone.png", server.uri())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 404, .. }));
    }
}
