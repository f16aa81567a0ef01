use crate::server::telemetry::increment_upstream_failures;
use bytes::Bytes;
use core::future::Future;
use ff_like_core::{
    Error, Result,
    types::{GA_HEADER, UNITY_VERSION, USER_AGENT},
};
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};

/// Issues one authenticated POST to the game API.
///
/// Implementations never fail: every error is logged and collapsed to `None`
/// so a single bad token cannot abort a batch.
pub trait Executor: Send + Sync + 'static {
    fn execute(
        &self,
        ciphertext: Bytes,
        token: &str,
        url: &str,
    ) -> impl Future<Output = Option<Bytes>> + Send;
}

/// [`Executor`] backed by a shared `reqwest` client.
///
/// The client carries the game client's fixed header set; only the bearer
/// token varies per request.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the upstream client with the default header set.
    pub fn build_client(release_version: &str, accept_invalid_certs: bool) -> anyhow::Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert("X-Unity-Version", HeaderValue::from_static(UNITY_VERSION));
        headers.insert("X-GA", HeaderValue::from_static(GA_HEADER));
        headers.insert("ReleaseVersion", HeaderValue::from_str(release_version)?);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(client)
    }

    async fn try_execute(&self, ciphertext: Bytes, token: &str, url: &str) -> Result<Bytes> {
        let transport = |e: reqwest::Error| Error::Transport {
            reason: e.to_string(),
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(ciphertext)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UpstreamRejected {
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(transport)
    }
}

impl Executor for HttpExecutor {
    async fn execute(&self, ciphertext: Bytes, token: &str, url: &str) -> Option<Bytes> {
        self.try_execute(ciphertext, token, url)
            .await
            .inspect_err(|e| {
                increment_upstream_failures();
                match e {
                    Error::UpstreamRejected { status } => {
                        tracing::warn!("Request with a token failed with status: {status}");
                    }
                    other => tracing::error!("Upstream request to {url} failed: {other}"),
                }
            })
            .ok()
    }
}
