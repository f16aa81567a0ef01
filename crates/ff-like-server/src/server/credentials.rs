//! Per-region token lists.
//!
//! Tokens live in one JSON file per cluster on a static file host. Each call
//! fetches the file again; nothing is cached between requests.

use core::future::Future;
use ff_like_core::{Error, Result, region::Region, types::Credential};
use reqwest::{Client, Url};

/// Source of bearer-token credentials for a region.
pub trait CredentialSource: Send + Sync + 'static {
    /// Returns every credential listed for `region`, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] when the list cannot be retrieved
    /// or parsed. Callers treat this as fatal for the current request.
    fn fetch(&self, region: &Region) -> impl Future<Output = Result<Vec<Credential>>> + Send;
}

/// Fetches token files over HTTP from `base_url`.
#[derive(Clone, Debug)]
pub struct RemoteCredentialStore {
    client: Client,
    base_url: Url,
}

impl RemoteCredentialStore {
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// URL of the token file backing `region`.
    pub fn resource_url(&self, region: &Region) -> Result<Url> {
        self.base_url
            .join(region.cluster().token_file())
            .map_err(|e| Error::SourceUnavailable {
                reason: format!("invalid token file URL: {e}"),
            })
    }
}

impl CredentialSource for RemoteCredentialStore {
    #[tracing::instrument(skip_all, fields(region = %region))]
    async fn fetch(&self, region: &Region) -> Result<Vec<Credential>> {
        let url = self.resource_url(region)?;

        let credentials = async {
            self.client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Credential>>()
                .await
        }
        .await
        .map_err(|e| {
            tracing::error!("Error fetching or decoding tokens for {region} from {url}: {e}");
            Error::SourceUnavailable {
                reason: e.to_string(),
            }
        })?;

        tracing::debug!("Loaded {} tokens from {url}", credentials.len());
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::stub;
    use axum::{Router, http::StatusCode, routing::get};

    fn store(base: &str) -> RemoteCredentialStore {
        RemoteCredentialStore::new(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn resolves_token_file_per_cluster() {
        let store = store("https://tokens.example.com/main/");

        let cases = [
            ("IND", "https://tokens.example.com/main/token_ind.json"),
            ("pk", "https://tokens.example.com/main/token_pk.json"),
            ("SAC", "https://tokens.example.com/main/token_br.json"),
            ("ME", "https://tokens.example.com/main/token_bd.json"),
        ];
        for (code, expected) in cases {
            let url = store.resource_url(&Region::new(code)).unwrap();
            assert_eq!(url.as_str(), expected, "region {code}");
        }
    }

    /// Serves `body` with `status` as the India token file.
    async fn token_host(status: u16, body: &'static str) -> RemoteCredentialStore {
        let app = Router::new().route(
            "/token_ind.json",
            get(move || async move { (StatusCode::from_u16(status).unwrap(), body) }),
        );
        store(&format!("{}/", stub::serve(app).await))
    }

    #[tokio::test]
    async fn parses_token_file() {
        let store = token_host(200, r#"[{"token": "abc", "uid": 1}, {"token": "def"}]"#).await;

        let credentials = store.fetch(&Region::new("ind")).await.unwrap();

        let tokens: Vec<_> = credentials.iter().map(|c| c.token.as_str()).collect();
        assert_eq!(tokens, ["abc", "def"]);
    }

    #[tokio::test]
    async fn error_status_is_unavailable() {
        let store = token_host(404, "404: Not Found").await;
        let result = store.fetch(&Region::new("IND")).await;
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn malformed_json_is_unavailable() {
        let store = token_host(200, "<html>rate limited</html>").await;
        let result = store.fetch(&Region::new("IND")).await;
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn unreachable_source_is_unavailable() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let store = store("http://127.0.0.1:9/");
        let result = store.fetch(&Region::new("IND")).await;
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }
}
