use anyhow::{Context, bail};
use clap::Parser;
use ff_like_core::types::{DEFAULT_MAX_BATCH, DEFAULT_RELEASE_VERSION};
use reqwest::Url;

const DEFAULT_TOKEN_BASE_URL: &str = "https://raw.githubusercontent.com/SaeedX302/FF-Tokens/main/";

/// Runtime configuration for the `ff-like-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file is loaded first), with defaults matching the public deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ff-like-server",
    version,
    about = "An HTTP service that fans out likes across a pool of session tokens"
)]
pub struct CliArgs {
    /// Shared secret callers must pass as the `key` query parameter.
    ///
    /// When unset, every `/like` request is rejected with 403.
    ///
    /// Environment variable: `ACCESS_KEY`
    #[arg(long, env = "ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Maximum number of tokens used for a single like dispatch.
    ///
    /// The token list is shuffled and truncated to this many entries, which
    /// also bounds the number of concurrent upstream requests per call.
    ///
    /// Environment variable: `MAX_BATCH`
    #[arg(long, env = "MAX_BATCH", default_value_t = DEFAULT_MAX_BATCH)]
    pub max_batch: usize,

    /// Base URL the per-region token files are resolved against.
    ///
    /// Environment variable: `TOKEN_BASE_URL`
    #[arg(long, env = "TOKEN_BASE_URL", default_value_t = String::from(DEFAULT_TOKEN_BASE_URL))]
    pub token_base_url: String,

    /// Game build tag sent in the `ReleaseVersion` header.
    ///
    /// The game API rejects requests from outdated builds, so this has to
    /// follow game updates.
    ///
    /// Environment variable: `RELEASE_VERSION`
    #[arg(long, env = "RELEASE_VERSION", default_value_t = String::from(DEFAULT_RELEASE_VERSION))]
    pub release_version: String,

    /// Skip TLS certificate verification for upstream game API hosts.
    ///
    /// Environment variable: `ACCEPT_INVALID_CERTS`
    #[arg(long, env = "ACCEPT_INVALID_CERTS", default_value_t = false)]
    pub accept_invalid_certs: bool,

    /// Address to listen on.
    ///
    /// Example: "0.0.0.0:5000"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:5000"))]
    pub server_addr: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub access_key: Option<String>,
    pub max_batch: usize,
    pub token_base_url: Url,
    pub release_version: String,
    pub accept_invalid_certs: bool,
    pub server_addr: String,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_batch == 0 {
            bail!("MAX_BATCH must be greater than 0");
        }

        if args.release_version.trim().is_empty() {
            bail!("RELEASE_VERSION must not be empty");
        }

        // `Url::join` replaces the last path segment unless the base ends with
        // a slash.
        let mut base = args.token_base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let token_base_url = Url::parse(&base)
            .with_context(|| format!("TOKEN_BASE_URL ({base}) is not a valid URL"))?;
        if !matches!(token_base_url.scheme(), "http" | "https") {
            bail!(
                "TOKEN_BASE_URL must use http or https, got {}",
                token_base_url.scheme()
            );
        }

        let access_key = args.access_key.filter(|key| !key.is_empty());

        Ok(Self {
            access_key,
            max_batch: args.max_batch,
            token_base_url,
            release_version: args.release_version,
            accept_invalid_certs: args.accept_invalid_certs,
            server_addr: args.server_addr,
        })
    }
}
