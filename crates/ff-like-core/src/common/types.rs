//! # Credentials and Protocol Constants
//!
//! The game API authenticates every like with a bearer token tied to one game
//! account. Tokens are distributed as JSON files, one per cluster, each an
//! array of objects carrying at least a `token` field.
//!
//! ## Constants
//!
//! - [`DEFAULT_MAX_BATCH`] - Upper bound on concurrent likes per dispatch
//! - [`USER_AGENT`], [`UNITY_VERSION`], [`GA_HEADER`] - Client fingerprint the
//!   game API expects on every request
//! - [`DEFAULT_RELEASE_VERSION`] - Game build tag, bumped with each game update

use serde::Deserialize;
use serde_json::{Map, Value};

/// Default cap on sub-requests issued by one dispatch.
pub const DEFAULT_MAX_BATCH: usize = 150;

pub const USER_AGENT: &str = "Dalvik/2.1.0 (Linux; U; Android 9; ASUS_Z01QD Build/PI)";

pub const UNITY_VERSION: &str = "2018.4.11f1";

pub const GA_HEADER: &str = "v1 1";

pub const DEFAULT_RELEASE_VERSION: &str = "OB50";

/// A bearer token plus whatever else its source file carried.
///
/// Credentials have no identity beyond their token and duplicates are allowed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Credential {
    pub token: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            metadata: Map::new(),
        }
    }
}
