//! `/like` request handling.
//!
//! This module defines [`LikeService`], which measures the effect of a
//! dispatch by reading the target's like counter before and after it.
//!
//! ## Responsibilities
//!
//! - Gate every request on the shared access key before any upstream call.
//! - Validate `uid` and `server_name` and resolve the region.
//! - Poll the profile, run the [`Dispatcher`], poll again.
//! - Report the like-count delta, or map the failing stage to an [`Error`].

use crate::server::{
    credentials::CredentialSource,
    dispatch::{Dispatcher, Executor},
    telemetry::{increment_like_requests, record_likes_delta},
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use bytes::Bytes;
use ff_like_core::{Error, Result, codec::Codec, proto::AccountInfo, region::Region};
use serde::Serialize;
use std::sync::Arc;

/// Query parameters of `GET /like`.
///
/// Every field is optional at the extractor level so missing values are
/// reported by the service with its own status codes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LikeParams {
    pub uid: Option<String>,
    pub server_name: Option<String>,
    pub key: Option<String>,
}

impl LikeParams {
    /// Collects the known parameters from decoded query pairs.
    ///
    /// The first occurrence of a repeated name wins and unknown names are
    /// ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "uid" => &mut params.uid,
                "server_name" => &mut params.server_name,
                "key" => &mut params.key,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// Outcome classification reported as `status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum LikeStatus {
    /// The like counter went up.
    Increased,
    /// The like counter did not move.
    Unchanged,
}

impl LikeStatus {
    pub const fn from_delta(delta: i64) -> Self {
        if delta > 0 {
            LikeStatus::Increased
        } else {
            LikeStatus::Unchanged
        }
    }
}

impl From<LikeStatus> for u8 {
    fn from(status: LikeStatus) -> Self {
        match status {
            LikeStatus::Increased => 1,
            LikeStatus::Unchanged => 2,
        }
    }
}

/// Body of a successful `GET /like`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LikeResponse {
    #[serde(rename = "LikesGivenByAPI")]
    pub likes_given: i64,
    #[serde(rename = "LikesbeforeCommand")]
    pub likes_before: u32,
    #[serde(rename = "LikesafterCommand")]
    pub likes_after: u32,
    #[serde(rename = "PlayerNickname")]
    pub nickname: String,
    #[serde(rename = "UID")]
    pub uid: u64,
    pub status: LikeStatus,
}

/// Delta-measuring like service.
pub struct LikeService<S, E> {
    access_key: Option<String>,
    store: Arc<S>,
    executor: Arc<E>,
    codec: Codec,
    dispatcher: Dispatcher<S, E>,
}

impl<S, E> LikeService<S, E>
where
    S: CredentialSource,
    E: Executor,
{
    /// Creates a service. The store and executor are shared with the
    /// dispatcher it builds.
    ///
    /// With `access_key` set to `None` every request is denied.
    pub fn new(
        access_key: Option<String>,
        store: Arc<S>,
        executor: Arc<E>,
        codec: Codec,
        max_batch: usize,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            Arc::clone(&store),
            Arc::clone(&executor),
            codec.clone(),
            max_batch,
        );
        Self {
            access_key,
            store,
            executor,
            codec,
            dispatcher,
        }
    }

    /// Runs one like request end to end.
    ///
    /// # Errors
    ///
    /// - [`Error::AccessDenied`] if `key` does not match.
    /// - [`Error::InvalidParameters`] if `uid` or `server_name` is missing.
    /// - [`Error::SourceUnavailable`] / [`Error::NoCredentials`] if no token
    ///   is available for the profile lookup.
    /// - [`Error::EncodingFailed`] if `uid` is not numeric.
    /// - [`Error::ProfileNotFound`] if the first profile lookup fails.
    /// - Any dispatcher error.
    /// - [`Error::ProfileUnavailable`] if the second profile lookup fails.
    pub async fn like(&self, params: LikeParams) -> Result<LikeResponse> {
        self.authorize(params.key.as_deref())?;

        let (uid, server_name) = match (non_empty(params.uid), non_empty(params.server_name)) {
            (Some(uid), Some(server_name)) => (uid, server_name),
            _ => {
                return Err(Error::InvalidParameters {
                    reason: "UID and server_name are required".to_string(),
                });
            }
        };
        let region = Region::new(&server_name);
        increment_like_requests();

        // The first listed token reads the profile; the dispatcher draws its
        // own shuffled batch.
        let token = self
            .store
            .fetch(&region)
            .await?
            .into_iter()
            .next()
            .map(|credential| credential.token)
            .ok_or_else(|| Error::NoCredentials {
                region: region.code().to_string(),
            })?;
        let lookup = self.codec.encode_uid(&uid)?;

        let before = self
            .poll_profile(&region, lookup.clone(), &token)
            .await
            .ok_or(Error::ProfileNotFound)?;

        self.dispatcher
            .dispatch(&uid, &region, &region.like_url())
            .await?;

        let after = self
            .poll_profile(&region, lookup, &token)
            .await
            .ok_or(Error::ProfileUnavailable)?;

        let delta = i64::from(after.likes) - i64::from(before.likes);
        record_likes_delta(delta as f64);
        tracing::info!(
            "Likes for {} went from {} to {}",
            after.uid,
            before.likes,
            after.likes
        );

        Ok(LikeResponse {
            likes_given: delta,
            likes_before: before.likes,
            likes_after: after.likes,
            nickname: after.nickname,
            uid: after.uid,
            status: LikeStatus::from_delta(delta),
        })
    }

    fn authorize(&self, key: Option<&str>) -> Result<()> {
        match (self.access_key.as_deref(), key) {
            (Some(expected), Some(given)) if expected == given => Ok(()),
            _ => Err(Error::AccessDenied),
        }
    }

    async fn poll_profile(&self, region: &Region, lookup: Bytes, token: &str) -> Option<AccountInfo> {
        let raw = self
            .executor
            .execute(lookup, token, &region.profile_url())
            .await?;
        self.codec
            .decode_like_count(&raw)
            .inspect_err(|e| tracing::error!("Error decoding profile for {region}: {e}"))
            .ok()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `GET /like?uid=<int>&server_name=<region>&key=<secret>`
///
/// An undecodable query string is treated as empty, so it is answered by the
/// key check like any other request without a key.
#[tracing::instrument(skip_all, fields(uid = tracing::field::Empty, server_name = tracing::field::Empty))]
pub async fn like_handler<S, E>(
    State(service): State<Arc<LikeService<S, E>>>,
    query: core::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<LikeResponse>>
where
    S: CredentialSource,
    E: Executor,
{
    let params = query
        .map(|Query(pairs)| LikeParams::from_pairs(pairs))
        .unwrap_or_default();
    let span = tracing::Span::current();
    span.record("uid", params.uid.as_deref());
    span.record("server_name", params.server_name.as_deref());

    service
        .like(params)
        .await
        .map(Json)
        .inspect_err(|e| tracing::warn!("Like request failed: {e}"))
}
