//! Bounded fan-out of a like action across a token pool.
//!
//! One like on the game API is tied to one bearer token, so `N` likes need `N`
//! authenticated requests. [`Dispatcher::dispatch`] encodes the like request
//! once, draws a uniformly shuffled prefix of at most `max_batch` tokens, and
//! drives one request per token concurrently on the calling task until every
//! request has finished.
//!
//! Individual outcomes are discarded. Failures are absorbed by the
//! [`Executor`], and callers measure the effect of a dispatch through the
//! like counter instead.

use crate::server::{
    credentials::CredentialSource,
    dispatch::executor::Executor,
    telemetry::{increment_dispatched_likes, record_dispatch_duration},
};
use ff_like_core::{Error, Result, codec::Codec, region::Region, types::Credential};
use futures::future::join_all;
use rand::{Rng, seq::SliceRandom};
use std::{sync::Arc, time::Instant};

/// Concurrent like dispatcher over a [`CredentialSource`] and an
/// [`Executor`].
pub struct Dispatcher<S, E> {
    store: Arc<S>,
    executor: Arc<E>,
    codec: Codec,
    max_batch: usize,
}

impl<S, E> Clone for Dispatcher<S, E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            executor: Arc::clone(&self.executor),
            codec: self.codec.clone(),
            max_batch: self.max_batch,
        }
    }
}

impl<S, E> Dispatcher<S, E>
where
    S: CredentialSource,
    E: Executor,
{
    pub const fn new(store: Arc<S>, executor: Arc<E>, codec: Codec, max_batch: usize) -> Self {
        Self {
            store,
            executor,
            codec,
            max_batch,
        }
    }

    /// Sends one like for `user_id` per selected token to `url`.
    ///
    /// Returns the number of requests launched once all of them have
    /// completed, whether or not they succeeded.
    ///
    /// # Errors
    ///
    /// - [`Error::EncodingFailed`] if the like request cannot be built. No
    ///   tokens are fetched.
    /// - [`Error::SourceUnavailable`] or [`Error::NoCredentials`] if there is
    ///   nothing to dispatch with. No requests are sent.
    #[tracing::instrument(skip_all, fields(region = %region, batch = tracing::field::Empty))]
    pub async fn dispatch(&self, user_id: &str, region: &Region, url: &str) -> Result<usize> {
        let ciphertext = self.codec.encode_like(user_id, region)?;

        let credentials = self.store.fetch(region).await?;
        if credentials.is_empty() {
            tracing::error!("Failed to load tokens or token list is empty.");
            return Err(Error::NoCredentials {
                region: region.code().to_string(),
            });
        }

        let batch = select_batch(credentials, self.max_batch, &mut rand::rng());
        let launched = batch.len();
        tracing::Span::current().record("batch", launched);

        let start = Instant::now();
        let requests = batch
            .iter()
            .map(|credential| self.executor.execute(ciphertext.clone(), &credential.token, url));
        join_all(requests).await;

        let elapsed = start.elapsed();
        increment_dispatched_likes(launched as u64);
        record_dispatch_duration(elapsed.as_millis() as f64);
        tracing::info!("Dispatched {launched} likes in {elapsed:?}");

        Ok(launched)
    }
}

/// Shuffles `credentials` uniformly and keeps at most `max_batch` of them.
///
/// Takes the RNG by reference so the caller controls its lifetime. The
/// thread-local RNG must not be held across an `.await`.
pub fn select_batch<R>(
    mut credentials: Vec<Credential>,
    max_batch: usize,
    rng: &mut R,
) -> Vec<Credential>
where
    R: Rng + ?Sized,
{
    credentials.shuffle(rng);
    credentials.truncate(max_batch);
    credentials
}
