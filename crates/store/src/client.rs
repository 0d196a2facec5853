//! Redis-backed store client.

use crate::keys::{rating_pattern, recommend_key};
use crate::RecommendationStore;
use anyhow::{Context, Result};
use model::UserId;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{debug, info};

/// Client for the key-value store holding ratings and recommendation lists.
///
/// A multiplexed connection is drawn per operation scope; a connection that
/// errors is simply dropped and the next operation draws a fresh one, so a
/// broken connection is never reused.
pub struct StoreClient {
    client: redis::Client,
    namespace: String,
}

impl StoreClient {
    /// Connect to the store and verify the link with a `PING`.
    ///
    /// Failure here is the pipeline's only fatal error: without any store
    /// connection there is nothing to do.
    pub async fn connect(host: &str, port: u16, namespace: impl Into<String>) -> Result<Self> {
        let url = format!("redis://{host}:{port}");
        info!(url = %url, "Connecting to store");

        let client = redis::Client::open(url.as_str())?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .context("failed to establish store connection")?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("store did not answer PING")?;
        info!(response = %pong, "Store connection established");

        Ok(Self {
            client,
            namespace: namespace.into(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("failed to draw a store connection")
    }
}

impl RecommendationStore for StoreClient {
    /// Enumerate every rating key in the namespace and fetch all values in
    /// one batch.
    ///
    /// Keys whose value vanished between enumeration and the batch get are
    /// dropped. An empty keyspace is an empty result, not an error.
    async fn fetch_ratings(&self) -> Result<Vec<(String, String)>> {
        let mut conn = self.connection().await?;
        let pattern = rating_pattern(&self.namespace);

        let keys: Vec<String> = conn
            .keys(&pattern)
            .await
            .with_context(|| format!("key enumeration failed for '{pattern}'"))?;
        if keys.is_empty() {
            debug!(pattern = %pattern, "no rating keys in store");
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = conn
            .mget(&keys)
            .await
            .context("batch get of rating values failed")?;

        let pairs: Vec<(String, String)> = keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

        debug!(count = pairs.len(), "fetched rating records");
        Ok(pairs)
    }

    /// Replace the user's stored recommendation list.
    ///
    /// Delete-then-append, not a transaction: a failure between the delete
    /// and the last append leaves the list empty or partially written. That
    /// window is accepted; a full rerun overwrites it.
    async fn replace_recommendations(&self, user_id: UserId, items: &[String]) -> Result<()> {
        let mut conn = self.connection().await?;
        let key = recommend_key(&self.namespace, user_id);

        let _: () = conn
            .del(&key)
            .await
            .with_context(|| format!("failed to delete '{key}'"))?;
        for item in items {
            let _: () = conn
                .rpush(&key, item)
                .await
                .with_context(|| format!("failed to append to '{key}'"))?;
        }

        debug!(key = %key, count = items.len(), "recommendation list replaced");
        Ok(())
    }
}
