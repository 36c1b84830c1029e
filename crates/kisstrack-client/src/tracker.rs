use kisstrack_types::{CallType, EventName, Identity, Property, Timestamp};

use crate::config::{ApiKey, Endpoint};
use crate::dispatch::call_at;
use crate::error::DispatchError;

/// A shared HTTP client, API key and endpoint bundled together.
///
/// Cheap to clone; clones share the client's connection pool. Every method
/// performs exactly one request and never retries.
#[derive(Debug, Clone)]
pub struct Tracker {
    client: reqwest::Client,
    api_key: ApiKey,
    endpoint: Endpoint,
}

impl Tracker {
    /// Creates a tracker that sends to the default tracking endpoint.
    pub fn new(client: reqwest::Client, api_key: impl Into<ApiKey>) -> Self {
        Self::with_endpoint(client, api_key, Endpoint::default())
    }

    pub fn with_endpoint(
        client: reqwest::Client,
        api_key: impl Into<ApiKey>,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Sends a prepared call.
    pub async fn send(&self, call: &CallType) -> Result<(), DispatchError> {
        call_at(&self.client, &self.endpoint, &self.api_key, call).await
    }

    /// Records that `identity` performed `event_name`.
    pub async fn record<N, I>(
        &self,
        event_name: N,
        identity: I,
        timestamp: Timestamp,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<(), DispatchError>
    where
        N: EventName + Send + Sync + 'static,
        I: Identity + Send + Sync + 'static,
    {
        self.send(&CallType::record(event_name, identity, timestamp, properties))
            .await
    }

    /// Sets properties on `identity`.
    pub async fn set_props<I>(
        &self,
        identity: I,
        timestamp: Timestamp,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<(), DispatchError>
    where
        I: Identity + Send + Sync + 'static,
    {
        self.send(&CallType::set_props(identity, timestamp, properties))
            .await
    }

    /// Declares `identity` and `identity2` to be the same person.
    pub async fn alias<I, J>(&self, identity: I, identity2: J) -> Result<(), DispatchError>
    where
        I: Identity + Send + Sync + 'static,
        J: Identity + Send + Sync + 'static,
    {
        self.send(&CallType::alias(identity, identity2)).await
    }
}
