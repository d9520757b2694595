//! A scriptable stand-in for the backend.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    api::AdminApi,
    entity::{RelationRef, RelationType},
    errors::ApiError,
};

/// Long enough for any test to notice if something was awaited that shouldn't have been.
pub const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Delete,
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    /// The endpoint, with the query string for searches.
    pub endpoint: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Reply {
    delay: Duration,
    result: Result<Value, ApiError>,
}

/// An [`AdminApi`] that answers from a script and records every call.
///
/// Replies for an endpoint are served in the order they were scripted, the last one is reused
/// once the others run out. Unscripted endpoints answer with an empty list for `list` and
/// `search`, a 404 for `get`, and success for everything else.
#[derive(Debug, Default)]
pub struct MockApi {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply to `method endpoint`.
    #[must_use]
    pub fn on(self, method: Method, endpoint: &str, result: Result<Value, ApiError>) -> Self {
        self.on_delayed(method, endpoint, Duration::ZERO, result)
    }

    /// Script a reply that only arrives after `delay`.
    #[must_use]
    pub fn on_delayed(
        self,
        method: Method,
        endpoint: &str,
        delay: Duration,
        result: Result<Value, ApiError>,
    ) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, endpoint.to_string()))
            .or_default()
            .push_back(Reply { delay, result });
        self
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The calls made with `method` to endpoints starting with `prefix`.
    #[must_use]
    pub fn calls_to(&self, method: Method, prefix: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.endpoint.starts_with(prefix))
            .collect()
    }

    async fn respond(
        &self,
        method: Method,
        endpoint: String,
        body: Option<Value>,
    ) -> Option<Result<Value, ApiError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                method,
                endpoint: endpoint.clone(),
                body,
            });

        let reply = {
            let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
            let queue = replies.get_mut(&(method, endpoint))?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        }?;

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Some(reply.result)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl AdminApi for MockApi {
    async fn list(&self, endpoint: &str) -> Result<Vec<Value>, ApiError> {
        match self.respond(Method::Get, endpoint.to_string(), None).await {
            Some(result) => decode(result?),
            None => Ok(Vec::new()),
        }
    }

    async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.respond(Method::Get, endpoint.to_string(), None)
            .await
            .unwrap_or(Err(ApiError::Server {
                status: 404,
                message: Some("Not found".into()),
            }))
    }

    async fn update(&self, endpoint: &str, payload: &Value) -> Result<(), ApiError> {
        match self
            .respond(Method::Put, endpoint.to_string(), Some(payload.clone()))
            .await
        {
            Some(result) => result.map(|_| ()),
            None => Ok(()),
        }
    }

    async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        match self.respond(Method::Delete, endpoint.to_string(), None).await {
            Some(result) => result.map(|_| ()),
            None => Ok(()),
        }
    }

    async fn search(
        &self,
        relation: RelationType,
        query: &str,
    ) -> Result<Vec<RelationRef>, ApiError> {
        let endpoint = format!("{}?q={query}", relation.search_endpoint());
        match self.respond(Method::Get, endpoint, None).await {
            Some(result) => decode(result?),
            None => Ok(Vec::new()),
        }
    }
}
