//! The contract with the distribution backend, and the HTTP client that fulfils it.
//!
//! The backend owns validation and persistence; everything here is a single blocking round trip
//! whose failure is reported as an [`ApiError`].

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    entity::{Id, RelationRef, RelationType},
    errors::ApiError,
};

/// Everything the console needs from the backend. Enables mocking in tests.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET {endpoint}`, expecting an array of records.
    ///
    /// # Errors
    ///
    /// Fails if the request fails, or the body isn't an array.
    async fn list(&self, endpoint: &str) -> Result<Vec<Value>, ApiError>;

    /// `GET {endpoint}`, expecting a single record.
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    async fn get(&self, endpoint: &str) -> Result<Value, ApiError>;

    /// `PUT {endpoint}` with a JSON payload.
    ///
    /// # Errors
    ///
    /// Fails if the request fails, or the server rejects the payload.
    async fn update(&self, endpoint: &str, payload: &Value) -> Result<(), ApiError>;

    /// `DELETE {endpoint}`.
    ///
    /// # Errors
    ///
    /// Fails if the request fails.
    async fn delete(&self, endpoint: &str) -> Result<(), ApiError>;

    /// Look up candidates of the given relation type matching `query`.
    ///
    /// # Errors
    ///
    /// Fails if the request fails, or the candidates can't be decoded.
    async fn search(
        &self,
        relation: RelationType,
        query: &str,
    ) -> Result<Vec<RelationRef>, ApiError>;

    /// Set a new password for a user.
    ///
    /// # Errors
    ///
    /// Fails if the request fails, or the server rejects the password.
    async fn change_password(&self, user_id: &Id, password: &str) -> Result<(), ApiError> {
        self.update(
            &format!("/users/{user_id}/password"),
            &serde_json::json!({ "password": password }),
        )
        .await
    }
}

#[cfg(feature = "http")]
pub use http::HttpClient;

#[cfg(feature = "http")]
mod http {
    use reqwest::{Method, RequestBuilder, Response};
    use serde::Deserialize;
    use tracing::instrument;

    use super::{AdminApi, ApiError, RelationRef, RelationType, Value, async_trait};
    use crate::session::AdminContext;

    /// The body the backend sends along with a failure.
    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    /// [`AdminApi`] over HTTP, authenticated with the context's bearer token.
    #[derive(Debug, Clone)]
    pub struct HttpClient {
        client: reqwest::Client,
        context: AdminContext,
    }

    impl HttpClient {
        /// # Errors
        ///
        /// Fails if the underlying HTTP client can't be constructed.
        pub fn new(context: AdminContext) -> Result<Self, ApiError> {
            let client = reqwest::Client::builder().build()?;
            Ok(Self { client, context })
        }

        #[must_use]
        pub const fn context(&self) -> &AdminContext {
            &self.context
        }

        fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
            let request = self.client.request(method, self.context.url(endpoint));
            match &self.context.token {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        }

        /// Turn non-2xx responses into errors, keeping the server's message if it sent one.
        async fn check(response: Response) -> Result<Response, ApiError> {
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            log::debug!("request failed with {status}: {message:?}");

            Err(ApiError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    #[async_trait]
    impl AdminApi for HttpClient {
        #[instrument(skip(self))]
        async fn list(&self, endpoint: &str) -> Result<Vec<Value>, ApiError> {
            let response = Self::check(self.request(Method::GET, endpoint).send().await?).await?;
            match response.json::<Value>().await? {
                Value::Array(rows) => Ok(rows),
                other => Err(ApiError::Decode(format!(
                    "expected a list of records from {endpoint}, got {}",
                    type_name(&other)
                ))),
            }
        }

        #[instrument(skip(self))]
        async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
            let response = Self::check(self.request(Method::GET, endpoint).send().await?).await?;
            Ok(response.json::<Value>().await?)
        }

        #[instrument(skip(self, payload))]
        async fn update(&self, endpoint: &str, payload: &Value) -> Result<(), ApiError> {
            let request = self.request(Method::PUT, endpoint).json(payload);
            Self::check(request.send().await?).await?;
            Ok(())
        }

        #[instrument(skip(self))]
        async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
            Self::check(self.request(Method::DELETE, endpoint).send().await?).await?;
            Ok(())
        }

        #[instrument(skip(self))]
        async fn search(
            &self,
            relation: RelationType,
            query: &str,
        ) -> Result<Vec<RelationRef>, ApiError> {
            let request = self
                .request(Method::GET, relation.search_endpoint())
                .query(&[("q", query)]);
            let response = Self::check(request.send().await?).await?;
            Ok(response.json::<Vec<RelationRef>>().await?)
        }
    }

    const fn type_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

}
