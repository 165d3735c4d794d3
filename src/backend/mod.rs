use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub mod auth;
pub mod config;
pub mod error;
pub mod rpc;
pub mod table;

pub use auth::{AuthUser, Session};
pub use config::BackendConfig;
pub use error::BackendError;
pub use table::{TableQuery, UpdateQuery};

/// Thin client over the hosted backend: auth endpoints, RLS-governed table
/// access and named remote procedures. All calls are blocking and issued
/// from UI event handlers; the backend is the sole arbiter of concurrent
/// writes.
pub struct Backend {
    base_url: String,
    anon_key: String,
    http: Client,
    session: Option<Session>,
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            base_url: config.url,
            anon_key: config.anon_key,
            http: Client::new(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    /// Start a read query against a table.
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    /// Start an update against a table. Filters are mandatory before `execute`.
    pub fn update(&self, table: &str) -> UpdateQuery<'_> {
        UpdateQuery::new(self, table)
    }

    /// Insert one row and return the stored representation.
    pub fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let request = self
            .http
            .post(&url)
            .json(row)
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json");
        let response = self.send(request)?;
        Self::decode(response)
    }

    /// Insert one row, discarding the representation.
    pub fn insert_only(&self, table: &str, row: &serde_json::Value) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let request = self.http.post(&url).json(row);
        self.send(request)?;
        Ok(())
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attach the api key and bearer token, send, and translate non-2xx
    /// responses into `BackendError::Api`.
    pub(crate) fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let bearer = self
            .session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.anon_key);

        let response = request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(BackendError::from_response(status.as_u16(), &body))
    }

    pub(crate) fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        Ok(response.json::<T>()?)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(BackendConfig::from_env())
    }
}
