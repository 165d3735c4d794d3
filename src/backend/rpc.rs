use serde::de::DeserializeOwned;

use super::{Backend, BackendError};

impl Backend {
    /// Invoke a named remote procedure with JSON parameters.
    ///
    /// A missing procedure surfaces as `is_rpc_missing()`, which callers
    /// check to decide between a direct-table fallback and a
    /// configuration-error message.
    pub fn rpc<T: DeserializeOwned>(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<T, BackendError> {
        let request = self
            .http()
            .post(self.rest_url(&format!("rpc/{name}")))
            .json(&params);
        let response = self.send(request)?;
        Backend::decode(response)
    }
}
