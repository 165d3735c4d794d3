use serde::de::DeserializeOwned;

use super::{Backend, BackendError};

/// Read-query builder over one table, mirroring the filter surface the
/// backend exposes: equality, case-insensitive pattern, in-list, ordering
/// and limit. Terminal calls decode the JSON row set.
pub struct TableQuery<'a> {
    backend: &'a Backend,
    table: String,
    select: String,
    params: Vec<(String, String)>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(backend: &'a Backend, table: &str) -> Self {
        Self {
            backend,
            table: table.to_owned(),
            select: "*".to_owned(),
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_owned();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_owned(), format!("eq.{}", value.to_string())));
        self
    }

    /// Case-insensitive exact match (`ilike` without wildcards).
    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.params
            .push((column.to_owned(), format!("ilike.{pattern}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_owned(), format!("{column}.{dir}")));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".to_owned(), n.to_string()));
        self
    }

    fn request(&self) -> reqwest::blocking::RequestBuilder {
        let mut params = vec![("select".to_owned(), self.select.clone())];
        params.extend(self.params.iter().cloned());
        self.backend
            .http()
            .get(self.backend.rest_url(&self.table))
            .query(&params)
    }

    /// Fetch all matching rows.
    pub fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let response = self.backend.send(self.request())?;
        Backend::decode(response)
    }

    /// Fetch exactly one row; zero rows surfaces as a not-found error.
    pub fn fetch_single<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let request = self
            .request()
            .header("Accept", "application/vnd.pgrst.object+json");
        let response = self.backend.send(request)?;
        Backend::decode(response)
    }

    /// Fetch at most one row.
    pub fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, BackendError> {
        let rows: Vec<T> = self.limit(1).fetch()?;
        Ok(rows.into_iter().next())
    }

    /// Count matching rows without transferring them.
    pub fn count(self) -> Result<u64, BackendError> {
        let request = self
            .request()
            .header("Prefer", "count=exact")
            .header("Range", "0-0");
        let response = self.backend.send(request)?;

        // content-range: "0-0/42" (or "*/0" when empty)
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|n| n.parse::<u64>().ok())
            .unwrap_or(0);
        Ok(total)
    }
}

/// Update builder; `set` then filter then `execute`.
pub struct UpdateQuery<'a> {
    backend: &'a Backend,
    table: String,
    patch: serde_json::Value,
    params: Vec<(String, String)>,
}

impl<'a> UpdateQuery<'a> {
    pub(crate) fn new(backend: &'a Backend, table: &str) -> Self {
        Self {
            backend,
            table: table.to_owned(),
            patch: serde_json::Value::Null,
            params: Vec::new(),
        }
    }

    pub fn set(mut self, patch: serde_json::Value) -> Self {
        self.patch = patch;
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_owned(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn execute(self) -> Result<(), BackendError> {
        // An unfiltered PATCH would rewrite the whole table under whatever
        // rows RLS lets us touch.
        debug_assert!(!self.params.is_empty(), "update without a filter");
        let request = self
            .backend
            .http()
            .patch(self.backend.rest_url(&self.table))
            .query(&self.params)
            .json(&self.patch);
        self.backend.send(request)?;
        Ok(())
    }
}
