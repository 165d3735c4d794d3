use thiserror::Error;

/// PostgREST "zero rows" code returned by `single()` requests.
const CODE_NO_ROWS: &str = "PGRST116";
/// PostgREST "function not found" code for missing RPCs.
const CODE_RPC_MISSING: &str = "PGRST202";
/// Postgres unique-violation SQLSTATE.
const CODE_UNIQUE_VIOLATION: &str = "23505";
/// Postgres insufficient-privilege SQLSTATE (RLS denials).
const CODE_PERMISSION_DENIED: &str = "42501";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An error response from the backend, with the PostgREST/GoTrue
    /// error code when one was present in the body.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

}

impl BackendError {
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        // PostgREST: {"code": "...", "message": "...", ...}
        // GoTrue:    {"error_description": "..."} or {"msg": "..."}
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
        let code = parsed
            .get("code")
            .and_then(|c| c.as_str())
            .map(str::to_owned)
            .unwrap_or_default();
        let message = parsed
            .get("message")
            .or_else(|| parsed.get("error_description"))
            .or_else(|| parsed.get("msg"))
            .and_then(|m| m.as_str())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("backend returned HTTP {status}"));

        BackendError::Api {
            status,
            code,
            message,
        }
    }

    fn matches(&self, wanted: &str) -> bool {
        matches!(self, BackendError::Api { code, .. } if code == wanted)
    }

    /// The requested row does not exist.
    pub fn is_not_found(&self) -> bool {
        self.matches(CODE_NO_ROWS)
    }

    pub fn is_unique_violation(&self) -> bool {
        self.matches(CODE_UNIQUE_VIOLATION)
    }

    pub fn is_permission_denied(&self) -> bool {
        if self.matches(CODE_PERMISSION_DENIED) {
            return true;
        }
        matches!(self, BackendError::Api { message, .. }
            if message.contains("permission denied") || message.contains("row-level security"))
    }

    /// The named remote procedure has not been provisioned on the backend.
    /// Distinct from a procedure that exists and returned an error.
    pub fn is_rpc_missing(&self) -> bool {
        if self.matches(CODE_RPC_MISSING) {
            return true;
        }
        matches!(self, BackendError::Api { status, .. } if *status == 404)
    }

    /// The access token is expired or revoked. The caller should treat this
    /// as a sign-out, never continue silently.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, BackendError::Api { status, .. } if *status == 401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgrest_body_maps_code_and_message() {
        let err = BackendError::from_response(
            409,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        assert!(err.is_unique_violation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "duplicate key value violates unique constraint");
    }

    #[test]
    fn zero_rows_is_not_found() {
        let err = BackendError::from_response(
            406,
            r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#,
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn rls_denial_is_detected_by_code_or_message() {
        let by_code =
            BackendError::from_response(403, r#"{"code":"42501","message":"denied"}"#);
        let by_message = BackendError::from_response(
            403,
            r#"{"code":"","message":"new row violates row-level security policy"}"#,
        );
        assert!(by_code.is_permission_denied());
        assert!(by_message.is_permission_denied());
    }

    #[test]
    fn missing_rpc_is_distinct_from_rpc_error() {
        let missing = BackendError::from_response(
            404,
            r#"{"code":"PGRST202","message":"Could not find the function"}"#,
        );
        let failed = BackendError::from_response(400, r#"{"code":"P0001","message":"boom"}"#);
        assert!(missing.is_rpc_missing());
        assert!(!failed.is_rpc_missing());
    }

    #[test]
    fn gotrue_body_without_code_still_yields_message() {
        let err =
            BackendError::from_response(400, r#"{"error_description":"Invalid login credentials"}"#);
        assert_eq!(err.to_string(), "Invalid login credentials");
        let err = BackendError::from_response(401, "not json at all");
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "backend returned HTTP 401");
    }
}
