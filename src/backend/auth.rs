use serde::{Deserialize, Serialize};

use super::{Backend, BackendError};

/// The authenticated principal as issued by the auth subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.user_metadata.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub user: AuthUser,
}

/// Signup may or may not return a session depending on whether email
/// confirmation is enabled on the project.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
}

impl Backend {
    /// Register a new identity. `metadata` carries username/role/year_group
    /// for the server-side profile trigger. Returns the session when the
    /// project auto-confirms, `None` when confirmation is pending.
    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<Option<Session>, BackendError> {
        let request = self.http().post(self.auth_url("signup")).json(&serde_json::json!({
            "email": email,
            "password": password,
            "data": metadata,
        }));
        let response = self.send(request)?;
        let body: SignUpResponse = Backend::decode(response)?;

        let session = match (body.access_token, body.user) {
            (Some(access_token), Some(user)) => Some(Session {
                access_token,
                refresh_token: body.refresh_token.unwrap_or_default(),
                user,
            }),
            _ => None,
        };
        if let Some(s) = &session {
            self.set_session(Some(s.clone()));
        }
        Ok(session)
    }

    pub fn sign_in_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let request = self
            .http()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = self.send(request)?;
        let session: Session = Backend::decode(response)?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Exchange a stored refresh token for a fresh session. Used to restore
    /// a remembered session on startup.
    pub fn refresh_session(&mut self, refresh_token: &str) -> Result<Session, BackendError> {
        let request = self
            .http()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }));
        let response = self.send(request)?;
        let session: Session = Backend::decode(response)?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Revoke the session server-side and forget it locally. The local
    /// session is dropped even if revocation fails.
    pub fn sign_out(&mut self) -> Result<(), BackendError> {
        let result = match self.session() {
            Some(_) => {
                let request = self.http().post(self.auth_url("logout"));
                self.send(request).map(|_| ())
            }
            None => Ok(()),
        };
        self.set_session(None);
        result
    }

    pub fn reset_password_for_email(&self, email: &str) -> Result<(), BackendError> {
        let request = self
            .http()
            .post(self.auth_url("recover"))
            .json(&serde_json::json!({ "email": email }));
        self.send(request)?;
        Ok(())
    }
}
