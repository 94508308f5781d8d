//! HTTP Basic authentication.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Authenticator that checks `Authorization: Basic` credentials against a
/// single configured user.
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Decode `user:password` from the Authorization header.
    fn extract_credentials(request: &AuthRequest) -> Result<(String, String), AuthError> {
        let header = request
            .headers
            .get("authorization")
            .ok_or(AuthError::NotAuthenticated)?;

        let (scheme, encoded) = header
            .trim()
            .split_once(' ')
            .ok_or_else(|| AuthError::InvalidCredentials("Malformed Authorization header".to_string()))?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::NotAuthenticated);
        }

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::InvalidCredentials("Credentials are not valid base64".to_string()))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| AuthError::InvalidCredentials("Credentials are not valid UTF-8".to_string()))?;

        decoded
            .split_once(':')
            .map(|(user, pass)| (user.to_string(), pass.to_string()))
            .ok_or_else(|| AuthError::InvalidCredentials("Missing ':' in credentials".to_string()))
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let (username, password) = Self::extract_credentials(request)?;

        // Evaluate both so timing does not reveal which one was wrong.
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());

        if user_ok && pass_ok {
            Ok(Identity {
                user_id: username,
                method: "basic".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials("Invalid username or password".to_string()))
        }
    }

    fn method_name(&self) -> &'static str {
        "basic"
    }
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
