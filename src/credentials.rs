//! Platform credentials.
//!
//! A username is always required, together with exactly one complete
//! authentication mode: an API key, or a password plus OpenID.

use std::fmt;

use reqwest::header::HeaderValue;

use crate::error::{ErrorKind, PlatformError, Result};

/// Authentication mode used alongside the username.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    ApiKey(String),
    Password { password: String, open_id: String },
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[REDACTED]").finish(),
            AuthMode::Password { open_id, .. } => f
                .debug_struct("Password")
                .field("password", &"[REDACTED]")
                .field("open_id", open_id)
                .finish(),
        }
    }
}

/// Validated credentials held by a `PlatformClient`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    auth: AuthMode,
}

/// Blank values count as missing; present values are kept verbatim.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Every credential part travels as a header value.
fn header_safe<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    HeaderValue::from_str(value).map(|_| value).map_err(|_| {
        PlatformError::new(
            ErrorKind::InvalidCredentials,
            format!(
                "Invalid credentials: the {} contains characters not allowed in an HTTP header",
                field
            ),
        )
    })
}

impl Credentials {
    pub fn api_key(username: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let api_key = api_key.into();
        Self::from_parts(Some(&username), Some(&api_key), None, None)
    }

    pub fn password(
        username: impl Into<String>,
        password: impl Into<String>,
        open_id: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        let open_id = open_id.into();
        Self::from_parts(Some(&username), None, Some(&password), Some(&open_id))
    }

    /// Build credentials from loosely specified parts.
    ///
    /// The API key wins when both modes are complete.
    pub fn from_parts(
        username: Option<&str>,
        api_key: Option<&str>,
        password: Option<&str>,
        open_id: Option<&str>,
    ) -> Result<Self> {
        let username = non_empty(username).ok_or_else(PlatformError::invalid_credentials)?;
        let username = header_safe("username", username)?;

        let auth = match (non_empty(api_key), non_empty(password), non_empty(open_id)) {
            (Some(key), _, _) => AuthMode::ApiKey(header_safe("API key", key)?.to_string()),
            (None, Some(password), Some(open_id)) => AuthMode::Password {
                password: header_safe("password", password)?.to_string(),
                open_id: header_safe("OpenID", open_id)?.to_string(),
            },
            _ => return Err(PlatformError::invalid_credentials()),
        };

        Ok(Self {
            username: username.to_string(),
            auth,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    /// Headers identifying the caller to both platform endpoints.
    pub(crate) fn headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = vec![("Mendix-Username", self.username.as_str())];
        match &self.auth {
            AuthMode::ApiKey(key) => headers.push(("Mendix-ApiKey", key.as_str())),
            AuthMode::Password { password, open_id } => {
                headers.push(("Mendix-Password", password.as_str()));
                headers.push(("Mendix-OpenId", open_id.as_str()));
            }
        }
        headers
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.auth {
            AuthMode::ApiKey(_) => "api_key",
            AuthMode::Password { .. } => "password",
        };
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("auth", &mode)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kind_of(result: Result<Credentials>) -> ErrorKind {
        result.unwrap_err().kind
    }

    #[test]
    fn test_missing_username_is_rejected() {
        assert_eq!(
            kind_of(Credentials::from_parts(None, Some("key"), None, None)),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            kind_of(Credentials::from_parts(Some("  "), Some("key"), None, None)),
            ErrorKind::InvalidCredentials
        );
    }

    #[test]
    fn test_incomplete_auth_modes_are_rejected() {
        let incomplete = [
            (None, None, None),
            (None, Some("secret"), None),
            (None, None, Some("https://openid")),
            (Some(""), Some(""), Some("")),
        ];
        for (api_key, password, open_id) in incomplete {
            let err = Credentials::from_parts(Some("someone"), api_key, password, open_id)
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidCredentials);
            assert!(err.to_string().contains("Incomplete credentials"));
        }
    }

    #[test]
    fn test_complete_modes_are_accepted() {
        let creds = Credentials::from_parts(Some("someone"), Some("key"), None, None).unwrap();
        assert_eq!(creds.auth(), &AuthMode::ApiKey("key".to_string()));

        let creds =
            Credentials::from_parts(Some("someone"), None, Some("pw"), Some("oid")).unwrap();
        assert!(matches!(creds.auth(), AuthMode::Password { .. }));

        let creds = Credentials::from_parts(Some("someone"), Some("key"), Some("pw"), Some("oid"))
            .unwrap();
        assert!(matches!(creds.auth(), AuthMode::ApiKey(_)));
    }

    #[test]
    fn test_headers_per_mode() {
        let creds = Credentials::api_key("someone", "key").unwrap();
        assert_eq!(
            creds.headers(),
            vec![("Mendix-Username", "someone"), ("Mendix-ApiKey", "key")]
        );

        let creds = Credentials::password("someone", "pw", "oid").unwrap();
        assert_eq!(creds.headers().len(), 3);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::api_key("someone", "secret-key-123").unwrap();
        let debug_str = format!("{:?}", creds);
        assert!(!debug_str.contains("secret-key-123"));
        assert!(debug_str.contains("[REDACTED]"));

        let auth_str = format!("{:?}", creds.auth());
        assert!(!auth_str.contains("secret-key-123"));
    }

    #[test]
    fn test_secrets_are_kept_verbatim() {
        let creds = Credentials::password("someone", " pass word ", " oid ").unwrap();
        assert_eq!(
            creds.auth(),
            &AuthMode::Password {
                password: " pass word ".to_string(),
                open_id: " oid ".to_string(),
            }
        );

        let creds = Credentials::api_key("someone", "key ").unwrap();
        assert_eq!(creds.headers()[1], ("Mendix-ApiKey", "key "));
    }

    #[test]
    fn test_non_header_characters_are_rejected() {
        let err = Credentials::api_key("someone", "key\nwith newline").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
        assert!(err.to_string().contains("API key"));

        let err = Credentials::password("someone", "pw\r", "oid").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);

        let err = Credentials::api_key("some\none", "key").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    }
}
