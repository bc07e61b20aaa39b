use std::fmt;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SourceEndpoint {
    pub base_uri: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TargetEndpoint {
    pub base_uri: Option<String>,
    pub organization: String,
    pub username: String,
    pub token: String,
}

/// Username and secret handed to the git transport.
///
/// The secret never shows up in `Debug` output so credentials can be logged
/// alongside requests without leaking.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Value of an HTTP `Authorization` header using basic auth.
    pub fn basic_auth_header(&self) -> String {
        let pair = format!("{}:{}", self.username, self.secret);
        format!("Authorization: Basic {}", base64::encode(pair))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl SourceEndpoint {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

impl TargetEndpoint {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.token)
    }
}
