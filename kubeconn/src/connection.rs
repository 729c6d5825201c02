//! The flat, resolved connection record handed to API client constructors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, Violations};

/// Everything needed to open a connection to one Kubernetes API server.
///
/// `host` carries no scheme; consumers always connect over TLS. PEM material
/// is inlined in `cacert`, `cert` and `key`. When file inlining is disabled,
/// the `*_file` fields carry the referenced paths instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParameters {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Name to verify the server certificate against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cacert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cacert_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

impl ConnectionParameters {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn has_client_certificate(&self) -> bool {
        (self.cert.is_some() || self.cert_file.is_some())
            && (self.key.is_some() || self.key_file.is_some())
    }

    pub fn has_basic_auth(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Check that the record is usable: a host and at least one way to
    /// authenticate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::default();

        if self.host.is_empty() {
            violations.push("host", "must not be empty");
        }
        if !(self.has_client_certificate() || self.bearer_token.is_some() || self.has_basic_auth()) {
            violations.push(
                "connection",
                "no credentials: expected a client certificate and key, \
                 a bearer token, or a username and password",
            );
        }

        violations.finish()
    }
}
