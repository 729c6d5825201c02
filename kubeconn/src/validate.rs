//! Field constraints that serde alone cannot express.
//!
//! Checks run after decoding and collect every violation instead of stopping
//! at the first one.

use std::fmt;

use crate::direct::{ClusterSpec, KubeConfig, UserSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates violations while walking a value.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<Violation>);

impl Violations {
    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

const API_VERSION_MIN_LEN: usize = 2;

impl KubeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::default();

        if self.api_version.chars().count() < API_VERSION_MIN_LEN {
            violations.push(
                "apiVersion",
                format!("must be at least {API_VERSION_MIN_LEN} characters long"),
            );
        }

        for (i, cluster) in self.clusters.iter().enumerate() {
            cluster
                .cluster
                .check(&format!("clusters[{i}].cluster"), &mut violations);
        }

        for (i, user) in self.users.iter().enumerate() {
            user.user.check(&format!("users[{i}].user"), &mut violations);
        }

        violations.finish()
    }
}

impl ClusterSpec {
    fn check(&self, path: &str, violations: &mut Violations) {
        if self.insecure_skip_tls_verify {
            return;
        }
        match (&self.certificate_authority, &self.certificate_authority_data) {
            (Some(_), Some(_)) => violations.push(
                path,
                "certificate-authority conflicts with certificate-authority-data",
            ),
            (None, None) => violations.push(
                path,
                "one of certificate-authority or certificate-authority-data is required \
                 unless insecure-skip-tls-verify is set",
            ),
            _ => {}
        }
    }
}

impl UserSpec {
    fn check(&self, path: &str, violations: &mut Violations) {
        if self.token.is_some() {
            return;
        }
        if !(self.has_certificate() && self.has_key()) {
            violations.push(
                path,
                "token is required unless both a client certificate \
                 (client-certificate or client-certificate-data) and a client key \
                 (client-key or client-key-data) are set",
            );
        }
    }
}
