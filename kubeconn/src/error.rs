//! Error types.
//!
//! Every failure is one of two kinds. [`Error::Invalid`] means the input
//! itself is malformed or inconsistent; [`Error::Unusable`] means it is
//! well-formed but cannot produce a connection this crate is willing to use.

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid kubeconfig: {0}")]
    Invalid(#[from] InvalidKubeConfig),

    #[error("unusable kubeconfig: {0}")]
    Unusable(#[from] UnusableKubeConfig),
}

impl Error {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Error::Invalid(_))
    }

    pub fn is_unusable(&self) -> bool {
        matches!(self, Error::Unusable(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum InvalidKubeConfig {
    #[error("failed to decode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Structure(#[from] ValidationError),

    #[error("current context {0} not found in kubeconfig")]
    ContextNotFound(String),

    #[error("cluster {0} not found in kubeconfig")]
    ClusterNotFound(String),

    #[error("user {0} not found in kubeconfig")]
    UserNotFound(String),

    #[error("the referenced {material} file {} was not readable: {source}", .path.display())]
    UnreadableFile {
        material: Material,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} is not readable: {source}")]
    UndecodableData {
        field: &'static str,
        #[source]
        source: DataError,
    },
}

#[derive(Error, Debug)]
pub enum UnusableKubeConfig {
    #[error("no current context is set")]
    NoCurrentContext,

    #[error(
        "the cluster is set to skip TLS verification, which is not supported; \
         configure a certificate authority instead"
    )]
    InsecureSkipTlsVerify,

    #[error("{0}")]
    Connection(ValidationError),
}

/// Failure to turn a `*-data` field into PEM text.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded data is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Which piece of credential material a file or data field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    CertificateAuthority,
    ClientCertificate,
    ClientKey,
}

impl Material {
    /// Wire id of the field holding the base64 data for this material.
    pub fn data_field(self) -> &'static str {
        match self {
            Material::CertificateAuthority => "certificate-authority-data",
            Material::ClientCertificate => "client-certificate-data",
            Material::ClientKey => "client-key-data",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Material::CertificateAuthority => "certificate authority",
            Material::ClientCertificate => "client certificate",
            Material::ClientKey => "client key",
        })
    }
}
