//! The kubeconfig document exactly as it appears on the wire.
//!
//! Lists keep their original order and duplicates; see [`crate::clean`] for
//! the name-indexed view used during resolution.

use std::io;
use std::str::FromStr;
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::*;
use serde_yaml::Value as YamlValue;

use crate::error::{Error, InvalidKubeConfig};

// region: Context
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ContextSpec {
    pub cluster: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<YamlValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Context {
    pub name: String,
    pub context: ContextSpec,
}
// endregion

// region: Cluster
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterSpec {
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub insecure_skip_tls_verify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<YamlValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub cluster: ClusterSpec,
}
// endregion

// region: User
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UserSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserSpec {
    pub fn has_certificate(&self) -> bool {
        self.client_certificate.is_some() || self.client_certificate_data.is_some()
    }

    pub fn has_key(&self) -> bool {
        self.client_key.is_some() || self.client_key_data.is_some()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub user: UserSpec,
}
// endregion

// region: Common
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Config,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfig {
    pub kind: Kind,
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub clusters: Vec<Cluster>,
    pub contexts: Vec<Context>,
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<YamlValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<YamlValue>,
}

/// Parse kubeconfig YAML text into a validated [`KubeConfig`].
///
/// The text is first decoded into a generic YAML value, then into the typed
/// document, and finally checked by [`KubeConfig::validate`]. Any failure is
/// reported as [`Error::Invalid`].
pub fn parse_kubeconfig(raw: &str) -> Result<KubeConfig, Error> {
    let value: YamlValue = serde_yaml::from_str(raw).map_err(InvalidKubeConfig::from)?;
    let kc: KubeConfig = serde_yaml::from_value(value).map_err(InvalidKubeConfig::from)?;
    kc.validate().map_err(InvalidKubeConfig::from)?;
    Ok(kc)
}

impl FromStr for KubeConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_kubeconfig(s)
    }
}

impl KubeConfig {
    pub fn read_from(path: impl AsRef<Path>) -> Result<KubeConfig, Error> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| InvalidKubeConfig::Read {
            path: path.to_owned(),
            source,
        })?;
        parse_kubeconfig(&raw)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Write the document to a new file. Existing files are never replaced.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;

        serde_yaml::to_writer(file, self).map_err(io::Error::other)
    }
}

/// Read the kubeconfig at [`crate::default_kubeconfig_path`].
pub fn read_config() -> Result<KubeConfig, Error> {
    match crate::default_kubeconfig_path() {
        Some(path) => KubeConfig::read_from(path),
        None => Err(InvalidKubeConfig::Read {
            path: PathBuf::from("~/.kube/config"),
            source: io::Error::new(io::ErrorKind::NotFound, "neither KUBECONFIG nor HOME is set"),
        }
        .into()),
    }
}
// endregion
