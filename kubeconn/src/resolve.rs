use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::connection::ConnectionParameters;
use crate::direct::KubeConfig;
use crate::error::{DataError, Error, InvalidKubeConfig, Material, UnusableKubeConfig};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResolveOptions {
    /// Read referenced certificate and key files into the result. When
    /// false, their paths are recorded instead and no file is touched.
    pub inline_files: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { inline_files: true }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inline_files(mut self, inline_files: bool) -> Self {
        self.inline_files = inline_files;
        self
    }
}

/// Resolve the current context of `kc` into connection parameters.
///
/// Fails with [`Error::Unusable`] when no context is selected, when the
/// cluster disables TLS verification, or when the result carries no
/// credentials. Dangling references and unreadable or undecodable
/// certificate material fail with [`Error::Invalid`].
pub fn resolve_connection(
    kc: &KubeConfig,
    options: &ResolveOptions,
) -> Result<ConnectionParameters, Error> {
    let view = kc.view();

    let current = view
        .current_context
        .ok_or(UnusableKubeConfig::NoCurrentContext)?;
    let context = view
        .contexts
        .get(current)
        .ok_or_else(|| InvalidKubeConfig::ContextNotFound(current.to_owned()))?;
    let cluster = view
        .clusters
        .get(context.cluster.as_str())
        .ok_or_else(|| InvalidKubeConfig::ClusterNotFound(context.cluster.clone()))?;
    let user = view
        .users
        .get(context.user.as_str())
        .ok_or_else(|| InvalidKubeConfig::UserNotFound(context.user.clone()))?;

    debug!(
        context = current,
        cluster = %context.cluster,
        user = %context.user,
        "resolving kubeconfig context"
    );

    if cluster.insecure_skip_tls_verify {
        return Err(UnusableKubeConfig::InsecureSkipTlsVerify.into());
    }

    let mut conn = ConnectionParameters::new(strip_scheme(&cluster.server));
    conn.server_name = cluster.tls_server_name.clone();

    let resolver = Resolver { options };
    resolver.apply(
        Material::CertificateAuthority,
        cluster.certificate_authority.as_deref(),
        cluster.certificate_authority_data.as_deref(),
        &mut conn.cacert,
        &mut conn.cacert_file,
    )?;
    resolver.apply(
        Material::ClientCertificate,
        user.client_certificate.as_deref(),
        user.client_certificate_data.as_deref(),
        &mut conn.cert,
        &mut conn.cert_file,
    )?;
    resolver.apply(
        Material::ClientKey,
        user.client_key.as_deref(),
        user.client_key_data.as_deref(),
        &mut conn.key,
        &mut conn.key_file,
    )?;

    conn.username = user.username.clone();
    conn.password = user.password.clone();
    conn.bearer_token = user.token.clone();

    conn.validate().map_err(UnusableKubeConfig::Connection)?;

    Ok(conn)
}

impl KubeConfig {
    /// [`resolve_connection`] with default options.
    pub fn to_connection(&self) -> Result<ConnectionParameters, Error> {
        resolve_connection(self, &ResolveOptions::default())
    }
}

fn strip_scheme(server: &str) -> &str {
    server
        .strip_prefix("https://")
        .or_else(|| server.strip_prefix("http://"))
        .unwrap_or(server)
}

struct Resolver<'a> {
    options: &'a ResolveOptions,
}

impl Resolver<'_> {
    /// Fill one piece of PEM material. Data is applied after the path so it
    /// wins when both are set.
    fn apply(
        &self,
        material: Material,
        path: Option<&Path>,
        data: Option<&str>,
        pem: &mut Option<String>,
        deferred: &mut Option<PathBuf>,
    ) -> Result<(), InvalidKubeConfig> {
        if let Some(path) = path {
            if self.options.inline_files {
                *pem = Some(read_material(material, path)?);
            } else {
                *deferred = Some(path.to_owned());
            }
        }

        if let Some(data) = data {
            *pem = Some(decode_material(material, data)?);
            *deferred = None;
        }

        Ok(())
    }
}

fn read_material(material: Material, path: &Path) -> Result<String, InvalidKubeConfig> {
    debug!(%material, path = %path.display(), "inlining referenced file");
    fs::read_to_string(path).map_err(|source| InvalidKubeConfig::UnreadableFile {
        material,
        path: path.to_owned(),
        source,
    })
}

fn decode_material(material: Material, data: &str) -> Result<String, InvalidKubeConfig> {
    trace!(field = material.data_field(), "decoding inline data");
    // Line-wrapped data is common in hand-edited kubeconfigs.
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let decode = || -> Result<String, DataError> {
        let bytes = BASE64_STANDARD.decode(&compact)?;
        Ok(String::from_utf8(bytes)?)
    };
    decode().map_err(|source| InvalidKubeConfig::UndecodableData {
        field: material.data_field(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_most_one_scheme() {
        assert_eq!(strip_scheme("https://127.0.0.1:6443"), "127.0.0.1:6443");
        assert_eq!(strip_scheme("http://localhost:8080"), "localhost:8080");
        assert_eq!(strip_scheme("https://http://weird"), "http://weird");
        assert_eq!(strip_scheme("kube.example.com"), "kube.example.com");
        assert_eq!(strip_scheme("tcp://https://x"), "tcp://https://x");
    }

    #[test]
    fn decodes_base64_to_text() {
        assert_eq!(
            decode_material(Material::ClientKey, "aGVsbG8=").unwrap(),
            "hello"
        );
    }

    #[test]
    fn decodes_line_wrapped_base64() {
        assert_eq!(
            decode_material(Material::CertificateAuthority, "aGVs\nbG8g\r\n d29y\tbGQ=\n").unwrap(),
            "hello world"
        );
    }

    #[test]
    fn decode_failures_name_the_field() {
        let err = decode_material(Material::ClientCertificate, "not base64!").unwrap_err();
        assert!(matches!(
            err,
            InvalidKubeConfig::UndecodableData {
                field: "client-certificate-data",
                source: DataError::Base64(_),
            }
        ));

        // 0xff 0xfe is not UTF-8
        let err = decode_material(Material::CertificateAuthority, "//4=").unwrap_err();
        assert!(matches!(
            err,
            InvalidKubeConfig::UndecodableData {
                source: DataError::Utf8(_),
                ..
            }
        ));
        assert!(err.to_string().starts_with("certificate-authority-data is not readable"));
    }

    #[test]
    fn deferred_paths_are_not_read() {
        let options = ResolveOptions::new().inline_files(false);
        let resolver = Resolver { options: &options };
        let (mut pem, mut deferred) = (None, None);

        resolver
            .apply(
                Material::ClientKey,
                Some(Path::new("/does/not/exist")),
                None,
                &mut pem,
                &mut deferred,
            )
            .unwrap();

        assert_eq!(pem, None);
        assert_eq!(deferred, Some(PathBuf::from("/does/not/exist")));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ResolveOptions = serde_yaml::from_str("{}").unwrap();
        assert!(options.inline_files);

        let options: ResolveOptions = serde_yaml::from_str("inline-files: false").unwrap();
        assert_eq!(options, ResolveOptions::new().inline_files(false));
    }
}
