//! Wrap a [`ConnectionParameters`] in a minimal kubeconfig document, for
//! tools that only accept kubeconfig input.
//!
//! Only connections the kubeconfig model can carry are converted: the
//! cluster needs a certificate authority (inline or path), the user needs a
//! token or a client certificate and key, and `path` must be unset since
//! `server` cannot keep it apart from the host.

use base64::prelude::{Engine as _, BASE64_STANDARD};

use crate::connection::ConnectionParameters;
use crate::direct::{Cluster, ClusterSpec, Context, ContextSpec, Kind, KubeConfig, User, UserSpec};
use crate::validate::{ValidationError, Violations};

/// Name used for the single cluster, context and user.
pub const SYNTHETIC_NAME: &str = "default";

/// Build a single-context kubeconfig that resolves back to `conn`.
///
/// Fails with every reason the result would not survive a round trip
/// through [`crate::parse_kubeconfig`] and [`crate::resolve_connection`].
pub fn connection_to_kubeconfig(
    conn: &ConnectionParameters,
) -> Result<KubeConfig, ValidationError> {
    let encode = |pem: &Option<String>| pem.as_ref().map(|pem| BASE64_STANDARD.encode(pem));

    let cluster = ClusterSpec {
        server: format!("https://{}", conn.host),
        certificate_authority: conn.cacert_file.clone(),
        certificate_authority_data: encode(&conn.cacert),
        insecure_skip_tls_verify: false,
        tls_server_name: conn.server_name.clone(),
        extensions: None,
    };

    let user = UserSpec {
        token: conn.bearer_token.clone(),
        client_certificate: conn.cert_file.clone(),
        client_certificate_data: encode(&conn.cert),
        client_key: conn.key_file.clone(),
        client_key_data: encode(&conn.key),
        username: conn.username.clone(),
        password: conn.password.clone(),
    };

    let kc = KubeConfig {
        kind: Kind::Config,
        api_version: "v1".to_owned(),
        clusters: vec![Cluster {
            name: SYNTHETIC_NAME.to_owned(),
            cluster,
        }],
        contexts: vec![Context {
            name: SYNTHETIC_NAME.to_owned(),
            context: ContextSpec {
                cluster: SYNTHETIC_NAME.to_owned(),
                user: SYNTHETIC_NAME.to_owned(),
                namespace: None,
                extensions: None,
            },
        }],
        users: vec![User {
            name: SYNTHETIC_NAME.to_owned(),
            user,
        }],
        current_context: Some(SYNTHETIC_NAME.to_owned()),
        preferences: None,
        extensions: None,
    };

    let mut violations = Violations::default();
    if conn.path.is_some() {
        violations.push("path", "has no kubeconfig counterpart");
    }
    if let Err(err) = kc.validate() {
        for violation in err.violations {
            violations.push(violation.path, violation.message);
        }
    }
    violations.finish()?;

    Ok(kc)
}

impl TryFrom<&ConnectionParameters> for KubeConfig {
    type Error = ValidationError;

    fn try_from(conn: &ConnectionParameters) -> Result<Self, Self::Error> {
        connection_to_kubeconfig(conn)
    }
}
