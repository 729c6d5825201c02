//! Turn kubeconfig documents into flat connection parameters and back.
//!
//! ```
//! let kc = kubeconn::parse_kubeconfig(
//!     "apiVersion: v1
//! kind: Config
//! clusters:
//! - name: default
//!   cluster:
//!     server: https://127.0.0.1:6443
//!     certificate-authority-data: Y2E=
//! contexts:
//! - name: default
//!   context: {cluster: default, user: default}
//! users:
//! - name: default
//!   user: {token: secret}
//! current-context: default
//! ",
//! )?;
//! let conn = kubeconn::resolve_connection(&kc, &kubeconn::ResolveOptions::default())?;
//! assert_eq!(conn.host, "127.0.0.1:6443");
//! assert_eq!(conn.cacert.as_deref(), Some("ca"));
//! # Ok::<(), kubeconn::Error>(())
//! ```

pub mod clean;
pub mod connection;
pub mod direct;
pub mod error;
pub mod resolve;
pub mod synth;
pub mod validate;

use std::path::{Path, PathBuf};

pub use clean::KubeConfigView;
pub use connection::ConnectionParameters;
pub use direct::{
    parse_kubeconfig, read_config, Cluster, ClusterSpec, Context, ContextSpec, Kind, KubeConfig,
    User, UserSpec,
};
pub use error::{Error, InvalidKubeConfig, Result, UnusableKubeConfig};
pub use resolve::{resolve_connection, ResolveOptions};
pub use synth::connection_to_kubeconfig;
pub use validate::{ValidationError, Violation};

pub fn kube_dir() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").filter(|home| !home.is_empty())?;
    Some(Path::new(&home).join(".kube"))
}

/// The kubeconfig kubectl would read: the first entry of `KUBECONFIG`, or
/// `~/.kube/config`.
pub fn default_kubeconfig_path() -> Option<PathBuf> {
    std::env::var_os("KUBECONFIG")
        .and_then(|paths| std::env::split_paths(&paths).find(|p| !p.as_os_str().is_empty()))
        .or_else(|| kube_dir().map(|dir| dir.join("config")))
}
