use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kubeconn::{default_kubeconfig_path, resolve_connection, KubeConfig, ResolveOptions};

/// Resolve a kubeconfig into the connection parameters of its current context.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Kubeconfig to read. Defaults to the first entry of KUBECONFIG, then ~/.kube/config.
    file: Option<PathBuf>,

    /// Use this context instead of the document's current-context.
    #[arg(long)]
    context: Option<String>,

    /// Keep certificate and key file references instead of inlining their contents.
    #[arg(long)]
    no_inline: bool,

    /// Print a single-context kubeconfig of the resolved connection instead.
    #[arg(long)]
    to_kubeconfig: bool,

    /// Write the output to a new file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let file_path = args
        .file
        .or_else(default_kubeconfig_path)
        .context("No kubeconfig given and neither KUBECONFIG nor HOME is set")?;

    let mut kc = KubeConfig::read_from(&file_path)
        .with_context(|| format!("Loading {}", file_path.display()))?;

    if let Some(context) = args.context {
        kc.current_context = Some(context);
    }

    let options = ResolveOptions::new().inline_files(!args.no_inline);
    let conn = resolve_connection(&kc, &options).context("Resolving connection")?;

    tracing::info!(host = %conn.host, "resolved connection");

    let rendered = if args.to_kubeconfig {
        KubeConfig::try_from(&conn)
            .context("Connection cannot be expressed as a kubeconfig")?
            .to_yaml()?
    } else {
        serde_yaml::to_string(&conn)?
    };

    match args.output {
        Some(path) => fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(rendered.as_bytes()))
            .with_context(|| format!("Writing {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}
