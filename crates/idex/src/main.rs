use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use idex_settings::{MANIFEST_FILE, Manifest, SettingsDocument};

/// idex: export project and module settings as IDE-import JSON.
#[derive(Parser)]
#[command(name = "idex", version, about)]
struct Cli {
    /// Output format for listings.
    #[arg(long, default_value = "text", global = true)]
    format: Format,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the settings document of the project or one module.
    Render {
        /// Manifest path.
        #[arg(long, default_value = MANIFEST_FILE)]
        manifest: PathBuf,

        /// Render this module instead of the project.
        #[arg(long, value_name = "NAME")]
        module: Option<String>,

        /// Pretty-print the JSON document.
        #[arg(long)]
        pretty: bool,

        /// Output file path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the modules declared in the manifest.
    Modules {
        /// Manifest path.
        #[arg(long, default_value = MANIFEST_FILE)]
        manifest: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("idex=debug,idex_settings=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            manifest,
            module,
            pretty,
            output,
        } => {
            let manifest = Manifest::load(&manifest)?;
            let document: &dyn SettingsDocument = match module.as_deref() {
                Some(name) => manifest.module(name).with_context(|| {
                    format!(
                        "module '{name}' is not declared in {}",
                        manifest.path().display()
                    )
                })?,
                None => manifest.project(),
            };
            let json = if pretty {
                document.render_pretty()
            } else {
                document.render()
            }
            .context("failed to render settings")?;
            tracing::debug!(bytes = json.len(), "Rendered settings document");

            if let Some(out_path) = output {
                std::fs::write(&out_path, format!("{json}\n"))
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                eprintln!("wrote {}", out_path.display());
            } else {
                println!("{json}");
            }
        }
        Commands::Modules { manifest } => {
            let manifest = Manifest::load(&manifest)?;
            let names: Vec<&str> = manifest.module_names().collect();
            match cli.format {
                Format::Text => {
                    for name in names {
                        println!("{name}");
                    }
                }
                Format::Json => println!("{}", serde_json::to_string(&names)?),
            }
        }
    }

    Ok(())
}
