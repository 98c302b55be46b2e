use super::manifest::RouteManifest;
use crate::config::GateConfig;
use crate::gate::SpecGate;
use crate::path::PathTranslator;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for specgate
#[derive(Debug, Parser)]
#[command(name = "specgate")]
#[command(version, about = "Translate routing rules and assemble OpenAPI documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the OpenAPI path and path parameters for one rule
    Translate {
        /// Rule in converter syntax, e.g. `/users/<int(min=1):id>`
        rule: String,

        /// Fail on unknown converters instead of documenting them as strings
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Assemble the OpenAPI document for a YAML route manifest
    Spec {
        /// Route manifest (YAML)
        #[arg(short, long)]
        routes: PathBuf,

        /// Gate configuration (YAML); `SPECGATE_*` variables override it
        #[arg(short, long, env = "SPECGATE_CONFIG")]
        config: Option<PathBuf>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run `cli`, writing command output to `out`.
pub fn run_cli(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Translate { rule, strict } => {
            let spec = PathTranslator::new()
                .strict(*strict)
                .translate(rule)
                .with_context(|| format!("failed to translate `{rule}`"))?;
            let rendered = json!({
                "rule": rule,
                "path": spec.normalized,
                "parameters": spec.parameters,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&rendered)?)?;
            Ok(())
        }
        Commands::Spec {
            routes,
            config,
            output,
        } => {
            let config = match config {
                Some(path) => GateConfig::from_yaml_file(path)?.with_env_overrides()?,
                None => GateConfig::from_env()?,
            };
            let gate = SpecGate::new(config);
            let app = RouteManifest::from_yaml_file(routes)?.into_app(&gate)?;
            let document = gate
                .build_document(&app)
                .context("failed to assemble document")?;
            let rendered = serde_json::to_string_pretty(&document)?;

            match output {
                Some(path) => {
                    std::fs::write(path, rendered + "\n")
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(output = %path.display(), "Document written");
                }
                None => writeln!(out, "{rendered}")?,
            }
            Ok(())
        }
    }
}
