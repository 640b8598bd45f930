use crate::core::Compiler;
use crate::infrastructure::TokioFileSystemService;
use crate::plugins::{builtin_registry, StatsPlugin};
use crate::utils::{CliOverrides, ConfigLoader, Logger, Result, TinypackError};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "tinypack")]
#[command(about = "tinypack - a small CommonJS module bundler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bundle every entry into its own chunk
    Build {
        /// Config file (defaults to tinypack.config.json in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Root that module ids are relative to
        #[arg(long)]
        context: Option<PathBuf>,
        /// Single entry file, bundled as chunk `main`
        #[arg(short, long)]
        entry: Option<String>,
        /// Output directory
        #[arg(short, long)]
        outdir: Option<String>,
        /// Output file name template, `[name]` is the chunk name
        #[arg(short, long)]
        filename: Option<String>,
        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
        /// Log phase timings
        #[arg(long)]
        stats: bool,
    },
    /// Print an example config file
    Init,
    /// Show bundler information
    Info,
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Build {
                config,
                context,
                entry,
                outdir,
                filename,
                json,
                stats,
            } => {
                let overrides = CliOverrides {
                    context,
                    entry,
                    outdir,
                    filename,
                };
                self.handle_build_command(config.as_deref(), overrides, json, stats).await
            }
            Commands::Init => {
                println!("{}", ConfigLoader::generate_example());
                Ok(())
            }
            Commands::Info => {
                self.handle_info_command();
                Ok(())
            }
        }
    }

    async fn handle_build_command(
        &self,
        config_path: Option<&Path>,
        overrides: CliOverrides,
        json: bool,
        stats: bool,
    ) -> Result<()> {
        let cwd = std::env::current_dir().map_err(|e| TinypackError::io(Path::new("."), e))?;

        let (file_config, base_dir) = match config_path {
            Some(path) => {
                let config = ConfigLoader::load_from_file(path)?;
                let base_dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| cwd.join(p))
                    .unwrap_or_else(|| cwd.clone());
                (Some(config), base_dir)
            }
            None => (ConfigLoader::find(&cwd)?, cwd.clone()),
        };

        let banner = file_config.as_ref().and_then(|c| c.banner.clone());
        let registry = builtin_registry(banner.as_deref());
        let config = ConfigLoader::merge_with_cli(file_config, overrides, &base_dir, &registry)?;

        let mut compiler = Compiler::new(config, Arc::new(TokioFileSystemService));
        if stats {
            compiler = compiler.with_plugin(Arc::new(StatsPlugin::new(true)));
        }

        let report = compiler.run().await?;

        if json {
            println!("{}", report.to_json()?);
        }
        Ok(())
    }

    fn handle_info_command(&self) {
        println!("tinypack {}", env!("CARGO_PKG_VERSION"));
        println!("  Parser: oxc");
        println!("  Module format: CommonJS require()");
        println!("  Built-in loaders: json, banner");
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
