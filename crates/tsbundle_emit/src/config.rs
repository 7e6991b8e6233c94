use anyhow::Result;
use clap::Parser;
use log::debug;
use path_clean::clean;
use std::{env, path::PathBuf};

use tsbundle_core::{DEFAULT_CONTENT_EXTENSIONS, DEFAULT_INDEX};

#[derive(Debug, Clone, Parser)]
#[command(name = "emit")]
#[command(about = "Emit an editor bundle for a TypeScript project")]
pub struct Config {
    /// Comma separated extensions of files to include in the project files
    /// (defaults to "ts,html,css,json,xml,md")
    #[arg(short, long)]
    pub content: Option<String>,

    /// Project file that becomes the entry of the bundle
    #[arg(short, long, default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Output directory for the bundle, relative to the current directory
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Root of the project to bundle
    #[arg(short, long, default_value = ".")]
    pub project: PathBuf,

    /// Print every step while emitting the bundle
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory `out` and `project` are relative to
    #[clap(skip)]
    pub invocation_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: None,
            index: DEFAULT_INDEX.to_string(),
            out: PathBuf::from("."),
            project: PathBuf::from("."),
            verbose: false,
            invocation_dir: PathBuf::new(),
        }
    }
}

impl Config {
    /// Pin relative paths to the current directory, unless already pinned
    pub fn initialize(&mut self) -> Result<()> {
        if self.invocation_dir.as_os_str().is_empty() {
            self.invocation_dir = env::current_dir()?;
        }
        debug!("Invocation directory: {}", self.invocation_dir.display());
        Ok(())
    }

    pub fn project_root(&self) -> PathBuf {
        clean(self.invocation_dir.join(&self.project))
    }

    pub fn output_dir(&self) -> PathBuf {
        clean(self.invocation_dir.join(&self.out))
    }

    pub fn content_extensions(&self) -> &str {
        self.content.as_deref().unwrap_or(DEFAULT_CONTENT_EXTENSIONS)
    }
}
