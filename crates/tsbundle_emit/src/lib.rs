//! Emit a self-contained JSON bundle of a TypeScript project for editors.
//!
//! The bundle carries the project's `package.json` and `tsconfig.json`, every
//! file matched by the `include` patterns, the type environment (lib files,
//! declared type packages, ambient declarations) and the transitive
//! dependency versions of both production and development dependencies.
//!
//! # Examples
//!
//! ```no_run
//! use tsbundle_emit::{Config, Reporter, emit_project};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut cfg = Config {
//!     project: std::path::PathBuf::from("/path/to/project"),
//!     verbose: true,
//!     ..Config::default()
//! };
//! cfg.initialize()?;
//!
//! let reporter = Reporter::new(BufWriter::new(std::io::stdout()), cfg.verbose);
//! if let Some(path) = emit_project(&cfg, &reporter) {
//!     println!("{}", path.display());
//! }
//! reporter.into_inner().flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod dependencies;
mod emitter;
mod environment;
mod project;
mod reporter;
mod types;

// Re-export public API
pub use config::Config;
pub use dependencies::{resolve_bundle_dependencies, resolve_dependencies};
pub use emitter::{assemble_bundle, emit_project, emit_project_with};
pub use environment::{
    collect_ambient_declarations, collect_environment, collect_lib_files, collect_type_files,
};
pub use project::{collect_project_files, find_index, output_file_name, rewrite_include};
pub use reporter::Reporter;
pub use types::{BundleDependencies, ProjectBundle};
