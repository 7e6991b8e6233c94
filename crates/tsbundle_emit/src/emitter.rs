use anyhow::{Result, bail};
use log::{debug, info};
use path_clean::clean;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tsbundle_core::{
    CompilerConfig, DiskFiles, Document, FileAccess, Manifest, ManifestResolver,
    NodeModulesResolver, PACKAGE_JSON, TSCONFIG_JSON, read_document,
};

use crate::config::Config;
use crate::dependencies::resolve_bundle_dependencies;
use crate::environment::collect_environment;
use crate::project::{collect_project_files, find_index, output_file_name};
use crate::reporter::Reporter;
use crate::types::ProjectBundle;

const TITLE: &str = "Emit editor project bundle";

/// Build the bundle for the project `files` is rooted at, without writing it.
pub fn assemble_bundle<W: Write + Send>(
    cfg: &Config,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Result<ProjectBundle> {
    let package_path = Path::new(PACKAGE_JSON);
    let tsconfig_path = Path::new(TSCONFIG_JSON);
    if !files.exists(package_path) || !files.exists(tsconfig_path) {
        bail!(
            "Path \"{}\" does not contain a \"{}\" and \"{}\".",
            files.root().display(),
            TSCONFIG_JSON,
            PACKAGE_JSON
        );
    }

    reporter.step("reading", format!("\"{}\"", PACKAGE_JSON));
    let package: Document<Manifest> = read_document(files, package_path)?;
    reporter.step("reading", format!("\"{}\"", TSCONFIG_JSON));
    let tsconfig: Document<CompilerConfig> = read_document(files, tsconfig_path)?;

    if let Some(content) = &cfg.content {
        reporter.step("setting", format!("project file extensions to \"{}\"", content));
    }
    let extensions = cfg.content_extensions();

    // The three collectors own disjoint parts of the bundle, so they run side
    // by side and are only checked once all of them have finished.
    let ((environment, dependencies), project_files) = rayon::join(
        || {
            rayon::join(
                || collect_environment(&tsconfig.parsed, files, resolver, reporter),
                || resolve_bundle_dependencies(&package.parsed, files, resolver),
            )
        },
        || collect_project_files(&tsconfig.parsed.include, extensions, files, reporter),
    );
    let environment_files = environment?;
    let project_files = project_files?;
    debug!(
        "Bundle has {} environment files, {} project files, {} production and {} development dependencies",
        environment_files.len(),
        project_files.len(),
        dependencies.production.len(),
        dependencies.development.len()
    );

    let index = match find_index(&project_files, &cfg.index) {
        Some(file) => file.name.clone(),
        None => {
            reporter.error(format!("unable to find index \"{}\" in project.", cfg.index));
            String::new()
        }
    };

    Ok(ProjectBundle {
        dependencies,
        environment_files,
        files: project_files,
        index,
        package: package.raw,
        tsconfig: tsconfig.raw,
    })
}

/// Assemble the bundle and write it to the output directory.
///
/// Failures are reported, never returned: the path of the written bundle
/// comes back on success and `None` otherwise.
pub fn emit_project_with<W: Write + Send>(
    cfg: &Config,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Option<PathBuf> {
    reporter.title(TITLE);
    report_emit(cfg, files, resolver, reporter)
}

fn report_emit<W: Write + Send>(
    cfg: &Config,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Option<PathBuf> {
    match write_bundle(cfg, files, resolver, reporter) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!("Emit failed: {:#}", e);
            reporter.failure(&e);
            None
        }
    }
}

fn write_bundle<W: Write + Send>(
    cfg: &Config,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Result<PathBuf> {
    let bundle = assemble_bundle(cfg, files, resolver, reporter)?;
    let filename = output_file_name(bundle.package_name());
    let path = cfg.output_dir().join(&filename);

    let json = serde_json::to_string(&bundle)?;
    files.write(&path, &json)?;
    info!("Wrote {} bytes to {}", json.len(), path.display());

    reporter.emitted(clean(cfg.out.join(&filename)).display());
    Ok(path)
}

/// Emit the bundle for `cfg.project` on the real filesystem.
pub fn emit_project<W: Write + Send>(cfg: &Config, reporter: &Reporter<W>) -> Option<PathBuf> {
    reporter.title(TITLE);
    let root = cfg.project_root();
    let files = match DiskFiles::new(&root) {
        Ok(files) => files,
        Err(e) => {
            reporter.failure(&e);
            return None;
        }
    };

    if root != cfg.invocation_dir {
        reporter.step("changing", format!("working directory to \"{}\"", root.display()));
    }
    let resolver = NodeModulesResolver::new(files.root());
    report_emit(cfg, &files, &resolver, reporter)
}
