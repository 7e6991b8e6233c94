use anyhow::{Result, anyhow};
use log::{debug, trace};
use path_clean::clean;
use rayon::prelude::*;
use std::{io::Write, path::Path};

use tsbundle_core::{
    AMBIENT_EXCLUDES, AMBIENT_TYPE_SCOPES, BundleFile, CompilerConfig, Document, FileAccess,
    FileKind, INDEX_DECLARATION, Manifest, ManifestResolver, NODE_MODULES, TYPESCRIPT_LIB_DIR,
    package_dir, read_document, to_slash,
};

use crate::reporter::Reporter;

/// Gathers the files an editor needs to type-check the project: lib files,
/// the packages named in `compilerOptions.types`, and every declaration file
/// in the ambient scopes. Output order is lib, types, ambient.
pub fn collect_environment<W: Write + Send>(
    config: &CompilerConfig,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Result<Vec<BundleFile>> {
    let (lib, (types, ambient)) = rayon::join(
        || collect_lib_files(&config.compiler_options.lib, files, reporter),
        || {
            rayon::join(
                || collect_type_files(&config.compiler_options.types, files, resolver, reporter),
                || collect_ambient_declarations(files, reporter),
            )
        },
    );

    let mut environment = lib?;
    environment.extend(types?);
    environment.extend(ambient?);
    debug!("Collected {} environment files", environment.len());
    Ok(environment)
}

pub fn collect_lib_files<W: Write + Send>(
    libs: &[String],
    files: &dyn FileAccess,
    reporter: &Reporter<W>,
) -> Result<Vec<BundleFile>> {
    libs.par_iter()
        .map(|lib| {
            let filename = format!("lib.{}.d.ts", lib.to_lowercase());
            let text = files.read(&Path::new(TYPESCRIPT_LIB_DIR).join(&filename))?;
            reporter.step("adding", format!("lib \"{}\"", lib));
            Ok(BundleFile::new(filename, text, FileKind::LibDeclaration))
        })
        .collect()
}

pub fn collect_type_files<W: Write + Send>(
    packages: &[String],
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Result<Vec<BundleFile>> {
    let per_package: Vec<Vec<BundleFile>> = packages
        .par_iter()
        .map(|package| type_files_for(package, files, resolver, reporter))
        .collect::<Result<_>>()?;
    Ok(per_package.into_iter().flatten().collect())
}

/// The manifest of `package`, followed by its declaration entry if one can be found
fn type_files_for<W: Write + Send>(
    package: &str,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    reporter: &Reporter<W>,
) -> Result<Vec<BundleFile>> {
    reporter.step("resolving", format!("types for package \"{}\"", package));
    let manifest_path = resolver
        .resolve(package)
        .ok_or_else(|| anyhow!("Cannot find module \"{}/package.json\"", package))?;
    let manifest: Document<Manifest> = read_document(files, &manifest_path)?;
    let manifest_name = to_slash(&manifest_path);

    let mut out = vec![BundleFile::new(
        manifest_name.clone(),
        serde_json::to_string(&manifest.raw)?,
        FileKind::Json,
    )];

    let dir = package_dir(&manifest_path);
    let declaration = match manifest.parsed.type_entry() {
        Some(entry) => {
            let path = clean(dir.join(entry));
            let text = files.read(&path)?;
            Some(BundleFile::new(to_slash(&path), text, FileKind::TypeDeclaration))
        }
        None => {
            reporter.warn(format!("\"{}\" does not contain type information", manifest_name));
            probe_index_declaration(files, dir)
        }
    };

    if let Some(file) = declaration {
        reporter.step("adding", format!("type file \"{}\"", file.name));
        out.push(file);
    }
    Ok(out)
}

/// `index.d.ts` next to a manifest that declares no type entry, if there is one
fn probe_index_declaration(files: &dyn FileAccess, dir: &Path) -> Option<BundleFile> {
    let path = dir.join(INDEX_DECLARATION);
    if !files.exists(&path) {
        trace!("No {} at {}", INDEX_DECLARATION, path.display());
        return None;
    }
    match files.read(&path) {
        Ok(text) => Some(BundleFile::new(to_slash(&path), text, FileKind::TypeDeclaration)),
        Err(e) => {
            debug!("Ignoring unreadable {}: {:#}", path.display(), e);
            None
        }
    }
}

pub fn collect_ambient_declarations<W: Write + Send>(
    files: &dyn FileAccess,
    reporter: &Reporter<W>,
) -> Result<Vec<BundleFile>> {
    let mut names = Vec::new();
    for scope in AMBIENT_TYPE_SCOPES {
        names.extend(files.glob(&format!("{}/{}/**/*.d.ts", NODE_MODULES, scope))?);
    }

    names.retain(|name| {
        let excluded = is_excluded_declaration(name);
        if excluded {
            trace!("Excluding duplicate declaration: {}", name);
        }
        !excluded
    });

    names
        .par_iter()
        .map(|name| {
            let text = files.read(Path::new(name))?;
            reporter.step("adding", format!("definition file \"{}\"", name));
            Ok(BundleFile::new(name.clone(), text, FileKind::TypeDeclaration))
        })
        .collect()
}

fn is_excluded_declaration(name: &str) -> bool {
    AMBIENT_EXCLUDES.iter().any(|suffix| name.ends_with(suffix))
}
