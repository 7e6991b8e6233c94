use anyhow::Result;
use log::debug;
use rayon::prelude::*;
use std::{io::Write, path::Path};

use tsbundle_core::{BUNDLE_SUFFIX, BundleFile, DEFAULT_BUNDLE_NAME, FileAccess, classify};

use crate::reporter::Reporter;

/// Point a TypeScript include pattern at every content extension.
///
/// `src/**/*.ts` with `ts,html` becomes `src/**/*.{ts,html}`. Patterns that do
/// not end in `.ts` or `.d.ts` are returned unchanged.
pub fn rewrite_include(pattern: &str, extensions: &str) -> String {
    let stem = pattern
        .strip_suffix(".d.ts")
        .or_else(|| pattern.strip_suffix(".ts"));
    match stem {
        Some(stem) if extensions.contains(',') => format!("{}.{{{}}}", stem, extensions),
        Some(stem) => format!("{}.{}", stem, extensions),
        None => pattern.to_string(),
    }
}

/// Read every file matched by the rewritten include patterns.
///
/// Files are in pattern order, and in walk order within a pattern.
pub fn collect_project_files<W: Write + Send>(
    include: &[String],
    extensions: &str,
    files: &dyn FileAccess,
    reporter: &Reporter<W>,
) -> Result<Vec<BundleFile>> {
    let mut names: Vec<String> = Vec::new();
    for pattern in include {
        let rewritten = rewrite_include(pattern, extensions);
        debug!("Include '{}' rewritten to '{}'", pattern, rewritten);
        names.extend(files.glob(&rewritten)?);
    }

    names
        .par_iter()
        .map(|name| {
            let text = files.read(Path::new(name))?;
            reporter.step("adding", format!("project file \"{}\"", name));
            Ok(BundleFile::new(name.clone(), text, classify(name)))
        })
        .collect()
}

/// The project file named exactly `hint`
pub fn find_index<'a>(files: &'a [BundleFile], hint: &str) -> Option<&'a BundleFile> {
    files.iter().find(|f| f.name == hint)
}

/// `<package name>.project.json`, with the scope separator of a scoped name
/// turned into `-`.
pub fn output_file_name(package_name: Option<&str>) -> String {
    let name = package_name.unwrap_or(DEFAULT_BUNDLE_NAME);
    format!("{}{}", name.replacen(['/', '\\'], "-", 1), BUNDLE_SUFFIX)
}
