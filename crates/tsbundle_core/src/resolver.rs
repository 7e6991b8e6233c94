use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::constants::{NODE_MODULES, PACKAGE_JSON};

/// Maps a package specifier (`foo`, `@scope/foo`) to the path of its `package.json`.
///
/// Paths inside the project root are returned relative to it.
pub trait ManifestResolver: Send + Sync {
    fn resolve(&self, specifier: &str) -> Option<PathBuf>;
}

/// Node-style resolution: look in `node_modules` of the project root, then of
/// every ancestor directory.
#[derive(Debug)]
pub struct NodeModulesResolver {
    root: PathBuf,
    cache: DashMap<String, Option<PathBuf>>,
}

impl NodeModulesResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), cache: DashMap::new() }
    }

    fn resolve_uncached(&self, specifier: &str) -> Option<PathBuf> {
        if !is_package_specifier(specifier) {
            debug!("Refusing to resolve non-package specifier '{}'", specifier);
            return None;
        }

        trace!("Walking up from {:?} to find node_modules for '{}'", self.root, specifier);
        let mut current_dir = Some(self.root.as_path());
        while let Some(dir) = current_dir {
            let candidate = dir.join(NODE_MODULES).join(specifier).join(PACKAGE_JSON);
            trace!("Checking manifest at: {:?}", candidate);
            if candidate.is_file() {
                let found = match candidate.strip_prefix(&self.root) {
                    Ok(rel) => rel.to_path_buf(),
                    Err(_) => PathBuf::from(clean(candidate.to_string_lossy().as_ref())),
                };
                return Some(found);
            }
            current_dir = dir.parent();
        }

        None
    }
}

impl ManifestResolver for NodeModulesResolver {
    fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        if let Some(v) = self.cache.get(specifier) {
            trace!("Cache hit for manifest: '{}'", specifier);
            return v.clone();
        }

        let resolved = self.resolve_uncached(specifier);
        match &resolved {
            Some(p) => debug!("Resolved '{}' to {}", specifier, p.display()),
            None => debug!("Could not resolve manifest for '{}'", specifier),
        }
        self.cache.insert(specifier.to_string(), resolved.clone());
        resolved
    }
}

/// Bare package names only: relative, absolute and empty requests never name a package
fn is_package_specifier(specifier: &str) -> bool {
    !specifier.is_empty()
        && !specifier.starts_with('.')
        && !specifier.starts_with('/')
        && !specifier.contains('\\')
        && !specifier.split('/').any(|s| s == "..")
}

/// Directory containing the manifest at `manifest`
pub fn package_dir(manifest: &Path) -> &Path {
    manifest.parent().unwrap_or(Path::new(""))
}
