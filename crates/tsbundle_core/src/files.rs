use anyhow::{Context, Result, anyhow};
use ignore::{WalkBuilder, overrides::OverrideBuilder};
use log::{debug, trace};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Filesystem capability used by every collector.
///
/// Relative paths are interpreted against the project root the implementation
/// was created for; absolute paths are used as-is.
pub trait FileAccess: Send + Sync {
    fn root(&self) -> &Path;

    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Files matching `pattern`, as `/`-separated paths relative to the root.
    ///
    /// Supports `*`, `**`, `?`, `[...]` and `{a,b}` alternation. A leading `./`
    /// is kept on every returned path.
    fn glob(&self, pattern: &str) -> Result<Vec<String>>;
}

/// [`FileAccess`] backed by the real filesystem
#[derive(Debug, Clone)]
pub struct DiskFiles {
    root: PathBuf,
}

impl DiskFiles {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = root
            .canonicalize()
            .with_context(|| format!("Project root {} does not exist", root.display()))?;
        debug!("File access rooted at: {}", root.display());
        Ok(Self { root })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileAccess for DiskFiles {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        let p = self.absolute(path);
        trace!("Checking existence of: {}", p.display());
        fs::metadata(&p).is_ok_and(|m| m.is_file())
    }

    fn read(&self, path: &Path) -> Result<String> {
        trace!("Reading file: {}", path.display());
        fs::read_to_string(self.absolute(path))
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        debug!("Writing {} bytes to {}", contents.len(), path.display());
        fs::write(self.absolute(path), contents)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        let (prefix, relative) = match pattern.strip_prefix("./") {
            Some(rest) => ("./", rest),
            None => ("", pattern),
        };
        let base = literal_base(relative);
        let start = self.root.join(&base);
        debug!("Globbing '{}' from {}", pattern, start.display());
        if !start.is_dir() {
            trace!("Glob base {} does not exist", start.display());
            return Ok(Vec::new());
        }

        // Override globs follow gitignore rules, where a pattern without a `/`
        // matches at any depth. Anchor it to the root.
        let mut builder = OverrideBuilder::new(&self.root);
        builder
            .add(&format!("/{}", relative))
            .with_context(|| format!("Invalid glob pattern '{}'", pattern))?;
        let overrides = builder.build()?;

        let walker = WalkBuilder::new(&start)
            .standard_filters(false)
            .hidden(true)
            .overrides(overrides)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut matches = Vec::new();
        for res in walker {
            let dent = res.map_err(|e| anyhow!("Glob '{}' failed: {}", pattern, e))?;
            if !dent.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let rel = dent.path().strip_prefix(&self.root).unwrap_or(dent.path());
            let name = format!("{}{}", prefix, to_slash(rel));
            trace!("Glob match: {}", name);
            matches.push(name);
        }

        debug!("Glob '{}' matched {} files", pattern, matches.len());
        Ok(matches)
    }
}

/// Leading directory components of a glob that contain no wildcards
fn literal_base(pattern: &str) -> PathBuf {
    let mut segments: Vec<&str> = pattern.split('/').collect();
    // The last segment names files, never a directory to start from
    segments.pop();
    segments
        .into_iter()
        .take_while(|s| !s.contains(['*', '?', '[', '{']))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Render a path with `/` separators regardless of platform
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
