//! Core building blocks for emitting TypeScript project bundles.
//!
//! This crate provides the pieces shared by the bundle emitter:
//! - Bundle data types (files, manifests, compiler configuration)
//! - Classifying files by extension
//! - Filesystem access and glob matching rooted at a project directory
//! - Resolving package manifests through `node_modules`
//! - Reading comment-tolerant JSON configuration

mod classify;
mod config;
mod constants;
mod files;
mod resolver;
mod types;

// Re-export public API
pub use classify::classify;
pub use config::{Document, parse_document, read_document, strip_json_comments};
pub use constants::{
    AMBIENT_EXCLUDES, AMBIENT_TYPE_SCOPES, BUNDLE_SUFFIX, DEFAULT_BUNDLE_NAME,
    DEFAULT_CONTENT_EXTENSIONS, DEFAULT_INDEX, INDEX_DECLARATION, NODE_MODULES, PACKAGE_JSON,
    TSCONFIG_JSON, TYPESCRIPT_LIB_DIR,
};
pub use files::{DiskFiles, FileAccess, to_slash};
pub use resolver::{ManifestResolver, NodeModulesResolver, package_dir};
pub use types::{BundleFile, CompilerConfig, CompilerOptions, DependencyMap, FileKind, Manifest};
