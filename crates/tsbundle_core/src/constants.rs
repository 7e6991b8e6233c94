//! Well-known file names, directories and defaults.
//!
//! Everything that names a location inside a TypeScript project lives here so
//! the collectors and the resolver agree on the same layout.

/// Root package manifest, relative to the project root
pub const PACKAGE_JSON: &str = "package.json";

/// Root compiler configuration, relative to the project root
pub const TSCONFIG_JSON: &str = "tsconfig.json";

/// Directory holding installed packages
pub const NODE_MODULES: &str = "node_modules";

/// Directory holding the compiler's `lib.<id>.d.ts` files
pub const TYPESCRIPT_LIB_DIR: &str = "node_modules/typescript/lib";

/// Scoped namespaces whose declaration files are always part of the environment
pub const AMBIENT_TYPE_SCOPES: &[&str] = &["@dojo", "@types"];

/// Declaration files that redeclare an interface already provided by a sibling
/// file in the same scope. Matched as path suffixes.
pub const AMBIENT_EXCLUDES: &[&str] = &["@dojo/loader/interfaces.d.ts"];

/// Extensions substituted into `include` patterns when none are given
pub const DEFAULT_CONTENT_EXTENSIONS: &str = "ts,html,css,json,xml,md";

/// File that must be present among the project files to become the entry
pub const DEFAULT_INDEX: &str = "./src/index.html";

/// Bundle name used when the manifest has no `name`
pub const DEFAULT_BUNDLE_NAME: &str = "bundle";

/// Suffix appended to every emitted bundle
pub const BUNDLE_SUFFIX: &str = ".project.json";

/// Declaration file probed when a types package declares no entry
pub const INDEX_DECLARATION: &str = "index.d.ts";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lib_dir_is_inside_node_modules() {
        assert!(TYPESCRIPT_LIB_DIR.starts_with(NODE_MODULES));
    }

    #[test]
    fn test_ambient_excludes_belong_to_a_scanned_scope() {
        for exclude in AMBIENT_EXCLUDES {
            assert!(
                AMBIENT_TYPE_SCOPES.iter().any(|scope| exclude.starts_with(scope)),
                "'{}' is not under a scanned scope",
                exclude
            );
        }
    }

    #[test]
    fn test_default_index_is_a_content_extension() {
        let ext = DEFAULT_INDEX.rsplit('.').next().unwrap();
        assert!(DEFAULT_CONTENT_EXTENSIONS.split(',').any(|e| e == ext));
    }
}
