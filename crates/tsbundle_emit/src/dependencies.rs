use log::{debug, trace};
use std::collections::HashSet;

use tsbundle_core::{DependencyMap, FileAccess, Manifest, ManifestResolver, read_document};

use crate::types::BundleDependencies;

/// Expands `seed` into its transitive dependency closure.
///
/// Every sweep looks up the manifests of the names discovered by the previous
/// sweep and collects their peer and regular dependencies. The first version
/// range seen for a name is kept; later sightings, at any depth, are ignored.
/// A name is looked up at most once, so cycles terminate. Names whose manifest
/// cannot be found stay in the result but are not expanded.
pub fn resolve_dependencies<F>(seed: &DependencyMap, mut lookup: F) -> DependencyMap
where
    F: FnMut(&str) -> Option<Manifest>,
{
    let mut resolved = seed.clone();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: Vec<String> = seed.keys().cloned().collect();
    let mut sweep = 0;

    while !frontier.is_empty() {
        sweep += 1;
        trace!("Dependency sweep {} over {} packages", sweep, frontier.len());
        let mut discovered = DependencyMap::new();

        for name in &frontier {
            if !visited.insert(name.clone()) {
                continue;
            }

            let Some(manifest) = lookup(name) else {
                debug!("No manifest for dependency '{}', not expanding it", name);
                continue;
            };

            for (dep, range) in manifest.peer_dependencies.iter().chain(&manifest.dependencies) {
                if resolved.contains_key(dep) || discovered.contains_key(dep) {
                    continue;
                }
                trace!("Discovered '{}@{}' via '{}'", dep, range, name);
                discovered.insert(dep.clone(), range.clone());
            }
        }

        frontier = discovered.keys().cloned().collect();
        resolved.extend(discovered);
    }

    debug!("Resolved {} dependencies in {} sweeps", resolved.len(), sweep);
    resolved
}

/// Production and development closures of the root manifest.
///
/// The two passes share nothing, so they run side by side.
pub fn resolve_bundle_dependencies(
    manifest: &Manifest,
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
) -> BundleDependencies {
    let mut production = manifest.dependencies.clone();
    for (name, range) in &manifest.peer_dependencies {
        production.entry(name.clone()).or_insert_with(|| range.clone());
    }

    let lookup = |name: &str| load_dependency_manifest(files, resolver, name);
    let (production, development) = rayon::join(
        || resolve_dependencies(&production, lookup),
        || resolve_dependencies(&manifest.dev_dependencies, lookup),
    );

    BundleDependencies { production, development }
}

fn load_dependency_manifest(
    files: &dyn FileAccess,
    resolver: &dyn ManifestResolver,
    name: &str,
) -> Option<Manifest> {
    let path = resolver.resolve(name)?;
    match read_document::<Manifest>(files, &path) {
        Ok(doc) => Some(doc.parsed),
        Err(e) => {
            debug!("Skipping manifest of '{}': {:#}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, collections::HashMap, fs, path::Path};
    use tempfile::TempDir;
    use tsbundle_core::{DiskFiles, NodeModulesResolver};

    fn deps(pairs: &[(&str, &str)]) -> DependencyMap {
        pairs.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect()
    }

    fn manifest(dependencies: &[(&str, &str)], peer: &[(&str, &str)]) -> Manifest {
        Manifest {
            dependencies: deps(dependencies),
            peer_dependencies: deps(peer),
            ..Manifest::default()
        }
    }

    fn registry(entries: Vec<(&str, Manifest)>) -> HashMap<String, Manifest> {
        entries.into_iter().map(|(n, m)| (n.to_string(), m)).collect()
    }

    fn pairs(map: &DependencyMap) -> Vec<(&str, &str)> {
        map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_no_additional_dependencies() {
        let packages = registry(vec![("dep1", manifest(&[], &[])), ("dep2", manifest(&[], &[]))]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0"), ("dep2", "2.0.0")]), |n| {
                packages.get(n).cloned()
            });
        assert_eq!(pairs(&resolved), [("dep1", "1.0.0"), ("dep2", "2.0.0")]);
    }

    #[test]
    fn test_first_discovery_wins() {
        let packages = registry(vec![
            ("dep1", manifest(&[("dep4", "1.0.0")], &[])),
            ("dep2", manifest(&[("dep4", "1.0.1")], &[])),
            ("dep4", manifest(&[], &[])),
        ]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0"), ("dep2", "2.0.0")]), |n| {
                packages.get(n).cloned()
            });
        assert_eq!(pairs(&resolved), [("dep1", "1.0.0"), ("dep2", "2.0.0"), ("dep4", "1.0.0")]);
    }

    #[test]
    fn test_shallow_range_beats_deeper_range() {
        let packages = registry(vec![
            ("dep1", manifest(&[("dep2", "1.0.0"), ("dep3", "2.0.0"), ("dep4", "1.0.0")], &[])),
            ("dep2", manifest(&[("dep3", "1.0.0"), ("dep4", "1.0.0")], &[])),
            ("dep3", manifest(&[("dep4", "2.0.0")], &[])),
            ("dep4", manifest(&[], &[])),
        ]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0")]), |n| packages.get(n).cloned());
        assert_eq!(
            pairs(&resolved),
            [("dep1", "1.0.0"), ("dep2", "1.0.0"), ("dep3", "2.0.0"), ("dep4", "1.0.0")]
        );
    }

    #[test]
    fn test_peer_dependencies_come_before_regular_ones() {
        let packages = registry(vec![
            ("dep1", manifest(&[("dep2", "1.0.0"), ("dep4", "1.0.0")], &[("dep3", "2.0.0")])),
            ("dep2", manifest(&[("dep3", "1.0.0")], &[("dep4", "1.0.0")])),
            ("dep3", manifest(&[("dep4", "2.0.0")], &[])),
            ("dep4", manifest(&[], &[])),
        ]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0")]), |n| packages.get(n).cloned());
        assert_eq!(
            pairs(&resolved),
            [("dep1", "1.0.0"), ("dep3", "2.0.0"), ("dep2", "1.0.0"), ("dep4", "1.0.0")]
        );
    }

    #[test]
    fn test_same_manifest_peer_range_wins_over_regular_range() {
        let packages = registry(vec![(
            "dep1",
            manifest(&[("shared", "^2.0.0")], &[("shared", "^1.0.0")]),
        )]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0")]), |n| packages.get(n).cloned());
        assert_eq!(resolved.get("shared").map(String::as_str), Some("^1.0.0"));
    }

    #[test]
    fn test_cycle_terminates_and_reads_each_manifest_once() {
        let packages = registry(vec![
            ("a", manifest(&[("b", "1.0.0")], &[])),
            ("b", manifest(&[("a", "9.9.9")], &[])),
        ]);
        let lookups = RefCell::new(Vec::new());
        let resolved = resolve_dependencies(&deps(&[("a", "1.0.0")]), |n| {
            lookups.borrow_mut().push(n.to_string());
            packages.get(n).cloned()
        });

        assert_eq!(pairs(&resolved), [("a", "1.0.0"), ("b", "1.0.0")]);
        assert_eq!(*lookups.borrow(), ["a", "b"]);
    }

    #[test]
    fn test_self_dependency() {
        let packages = registry(vec![("a", manifest(&[("a", "2.0.0")], &[]))]);
        let mut count = 0;
        let resolved = resolve_dependencies(&deps(&[("a", "1.0.0")]), |n| {
            count += 1;
            packages.get(n).cloned()
        });
        assert_eq!(pairs(&resolved), [("a", "1.0.0")]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_missing_manifest_is_kept_but_not_expanded() {
        let packages = registry(vec![
            ("dep1", manifest(&[("dep6", "next")], &[])),
            ("dep2", manifest(&[("dep7", "1.0.0")], &[])),
        ]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0"), ("dep2", "2.0.0")]), |n| {
                packages.get(n).cloned()
            });
        assert_eq!(
            pairs(&resolved),
            [("dep1", "1.0.0"), ("dep2", "2.0.0"), ("dep6", "next"), ("dep7", "1.0.0")]
        );
    }

    #[test]
    fn test_dev_dependencies_of_dependencies_are_ignored() {
        let mut dep1 = manifest(&[("dep4", "next")], &[]);
        dep1.dev_dependencies = deps(&[("dep5", "2.0.0")]);
        let packages = registry(vec![("dep1", dep1)]);
        let resolved =
            resolve_dependencies(&deps(&[("dep1", "1.0.0")]), |n| packages.get(n).cloned());
        assert_eq!(pairs(&resolved), [("dep1", "1.0.0"), ("dep4", "next")]);
    }

    #[test]
    fn test_empty_seed() {
        let resolved = resolve_dependencies(&DependencyMap::new(), |_| {
            panic!("nothing to look up");
        });
        assert!(resolved.is_empty());
    }

    fn create_test_file(dir: &Path, path: &str, content: &str) {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    #[test]
    fn test_bundle_passes_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "node_modules/dep1/package.json", r#"{"dependencies":{"dep4":"1.0.0"}}"#);
        create_test_file(root, "node_modules/dep2/package.json", r#"{"dependencies":{"dep4":"1.0.1"}}"#);
        create_test_file(root, "node_modules/dep3/package.json", r#"{"dependencies":{"dep4":"2.0.0"}}"#);
        create_test_file(root, "node_modules/dep4/package.json", "{}");
        create_test_file(root, "node_modules/shared/package.json", r#"{"dependencies":{"leaf":"3.0.0"}}"#);

        let root_manifest: Manifest = serde_json::from_str(
            r#"{
                "dependencies": { "dep1": "1.0.0", "shared": "1.0.0" },
                "peerDependencies": { "dep2": "2.0.0" },
                "devDependencies": { "dep3": "0.1.0", "shared": "1.0.0" }
            }"#,
        )
        .unwrap();

        let files = DiskFiles::new(root).unwrap();
        let resolver = NodeModulesResolver::new(files.root());
        let result = resolve_bundle_dependencies(&root_manifest, &files, &resolver);

        assert_eq!(
            pairs(&result.production),
            [
                ("dep1", "1.0.0"),
                ("shared", "1.0.0"),
                ("dep2", "2.0.0"),
                ("dep4", "1.0.0"),
                ("leaf", "3.0.0")
            ]
        );
        assert_eq!(
            pairs(&result.development),
            [("dep3", "0.1.0"), ("shared", "1.0.0"), ("dep4", "2.0.0"), ("leaf", "3.0.0")]
        );
    }

    #[test]
    fn test_regular_dependency_shadows_peer_in_seed() {
        let temp_dir = TempDir::new().unwrap();
        let root_manifest: Manifest = serde_json::from_str(
            r#"{ "dependencies": { "x": "1.0.0" }, "peerDependencies": { "x": "2.0.0" } }"#,
        )
        .unwrap();

        let files = DiskFiles::new(temp_dir.path()).unwrap();
        let resolver = NodeModulesResolver::new(files.root());
        let result = resolve_bundle_dependencies(&root_manifest, &files, &resolver);
        assert_eq!(pairs(&result.production), [("x", "1.0.0")]);
        assert!(result.development.is_empty());
    }

    #[test]
    fn test_unparsable_dependency_manifest_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "node_modules/broken/package.json", "{ not json");

        let root_manifest: Manifest =
            serde_json::from_str(r#"{ "dependencies": { "broken": "1.0.0" } }"#).unwrap();
        let files = DiskFiles::new(root).unwrap();
        let resolver = NodeModulesResolver::new(files.root());
        let result = resolve_bundle_dependencies(&root_manifest, &files, &resolver);
        assert_eq!(pairs(&result.production), [("broken", "1.0.0")]);
    }
}
