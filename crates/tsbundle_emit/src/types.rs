use serde::Serialize;
use serde_json::Value;

use tsbundle_core::{BundleFile, DependencyMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BundleDependencies {
    pub production: DependencyMap,
    pub development: DependencyMap,
}

/// Everything an editor needs to open the project without filesystem access
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBundle {
    pub dependencies: BundleDependencies,
    /// Supporting files that are not exposed for editing: lib files, type
    /// declarations and the manifests they came from
    pub environment_files: Vec<BundleFile>,
    /// Editable project files matched by the `include` patterns
    pub files: Vec<BundleFile>,
    /// Name of the entry file, empty when it was not found
    pub index: String,
    pub package: Value,
    pub tsconfig: Value,
}

impl ProjectBundle {
    pub fn package_name(&self) -> Option<&str> {
        self.package.get("name").and_then(Value::as_str)
    }
}
