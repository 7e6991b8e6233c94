use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Package name to version range, in discovery order
pub type DependencyMap = IndexMap<String, String>;

/// Semantic kind of a bundled file.
///
/// Serialized as a numeric code starting at 1, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    TypeScriptSource,
    TypeDeclaration,
    LibDeclaration,
    JavaScript,
    Css,
    Html,
    Markdown,
    Json,
    Xml,
    SourceMap,
    PlainText,
}

impl FileKind {
    pub fn code(self) -> u8 {
        match self {
            FileKind::TypeScriptSource => 1,
            FileKind::TypeDeclaration => 2,
            FileKind::LibDeclaration => 3,
            FileKind::JavaScript => 4,
            FileKind::Css => 5,
            FileKind::Html => 6,
            FileKind::Markdown => 7,
            FileKind::Json => 8,
            FileKind::Xml => 9,
            FileKind::SourceMap => 10,
            FileKind::PlainText => 11,
        }
    }
}

impl Serialize for FileKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleFile {
    pub name: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

impl BundleFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>, kind: FileKind) -> Self {
        Self { name: name.into(), text: text.into(), kind }
    }
}

/// The subset of `package.json` the bundler consumes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: DependencyMap,
    #[serde(default)]
    pub dev_dependencies: DependencyMap,
    #[serde(default)]
    pub peer_dependencies: DependencyMap,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub typings: Option<String>,
}

impl Manifest {
    /// Declared type entry, `typings` taking precedence over `types`
    pub fn type_entry(&self) -> Option<&str> {
        self.typings.as_deref().or(self.types.as_deref())
    }
}

/// The subset of `tsconfig.json` the bundler consumes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    #[serde(default)]
    pub compiler_options: CompilerOptions,
    #[serde(default)]
    pub include: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompilerOptions {
    #[serde(default)]
    pub lib: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}
