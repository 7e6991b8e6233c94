use std::path::Path;

use crate::types::FileKind;

/// Classify a file by its extension.
///
/// Lib declarations share the `.d.ts` suffix with ordinary declarations, so
/// callers tag those explicitly.
pub fn classify(name: &str) -> FileKind {
    let ext = Path::new(name).extension().and_then(|e| e.to_str());
    match ext {
        Some("ts") if name.ends_with(".d.ts") => FileKind::TypeDeclaration,
        Some("ts") => FileKind::TypeScriptSource,
        Some("html") => FileKind::Html,
        Some("css") => FileKind::Css,
        Some("json") => FileKind::Json,
        Some("xml") => FileKind::Xml,
        Some("md") => FileKind::Markdown,
        _ => FileKind::PlainText,
    }
}
