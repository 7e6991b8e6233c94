use anyhow::{Context, Result};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use crate::files::FileAccess;

/// A JSON document kept both verbatim and as a typed view
#[derive(Debug, Clone)]
pub struct Document<T> {
    pub raw: Value,
    pub parsed: T,
}

/// Read and parse a JSON configuration file through `files`.
///
/// Comments and trailing commas are tolerated, since `tsconfig.json` allows both.
pub fn read_document<T: DeserializeOwned>(files: &dyn FileAccess, path: &Path) -> Result<Document<T>> {
    debug!("Reading JSON document: {}", path.display());
    let text = files.read(path)?;
    parse_document(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_document<T: DeserializeOwned>(text: &str) -> Result<Document<T>> {
    let raw: Value = serde_json::from_str(&strip_json_comments(text))?;
    let parsed = serde_json::from_value(raw.clone())?;
    Ok(Document { raw, parsed })
}

/// Remove `//` and `/* */` comments and trailing commas outside of string literals
pub fn strip_json_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                trace!("Stripping line comment");
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                trace!("Stripping block comment");
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
            }
            '}' | ']' => {
                // Drop a dangling comma before the closing bracket
                let trimmed = out.trim_end().len();
                if out[..trimmed].ends_with(',') {
                    out.truncate(trimmed - 1);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}
