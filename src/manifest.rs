//! Reading and writing the version of a project manifest.
//!
//! Two manifest kinds are understood: `Cargo.toml` (the `[package]` or
//! `[workspace.package]` version) and JSON manifests such as `package.json`
//! (the top-level `version` key). Only the version value is replaced; key
//! order, comments (TOML) and indentation (JSON) are kept.

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Value};

/// Manifest flavor, detected from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `package.json` and other JSON manifests
    Npm,
    /// `Cargo.toml`
    Cargo,
}

impl ManifestKind {
    /// `Cargo.toml` is a Cargo manifest; anything else is treated as JSON.
    pub fn detect(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("Cargo.toml") => ManifestKind::Cargo,
            _ => ManifestKind::Npm,
        }
    }

    /// Command suggested to the user once the release is tagged
    pub fn publish_hint(&self, version: &Version) -> String {
        match self {
            ManifestKind::Npm => format!("yarn publish --new-version {}", version),
            // cargo reads the version from the manifest itself
            ManifestKind::Cargo => "cargo publish".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum Document {
    Json {
        value: serde_json::Value,
        indent: String,
        trailing_newline: bool,
    },
    Toml(DocumentMut),
}

/// A loaded manifest whose version can be read and replaced
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    kind: ManifestKind,
    document: Document,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)
            .map_err(|e| ReleaseError::manifest(format!("cannot read manifest: {}", e), &path))?;
        Self::parse(path, &content)
    }

    /// Parse manifest content as if it had been read from `path`.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let kind = ManifestKind::detect(&path);

        let document = match kind {
            ManifestKind::Npm => {
                let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
                    ReleaseError::manifest(format!("invalid JSON: {}", e), &path)
                })?;
                if !value.is_object() {
                    return Err(ReleaseError::manifest(
                        "top-level JSON value must be an object",
                        &path,
                    ));
                }
                Document::Json {
                    value,
                    indent: detect_indent(content),
                    trailing_newline: content.ends_with('\n'),
                }
            }
            ManifestKind::Cargo => {
                let doc = content.parse::<DocumentMut>().map_err(|e| {
                    ReleaseError::manifest(format!("invalid TOML: {}", e), &path)
                })?;
                Document::Toml(doc)
            }
        };

        Ok(Manifest {
            path,
            kind,
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    /// The declared version string, if the manifest has one
    pub fn version_str(&self) -> Option<&str> {
        match &self.document {
            Document::Json { value, .. } => value.get("version").and_then(|v| v.as_str()),
            Document::Toml(doc) => cargo_version_item(doc).and_then(|item| item.as_str()),
        }
    }

    /// The declared version, parsed.
    ///
    /// `Ok(None)` when no version is declared; an error when the declared
    /// version is not `major.minor.patch` with integer components.
    pub fn version(&self) -> Result<Option<Version>> {
        self.version_str().map(Version::parse).transpose()
    }

    /// Replace the declared version, adding it if absent.
    pub fn set_version(&mut self, version: &Version) -> Result<()> {
        let rendered = version.to_string();
        match &mut self.document {
            Document::Json { value, .. } => {
                let object = value.as_object_mut().ok_or_else(|| {
                    ReleaseError::manifest("top-level JSON value must be an object", &self.path)
                })?;
                object.insert("version".to_string(), serde_json::Value::String(rendered));
            }
            Document::Toml(doc) => set_cargo_version(doc, &rendered, &self.path)?,
        }
        tracing::debug!(path = %self.path.display(), %version, "manifest version updated");
        Ok(())
    }

    /// Serialize the manifest in the style it was read in.
    pub fn render(&self) -> Result<String> {
        match &self.document {
            Document::Json {
                value,
                indent,
                trailing_newline,
            } => {
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                value.serialize(&mut serializer)?;
                let mut rendered = String::from_utf8(out).map_err(|e| {
                    ReleaseError::manifest(format!("non UTF-8 output: {}", e), &self.path)
                })?;
                if *trailing_newline {
                    rendered.push('\n');
                }
                Ok(rendered)
            }
            Document::Toml(doc) => Ok(doc.to_string()),
        }
    }

    /// Write the manifest back to its path.
    pub fn save(&self) -> Result<()> {
        let rendered = self.render()?;
        fs::write(&self.path, rendered).map_err(|e| {
            ReleaseError::manifest(format!("cannot write manifest: {}", e), &self.path)
        })?;
        tracing::info!(path = %self.path.display(), "manifest written");
        Ok(())
    }
}

/// `[package].version` when it is a literal, else `[workspace.package].version`.
fn cargo_version_item(doc: &DocumentMut) -> Option<&Item> {
    let package = doc
        .get("package")
        .and_then(|p| p.get("version"))
        .filter(|v| v.is_str());
    package.or_else(|| {
        doc.get("workspace")
            .and_then(|w| w.get("package"))
            .and_then(|p| p.get("version"))
            .filter(|v| v.is_str())
    })
}

fn set_cargo_version(doc: &mut DocumentMut, version: &str, path: &Path) -> Result<()> {
    let package_literal = doc
        .get("package")
        .and_then(|p| p.get("version"))
        .is_some_and(|v| v.is_str());
    let workspace_literal = doc
        .get("workspace")
        .and_then(|w| w.get("package"))
        .and_then(|p| p.get("version"))
        .is_some_and(|v| v.is_str());

    let table = if package_literal || (!workspace_literal && doc.contains_key("package")) {
        doc.get_mut("package")
    } else if workspace_literal {
        doc.get_mut("workspace").and_then(|w| w.get_mut("package"))
    } else {
        None
    };

    let table = table
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| ReleaseError::manifest("no [package] table to hold a version", path))?;

    match table.get_mut("version").and_then(Item::as_value_mut) {
        Some(value) if value.is_str() => {
            let decor = value.decor().clone();
            *value = Value::from(version);
            *value.decor_mut() = decor;
        }
        _ => {
            table.insert("version", toml_edit::value(version));
        }
    }
    Ok(())
}

/// Indentation unit of a pretty-printed JSON document; two spaces by default.
fn detect_indent(content: &str) -> String {
    content
        .lines()
        .skip(1)
        .find_map(|line| {
            let indent: String = line
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
            (!indent.is_empty() && indent.len() < line.len()).then_some(indent)
        })
        .unwrap_or_else(|| "  ".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE_JSON: &str = r#"{
  "name": "demo",
  "version": "0.1.0",
  "scripts": {
    "build": "tsc"
  },
  "license": "MIT"
}
"#;

    #[test]
    fn test_detect_kind() {
        assert_eq!(ManifestKind::detect(Path::new("Cargo.toml")), ManifestKind::Cargo);
        assert_eq!(
            ManifestKind::detect(Path::new("crates/x/Cargo.toml")),
            ManifestKind::Cargo
        );
        assert_eq!(ManifestKind::detect(Path::new("package.json")), ManifestKind::Npm);
    }

    #[test]
    fn test_json_version() {
        let manifest = Manifest::parse("package.json", PACKAGE_JSON).unwrap();
        assert_eq!(manifest.version_str(), Some("0.1.0"));
        assert_eq!(manifest.version().unwrap(), Some(Version::new(0, 1, 0)));
    }

    #[test]
    fn test_json_set_version_keeps_layout() {
        let mut manifest = Manifest::parse("package.json", PACKAGE_JSON).unwrap();
        manifest.set_version(&Version::new(0, 2, 0)).unwrap();
        assert_eq!(
            manifest.render().unwrap(),
            PACKAGE_JSON.replace("\"0.1.0\"", "\"0.2.0\"")
        );
    }

    #[test]
    fn test_json_keeps_four_space_indent() {
        let content = "{\n    \"name\": \"demo\",\n    \"version\": \"1.0.0\"\n}";
        let mut manifest = Manifest::parse("package.json", content).unwrap();
        manifest.set_version(&Version::new(1, 0, 1)).unwrap();
        assert_eq!(
            manifest.render().unwrap(),
            "{\n    \"name\": \"demo\",\n    \"version\": \"1.0.1\"\n}"
        );
    }

    #[test]
    fn test_json_without_version() {
        let mut manifest = Manifest::parse("package.json", "{\n  \"name\": \"demo\"\n}\n").unwrap();
        assert_eq!(manifest.version().unwrap(), None);
        manifest.set_version(&Version::new(0, 0, 1)).unwrap();
        assert_eq!(manifest.version_str(), Some("0.0.1"));
    }

    #[test]
    fn test_json_invalid_version_is_error() {
        let manifest =
            Manifest::parse("package.json", r#"{ "version": "1.two.3" }"#).unwrap();
        assert!(matches!(
            manifest.version(),
            Err(ReleaseError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_json_must_be_object() {
        assert!(Manifest::parse("package.json", "[1, 2]").is_err());
        assert!(Manifest::parse("package.json", "{ not json").is_err());
    }

    #[test]
    fn test_cargo_package_version_keeps_comments() {
        let content = r#"# project manifest
[package]
name = "demo"
version = "1.4.2" # bumped by release
edition = "2021"

[dependencies]
serde = "1"
"#;
        let mut manifest = Manifest::parse("Cargo.toml", content).unwrap();
        assert_eq!(manifest.version().unwrap(), Some(Version::new(1, 4, 2)));

        manifest.set_version(&Version::new(1, 5, 0)).unwrap();
        assert_eq!(
            manifest.render().unwrap(),
            content.replace("\"1.4.2\"", "\"1.5.0\"")
        );
    }

    #[test]
    fn test_cargo_workspace_version() {
        let content = r#"[workspace]
members = ["crates/*"]

[workspace.package]
version = "0.3.0"
edition = "2021"

[package]
name = "root"
version.workspace = true
"#;
        let mut manifest = Manifest::parse("Cargo.toml", content).unwrap();
        assert_eq!(manifest.version_str(), Some("0.3.0"));

        manifest.set_version(&Version::new(0, 3, 1)).unwrap();
        let rendered = manifest.render().unwrap();
        assert!(rendered.contains("version = \"0.3.1\""));
        assert!(rendered.contains("version.workspace = true"));
    }

    #[test]
    fn test_cargo_without_package_table() {
        let mut manifest = Manifest::parse("Cargo.toml", "[dependencies]\n").unwrap();
        assert_eq!(manifest.version().unwrap(), None);
        assert!(manifest.set_version(&Version::new(1, 0, 0)).is_err());
    }

    #[test]
    fn test_open_and_save_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, PACKAGE_JSON).unwrap();

        let mut manifest = Manifest::open(&path).unwrap();
        manifest.set_version(&Version::new(0, 1, 1)).unwrap();
        manifest.save().unwrap();

        let reopened = Manifest::open(&path).unwrap();
        assert_eq!(reopened.version().unwrap(), Some(Version::new(0, 1, 1)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Manifest::open("/nonexistent/package.json").unwrap_err();
        assert!(matches!(err, ReleaseError::Manifest { .. }));
    }

    #[test]
    fn test_publish_hint() {
        let v = Version::new(1, 2, 3);
        assert_eq!(
            ManifestKind::Npm.publish_hint(&v),
            format!("yarn publish --new-version {}", v)
        );
        assert!(ManifestKind::Cargo.publish_hint(&v).contains("cargo publish"));
    }
}
