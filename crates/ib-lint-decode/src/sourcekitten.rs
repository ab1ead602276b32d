//! Swift source decoding through SourceKitten's `structure` output.

use ib_lint_core::{DecodeError, DecoderConfig, DeclarationRecord, MemberRecord, SourceDecoder};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const DECL_PREFIX: &str = "source.lang.swift.decl.";
const METHOD_PREFIX: &str = "source.lang.swift.decl.function.method";

/// One node of SourceKitten's structure JSON.
#[derive(Debug, Deserialize)]
struct RawStructure {
    #[serde(rename = "key.kind")]
    kind: Option<String>,
    #[serde(rename = "key.name")]
    name: Option<String>,
    #[serde(rename = "key.nameoffset")]
    name_offset: Option<usize>,
    #[serde(rename = "key.typename")]
    type_name: Option<String>,
    #[serde(rename = "key.inheritedtypes", default)]
    inherited_types: Vec<RawInheritedType>,
    #[serde(rename = "key.attributes", default)]
    attributes: Vec<RawAttribute>,
    #[serde(rename = "key.substructure", default)]
    substructure: Vec<RawStructure>,
}

#[derive(Debug, Deserialize)]
struct RawInheritedType {
    #[serde(rename = "key.name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawAttribute {
    #[serde(rename = "key.attribute")]
    attribute: String,
}

/// Where structure JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureSource {
    /// Run `<program> structure --file <path>` per source file.
    Command {
        /// SourceKitten executable.
        program: PathBuf,
    },
    /// Read `<dir>/<path relative to root>.json`.
    Directory {
        /// Directory holding the JSON files.
        dir: PathBuf,
        /// Project root the source paths are relative to.
        root: PathBuf,
    },
}

/// [`SourceDecoder`] backed by SourceKitten.
#[derive(Debug, Clone)]
pub struct SourceKittenDecoder {
    source: StructureSource,
}

impl SourceKittenDecoder {
    /// Decodes by running the given SourceKitten executable.
    #[must_use]
    pub fn command(program: impl Into<PathBuf>) -> Self {
        Self {
            source: StructureSource::Command {
                program: program.into(),
            },
        }
    }

    /// Decodes from pre-generated JSON files.
    #[must_use]
    pub fn structure_dir(dir: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            source: StructureSource::Directory {
                dir: dir.into(),
                root: root.into(),
            },
        }
    }

    /// Picks the mode from configuration: a configured structure directory
    /// (relative paths resolve against `root`) wins over running the command.
    #[must_use]
    pub fn from_config(config: &DecoderConfig, root: &Path) -> Self {
        match &config.structure_dir {
            Some(dir) => Self::structure_dir(root.join(dir), root),
            None => Self::command(&config.sourcekitten),
        }
    }

    /// Returns where structure JSON is read from.
    #[must_use]
    pub fn source(&self) -> &StructureSource {
        &self.source
    }

    /// Parses structure JSON for `path` into declaration records.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the JSON is malformed.
    pub fn parse(path: &Path, json: &str) -> Result<Vec<DeclarationRecord>, DecodeError> {
        let root: RawStructure = serde_json::from_str(json)
            .map_err(|e| DecodeError::new(path, format!("invalid structure JSON: {e}")))?;

        Ok(root
            .substructure
            .into_iter()
            .filter_map(|raw| declaration(path, raw))
            .collect())
    }

    fn structure_json(&self, path: &Path) -> Result<String, DecodeError> {
        match &self.source {
            StructureSource::Command { program } => {
                debug!("Running {} structure --file {}", program.display(), path.display());
                let output = Command::new(program)
                    .args(["structure", "--file"])
                    .arg(path)
                    .output()
                    .map_err(|e| {
                        DecodeError::new(path, format!("failed to run {}: {e}", program.display()))
                    })?;
                if !output.status.success() {
                    return Err(DecodeError::new(
                        path,
                        format!(
                            "{} exited with {}: {}",
                            program.display(),
                            output.status,
                            String::from_utf8_lossy(&output.stderr).trim()
                        ),
                    ));
                }
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            StructureSource::Directory { dir, root } => {
                let json_path = structure_path(dir, root, path);
                std::fs::read_to_string(&json_path).map_err(|e| {
                    DecodeError::new(path, format!("cannot read {}: {e}", json_path.display()))
                })
            }
        }
    }
}

impl SourceDecoder for SourceKittenDecoder {
    fn decode(&self, path: &Path, _text: &str) -> Result<Vec<DeclarationRecord>, DecodeError> {
        let json = self.structure_json(path)?;
        Self::parse(path, &json)
    }
}

/// `<dir>/<path relative to root>.json`
fn structure_path(dir: &Path, root: &Path, path: &Path) -> PathBuf {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut name = relative.as_os_str().to_owned();
    name.push(".json");
    dir.join(name)
}

fn declaration(path: &Path, raw: RawStructure) -> Option<DeclarationRecord> {
    let kind = normalize_kind(raw.kind.as_deref()?);
    let (Some(name), Some(name_offset)) = (raw.name, raw.name_offset) else {
        debug!("Skipping unnamed {kind} in {}", path.display());
        return None;
    };

    Some(DeclarationRecord {
        kind,
        name,
        name_offset,
        inherited_types: raw.inherited_types.into_iter().map(|t| t.name).collect(),
        members: raw.substructure.into_iter().filter_map(member).collect(),
    })
}

fn member(raw: RawStructure) -> Option<MemberRecord> {
    let name = raw.name?;
    let is_method = raw
        .kind
        .as_deref()
        .is_some_and(|k| k.starts_with(METHOD_PREFIX));

    Some(MemberRecord {
        selector_name: if is_method { objc_selector(&name) } else { None },
        name,
        attributes: raw.attributes.into_iter().map(|a| a.attribute).collect(),
        type_name: raw.type_name,
        name_offset: raw.name_offset,
    })
}

/// Shortens SourceKit declaration kinds.
///
/// `source.lang.swift.decl.class` becomes `class`, every
/// `source.lang.swift.decl.extension*` becomes `extension`.
#[must_use]
pub fn normalize_kind(kind: &str) -> String {
    let short = kind.strip_prefix(DECL_PREFIX).unwrap_or(kind);
    if short.starts_with("extension") {
        "extension".to_string()
    } else {
        short.to_string()
    }
}

/// Derives the Objective-C selector of a Swift method name.
///
/// ```
/// use ib_lint_decode::objc_selector;
///
/// assert_eq!(objc_selector("tap()").as_deref(), Some("tap"));
/// assert_eq!(objc_selector("tap(_:)").as_deref(), Some("tap:"));
/// assert_eq!(objc_selector("tap(_:for:)").as_deref(), Some("tap:for:"));
/// assert_eq!(objc_selector("tap(sender:)").as_deref(), Some("tapWithSender:"));
/// ```
#[must_use]
pub fn objc_selector(name: &str) -> Option<String> {
    let (base, rest) = match name.split_once('(') {
        Some((base, rest)) => (base, rest.strip_suffix(')')?),
        None => (name, ""),
    };
    if base.is_empty() {
        return None;
    }

    let labels: Vec<&str> = rest.split(':').filter(|l| !l.is_empty()).collect();
    let Some((first, others)) = labels.split_first() else {
        return Some(base.to_string());
    };

    let mut selector = base.to_string();
    if *first != "_" {
        selector.push_str("With");
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            selector.extend(c.to_uppercase());
            selector.push_str(chars.as_str());
        }
    }
    selector.push(':');
    for label in others {
        if *label != "_" {
            selector.push_str(label);
        }
        selector.push(':');
    }
    Some(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURE: &str = r#"{
  "key.diagnostic_stage": "source.diagnostic.stage.swift.parse",
  "key.length": 180,
  "key.offset": 0,
  "key.substructure": [
    {
      "key.kind": "source.lang.swift.decl.class",
      "key.name": "LoginViewController",
      "key.nameoffset": 19,
      "key.inheritedtypes": [{ "key.name": "UIViewController" }],
      "key.substructure": [
        {
          "key.kind": "source.lang.swift.decl.var.instance",
          "key.name": "titleLabel",
          "key.nameoffset": 70,
          "key.typename": "UILabel!",
          "key.attributes": [{ "key.attribute": "source.decl.attribute.iboutlet" }]
        },
        {
          "key.kind": "source.lang.swift.decl.function.method.instance",
          "key.name": "login(_:)",
          "key.nameoffset": 120,
          "key.attributes": [{ "key.attribute": "source.decl.attribute.ibaction" }]
        }
      ]
    },
    {
      "key.kind": "source.lang.swift.decl.extension",
      "key.name": "LoginViewController",
      "key.nameoffset": 160
    },
    {
      "key.kind": "source.lang.swift.decl.struct",
      "key.name": "Credentials",
      "key.nameoffset": 170
    },
    { "key.kind": "source.lang.swift.decl.enum" }
  ]
}"#;

    #[test]
    fn parses_declarations_and_members() {
        let records = SourceKittenDecoder::parse(Path::new("Login.swift"), STRUCTURE).unwrap();
        let kinds: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.kind.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            kinds,
            [
                ("class", "LoginViewController"),
                ("extension", "LoginViewController"),
                ("struct", "Credentials"),
            ]
        );

        assert_eq!(records[0].inherited_types, ["UIViewController"]);
        assert!(records[1].inherited_types.is_empty());

        let members = &records[0].members;
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "titleLabel");
        assert_eq!(members[0].type_name.as_deref(), Some("UILabel!"));
        assert_eq!(members[0].selector_name, None);
        assert_eq!(members[0].attributes, ["source.decl.attribute.iboutlet"]);
        assert_eq!(members[1].selector_name.as_deref(), Some("login:"));
        assert_eq!(members[1].name_offset, Some(120));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = SourceKittenDecoder::parse(Path::new("A.swift"), "{ not json").unwrap_err();
        assert!(err.message.starts_with("invalid structure JSON"));
    }

    #[test]
    fn normalizes_kinds() {
        assert_eq!(normalize_kind("source.lang.swift.decl.class"), "class");
        assert_eq!(normalize_kind("source.lang.swift.decl.extension.class"), "extension");
        assert_eq!(normalize_kind("source.lang.swift.decl.protocol"), "protocol");
        assert_eq!(normalize_kind("class"), "class");
    }

    #[test]
    fn selectors() {
        assert_eq!(objc_selector("reset").as_deref(), Some("reset"));
        assert_eq!(objc_selector("pick(_:_:)").as_deref(), Some("pick::"));
        assert_eq!(
            objc_selector("didTap(button:event:)").as_deref(),
            Some("didTapWithButton:event:")
        );
        assert_eq!(objc_selector("broken(_:").as_deref(), None);
        assert_eq!(objc_selector("(_:)").as_deref(), None);
    }

    #[test]
    fn reads_from_structure_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = Path::new("/project");
        let json_dir = dir.path().join("App");
        std::fs::create_dir_all(&json_dir).unwrap();
        std::fs::write(json_dir.join("Login.swift.json"), STRUCTURE).unwrap();

        let decoder = SourceKittenDecoder::structure_dir(dir.path(), root);
        let records = decoder
            .decode(Path::new("/project/App/Login.swift"), "")
            .unwrap();
        assert_eq!(records.len(), 3);

        let err = decoder
            .decode(Path::new("/project/App/Missing.swift"), "")
            .unwrap_err();
        assert!(err.message.contains("Missing.swift.json"));
    }

    #[test]
    fn missing_executable_is_a_decode_error() {
        let decoder = SourceKittenDecoder::command("/nonexistent/sourcekitten");
        assert!(decoder.decode(Path::new("A.swift"), "").is_err());
    }

    #[test]
    fn from_config_prefers_structure_dir() {
        let mut config = DecoderConfig::default();
        assert_eq!(
            SourceKittenDecoder::from_config(&config, Path::new("/p")).source(),
            &StructureSource::Command {
                program: PathBuf::from("sourcekitten")
            }
        );

        config.structure_dir = Some(PathBuf::from("build/structure"));
        assert_eq!(
            SourceKittenDecoder::from_config(&config, Path::new("/p")).source(),
            &StructureSource::Directory {
                dir: PathBuf::from("/p/build/structure"),
                root: PathBuf::from("/p"),
            }
        );
    }
}
