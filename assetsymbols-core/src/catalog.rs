//! Catalog Reader - Asset Catalog Discovery
//!
//! Turns an asset catalog (an `.xcassets` directory tree, or a flat JSON
//! manifest) into a list of resource descriptors. Anything the reader does
//! not understand is an error; a symbol table built from a partially read
//! catalog is worse than none.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, Result};

const CONTENTS_FILE: &str = "Contents.json";

/// Set kinds the catalog editor produces that never yield symbols.
const NON_SYMBOL_KINDS: &[&str] = &[
    "appiconset",
    "launchimage",
    "brandassets",
    "imagestack",
    "dataset",
    "symbolset",
];

/// Container kinds whose children are walked like a plain folder.
const GROUP_KINDS: &[&str] = &["spriteatlas"];

/// How a catalog sub-directory is treated.
#[derive(Debug, PartialEq, Eq)]
enum Entry<'a> {
    /// Folder of further entries; the name is the namespace segment.
    Group(&'a str),
    Set(ResourceKind, &'a str),
    Skipped(&'a str),
    Unsupported(&'a str),
}

/// Classify a directory name. Extensions ending in `set` name typed sets;
/// any other dot (`Onboarding.v2`) is part of a plain group name.
fn classify(file_name: &str) -> Entry<'_> {
    let Some((stem, extension)) = file_name.rsplit_once('.') else {
        return Entry::Group(file_name);
    };

    if let Some(kind) = ResourceKind::from_set_extension(extension) {
        Entry::Set(kind, stem)
    } else if NON_SYMBOL_KINDS.contains(&extension) {
        Entry::Skipped(extension)
    } else if GROUP_KINDS.contains(&extension) {
        Entry::Group(stem)
    } else if extension.ends_with("set") {
        Entry::Unsupported(extension)
    } else {
        Entry::Group(file_name)
    }
}

/// Resource kinds that receive generated symbols.
///
/// Declaration order is the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Color,
    Image,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Color, ResourceKind::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Color => "color",
            ResourceKind::Image => "image",
        }
    }

    /// Directory extension used by the catalog editor for this kind.
    pub fn set_extension(&self) -> &'static str {
        match self {
            ResourceKind::Color => "colorset",
            ResourceKind::Image => "imageset",
        }
    }

    pub fn from_set_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.set_extension() == ext)
    }

    pub fn from_manifest_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    /// Key of the variant array inside a set's Contents.json
    fn variants_key(&self) -> &'static str {
        match self {
            ResourceKind::Color => "colors",
            ResourceKind::Image => "images",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry as discovered by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub logical_name: String,
    /// Number of appearance/scale variants declared for the entry, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<usize>,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, logical_name: impl Into<String>) -> Self {
        Self {
            kind,
            logical_name: logical_name.into(),
            variants: None,
        }
    }

    pub fn color(logical_name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Color, logical_name)
    }

    pub fn image(logical_name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Image, logical_name)
    }

    /// Total order key: kind first, then case-sensitive name.
    pub fn sort_key(&self) -> (ResourceKind, &str) {
        (self.kind, self.logical_name.as_str())
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind, self.logical_name)
    }
}

/// Read a catalog from either a catalog directory or a JSON manifest file.
pub fn read_catalog(path: &Path) -> Result<Vec<ResourceDescriptor>> {
    let descriptors = if path.is_dir() {
        CatalogReader::new(path).read()?
    } else if path.is_file() {
        read_manifest_file(path)?
    } else {
        return Err(GenerateError::malformed(path, "catalog not found"));
    };

    tracing::info!(
        catalog = %path.display(),
        entries = descriptors.len(),
        "catalog read"
    );
    Ok(descriptors)
}

/// Walks an `.xcassets` style directory tree.
pub struct CatalogReader {
    root: PathBuf,
}

impl CatalogReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Descriptors in discovery order (sorted file names, depth first).
    pub fn read(&self) -> Result<Vec<ResourceDescriptor>> {
        let mut descriptors = vec![];
        self.walk(&self.root, "", &mut descriptors)?;
        Ok(descriptors)
    }

    fn walk(&self, dir: &Path, namespace: &str, out: &mut Vec<ResourceDescriptor>) -> Result<()> {
        for path in sorted_children(dir)? {
            if !path.is_dir() {
                continue;
            }

            let file_name = utf8_name(&path)?;
            if file_name.starts_with('.') {
                continue;
            }

            match classify(file_name) {
                Entry::Group(name) => {
                    let child_namespace = if provides_namespace(&path)? {
                        format!("{namespace}{name}/")
                    } else {
                        namespace.to_string()
                    };
                    self.walk(&path, &child_namespace, out)?;
                }
                Entry::Set(kind, stem) => {
                    let contents = read_contents(&path)?
                        .ok_or_else(|| GenerateError::malformed(&path, "missing Contents.json"))?;
                    let variants = contents
                        .get(kind.variants_key())
                        .and_then(Value::as_array)
                        .map(Vec::len);

                    let descriptor = ResourceDescriptor {
                        kind,
                        logical_name: format!("{namespace}{stem}"),
                        variants,
                    };
                    tracing::debug!(%descriptor, "discovered catalog entry");
                    out.push(descriptor);
                }
                Entry::Skipped(kind) => {
                    tracing::debug!(path = %path.display(), kind, "no symbols for kind");
                }
                Entry::Unsupported(kind) => {
                    let kind = kind.to_string();
                    return Err(GenerateError::UnsupportedKind { path, kind });
                }
            }
        }
        Ok(())
    }
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| GenerateError::malformed(dir, e))?;
    let mut children = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| GenerateError::malformed(dir, e))?;
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}

fn utf8_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GenerateError::malformed(path, "entry name is not valid UTF-8"))
}

/// Parse `<dir>/Contents.json`, if present, as a JSON object.
fn read_contents(dir: &Path) -> Result<Option<Map<String, Value>>> {
    let path = dir.join(CONTENTS_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| GenerateError::malformed(&path, e))?;
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(GenerateError::malformed(&path, "expected a JSON object")),
        Err(e) => Err(GenerateError::malformed(&path, e)),
    }
}

fn provides_namespace(group: &Path) -> Result<bool> {
    let contents = read_contents(group)?;
    Ok(contents
        .as_ref()
        .and_then(|c| c.get("properties"))
        .and_then(|p| p.get("provides-namespace"))
        .and_then(Value::as_bool)
        .unwrap_or(false))
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    resources: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    kind: String,
    name: String,
}

/// Flat JSON manifest: `{"resources": [{"kind": "color", "name": "..."}]}`
fn read_manifest_file(path: &Path) -> Result<Vec<ResourceDescriptor>> {
    let content = fs::read_to_string(path).map_err(|e| GenerateError::malformed(path, e))?;
    let manifest: ManifestFile =
        serde_json::from_str(&content).map_err(|e| GenerateError::malformed(path, e))?;

    manifest
        .resources
        .into_iter()
        .map(|entry| {
            let kind = ResourceKind::from_manifest_kind(&entry.kind).ok_or_else(|| {
                GenerateError::UnsupportedKind {
                    path: path.to_path_buf(),
                    kind: entry.kind.clone(),
                }
            })?;
            Ok(ResourceDescriptor::new(kind, entry.name))
        })
        .collect()
}
