//! Build Configuration - one `[[target]]` per catalog
//!
//! ```toml
//! [[target]]
//! name = "MyApp"
//! catalog = "MyApp/Assets.xcassets"
//! bundle_id = "com.myapp.ios"
//! header = "DerivedSources/GeneratedAssetSymbols.h"
//! swift = "DerivedSources/GeneratedAssetSymbols.swift"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::emit::ArtifactFormat;
use crate::error::{GenerateError, Result};
use crate::pipeline::{GenerateRequest, OutputSpec};
use crate::publish::PublishMode;

pub const DEFAULT_CONFIG_FILE: &str = "assetsymbols.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub catalog: PathBuf,
    pub bundle_id: String,
    #[serde(default)]
    pub header: Option<PathBuf>,
    #[serde(default)]
    pub swift: Option<PathBuf>,
}

impl TargetConfig {
    pub fn outputs(&self) -> Vec<OutputSpec> {
        let mut outputs = vec![];
        if let Some(path) = &self.header {
            outputs.push(OutputSpec::new(ArtifactFormat::Header, path.clone()));
        }
        if let Some(path) = &self.swift {
            outputs.push(OutputSpec::new(ArtifactFormat::Swift, path.clone()));
        }
        outputs
    }

    fn resolve(&mut self, base: &Path) {
        self.catalog = base.join(&self.catalog);
        self.header = self.header.take().map(|p| base.join(p));
        self.swift = self.swift.take().map(|p| base.join(p));
    }
}

impl GeneratorConfig {
    /// Load a config file; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GenerateError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::from_toml_str(&content, base)?;
        tracing::debug!(config = %path.display(), targets = config.targets.len(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self> {
        let mut config: GeneratorConfig = toml::from_str(content)
            .map_err(|e| GenerateError::InvalidConfig(e.to_string()))?;
        for target in &mut config.targets {
            target.resolve(base);
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(GenerateError::InvalidConfig("no targets configured".into()));
        }

        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for target in &self.targets {
            if !names.insert(target.name.as_str()) {
                return Err(GenerateError::InvalidConfig(format!(
                    "duplicate target '{}'",
                    target.name
                )));
            }
            if target.bundle_id.trim().is_empty() {
                return Err(GenerateError::InvalidConfig(format!(
                    "target '{}' has an empty bundle_id",
                    target.name
                )));
            }

            let target_outputs = target.outputs();
            if target_outputs.is_empty() {
                return Err(GenerateError::InvalidConfig(format!(
                    "target '{}' has no outputs (set header and/or swift)",
                    target.name
                )));
            }
            // Each target owns its output paths exclusively
            for output in target_outputs {
                if !outputs.insert(output.path.clone()) {
                    return Err(GenerateError::InvalidConfig(format!(
                        "output {} is claimed by more than one target",
                        output.path.display()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn requests(&self, mode: PublishMode) -> Vec<GenerateRequest> {
        self.targets
            .iter()
            .map(|t| GenerateRequest {
                name: t.name.clone(),
                catalog: t.catalog.clone(),
                bundle_id: t.bundle_id.clone(),
                outputs: t.outputs(),
                mode,
            })
            .collect()
    }
}
