//! Generation Pipeline - Single Entry Point
//!
//! Idle -> Reading -> Building -> Emitting -> Done. Any error moves straight
//! to Failed. Every artifact is rendered and staged before the first one is
//! renamed into place, so a failed run publishes nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::{read_catalog, ResourceKind};
use crate::emit::{render, ArtifactFormat};
use crate::error::{GenerateError, Result, Stage};
use crate::hashing::{compute_catalog_hash, compute_job_hash, sha256_hex};
use crate::publish::{stage, PublishMode, PublishedArtifact};
use crate::symbols::SymbolTable;
use crate::GENERATOR_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub format: ArtifactFormat,
    pub path: PathBuf,
}

impl OutputSpec {
    pub fn new(format: ArtifactFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
        }
    }
}

/// One catalog to compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub name: String,
    pub catalog: PathBuf,
    pub bundle_id: String,
    pub outputs: Vec<OutputSpec>,
    #[serde(default)]
    pub mode: PublishMode,
}

impl GenerateRequest {
    pub fn new(name: impl Into<String>, catalog: impl Into<PathBuf>, bundle_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: catalog.into(),
            bundle_id: bundle_id.into(),
            outputs: vec![],
            mode: PublishMode::Write,
        }
    }

    pub fn with_output(mut self, format: ArtifactFormat, path: impl Into<PathBuf>) -> Self {
        self.outputs.push(OutputSpec::new(format, path));
        self
    }

    pub fn with_mode(mut self, mode: PublishMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub name: String,
    pub bundle_id: String,
    pub colors: usize,
    pub images: usize,
    pub catalog_hash: String,
    pub job_hash: String,
    pub generator_version: String,
    pub generated_at: DateTime<Utc>,
    pub artifacts: Vec<PublishedArtifact>,
}

impl GenerationReport {
    /// Any artifact differed from what was on disk.
    pub fn has_changes(&self) -> bool {
        self.artifacts.iter().any(|a| a.changed)
    }
}

/// The generation pipeline. Holds no state between runs.
#[derive(Debug, Default)]
pub struct GenerationPipeline;

impl GenerationPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Read and build only; nothing is emitted.
    pub fn symbol_table(&self, catalog: &Path, bundle_id: &str) -> Result<SymbolTable> {
        let descriptors = read_catalog(catalog)?;
        SymbolTable::build(&descriptors, bundle_id)
    }

    /// Compile one catalog and publish its artifacts.
    pub fn run(&self, request: &GenerateRequest) -> Result<GenerationReport> {
        let span = tracing::info_span!("generate", target = %request.name);
        let _guard = span.enter();

        match self.execute(request) {
            Ok(report) => {
                tracing::info!(
                    stage = %Stage::Done,
                    colors = report.colors,
                    images = report.images,
                    changed = report.has_changes(),
                    "generation complete"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(stage = %Stage::Failed, failed_in = %e.stage(), error = %e, "generation failed");
                Err(e)
            }
        }
    }

    fn execute(&self, request: &GenerateRequest) -> Result<GenerationReport> {
        if request.outputs.is_empty() {
            return Err(GenerateError::InvalidConfig(format!(
                "target '{}' has no outputs",
                request.name
            )));
        }

        tracing::info!(stage = %Stage::Reading, catalog = %request.catalog.display());
        let descriptors = read_catalog(&request.catalog)?;

        tracing::info!(stage = %Stage::Building, entries = descriptors.len());
        let table = SymbolTable::build(&descriptors, &request.bundle_id)?;

        tracing::info!(stage = %Stage::Emitting, symbols = table.len());
        let rendered: Vec<(&OutputSpec, String)> = request
            .outputs
            .iter()
            .map(|output| (output, render(&table, output.format)))
            .collect();

        let catalog_hash = compute_catalog_hash(&descriptors)?;

        // Stage every output before renaming any, so a failure leaves all
        // destinations untouched.
        let mut staged = Vec::with_capacity(rendered.len());
        for (output, content) in &rendered {
            staged.push(stage(&output.path, content, request.mode)?);
        }

        let mut artifacts = Vec::with_capacity(rendered.len());
        for ((output, content), artifact) in rendered.iter().zip(staged) {
            let changed = artifact.commit()?;
            artifacts.push(PublishedArtifact {
                path: output.path.clone(),
                format: output.format,
                hash: sha256_hex(content.as_bytes()),
                bytes: content.len(),
                changed,
            });
        }

        let formats: Vec<_> = request.outputs.iter().map(|o| o.format).collect();
        let job_hash = compute_job_hash(&catalog_hash, &request.bundle_id, &formats, GENERATOR_VERSION);

        Ok(GenerationReport {
            name: request.name.clone(),
            bundle_id: request.bundle_id.clone(),
            colors: table.count(ResourceKind::Color),
            images: table.count(ResourceKind::Image),
            catalog_hash,
            job_hash,
            generator_version: GENERATOR_VERSION.to_string(),
            generated_at: Utc::now(),
            artifacts,
        })
    }

    /// Compile independent targets in parallel, one result per request in
    /// input order. A failing target does not stop the others.
    pub fn run_all(&self, requests: &[GenerateRequest]) -> Vec<Result<GenerationReport>> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .map(|request| scope.spawn(move || self.run(request)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }
}
