//! AssetSymbols Core - Asset Symbol Compiler
//!
//! Compiles an asset catalog into constants that name its colors and images,
//! so application code refers to resources by checked symbol instead of by
//! string.
//!
//! # Guarantees
//! 1. Deterministic Output: same catalog, same bytes
//! 2. Unique Symbols: a collision aborts the build
//! 3. Stable Order: `(kind, name)`, never file order
//! 4. No Partial Artifacts: render everything, then publish atomically

pub mod catalog;
pub mod config;
pub mod emit;
pub mod error;
pub mod hashing;
pub mod naming;
pub mod pipeline;
pub mod publish;
pub mod symbols;

pub use catalog::{read_catalog, CatalogReader, ResourceDescriptor, ResourceKind};
pub use config::{GeneratorConfig, TargetConfig};
pub use emit::{render, ArtifactFormat, Emitter};
pub use error::{GenerateError, Stage};
pub use hashing::{canonical_json, compute_catalog_hash, compute_job_hash};
pub use pipeline::{GenerateRequest, GenerationPipeline, GenerationReport, OutputSpec};
pub use publish::{PublishMode, PublishedArtifact, StagedArtifact};
pub use symbols::{Symbol, SymbolTable};

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
