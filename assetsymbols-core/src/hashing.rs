//! Hashing System - SHA-256 for Catalogs and Artifacts
//!
//! Provides deterministic hashes so build systems can tell whether a
//! regeneration changed anything.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::catalog::ResourceDescriptor;
use crate::emit::ArtifactFormat;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Hash of a catalog's contents, independent of discovery order.
pub fn compute_catalog_hash(descriptors: &[ResourceDescriptor]) -> Result<String, serde_json::Error> {
    let mut sorted: Vec<&ResourceDescriptor> = descriptors.iter().collect();
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then(a.variants.cmp(&b.variants)));
    let canonical = canonical_json(&sorted)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Hash of everything that determines the generated output.
/// job_hash = sha256(catalog_hash + bundle_id + formats + generator_version)
pub fn compute_job_hash(
    catalog_hash: &str,
    bundle_id: &str,
    formats: &[ArtifactFormat],
    generator_version: &str,
) -> String {
    let formats: Vec<_> = formats.iter().map(ArtifactFormat::as_str).collect();
    let combined = format!(
        "{}:{}:{}:{}",
        catalog_hash,
        bundle_id,
        formats.join(","),
        generator_version
    );
    sha256_hex(combined.as_bytes())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
