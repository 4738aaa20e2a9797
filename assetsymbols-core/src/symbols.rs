//! Symbol Table Builder - Naming and Collision Detection
//!
//! Emission order is fixed by `(kind, logical_name)`, never by catalog file
//! order. Any two distinct entries that would share a generated name abort
//! the build.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::{ResourceDescriptor, ResourceKind};
use crate::error::{GenerateError, Result};
use crate::naming;

/// A generated constant standing in for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// C-family identifier, `<kindPrefix><Fragment>`.
    pub identifier: String,
    /// Member name on the Swift resource type.
    pub swift_name: String,
    pub kind: ResourceKind,
    /// Logical name as authored in the catalog; the constant's value.
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    bundle_identifier: String,
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    /// Build the table for a catalog.
    ///
    /// Exact duplicate entries collapse into one symbol. Distinct entries
    /// whose fragments match (across kinds) fail with `DuplicateSymbol`.
    /// A blank bundle identifier is a configuration error (`InvalidConfig`,
    /// attributed to `Stage::Idle`), not a build failure.
    pub fn build(descriptors: &[ResourceDescriptor], bundle_identifier: &str) -> Result<Self> {
        if bundle_identifier.trim().is_empty() {
            return Err(GenerateError::InvalidConfig(
                "bundle identifier is empty".to_string(),
            ));
        }

        let mut sorted: Vec<&ResourceDescriptor> = descriptors.iter().collect();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        sorted.dedup_by(|a, b| a.sort_key() == b.sort_key());

        let mut symbols: Vec<Symbol> = Vec::with_capacity(sorted.len());
        let mut by_fragment: HashMap<String, usize> = HashMap::new();
        let mut by_swift_name: HashMap<(ResourceKind, String), usize> = HashMap::new();

        for descriptor in &sorted {
            let fragment = naming::fragment(&descriptor.logical_name).ok_or_else(|| {
                GenerateError::UnrepresentableName {
                    kind: descriptor.kind.to_string(),
                    name: descriptor.logical_name.clone(),
                }
            })?;

            let symbol = Symbol {
                identifier: naming::identifier(descriptor.kind, &fragment),
                swift_name: naming::swift_member(descriptor.kind, &fragment),
                kind: descriptor.kind,
                source_name: descriptor.logical_name.clone(),
            };
            let index = symbols.len();

            if let Some(&existing) = by_fragment.get(&fragment) {
                return Err(duplicate(&sorted, &symbols, existing, descriptor, &symbol));
            }
            let swift_key = (symbol.kind, symbol.swift_name.clone());
            if let Some(&existing) = by_swift_name.get(&swift_key) {
                return Err(duplicate(&sorted, &symbols, existing, descriptor, &symbol));
            }

            tracing::trace!(identifier = %symbol.identifier, source = %descriptor, "symbol");
            by_fragment.insert(fragment, index);
            by_swift_name.insert(swift_key, index);
            symbols.push(symbol);
        }

        Ok(Self {
            bundle_identifier: bundle_identifier.to_string(),
            symbols,
        })
    }

    pub fn bundle_identifier(&self) -> &str {
        &self.bundle_identifier
    }

    /// All symbols in emission order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter().filter(move |s| s.kind == kind)
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn duplicate(
    sorted: &[&ResourceDescriptor],
    symbols: &[Symbol],
    existing: usize,
    descriptor: &ResourceDescriptor,
    symbol: &Symbol,
) -> GenerateError {
    // Indices into `symbols` line up with `sorted` until the first failure.
    GenerateError::DuplicateSymbol {
        identifier_a: symbols[existing].identifier.clone(),
        identifier_b: symbol.identifier.clone(),
        source_a: sorted[existing].clone(),
        source_b: descriptor.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifiers(table: &SymbolTable) -> Vec<&str> {
        table.symbols().iter().map(|s| s.identifier.as_str()).collect()
    }

    #[test]
    fn test_orders_by_kind_then_name() {
        let descriptors = vec![
            ResourceDescriptor::image("Zebra"),
            ResourceDescriptor::color("Mint"),
            ResourceDescriptor::image("Apple"),
            ResourceDescriptor::color("AccentColor"),
        ];
        let table = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap();
        assert_eq!(
            identifiers(&table),
            vec![
                "ACColorNameAccentColor",
                "ACColorNameMint",
                "ACImageNameApple",
                "ACImageNameZebra",
            ]
        );
    }

    #[test]
    fn test_case_sensitive_order() {
        let descriptors = vec![ResourceDescriptor::image("apple"), ResourceDescriptor::image("Banana")];
        let table = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap();
        assert_eq!(identifiers(&table), vec!["ACImageNameBanana", "ACImageNameApple"]);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let descriptors = vec![
            ResourceDescriptor::image("Logo"),
            ResourceDescriptor::image("Logo"),
        ];
        let table = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_cross_kind_collision() {
        let descriptors = vec![
            ResourceDescriptor::image("Foo Bar"),
            ResourceDescriptor::color("Foo-Bar"),
        ];
        let err = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap_err();
        match err {
            GenerateError::DuplicateSymbol {
                identifier_a,
                identifier_b,
                source_a,
                source_b,
            } => {
                assert_eq!(identifier_a, "ACColorNameFooBar");
                assert_eq!(identifier_b, "ACImageNameFooBar");
                assert_eq!(source_a, ResourceDescriptor::color("Foo-Bar"));
                assert_eq!(source_b, ResourceDescriptor::image("Foo Bar"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_kind_collision() {
        let descriptors = vec![
            ResourceDescriptor::image("hero_banner"),
            ResourceDescriptor::image("Hero Banner"),
        ];
        let err = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateSymbol { .. }));
    }

    #[test]
    fn test_swift_name_collision() {
        // Fragments differ, but both become `Color.accent`
        let descriptors = vec![
            ResourceDescriptor::color("Accent"),
            ResourceDescriptor::color("AccentColor"),
        ];
        let err = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap_err();
        assert!(err.to_string().contains("ACColorNameAccentColor"));
    }

    #[test]
    fn test_swift_names_may_repeat_across_kinds() {
        let descriptors = vec![
            ResourceDescriptor::color("BrandColor"),
            ResourceDescriptor::image("Brand"),
        ];
        let table = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.symbols().iter().all(|s| s.swift_name == "brand"));
    }

    #[test]
    fn test_unrepresentable_name() {
        let descriptors = vec![ResourceDescriptor::color("!!!")];
        let err = SymbolTable::build(&descriptors, "com.myapp.ios").unwrap_err();
        assert!(matches!(err, GenerateError::UnrepresentableName { .. }));
    }

    #[test]
    fn test_empty_catalog() {
        let table = SymbolTable::build(&[], "com.myapp.ios").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.bundle_identifier(), "com.myapp.ios");
    }

    #[test]
    fn test_empty_bundle_identifier_rejected() {
        let err = SymbolTable::build(&[], "  ").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidConfig(_)));
        assert_eq!(err.stage(), crate::error::Stage::Idle);
    }
}
