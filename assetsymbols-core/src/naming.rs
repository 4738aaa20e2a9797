//! Naming Policy - catalog names to identifiers
//!
//! The prefixes below are part of the generated interface. Renaming any of
//! them breaks every consumer of the generated constants.

use crate::catalog::ResourceKind;

/// Generator-reserved name of the bundle identifier constant.
pub const BUNDLE_ID_SYMBOL: &str = "ACBundleID";

/// Fixed per-kind identifier prefix.
pub fn kind_prefix(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Color => "ACColorName",
        ResourceKind::Image => "ACImageName",
    }
}

/// Suffix dropped from Swift member names (`AccentColor` -> `accent`).
fn kind_suffix(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Color => "Color",
        ResourceKind::Image => "Image",
    }
}

const SWIFT_KEYWORDS: &[&str] = &[
    "as", "associatedtype", "break", "case", "catch", "class", "continue", "default", "defer",
    "deinit", "do", "else", "enum", "extension", "fallthrough", "false", "fileprivate", "for",
    "func", "guard", "if", "import", "in", "init", "inout", "internal", "is", "let", "nil",
    "open", "operator", "private", "protocol", "public", "repeat", "rethrows", "return", "self",
    "static", "struct", "subscript", "super", "switch", "throw", "throws", "true", "try",
    "typealias", "var", "where", "while",
];

/// Sanitized, upper-camel-cased identifier fragment for a logical name.
///
/// Every character outside `[A-Za-z0-9]` is a word separator and is dropped.
/// The first character of each word is upper-cased; the rest of the word is
/// kept as written. Returns `None` when nothing representable remains.
pub fn fragment(logical_name: &str) -> Option<String> {
    let mut out = String::with_capacity(logical_name.len());
    for word in logical_name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Full C-family identifier: `<kindPrefix><Fragment>`.
pub fn identifier(kind: ResourceKind, fragment: &str) -> String {
    format!("{}{}", kind_prefix(kind), fragment)
}

/// Swift member name derived from a fragment.
pub fn swift_member(kind: ResourceKind, fragment: &str) -> String {
    let suffix = kind_suffix(kind);
    let base = match fragment.strip_suffix(suffix) {
        Some(rest) if !rest.is_empty() => rest,
        _ => fragment,
    };

    let name = lower_leading_word(base);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else if SWIFT_KEYWORDS.contains(&name.as_str()) {
        format!("`{name}`")
    } else {
        name
    }
}

/// Lower-case the leading capital run, keeping the last capital of an
/// acronym that starts the next word (`URLBanner` -> `urlBanner`).
fn lower_leading_word(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let run = chars.iter().take_while(|c| c.is_ascii_uppercase()).count();

    let lower_count = match run {
        0 => 0,
        n if n == chars.len() => n,
        1 => 1,
        n if chars[n].is_ascii_lowercase() => n - 1,
        n => n,
    };

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < lower_count { c.to_ascii_lowercase() } else { *c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_preserves_camel_humps() {
        assert_eq!(fragment("AccentColor").as_deref(), Some("AccentColor"));
        assert_eq!(fragment("OnboardingRoutine1").as_deref(), Some("OnboardingRoutine1"));
    }

    #[test]
    fn test_fragment_word_boundaries() {
        assert_eq!(fragment("Foo Bar").as_deref(), Some("FooBar"));
        assert_eq!(fragment("Foo-Bar").as_deref(), Some("FooBar"));
        assert_eq!(fragment("foo_bar baz").as_deref(), Some("FooBarBaz"));
        assert_eq!(fragment("Icons/star.fill").as_deref(), Some("IconsStarFill"));
        assert_eq!(fragment("  padded  ").as_deref(), Some("Padded"));
    }

    #[test]
    fn test_fragment_drops_non_ascii() {
        assert_eq!(fragment("Café Noir").as_deref(), Some("CafNoir"));
    }

    #[test]
    fn test_fragment_leading_digit() {
        assert_eq!(fragment("2x Logo").as_deref(), Some("2xLogo"));
        assert_eq!(identifier(ResourceKind::Image, "2xLogo"), "ACImageName2xLogo");
    }

    #[test]
    fn test_fragment_unrepresentable() {
        assert_eq!(fragment(""), None);
        assert_eq!(fragment("---"), None);
        assert_eq!(fragment("☀️"), None);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(identifier(ResourceKind::Color, "AccentColor"), "ACColorNameAccentColor");
        assert_eq!(
            identifier(ResourceKind::Image, "OnboardingScanning"),
            "ACImageNameOnboardingScanning"
        );
    }

    #[test]
    fn test_swift_member_strips_kind_suffix() {
        assert_eq!(swift_member(ResourceKind::Color, "AccentColor"), "accent");
        assert_eq!(swift_member(ResourceKind::Color, "Color"), "color");
        assert_eq!(swift_member(ResourceKind::Image, "HeroImage"), "hero");
        assert_eq!(swift_member(ResourceKind::Image, "AccentColor"), "accentColor");
    }

    #[test]
    fn test_swift_member_casing_and_escaping() {
        assert_eq!(
            swift_member(ResourceKind::Image, "OnboardingRoutine1"),
            "onboardingRoutine1"
        );
        assert_eq!(swift_member(ResourceKind::Image, "URLBanner"), "urlBanner");
        assert_eq!(swift_member(ResourceKind::Image, "URL"), "url");
        assert_eq!(swift_member(ResourceKind::Image, "2xLogo"), "_2xLogo");
        assert_eq!(swift_member(ResourceKind::Image, "Default"), "`default`");
    }
}
