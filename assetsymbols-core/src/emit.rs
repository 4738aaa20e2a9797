//! Emitters - Symbol Table to Source Text
//!
//! Rendering is pure: the same table always yields the same bytes. Nothing
//! here touches the file system (see `publish`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::ResourceKind;
use crate::naming::BUNDLE_ID_SYMBOL;
use crate::symbols::{Symbol, SymbolTable};

/// Name of the internal-visibility directive in the header.
const VISIBILITY_MACRO: &str = "AC_SWIFT_PRIVATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Objective-C header with `static NSString * const` declarations
    Header,
    /// Swift `ColorResource` / `ImageResource` symbols
    Swift,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Header => "header",
            ArtifactFormat::Swift => "swift",
        }
    }

    pub fn emitter(&self) -> Box<dyn Emitter> {
        match self {
            ArtifactFormat::Header => Box::new(HeaderEmitter),
            ArtifactFormat::Swift => Box::new(SwiftEmitter),
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitter trait - renders a complete artifact
pub trait Emitter {
    fn format(&self) -> ArtifactFormat;
    fn render(&self, table: &SymbolTable) -> String;
}

/// Render a table in the given format.
pub fn render(table: &SymbolTable, format: ArtifactFormat) -> String {
    format.emitter().render(table)
}

// --- Objective-C header ---

pub struct HeaderEmitter;

impl Emitter for HeaderEmitter {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Header
    }

    fn render(&self, table: &SymbolTable) -> String {
        let mut out = String::new();
        out.push_str("#import <Foundation/Foundation.h>\n\n");
        out.push_str("#if __has_attribute(swift_private)\n");
        out.push_str(&format!(
            "#define {VISIBILITY_MACRO} __attribute__((swift_private))\n"
        ));
        out.push_str("#else\n");
        out.push_str(&format!("#define {VISIBILITY_MACRO}\n"));
        out.push_str("#endif\n\n");

        out.push_str("/// The resource bundle ID.\n");
        push_constant(&mut out, BUNDLE_ID_SYMBOL, table.bundle_identifier());

        for symbol in table.symbols() {
            out.push_str(&format!(
                "/// The \"{}\" asset catalog {} resource.\n",
                escape_c(&symbol.source_name),
                symbol.kind
            ));
            push_constant(&mut out, &symbol.identifier, &symbol.source_name);
        }

        out.push_str(&format!("#undef {VISIBILITY_MACRO}\n"));
        out
    }
}

fn push_constant(out: &mut String, identifier: &str, value: &str) {
    out.push_str(&format!(
        "static NSString * const {identifier} {VISIBILITY_MACRO} = @\"{}\";\n\n",
        escape_c(value)
    ));
}

/// Escape for an Objective-C string literal. Control characters use octal
/// escapes, which unlike `\x` cannot swallow following characters.
fn escape_c(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

// --- Swift resource symbols ---

pub struct SwiftEmitter;

const SWIFT_PREAMBLE: &str = r#"import Foundation
#if canImport(AppKit)
import AppKit
#endif
#if canImport(UIKit)
import UIKit
#endif
#if canImport(SwiftUI)
import SwiftUI
#endif
#if canImport(DeveloperToolsSupport)
import DeveloperToolsSupport
#endif

#if SWIFT_PACKAGE
private let resourceBundle = Foundation.Bundle.module
#else
private class ResourceBundleClass {}
private let resourceBundle = Foundation.Bundle(for: ResourceBundleClass.self)
#endif

"#;

const AVAILABLE_ALL: &str = "@available(iOS 17.0, macOS 14.0, tvOS 17.0, watchOS 10.0, *)\n";
const AVAILABLE_APPKIT: &str = "@available(macOS 14.0, *)\n@available(macCatalyst, unavailable)\n";
const AVAILABLE_UIKIT: &str = "@available(iOS 17.0, tvOS 17.0, *)\n@available(watchOS, unavailable)\n";

impl Emitter for SwiftEmitter {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Swift
    }

    fn render(&self, table: &SymbolTable) -> String {
        let colors: Vec<&Symbol> = table.of_kind(ResourceKind::Color).collect();
        let images: Vec<&Symbol> = table.of_kind(ResourceKind::Image).collect();

        let mut out = String::from(SWIFT_PREAMBLE);

        if !colors.is_empty() {
            push_resource_section(&mut out, "Color Symbols", "ColorResource", &colors);
        }
        if !images.is_empty() {
            push_resource_section(&mut out, "Image Symbols", "ImageResource", &images);
        }

        if !colors.is_empty() {
            out.push_str("// MARK: - Color Symbol Extensions -\n\n");
            push_platform_extension(&mut out, Platform::AppKit, "AppKit.NSColor", &colors);
            push_platform_extension(&mut out, Platform::UIKit, "UIKit.UIColor", &colors);

            out.push_str("#if canImport(SwiftUI)\n");
            push_swiftui_extension(&mut out, "extension SwiftUI.Color {", &colors);
            out.push('\n');
            push_swiftui_extension(
                &mut out,
                "extension SwiftUI.ShapeStyle where Self == SwiftUI.Color {",
                &colors,
            );
            out.push_str("#endif\n\n");
        }

        if !images.is_empty() {
            out.push_str("// MARK: - Image Symbol Extensions -\n\n");
            push_platform_extension(&mut out, Platform::AppKit, "AppKit.NSImage", &images);
            push_platform_extension(&mut out, Platform::UIKit, "UIKit.UIImage", &images);
        }

        out.push_str(SWIFT_THINNABLE_SUPPORT);
        out
    }
}

fn push_resource_section(out: &mut String, title: &str, resource_type: &str, symbols: &[&Symbol]) {
    out.push_str(&format!("// MARK: - {title} -\n\n"));
    out.push_str(AVAILABLE_ALL);
    out.push_str(&format!("extension DeveloperToolsSupport.{resource_type} {{\n\n"));
    for symbol in symbols {
        let name = escape_swift(&symbol.source_name);
        out.push_str(&format!(
            "    /// The \"{name}\" asset catalog {} resource.\n",
            symbol.kind
        ));
        out.push_str(&format!(
            "    static let {} = DeveloperToolsSupport.{resource_type}(name: \"{name}\", bundle: resourceBundle)\n\n",
            symbol.swift_name
        ));
    }
    out.push_str("}\n\n");
}

#[derive(Clone, Copy)]
enum Platform {
    AppKit,
    UIKit,
}

impl Platform {
    fn module(&self) -> &'static str {
        match self {
            Platform::AppKit => "AppKit",
            Platform::UIKit => "UIKit",
        }
    }

    fn availability(&self) -> &'static str {
        match self {
            Platform::AppKit => AVAILABLE_APPKIT,
            Platform::UIKit => AVAILABLE_UIKIT,
        }
    }

    /// Condition under which the resource initializer exists.
    fn resource_condition(&self) -> &'static str {
        match self {
            Platform::AppKit => "!targetEnvironment(macCatalyst)",
            Platform::UIKit => "!os(watchOS)",
        }
    }
}

fn push_platform_extension(out: &mut String, platform: Platform, type_name: &str, symbols: &[&Symbol]) {
    out.push_str(&format!("#if canImport({})\n", platform.module()));
    out.push_str(platform.availability());
    out.push_str(&format!("extension {type_name} {{\n\n"));
    for symbol in symbols {
        out.push_str(&format!(
            "    /// The \"{}\" asset catalog {}.\n",
            escape_swift(&symbol.source_name),
            symbol.kind
        ));
        out.push_str(&format!("    static var {}: {type_name} {{\n", symbol.swift_name));
        out.push_str(&format!("#if {}\n", platform.resource_condition()));
        out.push_str(&format!("        .init(resource: .{})\n", symbol.swift_name));
        out.push_str("#else\n        .init()\n#endif\n    }\n\n");
    }
    out.push_str("}\n#endif\n\n");
}

fn push_swiftui_extension(out: &mut String, header: &str, symbols: &[&Symbol]) {
    out.push_str(AVAILABLE_ALL);
    out.push_str(header);
    out.push_str("\n\n");
    for symbol in symbols {
        out.push_str(&format!(
            "    /// The \"{}\" asset catalog color.\n",
            escape_swift(&symbol.source_name)
        ));
        out.push_str(&format!(
            "    static var {0}: SwiftUI.Color {{ .init(.{0}) }}\n\n",
            symbol.swift_name
        ));
    }
    out.push_str("}\n");
}

fn escape_swift(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

const SWIFT_THINNABLE_SUPPORT: &str = r#"// MARK: - Thinnable Asset Support -

@available(iOS 17.0, macOS 14.0, tvOS 17.0, watchOS 10.0, *)
@available(watchOS, unavailable)
extension DeveloperToolsSupport.ColorResource {

    private init?(thinnableName: Swift.String, bundle: Foundation.Bundle) {
#if canImport(AppKit) && os(macOS)
        if AppKit.NSColor(named: NSColor.Name(thinnableName), bundle: bundle) != nil {
            self.init(name: thinnableName, bundle: bundle)
        } else {
            return nil
        }
#elseif canImport(UIKit) && !os(watchOS)
        if UIKit.UIColor(named: thinnableName, in: bundle, compatibleWith: nil) != nil {
            self.init(name: thinnableName, bundle: bundle)
        } else {
            return nil
        }
#else
        return nil
#endif
    }

}

#if canImport(AppKit)
@available(macOS 14.0, *)
@available(macCatalyst, unavailable)
extension AppKit.NSColor {

    private convenience init?(thinnableResource: DeveloperToolsSupport.ColorResource?) {
#if !targetEnvironment(macCatalyst)
        if let resource = thinnableResource {
            self.init(resource: resource)
        } else {
            return nil
        }
#else
        return nil
#endif
    }

}
#endif

#if canImport(UIKit)
@available(iOS 17.0, tvOS 17.0, *)
@available(watchOS, unavailable)
extension UIKit.UIColor {

    private convenience init?(thinnableResource: DeveloperToolsSupport.ColorResource?) {
#if !os(watchOS)
        if let resource = thinnableResource {
            self.init(resource: resource)
        } else {
            return nil
        }
#else
        return nil
#endif
    }

}
#endif

#if canImport(SwiftUI)
@available(iOS 17.0, macOS 14.0, tvOS 17.0, watchOS 10.0, *)
extension SwiftUI.Color {

    private init?(thinnableResource: DeveloperToolsSupport.ColorResource?) {
        if let resource = thinnableResource {
            self.init(resource)
        } else {
            return nil
        }
    }

}

@available(iOS 17.0, macOS 14.0, tvOS 17.0, watchOS 10.0, *)
extension SwiftUI.ShapeStyle where Self == SwiftUI.Color {

    private init?(thinnableResource: DeveloperToolsSupport.ColorResource?) {
        if let resource = thinnableResource {
            self.init(resource)
        } else {
            return nil
        }
    }

}
#endif

@available(iOS 17.0, macOS 14.0, tvOS 17.0, watchOS 10.0, *)
@available(watchOS, unavailable)
extension DeveloperToolsSupport.ImageResource {

    private init?(thinnableName: Swift.String, bundle: Foundation.Bundle) {
#if canImport(AppKit) && os(macOS)
        if bundle.image(forResource: NSImage.Name(thinnableName)) != nil {
            self.init(name: thinnableName, bundle: bundle)
        } else {
            return nil
        }
#elseif canImport(UIKit) && !os(watchOS)
        if UIKit.UIImage(named: thinnableName, in: bundle, compatibleWith: nil) != nil {
            self.init(name: thinnableName, bundle: bundle)
        } else {
            return nil
        }
#else
        return nil
#endif
    }

}

#if canImport(AppKit)
@available(macOS 14.0, *)
@available(macCatalyst, unavailable)
extension AppKit.NSImage {

    private convenience init?(thinnableResource: DeveloperToolsSupport.ImageResource?) {
#if !targetEnvironment(macCatalyst)
        if let resource = thinnableResource {
            self.init(resource: resource)
        } else {
            return nil
        }
#else
        return nil
#endif
    }

}
#endif

#if canImport(UIKit)
@available(iOS 17.0, tvOS 17.0, *)
@available(watchOS, unavailable)
extension UIKit.UIImage {

    private convenience init?(thinnableResource: DeveloperToolsSupport.ImageResource?) {
#if !os(watchOS)
        if let resource = thinnableResource {
            self.init(resource: resource)
        } else {
            return nil
        }
#else
        return nil
#endif
    }

}
#endif

"#;
