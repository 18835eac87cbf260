//! Vendor namespace detection and framework-docs URL synthesis.

/// Top-level namespace prefixes with published framework documentation,
/// with the display name used in generated prose.
const VENDOR_PREFIXES: &[(&str, &str)] = &[
    ("System", ".NET"),
    ("Microsoft", "Microsoft"),
    ("Windows", "Windows"),
];

const DOCS_BASE_URL: &str = "https://learn.microsoft.com/dotnet/api/";

/// Vendor display name for a full type/namespace name, if its top-level
/// segment is a recognized vendor prefix.
pub fn vendor_of(full_name: &str) -> Option<&'static str> {
    let top = full_name.split('.').next().unwrap_or(full_name);
    VENDOR_PREFIXES
        .iter()
        .find(|(prefix, _)| *prefix == top)
        .map(|(_, display)| *display)
}

pub fn is_vendor(full_name: &str) -> bool {
    vendor_of(full_name).is_some()
}

/// Synthesize a framework-docs URL for a vendor type: the full name is
/// lowercased (generic arities included), backtick arity markers become
/// `-N`, nested-type `+` becomes `.`.
///
/// ``System.Collections.Generic.List`1`` →
/// `https://learn.microsoft.com/dotnet/api/system.collections.generic.list-1`
pub fn docs_url(full_name: &str) -> String {
    let slug = full_name.replace('+', ".").replace('`', "-").to_lowercase();
    format!("{}{}", DOCS_BASE_URL, slug)
}
