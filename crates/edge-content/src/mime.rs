//! Content type resolution from file extensions.

use std::path::Path;

/// Content type used when an extension has no mapping.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extensions served by a single-page app and their content types.
pub static CONTENT_TYPES: &[(&str, &str)] = &[
    (".bmp", "image/bmp"),
    (".css", "text/css"),
    (".csv", "text/csv"),
    (".gif", "image/gif"),
    (".htm", "text/html"),
    (".html", "text/html"),
    (".ico", "image/vnd.microsoft.icon"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpeg"),
    (".js", "text/javascript"),
    (".json", "application/json"),
    (".otf", "font/otf"),
    (".pdf", "application/pdf"),
    (".svg", "image/svg+xml"),
    (".ttf", "font/ttf"),
    (".txt", "text/plain"),
    (".weba", "audio/webm"),
    (".webm", "video/webm"),
    (".webp", "image/webp"),
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
    (".xml", "application/xml"),
];

/// Resolves file extensions against a fixed content-type table.
///
/// Lookups are case-sensitive; the table keys are lowercase.
#[derive(Debug, Clone, Copy)]
pub struct MimeResolver {
    table: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

impl Default for MimeResolver {
    fn default() -> Self {
        Self::new(CONTENT_TYPES)
    }
}

impl MimeResolver {
    /// Create a resolver over a table of `(".ext", "type")` pairs.
    pub fn new(table: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            table,
            fallback: DEFAULT_CONTENT_TYPE,
        }
    }

    /// Resolve an extension, given with or without its leading dot.
    ///
    /// Never fails: unmapped extensions resolve to the fallback type.
    pub fn resolve(&self, extension: &str) -> &'static str {
        self.lookup(extension).unwrap_or(self.fallback)
    }

    /// Resolve the extension of a path's final component.
    pub fn resolve_path(&self, path: &Path) -> &'static str {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.resolve(ext),
            None => self.fallback,
        }
    }

    /// Whether an extension has a mapping.
    pub fn is_mapped(&self, extension: &str) -> bool {
        self.lookup(extension).is_some()
    }

    /// The fallback content type.
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    fn lookup(&self, extension: &str) -> Option<&'static str> {
        let bare = extension.strip_prefix('.').unwrap_or(extension);
        if bare.is_empty() {
            return None;
        }
        self.table
            .iter()
            .find(|(ext, _)| ext.strip_prefix('.').unwrap_or(ext) == bare)
            .map(|(_, content_type)| *content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_every_table_entry_resolves() {
        let resolver = MimeResolver::default();
        for (ext, content_type) in CONTENT_TYPES {
            assert_eq!(resolver.resolve(ext), *content_type, "{}", ext);
            assert_eq!(resolver.resolve(&ext[1..]), *content_type, "{}", ext);
        }
    }

    #[test]
    fn test_unmapped_falls_back() {
        let resolver = MimeResolver::default();
        assert_eq!(resolver.resolve(".xyz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolver.resolve("wasm"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolver.resolve(""), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolver.resolve("."), DEFAULT_CONTENT_TYPE);
        assert!(!resolver.is_mapped(".xyz"));
    }

    #[test]
    fn test_case_as_encountered() {
        let resolver = MimeResolver::default();
        assert_eq!(resolver.resolve(".JPG"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolver.resolve(".jpg"), "image/jpeg");
    }

    #[test]
    fn test_resolve_path() {
        let resolver = MimeResolver::default();
        assert_eq!(resolver.resolve_path(&PathBuf::from("index.html")), "text/html");
        assert_eq!(
            resolver.resolve_path(&PathBuf::from("assets/app.v2.js")),
            "text/javascript"
        );
        assert_eq!(
            resolver.resolve_path(&PathBuf::from("fonts/inter.woff2")),
            "font/woff2"
        );
        assert_eq!(
            resolver.resolve_path(&PathBuf::from(".htaccess")),
            DEFAULT_CONTENT_TYPE
        );
        assert_eq!(
            resolver.resolve_path(&PathBuf::from("LICENSE")),
            DEFAULT_CONTENT_TYPE
        );
    }

    #[test]
    fn test_custom_table() {
        static TABLE: &[(&str, &str)] = &[(".wasm", "application/wasm")];
        let resolver = MimeResolver::new(TABLE);
        assert_eq!(resolver.resolve("wasm"), "application/wasm");
        assert_eq!(resolver.resolve("html"), DEFAULT_CONTENT_TYPE);
    }
}
