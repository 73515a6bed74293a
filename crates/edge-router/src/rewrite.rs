//! Single-page app URL rewriting.

use serde::Serialize;

/// Path prefixes that reach the origin verbatim.
pub const PASSTHROUGH_PREFIXES: &[&str] = &[
    "/assets/",
    "/robots.txt",
    "/favicon",
    "/humans.txt",
    "/manifest.json",
];

/// Document every other path is rewritten to.
pub const ENTRY_DOCUMENT: &str = "/index.html";

/// The rewrite applied to every single-page app deployment.
pub const SPA_REWRITE: RewriteRule = RewriteRule {
    passthrough_prefixes: PASSTHROUGH_PREFIXES,
    entry_document: ENTRY_DOCUMENT,
};

/// Rewrites request paths to an entry document unless they match a
/// passthrough prefix.
///
/// Matching is a plain prefix test. The prefixes are checked independently,
/// so their order never changes the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    /// Prefixes served as-is.
    pub passthrough_prefixes: &'static [&'static str],
    /// Target of every other path.
    pub entry_document: &'static str,
}

impl RewriteRule {
    /// Check if a path bypasses the rewrite.
    pub fn is_passthrough(&self, path: &str) -> bool {
        self.passthrough_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }

    /// Map a request path to the path fetched from the origin.
    pub fn route<'a>(&self, path: &'a str) -> &'a str {
        if self.is_passthrough(path) {
            path
        } else {
            self.entry_document
        }
    }

    /// Render the viewer-request handler implementing this rule for the
    /// edge function runtime.
    ///
    /// The runtime is ES5.1, so the handler sticks to `var`, plain loops and
    /// `indexOf`.
    pub fn handler_source(&self) -> String {
        let prefixes: Vec<String> = self
            .passthrough_prefixes
            .iter()
            .map(|p| js_string(p))
            .collect();

        format!(
            r#"function handler(event) {{
  var passthroughPrefixes = [{}];
  var request = event.request;

  for (var i = 0; i < passthroughPrefixes.length; i++) {{
    if (request.uri.indexOf(passthroughPrefixes[i]) === 0) {{
      return request;
    }}
  }}

  request.uri = {};
  return request;
}}
"#,
            prefixes.join(", "),
            js_string(self.entry_document)
        )
    }
}

/// Route a request path with the standard single-page app rule.
pub fn route(path: &str) -> &str {
    SPA_REWRITE.route(path)
}

/// Check a path against the standard passthrough prefixes.
pub fn is_passthrough(path: &str) -> bool {
    SPA_REWRITE.is_passthrough(path)
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_route_decisions() {
        assert_eq!(route("/assets/app.js"), "/assets/app.js");
        assert_eq!(route("/favicon.ico"), "/favicon.ico");
        assert_eq!(route("/about"), "/index.html");
        assert_eq!(route("/"), "/index.html");
        assert_eq!(route("/robots.txt"), "/robots.txt");
        assert_eq!(route("/humans.txt"), "/humans.txt");
        assert_eq!(route("/manifest.json"), "/manifest.json");
    }

    #[test]
    fn test_prefix_not_glob() {
        assert_eq!(route("/assets"), "/index.html");
        assert_eq!(route("/static/assets/app.js"), "/index.html");
        assert_eq!(route("/favicon-32x32.png"), "/favicon-32x32.png");
        assert_eq!(route("/robots.txt.bak"), "/robots.txt.bak");
        assert_eq!(route(""), "/index.html");
    }

    #[test]
    fn test_prefix_order_is_irrelevant() {
        static REVERSED: &[&str] = &[
            "/manifest.json",
            "/humans.txt",
            "/favicon",
            "/robots.txt",
            "/assets/",
        ];
        let reversed = RewriteRule {
            passthrough_prefixes: REVERSED,
            entry_document: ENTRY_DOCUMENT,
        };
        for path in ["/assets/x.css", "/about/team", "/favicon.svg", "/"] {
            assert_eq!(reversed.route(path), route(path));
        }
    }

    #[test]
    fn test_handler_source_mentions_every_prefix() {
        let source = SPA_REWRITE.handler_source();
        assert!(source.starts_with("function handler(event)"));
        for prefix in PASSTHROUGH_PREFIXES {
            assert!(source.contains(&format!("\"{}\"", prefix)), "{}", prefix);
        }
        assert!(source.contains("request.uri = \"/index.html\";"));
        assert!(!source.contains("=>"));
    }

    proptest! {
        /// Paths under a passthrough prefix are never rewritten.
        #[test]
        fn passthrough_paths_unchanged(idx in 0usize..5, suffix in "[a-zA-Z0-9/._-]{0,24}") {
            let path = format!("{}{}", PASSTHROUGH_PREFIXES[idx], suffix);
            prop_assert_eq!(route(&path), path.as_str());
        }

        /// Every path maps to itself iff it is a passthrough, otherwise to the entry document.
        #[test]
        fn route_is_total(path in "/?[a-zA-Z0-9/._-]{0,32}") {
            let routed = route(&path);
            if is_passthrough(&path) {
                prop_assert_eq!(routed, path.as_str());
            } else {
                prop_assert_eq!(routed, ENTRY_DOCUMENT);
            }
        }

        /// Routing is stateless: evaluating twice gives the same answer.
        #[test]
        fn route_is_repeatable(path in ".{0,32}") {
            prop_assert_eq!(route(&path), route(&path));
        }
    }
}
