//! Edge function definitions.

use serde::{Deserialize, Serialize};

use crate::rewrite::{RewriteRule, SPA_REWRITE};

/// Runtime the function code targets.
pub const FUNCTION_RUNTIME: &str = "cloudfront-js-1.0";

/// An edge function to register with the distribution's edge network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFunction {
    /// Function name, unique within the account.
    pub name: String,
    /// Runtime identifier.
    pub runtime: String,
    /// Human-readable description.
    pub comment: String,
    /// Function source.
    pub code: String,
    /// Whether the function is published for use by distributions.
    pub publish: bool,
}

impl EdgeFunction {
    /// Viewer-request function implementing a rewrite rule.
    pub fn for_rule(name: impl Into<String>, rule: &RewriteRule) -> Self {
        Self {
            name: name.into(),
            runtime: FUNCTION_RUNTIME.to_string(),
            comment: format!(
                "Rewrites paths outside {} to {}",
                rule.passthrough_prefixes.join(", "),
                rule.entry_document
            ),
            code: rule.handler_source(),
            publish: true,
        }
    }

    /// Viewer-request function implementing the standard single-page app rewrite.
    pub fn viewer_request_rewrite(name: impl Into<String>) -> Self {
        Self::for_rule(name, &SPA_REWRITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_request_rewrite() {
        let function = EdgeFunction::viewer_request_rewrite("rewrite-function-abc");
        assert_eq!(function.name, "rewrite-function-abc");
        assert_eq!(function.runtime, "cloudfront-js-1.0");
        assert_eq!(function.code, SPA_REWRITE.handler_source());
        assert!(function.publish);
    }
}
