//! Route template compilation.
//!
//! # Responsibilities
//! - Translate `<name>` and `<name:regex>` tokens into named capture groups
//! - Pass text between tokens through as regex, `/` included
//! - Anchor the result so only whole paths match, alternations included
//!
//! # Design Decisions
//! - Bare variables accept `[a-z-]+` only; anything wider needs `<name:regex>`
//! - Custom sub-patterns and the text around tokens are inserted verbatim,
//!   so a template may carry its own optional groups or quantifiers
//! - `/` needs no escaping: the regex crate has no delimiters
//! - Compilation errors surface here, at registration time

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Character class used for bare `<name>` variables.
pub const DEFAULT_VARIABLE_PATTERN: &str = "[a-z-]+";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([a-z]+)(?::([^>]+))?>").expect("token pattern is valid")
});

/// Errors raised while registering a route.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The template produced a regex the engine rejected.
    #[error("invalid route pattern '{template}': {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    regex: Regex,
}

impl RoutePattern {
    /// Compile a template such as `<controller>/<id:\d+>`.
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let source = translate(template);
        let regex = Regex::new(&source).map_err(|e| RouteError::InvalidPattern {
            template: template.to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The anchored regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Names of every named capture group, in group order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.regex.capture_names().flatten()
    }

    /// Match the whole path, returning the raw captures.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        self.regex.captures(path)
    }

    /// Iterate over the named captures that took part in a match.
    pub fn named_values<'a, 'p>(
        &'a self,
        captures: &'a Captures<'p>,
    ) -> impl Iterator<Item = (&'a str, &'p str)> + 'a {
        self.capture_names()
            .filter_map(move |name| captures.name(name).map(|m| (name, m.as_str())))
    }
}

/// Turn a route template into an anchored regex source string.
fn translate(template: &str) -> String {
    let mut re = String::with_capacity(template.len() + 16);
    re.push_str("^(?:");

    let mut last = 0;
    for token in TOKEN.captures_iter(template) {
        let whole = token.get(0).map_or(0..0, |m| m.range());
        re.push_str(&template[last..whole.start]);

        let name = &token[1];
        let body = token
            .get(2)
            .map_or(DEFAULT_VARIABLE_PATTERN, |m| m.as_str());
        re.push_str(&format!("(?P<{name}>{body})"));

        last = whole.end;
    }
    re.push_str(&template[last..]);

    re.push_str(")$");
    re
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_tokens() {
        assert_eq!(translate(""), "^(?:)$");
        assert_eq!(translate("login"), "^(?:login)$");
        assert_eq!(
            translate("<controller>/<action>"),
            "^(?:(?P<controller>[a-z-]+)/(?P<action>[a-z-]+))$"
        );
        assert_eq!(
            translate(r"<controller>/<index:\d+>"),
            r"^(?:(?P<controller>[a-z-]+)/(?P<index>\d+))$"
        );
    }

    #[test]
    fn test_text_between_tokens_is_regex() {
        let pattern = RoutePattern::compile("posts?").unwrap();
        assert!(pattern.captures("post").is_some());
        assert!(pattern.captures("posts").is_some());
        assert!(pattern.captures("postss").is_none());

        let pattern = RoutePattern::compile("(<controller>/)?<action>").unwrap();
        assert_eq!(
            pattern.as_str(),
            "^(?:((?P<controller>[a-z-]+)/)?(?P<action>[a-z-]+))$"
        );
        let caps = pattern.captures("index").unwrap();
        let values: Vec<_> = pattern.named_values(&caps).collect();
        assert_eq!(values, vec![("action", "index")]);
    }

    #[test]
    fn test_literal_slashes_match_themselves() {
        let pattern = RoutePattern::compile("api/v1/status").unwrap();
        assert!(pattern.captures("api/v1/status").is_some());
        assert!(pattern.captures("api-v1-status").is_none());
    }

    #[test]
    fn test_uppercase_token_name_is_literal() {
        let pattern = RoutePattern::compile("<Name>").unwrap();
        assert_eq!(pattern.as_str(), "^(?:<Name>)$");
        assert!(pattern.captures("<Name>").is_some());
        assert!(pattern.captures("abc").is_none());
    }

    #[test]
    fn test_anchored_match() {
        let pattern = RoutePattern::compile("<controller>").unwrap();
        assert!(pattern.captures("posts").is_some());
        assert!(pattern.captures("posts/extra").is_none());
        assert!(pattern.captures("a/posts").is_none());
    }

    #[test]
    fn test_bare_variable_restriction() {
        let pattern = RoutePattern::compile("<slug>").unwrap();
        assert!(pattern.captures("hello-world").is_some());
        assert!(pattern.captures("Hello").is_none());
        assert!(pattern.captures("post2").is_none());
        assert!(pattern.captures("").is_none());
    }

    #[test]
    fn test_custom_pattern_verbatim() {
        let pattern = RoutePattern::compile(r"password/reset/<token:[\da-f]{32}>").unwrap();
        let path = "password/reset/0123456789abcdef0123456789abcdef";
        let caps = pattern.captures(path).unwrap();
        let values: Vec<_> = pattern.named_values(&caps).collect();
        assert_eq!(values, vec![("token", "0123456789abcdef0123456789abcdef")]);
    }

    #[test]
    fn test_malformed_custom_pattern_fails() {
        let err = RoutePattern::compile(r"<id:\d+(>").unwrap_err();
        assert!(err.to_string().contains(r"<id:\d+(>"));
    }

    #[test]
    fn test_duplicate_capture_name_fails() {
        assert!(RoutePattern::compile("<a>/<a>").is_err());
    }
}
