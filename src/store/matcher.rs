//! URL matching for pattern associations.
//!
//! # Responsibilities
//! - Match a request URL against compiled regexes (any one suffices)
//! - Match a request URL against an exact URL list
//! - Combine matchers with OR semantics
//!
//! # Design Decisions
//! - Regexes are compiled once, at registration, so a bad pattern is
//!   rejected up front instead of silently never matching
//! - URL lists compare by plain string equality: no normalization, no
//!   wildcards
//! - Flag letters follow the ECMAScript set callers already write

use regex::{Regex, RegexBuilder};

use crate::error::{Result, TamperError};

/// Trait for matching request URLs against a condition.
pub trait UrlMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the URL matches this condition.
    fn matches(&self, url: &str) -> bool;
}

/// Matches URLs against a single regular expression.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compile `pattern` with ECMAScript-style `flags`.
    ///
    /// `i`, `m` and `s` map onto the regex builder; `u` and `v` are accepted
    /// as Unicode is always on; `g` and `d` have no effect on a match test;
    /// `y` anchors the match at the start of the URL.
    ///
    /// Patterns use the `regex` crate dialect, which has no look-around or
    /// backreferences. Such patterns are rejected with `InvalidSpec`.
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        let (mut ignore_case, mut multi_line, mut dot_all, mut sticky) = (false, false, false, false);

        for flag in flags.chars() {
            match flag {
                'i' => ignore_case = true,
                'm' => multi_line = true,
                's' => dot_all = true,
                'y' => sticky = true,
                'g' | 'd' | 'u' | 'v' => {}
                other => {
                    return Err(TamperError::InvalidSpec(format!(
                        "unsupported regex flag '{other}' in /{pattern}/{flags}"
                    )))
                }
            }
        }

        let source = if sticky {
            format!(r"\A(?:{pattern})")
        } else {
            pattern.to_string()
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(ignore_case)
            .multi_line(multi_line)
            .dot_matches_new_line(dot_all)
            .build()
            .map_err(|e| TamperError::InvalidSpec(format!("invalid regex /{pattern}/{flags}: {e}")))?;

        Ok(Self { regex })
    }
}

impl UrlMatcher for RegexMatcher {
    fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

/// Matches URLs equal to one of a fixed list.
#[derive(Debug, Clone)]
pub struct ExactUrlMatcher {
    urls: Vec<String>,
}

impl ExactUrlMatcher {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }
}

impl UrlMatcher for ExactUrlMatcher {
    fn matches(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn UrlMatcher>>,
}

impl AnyMatcher {
    pub fn push(&mut self, matcher: impl UrlMatcher + 'static) {
        self.matchers.push(Box::new(matcher));
    }
}

impl UrlMatcher for AnyMatcher {
    fn matches(&self, url: &str) -> bool {
        // Any matcher may pass (OR)
        self.matchers.iter().any(|m| m.matches(url))
    }
}
