//! Pattern associations: a URL rule bound to a spec for future requests.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TamperError};
use crate::store::matcher::{AnyMatcher, ExactUrlMatcher, RegexMatcher, UrlMatcher};
use crate::tamper::{normalize, TamperSpec};

/// A regex as callers write it: `["pattern", "flags"]` or a bare pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegexSource {
    Pair(String, String),
    Bare(String),
}

impl RegexSource {
    pub fn pattern(&self) -> &str {
        match self {
            RegexSource::Pair(pattern, _) | RegexSource::Bare(pattern) => pattern,
        }
    }

    pub fn flags(&self) -> &str {
        match self {
            RegexSource::Pair(_, flags) => flags,
            RegexSource::Bare(_) => "",
        }
    }
}

/// Uncompiled pattern association, as received from callers or config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexes: Option<Vec<RegexSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tamper: Option<TamperSpec>,
}

impl PatternRegistration {
    pub fn for_urls<I, S>(urls: I, tamper: TamperSpec) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regexes: None,
            urls: Some(urls.into_iter().map(Into::into).collect()),
            tamper: Some(tamper),
        }
    }

    pub fn for_regex(pattern: impl Into<String>, flags: impl Into<String>, tamper: TamperSpec) -> Self {
        Self {
            regexes: Some(vec![RegexSource::Pair(pattern.into(), flags.into())]),
            urls: None,
            tamper: Some(tamper),
        }
    }
}

/// Compiled, normalized association held by the store.
#[derive(Debug)]
pub struct PatternAssociation {
    regexes: Option<Vec<RegexSource>>,
    urls: Option<Vec<String>>,
    matcher: AnyMatcher,
    tamper: TamperSpec,
}

impl PatternAssociation {
    /// Validate and compile a registration.
    pub fn compile(registration: PatternRegistration) -> Result<Self> {
        let PatternRegistration { regexes, urls, tamper } = registration;

        if regexes.is_none() && urls.is_none() {
            return Err(TamperError::InvalidSpec(
                "pattern needs at least one of regexes or urls".into(),
            ));
        }
        let tamper = tamper
            .ok_or_else(|| TamperError::InvalidSpec("pattern has no tamper spec".into()))?;

        let mut matcher = AnyMatcher::default();
        for source in regexes.iter().flatten() {
            matcher.push(RegexMatcher::new(source.pattern(), source.flags())?);
        }
        if let Some(urls) = &urls {
            matcher.push(ExactUrlMatcher::new(urls.clone()));
        }

        Ok(Self {
            regexes,
            urls,
            matcher,
            tamper: normalize(tamper),
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.matcher.matches(url)
    }

    pub fn tamper(&self) -> &TamperSpec {
        &self.tamper
    }

    /// Registration form of this association, for inspection.
    pub fn to_registration(&self) -> PatternRegistration {
        PatternRegistration {
            regexes: self.regexes.clone(),
            urls: self.urls.clone(),
            tamper: Some(self.tamper.clone()),
        }
    }
}
