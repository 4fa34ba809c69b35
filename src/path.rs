//! Path template resolution
//!
//! Path templates are `/`-separated strings where a segment starting with `:`
//! names a parameter, e.g. `:systemId/device/:deviceId`. Resolution replaces
//! those segments from, in order: an installed special-parameter resolver,
//! the match parameters, and fallback parameters supplied by the caller.
//! Unresolvable segments are left as written.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Parameter values keyed by name
pub type Params = HashMap<String, String>;

/// A set of concrete identifiers to bind a path template against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Parameter values; a match without params resolves nothing
    pub params: Option<Params>,
    /// The concrete url the match was produced from, if any
    pub url: Option<String>,
}

impl Match {
    /// Create a match from parameters
    pub fn new(params: Params) -> Self {
        Self {
            params: Some(params),
            url: None,
        }
    }

    /// Create a match from `(key, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Set the url
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Non-empty parameter value
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .as_ref()?
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Copy of this match with one parameter set
    pub fn with_param(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = self.params.clone().unwrap_or_default();
        params.insert(key.into(), value.into());
        Self {
            params: Some(params),
            url: self.url.clone(),
        }
    }
}

/// Fallback source of parameter values
pub trait ParamSource {
    fn param(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl ParamSource for Params {
    fn param(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Failure reported by a special-parameter resolver
#[derive(Debug, Error)]
#[error("special parameter '{key}' failed: {message}")]
pub struct SpecialParamError {
    pub key: String,
    pub message: String,
}

impl SpecialParamError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Computes a parameter value from the template and the match
///
/// `Ok(None)` produces an empty segment.
pub type SpecialParamFn =
    Arc<dyn Fn(&str, &Match) -> Result<Option<String>, SpecialParamError> + Send + Sync>;

/// Resolves path templates, with installable special parameters
///
/// Cloning shares the installed resolvers, so a resolver installed after
/// relationships were built is still seen by them.
#[derive(Clone, Default)]
pub struct PathResolver {
    special: Arc<RwLock<HashMap<String, SpecialParamFn>>>,
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathResolver")
            .field("special", &self.special_param_keys())
            .finish()
    }
}

impl PathResolver {
    /// Create a resolver with no special parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the resolver function for `key`, replacing any earlier one
    pub fn set_special_param<F>(&self, key: impl Into<String>, resolver: F)
    where
        F: Fn(&str, &Match) -> Result<Option<String>, SpecialParamError> + Send + Sync + 'static,
    {
        self.special
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), Arc::new(resolver));
    }

    /// The resolver function installed for `key`
    pub fn get_special_param(&self, key: &str) -> Option<SpecialParamFn> {
        self.special
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// All installed resolver functions
    pub fn get_special_params(&self) -> HashMap<String, SpecialParamFn> {
        self.special
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn special_param_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .special
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Remove every special parameter
    pub fn clear(&self) {
        self.special
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Replace every `:key` segment of `path`
    ///
    /// Returns `path` unchanged when there is no path, no match, or the match
    /// carries no params.
    pub fn resolve(
        &self,
        path: Option<&str>,
        matched: Option<&Match>,
        extra: Option<&dyn ParamSource>,
    ) -> Option<String> {
        let path = path?;
        let Some(matched) = matched.filter(|m| m.params.is_some()) else {
            return Some(path.to_string());
        };

        let special = self.get_special_params();
        let segments: Vec<Cow<'_, str>> = path
            .split('/')
            .map(|segment| {
                let Some(key) = segment.strip_prefix(':') else {
                    return Cow::Borrowed(segment);
                };
                if let Some(resolver) = special.get(key) {
                    return match resolver(path, matched) {
                        Ok(value) => Cow::Owned(value.unwrap_or_default()),
                        Err(err) => {
                            warn!(key, path, error = %err, "special parameter resolver failed");
                            Cow::Owned(matched.param(key).unwrap_or_default().to_string())
                        }
                    };
                }
                if let Some(value) = matched.param(key) {
                    return Cow::Owned(value.to_string());
                }
                if let Some(value) = extra.and_then(|e| e.param(key)).filter(|v| !v.is_empty()) {
                    return Cow::Owned(value.into_owned());
                }
                Cow::Borrowed(segment)
            })
            .collect();

        Some(segments.join("/"))
    }

    /// Resolve against a match without fallback parameters
    pub fn resolve_str(&self, path: &str, matched: &Match) -> String {
        self.resolve(Some(path), Some(matched), None)
            .unwrap_or_else(|| path.to_string())
    }
}

/// Value of the last `:key` segment of `path` in the match
///
/// For `a/:aId/b/:bId/c` this is `bId`'s value. The first segment is never
/// considered.
pub fn last_id<'m>(path: &str, matched: &'m Match) -> Option<&'m str> {
    path.split('/')
        .skip(1)
        .filter_map(|segment| segment.strip_prefix(':'))
        .last()
        .and_then(|key| matched.params.as_ref()?.get(key).map(String::as_str))
}
