use aho_corasick::AhoCorasick;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};
use std::borrow::Cow;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::secret::REDACTION_MARKER;

// Global registry of raw values scrubbed from every emitted line
static REDACTION_REGISTRY: Lazy<DashMap<String, ()>> = Lazy::new(DashMap::new);

// Automaton over the registry, rebuilt lazily after a registration
static AUTOMATON: Lazy<RwLock<Option<Arc<AhoCorasick>>>> = Lazy::new(|| RwLock::new(None));

/// Registers a raw value for redaction. Empty values are ignored.
pub fn register_for_redaction(secret_value: &str) {
    if secret_value.is_empty() {
        return;
    }
    if REDACTION_REGISTRY
        .insert(secret_value.to_string(), ())
        .is_none()
    {
        invalidate();
        debug!("Registered secret value for redaction");
    }
}

/// Registers a secret for redaction via secrecy's wrapper
pub fn register_secret_for_redaction(secret: &SecretString) {
    register_for_redaction(secret.expose_secret());
}

/// Registers a secret and hands it back, for use at the point of retrieval
pub fn with_redaction(secret: SecretString) -> SecretString {
    register_secret_for_redaction(&secret);
    secret
}

/// Replaces every registered value in `input` with the redaction marker.
pub fn scrub(input: &str) -> Cow<'_, str> {
    if REDACTION_REGISTRY.is_empty() {
        return Cow::Borrowed(input);
    }
    match automaton() {
        Some(ac) if ac.is_match(input) => {
            let replacements = vec![REDACTION_MARKER; ac.patterns_len()];
            Cow::Owned(ac.replace_all(input, replacements.as_slice()))
        }
        _ => Cow::Borrowed(input),
    }
}

fn invalidate() {
    let mut cached = AUTOMATON.write().unwrap_or_else(|e| e.into_inner());
    *cached = None;
}

fn automaton() -> Option<Arc<AhoCorasick>> {
    if let Some(ac) = AUTOMATON
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
    {
        return Some(Arc::clone(ac));
    }

    let mut cached = AUTOMATON.write().unwrap_or_else(|e| e.into_inner());
    if let Some(ac) = cached.as_ref() {
        return Some(Arc::clone(ac));
    }

    let patterns: Vec<String> = REDACTION_REGISTRY
        .iter()
        .map(|entry| entry.key().clone())
        .collect();

    // Leftmost-longest so a secret containing another is replaced whole
    match AhoCorasick::builder()
        .match_kind(aho_corasick::MatchKind::LeftmostLongest)
        .build(&patterns)
    {
        Ok(ac) => {
            let ac = Arc::new(ac);
            *cached = Some(Arc::clone(&ac));
            Some(ac)
        }
        Err(e) => {
            // Logging from here would re-enter the sink
            eprintln!("failed to build redaction automaton: {e}");
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn is_registered_for_redaction(key: &str) -> bool {
    REDACTION_REGISTRY.contains_key(key)
}
