//! Output naming: sanitization and per-run collision suffixes

use std::collections::{HashMap, HashSet};

/// Name used when an object has no usable display name
pub const FALLBACK_NAME: &str = "unnamed";

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ')
}

/// Map a display name to a filesystem-safe identifier.
///
/// Disallowed characters become `_`, surrounding whitespace is trimmed.
/// Never returns an empty string.
pub fn sanitize(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return FALLBACK_NAME.to_string();
    };

    let replaced: String = raw
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Collision table for one extraction run
///
/// Maps each sanitized base name to the last suffix handed out for it.
#[derive(Debug, Default)]
pub struct NameRegistry {
    counters: HashMap<String, u32>,
    issued: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `base` to a name not yet issued in this run.
    ///
    /// First occurrence returns `base`, later ones `base_1`, `base_2`, ...
    pub fn resolve(&mut self, base: &str) -> String {
        let name = if !self.counters.contains_key(base) && !self.issued.contains(base) {
            self.counters.insert(base.to_string(), 0);
            base.to_string()
        } else {
            let counter = self.counters.entry(base.to_string()).or_insert(0);
            loop {
                *counter += 1;
                let candidate = format!("{}_{}", base, counter);
                if !self.issued.contains(&candidate) {
                    break candidate;
                }
            }
        };

        self.issued.insert(name.clone());
        name
    }
}
