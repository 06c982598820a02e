//! Which of the two profile save files a decoded object looks like.
//!
//! Detection only inspects top-level key names. It is a hint for front ends choosing
//! a view or a default file name; the codec itself never refuses data because of it.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

const META_KEYS: &[&str] = &["unlocked", "discovered", "alerted"];
const PROFILE_KEYS: &[&str] = &["career_stats", "high_scores", "name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    /// `meta.jkr`: unlock, discovery and alert flags.
    Meta,
    /// `profile.jkr`: profile name, career stats, high scores and progress.
    Profile,
}

impl SaveKind {
    /// Classify a plain JSON object. Meta keys take precedence over profile keys.
    pub fn detect(json: &JsonValue) -> Option<SaveKind> {
        let map = json.as_object()?;
        if META_KEYS.iter().any(|k| map.contains_key(*k)) {
            Some(SaveKind::Meta)
        } else if PROFILE_KEYS.iter().any(|k| map.contains_key(*k)) {
            Some(SaveKind::Profile)
        } else {
            None
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            SaveKind::Meta => "meta.jkr",
            SaveKind::Profile => "profile.jkr",
        }
    }
}

impl fmt::Display for SaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveKind::Meta => f.write_str("meta"),
            SaveKind::Profile => f.write_str("profile"),
        }
    }
}
