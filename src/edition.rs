use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::MemSqlError;

/// Operating mode of the backing engine.
///
/// Only `Enterprise` supports scoping a grant to a single database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Enterprise,
    Community,
}

impl Edition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edition::Enterprise => "enterprise",
            Edition::Community => "community",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edition {
    type Err = MemSqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enterprise" => Ok(Edition::Enterprise),
            "community" => Ok(Edition::Community),
            other => Err(MemSqlError::Config(format!("unknown edition: {other}"))),
        }
    }
}

/// One-way record of the detected engine edition.
///
/// Starts at the configured edition and can only move from `Enterprise` to
/// `Community`.
#[derive(Debug)]
pub struct EditionState {
    community: AtomicBool,
}

impl EditionState {
    pub fn new(initial: Edition) -> Self {
        Self {
            community: AtomicBool::new(initial == Edition::Community),
        }
    }

    pub fn current(&self) -> Edition {
        if self.community.load(Ordering::Acquire) {
            Edition::Community
        } else {
            Edition::Enterprise
        }
    }

    /// Switch to `Community`. Returns `true` only for the call that performed
    /// the transition.
    pub fn mark_community(&self) -> bool {
        !self.community.swap(true, Ordering::AcqRel)
    }
}

impl Default for EditionState {
    fn default() -> Self {
        Self::new(Edition::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Enterprise".parse::<Edition>().unwrap(), Edition::Enterprise);
        assert_eq!(" COMMUNITY ".parse::<Edition>().unwrap(), Edition::Community);
        let err = "standard".parse::<Edition>().unwrap_err();
        assert!(matches!(err, MemSqlError::Config(_)));
    }

    #[test]
    fn transition_happens_once() {
        let state = EditionState::default();
        assert_eq!(state.current(), Edition::Enterprise);
        assert!(state.mark_community());
        assert!(!state.mark_community());
        assert_eq!(state.current(), Edition::Community);
    }

    #[test]
    fn configured_community_is_terminal() {
        let state = EditionState::new(Edition::Community);
        assert_eq!(state.current(), Edition::Community);
        assert!(!state.mark_community());
    }
}
