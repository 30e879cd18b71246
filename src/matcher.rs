//! Lexicon matching strategies.
//!
//! The default `Substring` rule treats a lexicon word and a comment token as a match
//! when either one contains the other. It is fuzzy on purpose: a short listed word can
//! match inside an unrelated longer token. `Exact` is the strict alternative.

use serde::{Deserialize, Serialize};

pub trait TermMatcher: Send + Sync {
    fn matches(&self, listed: &str, token: &str) -> bool;
}

/// `listed ⊆ token || token ⊆ listed`
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TermMatcher for SubstringMatcher {
    fn matches(&self, listed: &str, token: &str) -> bool {
        token.contains(listed) || listed.contains(token)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl TermMatcher for ExactMatcher {
    fn matches(&self, listed: &str, token: &str) -> bool {
        listed == token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Substring,
    Exact,
}

impl MatchMode {
    pub fn matcher(self) -> Box<dyn TermMatcher> {
        match self {
            MatchMode::Substring => Box::new(SubstringMatcher),
            MatchMode::Exact => Box::new(ExactMatcher),
        }
    }
}
