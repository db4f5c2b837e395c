use serde::{Deserialize, Serialize};

/// Full answer to an anagram or cipher clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueSolution {
    pub clue: String,
    pub solution: String,
    pub location: String,
    pub challenge_answer: Option<String>,
    pub puzzle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrypticSolution {
    pub cryptic: String,
    pub solution: String,
    pub image: Option<String>,
}

/// Outcome of a clue search: exact or single prefix hit, or several names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClueMatches<T> {
    None,
    One(T),
    Many(Vec<String>),
}
