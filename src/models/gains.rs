use serde::{Deserialize, Serialize};

/// Signed change of one skill row. A positive rank means the account climbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillDelta {
    pub rank: i64,
    pub level: i64,
    pub experience: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityDelta {
    pub rank: i64,
    pub amount: i64,
}

/// Difference between two snapshots of the same account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainsResult {
    pub skills: Vec<SkillDelta>,
    pub activities: Vec<ActivityDelta>,
    pub combat_delta: i64,
}
