use serde::{Deserialize, Serialize};

use crate::error::HighscoreError;

/// Number of skill rows at the head of every snapshot, "Total" included.
pub const SKILL_ROW_COUNT: usize = 24;

/// Upstream answers unknown accounts with an HTML 404 page instead of data.
pub const NOT_FOUND_MARKER: &str = "<title>404 - Page not found</title>";

const NO_DATA_SENTINEL: &str = "-1";

/// Skill rows in the order the highscores API lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skill {
    Total,
    Attack,
    Defence,
    Strength,
    Hitpoints,
    Ranged,
    Prayer,
    Magic,
    Cooking,
    Woodcutting,
    Fletching,
    Fishing,
    Firemaking,
    Crafting,
    Smithing,
    Mining,
    Herblore,
    Agility,
    Thieving,
    Slayer,
    Farming,
    Runecrafting,
    Hunter,
    Construction,
}

impl Skill {
    pub const ALL: [Skill; SKILL_ROW_COUNT] = [
        Skill::Total,
        Skill::Attack,
        Skill::Defence,
        Skill::Strength,
        Skill::Hitpoints,
        Skill::Ranged,
        Skill::Prayer,
        Skill::Magic,
        Skill::Cooking,
        Skill::Woodcutting,
        Skill::Fletching,
        Skill::Fishing,
        Skill::Firemaking,
        Skill::Crafting,
        Skill::Smithing,
        Skill::Mining,
        Skill::Herblore,
        Skill::Agility,
        Skill::Thieving,
        Skill::Slayer,
        Skill::Farming,
        Skill::Runecrafting,
        Skill::Hunter,
        Skill::Construction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Total => "Total",
            Skill::Attack => "Attack",
            Skill::Defence => "Defence",
            Skill::Strength => "Strength",
            Skill::Hitpoints => "Hitpoints",
            Skill::Ranged => "Ranged",
            Skill::Prayer => "Prayer",
            Skill::Magic => "Magic",
            Skill::Cooking => "Cooking",
            Skill::Woodcutting => "Woodcutting",
            Skill::Fletching => "Fletching",
            Skill::Fishing => "Fishing",
            Skill::Firemaking => "Firemaking",
            Skill::Crafting => "Crafting",
            Skill::Smithing => "Smithing",
            Skill::Mining => "Mining",
            Skill::Herblore => "Herblore",
            Skill::Agility => "Agility",
            Skill::Thieving => "Thieving",
            Skill::Slayer => "Slayer",
            Skill::Farming => "Farming",
            Skill::Runecrafting => "Runecrafting",
            Skill::Hunter => "Hunter",
            Skill::Construction => "Construction",
        }
    }

    /// Row position inside a snapshot.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillRow {
    pub rank: i64,
    pub level: i64,
    pub experience: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityRow {
    pub rank: i64,
    pub amount: i64,
}

/// One fetched set of an account's highscores.
///
/// Skill rows and activity rows are kept apart so nothing has to slice a
/// mixed list by position. The skill count is checked on construction and
/// on deserialization; the activity tail may be any length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRepr")]
pub struct Snapshot {
    skills: Vec<SkillRow>,
    activities: Vec<ActivityRow>,
}

#[derive(Deserialize)]
struct SnapshotRepr {
    skills: Vec<SkillRow>,
    activities: Vec<ActivityRow>,
}

impl TryFrom<SnapshotRepr> for Snapshot {
    type Error = HighscoreError;

    fn try_from(repr: SnapshotRepr) -> Result<Self, Self::Error> {
        Snapshot::new(repr.skills, repr.activities)
    }
}

impl Snapshot {
    pub fn new(
        skills: Vec<SkillRow>,
        activities: Vec<ActivityRow>,
    ) -> Result<Self, HighscoreError> {
        if skills.len() != SKILL_ROW_COUNT {
            return Err(HighscoreError::MalformedData(format!(
                "expected {SKILL_ROW_COUNT} skill rows, got {}",
                skills.len()
            )));
        }
        Ok(Self { skills, activities })
    }

    pub fn skills(&self) -> &[SkillRow] {
        &self.skills
    }

    pub fn activities(&self) -> &[ActivityRow] {
        &self.activities
    }

    pub fn skill(&self, skill: Skill) -> &SkillRow {
        &self.skills[skill.index()]
    }

    pub fn level(&self, skill: Skill) -> i64 {
        self.skill(skill).level
    }

    /// Serialize back into the upstream `index_lite.ws` text format.
    pub fn to_raw_text(&self) -> String {
        let mut out = String::new();
        for row in &self.skills {
            out.push_str(&format!("{},{},{}\n", row.rank, row.level, row.experience));
        }
        for row in &self.activities {
            out.push_str(&format!("{},{}\n", row.rank, row.amount));
        }
        out
    }
}

/// Parse raw highscores text into a snapshot.
///
/// Records are newline separated and the body ends with a newline, so the
/// final empty record is dropped. `-1` means "no data" upstream and becomes 0.
pub fn parse_snapshot(raw: &str) -> Result<Snapshot, HighscoreError> {
    if raw.contains(NOT_FOUND_MARKER) {
        return Err(HighscoreError::AccountNotFound);
    }

    let mut records: Vec<&str> = raw.split('\n').map(|r| r.trim_end_matches('\r')).collect();
    if records.last().is_some_and(|last| last.trim().is_empty()) {
        records.pop();
    }

    if records.len() < SKILL_ROW_COUNT {
        return Err(HighscoreError::MalformedData(format!(
            "expected at least {SKILL_ROW_COUNT} records, got {}",
            records.len()
        )));
    }

    let mut skills = Vec::with_capacity(SKILL_ROW_COUNT);
    let mut activities = Vec::with_capacity(records.len() - SKILL_ROW_COUNT);

    for (index, record) in records.iter().enumerate() {
        let fields = parse_fields(record, index)?;
        if index < SKILL_ROW_COUNT {
            let [rank, level, experience] = fields[..] else {
                return Err(field_count_error(index, 3, fields.len()));
            };
            skills.push(SkillRow {
                rank,
                level,
                experience,
            });
        } else {
            let [rank, amount] = fields[..] else {
                return Err(field_count_error(index, 2, fields.len()));
            };
            activities.push(ActivityRow { rank, amount });
        }
    }

    Snapshot::new(skills, activities)
}

fn parse_fields(record: &str, index: usize) -> Result<Vec<i64>, HighscoreError> {
    record
        .split(',')
        .map(|field| {
            let field = field.trim();
            if field == NO_DATA_SENTINEL {
                return Ok(0);
            }
            match field.parse::<i64>() {
                Ok(value) if value >= 0 => Ok(value),
                _ => Err(HighscoreError::MalformedData(format!(
                    "record {index} has invalid field '{field}'"
                ))),
            }
        })
        .collect()
}

fn field_count_error(index: usize, expected: usize, got: usize) -> HighscoreError {
    HighscoreError::MalformedData(format!(
        "record {index} has {got} fields, expected {expected}"
    ))
}


#[cfg(test)]
mod tests {
    use super::fixtures::raw_with_levels;
    use super::*;

    #[test]
    fn parses_skills_and_activities_in_order() {
        let snapshot = parse_snapshot(&raw_with_levels(50, 9)).expect("parse");

        assert_eq!(snapshot.skills().len(), SKILL_ROW_COUNT);
        assert_eq!(snapshot.activities().len(), 9);
        assert_eq!(
            *snapshot.skill(Skill::Attack),
            SkillRow {
                rank: 1001,
                level: 50,
                experience: 100,
            }
        );
        assert_eq!(snapshot.activities()[2], ActivityRow { rank: 502, amount: 2 });
    }

    #[test]
    fn reserializes_to_the_original_text() {
        let raw = raw_with_levels(73, 9);
        let snapshot = parse_snapshot(&raw).expect("parse");
        assert_eq!(snapshot.to_raw_text(), raw);
    }

    #[test]
    fn normalizes_no_data_sentinels_to_zero() {
        let raw = raw_with_levels(1, 2).replace("500,0", "-1,-1");
        let snapshot = parse_snapshot(&raw).expect("parse");
        assert_eq!(snapshot.activities()[0], ActivityRow { rank: 0, amount: 0 });
    }

    #[test]
    fn all_zero_snapshot_is_not_a_missing_account() {
        let mut raw = String::new();
        for _ in 0..SKILL_ROW_COUNT {
            raw.push_str("-1,-1,-1\n");
        }
        raw.push_str("-1,-1\n");

        let snapshot = parse_snapshot(&raw).expect("zeros parse");
        assert!(snapshot.skills().iter().all(|row| *row == SkillRow::default()));
    }

    #[test]
    fn not_found_page_maps_to_account_not_found() {
        let page = format!("<html><head>{NOT_FOUND_MARKER}</head></html>");
        assert_eq!(parse_snapshot(&page), Err(HighscoreError::AccountNotFound));
    }

    #[test]
    fn rejects_records_with_wrong_field_counts() {
        let raw = raw_with_levels(1, 1).replacen("1000,1,0", "1000,1", 1);
        assert!(matches!(
            parse_snapshot(&raw),
            Err(HighscoreError::MalformedData(_))
        ));

        let raw = format!("{}1,2,3\n", raw_with_levels(1, 0));
        assert!(matches!(
            parse_snapshot(&raw),
            Err(HighscoreError::MalformedData(_))
        ));
    }

    #[test]
    fn rejects_truncated_and_non_numeric_bodies() {
        assert!(parse_snapshot("1,2,3\n").is_err());
        let raw = raw_with_levels(1, 0).replacen("1000", "abc", 1);
        assert!(parse_snapshot(&raw).is_err());
    }

    #[test]
    fn json_round_trip_is_lossless_and_validated() {
        let snapshot = parse_snapshot(&raw_with_levels(42, 9)).expect("parse");
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let back: Snapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snapshot);

        let short = r#"{"skills":[],"activities":[]}"#;
        assert!(serde_json::from_str::<Snapshot>(short).is_err());
    }
}
