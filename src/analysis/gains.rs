use crate::analysis::combat::combat_level;
use crate::error::HighscoreError;
use crate::models::gains::{ActivityDelta, GainsResult, SkillDelta};
use crate::models::snapshot::{ActivityRow, SkillRow, Snapshot};

/// Row-by-row difference between `old` and `new`.
///
/// Rows are aligned by position only. Ranks are negated so climbing the
/// leaderboard reads as a positive gain. Fails with `SchemaMismatch` when the
/// activity tails differ in length, since upstream added or removed tracked
/// activities in between and positions no longer line up.
pub fn compute_gains(old: &Snapshot, new: &Snapshot) -> Result<GainsResult, HighscoreError> {
    let old_len = old.activities().len();
    let new_len = new.activities().len();
    if old_len != new_len {
        return Err(HighscoreError::SchemaMismatch {
            old: old_len,
            new: new_len,
        });
    }

    let activities = old
        .activities()
        .iter()
        .zip(new.activities())
        .map(|(before, after)| activity_delta(before, after))
        .collect();

    Ok(GainsResult {
        skills: skill_deltas(old, new),
        activities,
        combat_delta: combat_delta(old, new),
    })
}

/// Skill gains only, with every activity reported as zero.
///
/// Used for the cycle in which a stale snapshot is re-baselined after a
/// `SchemaMismatch`. The zero tail takes the length of `new` so it matches
/// the current activity labels.
pub fn compute_skill_gains(old: &Snapshot, new: &Snapshot) -> GainsResult {
    GainsResult {
        skills: skill_deltas(old, new),
        activities: vec![ActivityDelta::default(); new.activities().len()],
        combat_delta: combat_delta(old, new),
    }
}

fn skill_deltas(old: &Snapshot, new: &Snapshot) -> Vec<SkillDelta> {
    old.skills()
        .iter()
        .zip(new.skills())
        .map(|(before, after)| skill_delta(before, after))
        .collect()
}

fn skill_delta(before: &SkillRow, after: &SkillRow) -> SkillDelta {
    SkillDelta {
        rank: rank_gain(before.rank, after.rank),
        level: after.level - before.level,
        experience: after.experience - before.experience,
    }
}

fn activity_delta(before: &ActivityRow, after: &ActivityRow) -> ActivityDelta {
    ActivityDelta {
        rank: rank_gain(before.rank, after.rank),
        amount: after.amount - before.amount,
    }
}

fn rank_gain(before: i64, after: i64) -> i64 {
    -(after - before)
}

fn combat_delta(old: &Snapshot, new: &Snapshot) -> i64 {
    combat_level(new) - combat_level(old)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::fixtures::snapshot_with_levels;
    use crate::models::snapshot::{Skill, SKILL_ROW_COUNT};

    fn snapshot(skill: SkillRow, activities: &[ActivityRow]) -> Snapshot {
        Snapshot::new(vec![skill; SKILL_ROW_COUNT], activities.to_vec()).expect("snapshot")
    }

    #[test]
    fn lower_rank_is_reported_as_positive_gain() {
        let old = snapshot(
            SkillRow {
                rank: 500,
                level: 60,
                experience: 1000,
            },
            &[ActivityRow { rank: 80, amount: 3 }],
        );
        let new = snapshot(
            SkillRow {
                rank: 300,
                level: 61,
                experience: 1500,
            },
            &[ActivityRow { rank: 95, amount: 5 }],
        );

        let gains = compute_gains(&old, &new).expect("gains");

        assert_eq!(
            gains.skills[0],
            SkillDelta {
                rank: 200,
                level: 1,
                experience: 500,
            }
        );
        assert_eq!(gains.activities[0], ActivityDelta { rank: -15, amount: 2 });
    }

    #[test]
    fn identical_snapshots_have_zero_gains() {
        let snapshot = snapshot_with_levels(70, 9);
        let gains = compute_gains(&snapshot, &snapshot).expect("gains");

        assert!(gains.skills.iter().all(|delta| *delta == SkillDelta::default()));
        assert!(gains
            .activities
            .iter()
            .all(|delta| *delta == ActivityDelta::default()));
        assert_eq!(gains.combat_delta, 0);
    }

    #[test]
    fn combat_delta_follows_level_changes() {
        let old = snapshot_with_levels(50, 0);
        let new = snapshot_with_levels(60, 0);
        let gains = compute_gains(&old, &new).expect("gains");

        assert_eq!(gains.combat_delta, combat_level(&new) - combat_level(&old));
        assert!(gains.combat_delta > 0);
        assert_eq!(gains.skills[Skill::Magic.index()].level, 10);
    }

    #[test]
    fn activity_count_change_is_a_schema_mismatch() {
        let old = snapshot_with_levels(50, 9);
        let new = snapshot_with_levels(50, 10);

        assert_eq!(
            compute_gains(&old, &new),
            Err(HighscoreError::SchemaMismatch { old: 9, new: 10 })
        );
    }

    #[test]
    fn skill_only_gains_zero_the_new_activity_tail() {
        let old = snapshot_with_levels(50, 9);
        let new = snapshot_with_levels(51, 10);
        let gains = compute_skill_gains(&old, &new);

        assert_eq!(gains.activities.len(), 10);
        assert!(gains
            .activities
            .iter()
            .all(|delta| *delta == ActivityDelta::default()));
        assert_eq!(gains.skills[Skill::Total.index()].level, 1);
    }
}
