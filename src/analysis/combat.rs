use crate::models::snapshot::{Skill, Snapshot};

/// Combat level of the account in `snapshot`.
///
/// Each floor sits where the game applies it; flooring only the final sum
/// gives different results for odd prayer or ranged/magic levels.
pub fn combat_level(snapshot: &Snapshot) -> i64 {
    combat_level_from_levels(CombatLevels {
        attack: snapshot.level(Skill::Attack),
        defence: snapshot.level(Skill::Defence),
        strength: snapshot.level(Skill::Strength),
        hitpoints: snapshot.level(Skill::Hitpoints),
        ranged: snapshot.level(Skill::Ranged),
        prayer: snapshot.level(Skill::Prayer),
        magic: snapshot.level(Skill::Magic),
    })
}

#[derive(Debug, Clone, Copy)]
pub struct CombatLevels {
    pub attack: i64,
    pub defence: i64,
    pub strength: i64,
    pub hitpoints: i64,
    pub ranged: i64,
    pub prayer: i64,
    pub magic: i64,
}

/// Works in fortieths so 0.25 and 0.325 become the integers 10 and 13 and
/// no float rounding can land a whole level on the wrong side of a floor.
pub fn combat_level_from_levels(levels: CombatLevels) -> i64 {
    let base = 10 * (levels.defence + levels.hitpoints + levels.prayer / 2);
    let melee = 13 * (levels.attack + levels.strength);
    let ranged = 13 * (3 * levels.ranged / 2);
    let magic = 13 * (3 * levels.magic / 2);

    (base + melee.max(ranged).max(magic)).div_euclid(40)
}
