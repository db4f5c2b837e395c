/// Highest virtual level the game tracks experience for.
pub const MAX_LEVEL: u32 = 127;

/// Experience required to reach `level`, or `None` outside 1..=127.
pub fn experience_for_level(level: u32) -> Option<i64> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return None;
    }

    let points: f64 = (1..level)
        .map(|l| (l as f64 + 300.0 * 2f64.powf(l as f64 / 7.0)).floor())
        .sum();
    Some((points / 4.0).floor() as i64)
}

/// Experience between two levels. Negative when `to` is below `from`.
pub fn experience_between(from: u32, to: u32) -> Option<i64> {
    Some(experience_for_level(to)? - experience_for_level(from)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_table_values() {
        assert_eq!(experience_for_level(1), Some(0));
        assert_eq!(experience_for_level(2), Some(83));
        assert_eq!(experience_for_level(10), Some(1_154));
        assert_eq!(experience_for_level(99), Some(13_034_431));
        assert_eq!(experience_for_level(126), Some(188_884_740));
    }

    #[test]
    fn rejects_levels_outside_the_table() {
        assert_eq!(experience_for_level(0), None);
        assert_eq!(experience_for_level(128), None);
        assert_eq!(experience_between(0, 99), None);
    }

    #[test]
    fn gap_is_difference_of_table_values() {
        assert_eq!(experience_between(98, 99), Some(13_034_431 - 11_805_606));
        assert!(experience_between(99, 98).unwrap() < 0);
    }
}
