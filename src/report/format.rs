/// Separator placed between groups of three digits.
pub const THOUSANDS_SEPARATOR: char = ' ';

/// `1234567` -> `1 234 567`, `-4500` -> `-4 500`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }

    grouped
}

/// Table cell text. With `signed`, positive values get an explicit `+`;
/// zero and negatives keep their natural sign.
pub fn format_cell(value: i64, signed: bool) -> String {
    if signed && value > 0 {
        format!("+{}", group_thousands(value))
    } else {
        group_thousands(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_three_from_the_right() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1 000");
        assert_eq!(group_thousands(1_234_567), "1 234 567");
        assert_eq!(group_thousands(-45_000), "-45 000");
        assert_eq!(group_thousands(i64::MIN), "-9 223 372 036 854 775 808");
    }

    #[test]
    fn signs_only_positive_gains() {
        assert_eq!(format_cell(1_500, true), "+1 500");
        assert_eq!(format_cell(0, true), "0");
        assert_eq!(format_cell(-20, true), "-20");
        assert_eq!(format_cell(1_500, false), "1 500");
    }
}
