use crate::analysis::experience::{experience_between, experience_for_level, MAX_LEVEL};
use crate::error::HighscoreError;
use crate::report::format::group_thousands;

fn invalid(message: &str) -> HighscoreError {
    HighscoreError::InvalidInput(message.to_string())
}

fn parse_level(raw: &str) -> Result<u32, HighscoreError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("max") {
        return Ok(MAX_LEVEL);
    }

    let level: i64 = raw.parse().map_err(|_| {
        invalid("Invalid input. Excessive characters or level(s) not convertible to number was given.")
    })?;
    if level > i64::from(MAX_LEVEL) {
        return Err(invalid(
            "Too big level was given. The biggest level in game can be given as 127 or max.",
        ));
    }
    if level < 1 {
        return Err(invalid(
            "Too small level was given. The smallest level in game is 1.",
        ));
    }
    Ok(level as u32)
}

/// `N` for the experience of one level, `A-B` for the gap between two.
pub fn xp_command(args: &str) -> Result<String, HighscoreError> {
    let levels = args
        .split('-')
        .map(parse_level)
        .collect::<Result<Vec<_>, _>>();

    match levels?.as_slice() {
        [target] => {
            let xp = experience_for_level(*target).unwrap_or_default();
            Ok(format!(
                "Experience needed for level {target}: {}",
                group_thousands(xp)
            ))
        }
        [start, target] => {
            if target < start {
                return Err(invalid("Target level can't be smaller than starting level."));
            }
            let xp = experience_between(*start, *target).unwrap_or_default();
            Ok(format!(
                "Experience needed in level gap {start} - {target}: {}",
                group_thousands(xp)
            ))
        }
        _ => Err(invalid(
            "Invalid input. This Command supports only one or two levels.",
        )),
    }
}
