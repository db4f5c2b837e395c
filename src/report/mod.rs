pub mod format;
pub mod table;

use chrono::{DateTime, Utc};

use crate::error::HighscoreError;
use crate::models::account::AccountVariant;
use crate::models::gains::GainsResult;
use crate::models::snapshot::{Skill, Snapshot};
use format::format_cell;
use table::{render_table, Align};

/// Activity rows in the order the highscores API lists them after skills.
///
/// Fixed to the nine-row layout. When upstream lengthens the tail every
/// report fails with `LabelMismatch` until an operator adds the new names here.
pub const ACTIVITY_NAMES: [&str; 9] = [
    "Bounty Hunter - Hunter",
    "Bounty Hunter - Rogue",
    "Clue Scrolls (all)",
    "Clue Scrolls (easy)",
    "Clue Scrolls (medium)",
    "Clue Scrolls (hard)",
    "Clue Scrolls (elite)",
    "Clue Scrolls (master)",
    "LMS - Rank",
];

pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

const TITLE_WIDTH: usize = 50;
const SKILL_HEADERS: [&str; 4] = ["Name", "Rank", "Level", "Xp"];
const ACTIVITY_HEADERS: [&str; 3] = ["Name", "Rank", "Amount"];

#[derive(Debug, Clone, Copy)]
pub enum ReportRows<'a> {
    Stats(&'a Snapshot),
    Gains(&'a GainsResult),
}

#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub rows: ReportRows<'a>,
    pub username: &'a str,
    /// Absolute level for stats, signed delta for gains.
    pub combat_level: i64,
    pub account_variant: AccountVariant,
    pub old_timestamp: Option<DateTime<Utc>>,
    pub new_timestamp: Option<DateTime<Utc>>,
}

impl ReportInput<'_> {
    fn is_gains(&self) -> bool {
        matches!(self.rows, ReportRows::Gains(_))
    }
}

/// Render the stats or gains report as one fenced code block.
pub fn render_report(input: &ReportInput<'_>) -> Result<String, HighscoreError> {
    let signed = input.is_gains();
    let (skill_rows, activity_rows) = match input.rows {
        ReportRows::Stats(snapshot) => (
            snapshot
                .skills()
                .iter()
                .map(|row| [row.rank, row.level, row.experience].to_vec())
                .collect::<Vec<_>>(),
            snapshot
                .activities()
                .iter()
                .map(|row| [row.rank, row.amount].to_vec())
                .collect::<Vec<_>>(),
        ),
        ReportRows::Gains(gains) => (
            gains
                .skills
                .iter()
                .map(|row| [row.rank, row.level, row.experience].to_vec())
                .collect(),
            gains
                .activities
                .iter()
                .map(|row| [row.rank, row.amount].to_vec())
                .collect(),
        ),
    };

    let skill_names: Vec<&str> = Skill::ALL.iter().map(|skill| skill.name()).collect();
    let skills = labelled_table(
        "skills",
        &skill_names,
        &SKILL_HEADERS,
        &skill_rows,
        signed,
    )?;
    let activities = labelled_table(
        "activities",
        &ACTIVITY_NAMES,
        &ACTIVITY_HEADERS,
        &activity_rows,
        signed,
    )?;

    Ok(format!(
        "```\n{}\n\n{skills}\n\n{activities}\n```",
        render_header(input)
    ))
}

fn render_header(input: &ReportInput<'_>) -> String {
    let title = if input.is_gains() {
        format!("Gains for {}", input.username)
    } else {
        format!("Stats of {}", input.username)
    };
    let mut lines = vec![format!("{title:^width$}", width = TITLE_WIDTH).trim_end().to_string()];

    if input.is_gains() {
        if let (Some(old), Some(new)) = (input.old_timestamp, input.new_timestamp) {
            lines.push(format!(
                "Between {} - {} UTC",
                old.format(TIMESTAMP_FORMAT),
                new.format(TIMESTAMP_FORMAT)
            ));
        }
    }
    if input.account_variant != AccountVariant::Normal {
        lines.push(format!(
            "Account type: {}",
            input.account_variant.display_name()
        ));
    }
    lines.push(format!(
        "Combat level: {}",
        format_cell(input.combat_level, input.is_gains())
    ));

    lines.join("\n")
}

fn labelled_table(
    table: &'static str,
    labels: &[&str],
    headers: &[&str],
    rows: &[Vec<i64>],
    signed: bool,
) -> Result<String, HighscoreError> {
    if labels.len() != rows.len() {
        return Err(HighscoreError::LabelMismatch {
            table,
            labels: labels.len(),
            rows: rows.len(),
        });
    }

    let cells: Vec<Vec<String>> = labels
        .iter()
        .zip(rows)
        .map(|(label, values)| {
            std::iter::once(label.to_string())
                .chain(values.iter().map(|value| format_cell(*value, signed)))
                .collect()
        })
        .collect();

    let mut aligns = vec![Align::Right; headers.len()];
    aligns[0] = Align::Left;

    Ok(render_table(headers, &aligns, &cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::gains::compute_gains;
    use crate::models::snapshot::fixtures::snapshot_with_levels;
    use chrono::TimeZone;

    fn stats_input(snapshot: &Snapshot) -> ReportInput<'_> {
        ReportInput {
            rows: ReportRows::Stats(snapshot),
            username: "Zezima",
            combat_level: 63,
            account_variant: AccountVariant::Normal,
            old_timestamp: None,
            new_timestamp: None,
        }
    }

    #[test]
    fn stats_report_is_fenced_and_labelled() {
        let snapshot = snapshot_with_levels(50, ACTIVITY_NAMES.len());
        let report = render_report(&stats_input(&snapshot)).expect("render");

        assert!(report.starts_with("```\n"));
        assert!(report.ends_with("\n```"));
        assert!(report.contains("Stats of Zezima"));
        assert!(report.contains("Combat level: 63"));
        assert!(!report.contains("Account type"));
        assert!(report.contains("| Total        | 1 000 |    50 |     0 |"));
        assert!(report.contains("| Construction | 1 023 |    50 | 2 300 |"));
        assert!(report.contains("| LMS - Rank             |  508 |      8 |"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let snapshot = snapshot_with_levels(50, ACTIVITY_NAMES.len());
        let input = stats_input(&snapshot);
        assert_eq!(render_report(&input), render_report(&input));
    }

    #[test]
    fn gains_report_signs_positive_values_and_shows_dates() {
        let old = snapshot_with_levels(50, ACTIVITY_NAMES.len());
        let new = snapshot_with_levels(52, ACTIVITY_NAMES.len());
        let gains = compute_gains(&old, &new).expect("gains");

        let input = ReportInput {
            rows: ReportRows::Gains(&gains),
            username: "Zezima",
            combat_level: gains.combat_delta,
            account_variant: AccountVariant::Hardcore,
            old_timestamp: Some(Utc.with_ymd_and_hms(2019, 3, 1, 12, 0, 0).unwrap()),
            new_timestamp: Some(Utc.with_ymd_and_hms(2019, 3, 8, 18, 30, 0).unwrap()),
        };
        let report = render_report(&input).expect("render");

        assert!(report.contains("Gains for Zezima"));
        assert!(report.contains("Between 01/03/2019 12:00 - 08/03/2019 18:30 UTC"));
        assert!(report.contains("Account type: Hardcore ironman"));
        assert!(report.contains("Combat level: +3"));
        assert!(report.contains("| Attack       |    0 |    +2 |  0 |"));
    }

    #[test]
    fn activity_count_without_labels_is_a_label_mismatch() {
        let snapshot = snapshot_with_levels(50, ACTIVITY_NAMES.len() + 1);
        assert_eq!(
            render_report(&stats_input(&snapshot)),
            Err(HighscoreError::LabelMismatch {
                table: "activities",
                labels: ACTIVITY_NAMES.len(),
                rows: ACTIVITY_NAMES.len() + 1,
            })
        );
    }
}
