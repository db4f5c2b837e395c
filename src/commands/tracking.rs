use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::analysis::combat::combat_level;
use crate::analysis::gains::{compute_gains, compute_skill_gains};
use crate::commands::db::{
    delete_tracked_account, insert_tracked_account, load_tracked_account,
    rename_tracked_account, upsert_tracked_account,
};
use crate::commands::highscores::{fetch_snapshot, SnapshotSource};
use crate::error::HighscoreError;
use crate::models::account::AccountVariant;
use crate::models::tracked::TrackedAccount;
use crate::report::{render_report, ReportInput, ReportRows};

pub async fn stats_command<S: SnapshotSource>(
    source: &S,
    username: &str,
    variant: AccountVariant,
) -> Result<String, HighscoreError> {
    let snapshot = fetch_snapshot(source, username, variant).await?;

    render_report(&ReportInput {
        rows: ReportRows::Stats(&snapshot),
        username,
        combat_level: combat_level(&snapshot),
        account_variant: variant,
        old_timestamp: None,
        new_timestamp: None,
    })
}

/// `[type,] username`. Without a type the account is tracked as normal.
fn parse_track_args(args: &str) -> Result<(AccountVariant, &str), HighscoreError> {
    let (variant, username) = match args.split_once(',') {
        Some((kind, username)) => (AccountVariant::from_track_arg(kind)?, username.trim()),
        None => (AccountVariant::Normal, args.trim()),
    };

    if username.is_empty() {
        return Err(HighscoreError::InvalidInput(
            "Give a username to track.".to_string(),
        ));
    }
    if !variant.is_trackable() {
        return Err(HighscoreError::InvalidAccountType(
            variant.as_tag().to_string(),
        ));
    }

    Ok((variant, username))
}

pub async fn track_command<S: SnapshotSource>(
    source: &S,
    conn: &Connection,
    args: &str,
    now: DateTime<Utc>,
) -> Result<String, HighscoreError> {
    let (variant, username) = parse_track_args(args)?;
    if load_tracked_account(conn, username)?.is_some() {
        return Err(HighscoreError::AlreadyTracked {
            username: username.to_string(),
        });
    }

    let snapshot = fetch_snapshot(source, username, variant)
        .await
        .map_err(|err| match err {
            HighscoreError::AccountNotFound => HighscoreError::NoHighscoresForVariant {
                username: username.to_string(),
                variant: variant.as_tag(),
            },
            other => other,
        })?;
    let account = TrackedAccount {
        username: TrackedAccount::key(username),
        display_name: username.to_string(),
        account_variant: variant,
        combat_level: combat_level(&snapshot),
        snapshot,
        saved_at: now.timestamp(),
        old_names: Vec::new(),
    };

    if !insert_tracked_account(conn, &account)? {
        return Err(HighscoreError::AlreadyTracked {
            username: username.to_string(),
        });
    }

    log::info!("started tracking {} ({})", account.username, variant.as_tag());
    Ok(format!(
        "Started tracking user {username}. Account type: {}",
        variant.as_tag()
    ))
}

/// Report what changed since the stored snapshot, then make the current
/// snapshot the new baseline.
///
/// When upstream changed the number of activity rows in between, the
/// activity tail cannot be compared. Skills are still reported, activities
/// show zero and a notice is appended; the new snapshot replaces the stale
/// one so the next call compares normally.
pub async fn gains_command<S: SnapshotSource>(
    source: &S,
    conn: &Connection,
    username: &str,
    now: DateTime<Utc>,
) -> Result<String, HighscoreError> {
    let mut account = load_tracked_account(conn, username)?.ok_or_else(|| {
        HighscoreError::NotTracked {
            username: username.to_string(),
        }
    })?;

    let snapshot = fetch_snapshot(source, &account.display_name, account.account_variant).await?;

    let (gains, notice) = match compute_gains(&account.snapshot, &snapshot) {
        Ok(gains) => (gains, None),
        Err(err @ HighscoreError::SchemaMismatch { .. }) => {
            log::warn!("{}: {err}, saving a new baseline", account.username);
            (
                compute_skill_gains(&account.snapshot, &snapshot),
                Some(err.user_message()),
            )
        }
        Err(err) => return Err(err),
    };

    let mut reply = render_report(&ReportInput {
        rows: ReportRows::Gains(&gains),
        username: &account.display_name,
        combat_level: gains.combat_delta,
        account_variant: account.account_variant,
        old_timestamp: DateTime::from_timestamp(account.saved_at, 0),
        new_timestamp: Some(now),
    })?;
    if let Some(notice) = notice {
        reply.push('\n');
        reply.push_str(&notice);
    }

    account.combat_level = combat_level(&snapshot);
    account.snapshot = snapshot;
    account.saved_at = now.timestamp();
    upsert_tracked_account(conn, &account)?;

    Ok(reply)
}

pub async fn reset_command<S: SnapshotSource>(
    source: &S,
    conn: &Connection,
    username: &str,
    now: DateTime<Utc>,
) -> Result<String, HighscoreError> {
    let mut account = load_tracked_account(conn, username)?.ok_or_else(|| {
        HighscoreError::NotTracked {
            username: username.to_string(),
        }
    })?;

    let snapshot = fetch_snapshot(source, &account.display_name, account.account_variant).await?;
    account.combat_level = combat_level(&snapshot);
    account.snapshot = snapshot;
    account.saved_at = now.timestamp();
    upsert_tracked_account(conn, &account)?;

    Ok(format!("Saved new stats for {}.", account.display_name))
}

pub fn untrack_command(conn: &Connection, username: &str) -> Result<String, HighscoreError> {
    if !delete_tracked_account(conn, username)? {
        return Err(HighscoreError::NotTracked {
            username: username.to_string(),
        });
    }
    Ok(format!("Stopped tracking user {}.", username.trim()))
}

/// `old name, new name`
pub fn rename_command(conn: &Connection, args: &str) -> Result<String, HighscoreError> {
    let Some((old_name, new_name)) = args
        .split_once(',')
        .map(|(old, new)| (old.trim(), new.trim()))
        .filter(|(old, new)| !old.is_empty() && !new.is_empty())
    else {
        return Err(HighscoreError::InvalidInput(
            "Give the old and the new username separated by a comma.".to_string(),
        ));
    };

    let account = rename_tracked_account(conn, old_name, new_name)?;
    Ok(format!(
        "Renamed {old_name} to {}. Old names: {}",
        account.display_name,
        account.old_names.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_args_default_to_normal() {
        assert_eq!(
            parse_track_args(" Zezima ").expect("args"),
            (AccountVariant::Normal, "Zezima")
        );
        assert_eq!(
            parse_track_args("hc, Lynx Titan").expect("args"),
            (AccountVariant::Hardcore, "Lynx Titan")
        );
    }

    #[test]
    fn track_args_reject_unknown_type_and_empty_name() {
        assert_eq!(
            parse_track_args("dmm, Zezima"),
            Err(HighscoreError::InvalidAccountType("dmm".to_string()))
        );
        assert!(matches!(
            parse_track_args("ironman, "),
            Err(HighscoreError::InvalidInput(_))
        ));
    }
}
