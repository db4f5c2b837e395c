use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::commands::clues::{anagram_command, cipher_command, cryptic_command};
use crate::commands::highscores::SnapshotSource;
use crate::commands::settings::BotSettings;
use crate::commands::tracking::{
    gains_command, rename_command, reset_command, stats_command, track_command,
    untrack_command,
};
use crate::commands::xp::xp_command;
use crate::error::HighscoreError;
use crate::models::account::AccountVariant;

/// Everything a command may need, owned by the console loop.
pub struct BotContext<S> {
    pub source: S,
    pub conn: Connection,
    pub settings: BotSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Stats(AccountVariant),
    Track,
    Gains,
    Reset,
    Untrack,
    Rename,
    Anagram,
    Cipher,
    Cryptic,
    Xp,
    Help,
}

impl Route {
    fn from_word(word: &str) -> Option<Self> {
        let route = match word {
            "track" => Self::Track,
            "gains" => Self::Gains,
            "reset" => Self::Reset,
            "untrack" => Self::Untrack,
            "rename" => Self::Rename,
            "anagram" => Self::Anagram,
            "cipher" => Self::Cipher,
            "cryptic" => Self::Cryptic,
            "xp" | "exp" | "level" | "lvl" => Self::Xp,
            "help" | "commands" => Self::Help,
            other => {
                let prefix = other.strip_suffix("stats")?;
                Self::Stats(AccountVariant::from_stats_prefix(prefix)?)
            }
        };
        Some(route)
    }

    fn usage(self) -> &'static str {
        match self {
            Self::Stats(_) => "stats <username>",
            Self::Track => "track [normal|ironman|hcim|uim,] <username>",
            Self::Gains => "gains <username>",
            Self::Reset => "reset <username>",
            Self::Untrack => "untrack <username>",
            Self::Rename => "rename <old name>, <new name>",
            Self::Anagram => "anagram <search>",
            Self::Cipher => "cipher <search>",
            Self::Cryptic => "cryptic <search>",
            Self::Xp => "xp <level> | <level>-<level>",
            Self::Help => "help",
        }
    }
}

/// Split `<prefix><command> <args>` into its route and argument text.
/// Lines without the prefix and unknown commands yield `None`.
pub fn parse_command<'a>(line: &'a str, prefix: &str) -> Option<(Route, &'a str)> {
    let body = line.trim().strip_prefix(prefix)?;
    let (word, args) = match body.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (body, ""),
    };
    Route::from_word(&word.to_lowercase()).map(|route| (route, args))
}

fn help_text(prefix: &str) -> String {
    let routes = [
        Route::Stats(AccountVariant::Normal),
        Route::Track,
        Route::Gains,
        Route::Reset,
        Route::Untrack,
        Route::Rename,
        Route::Anagram,
        Route::Cipher,
        Route::Cryptic,
        Route::Xp,
    ];
    let lines: Vec<String> = routes
        .iter()
        .map(|route| format!("{prefix}{}", route.usage()))
        .collect();

    format!(
        "Commands:\n{}\nStats of other highscores: {prefix}ironstats, {prefix}uimstats, \
         {prefix}hcstats, {prefix}dmmstats, {prefix}seasonstats, {prefix}tournamentstats",
        lines.join("\n")
    )
}

/// Answer one console line. Errors never escape: each one becomes a reply.
pub async fn dispatch<S: SnapshotSource>(
    ctx: &BotContext<S>,
    line: &str,
    now: DateTime<Utc>,
) -> Option<String> {
    let prefix = ctx.settings.command_prefix.as_str();
    let (route, args) = parse_command(line, prefix)?;

    if args.is_empty() && route != Route::Help {
        return Some(format!("Usage: {prefix}{}", route.usage()));
    }

    let result = match route {
        Route::Stats(variant) => stats_command(&ctx.source, args, variant).await,
        Route::Track => track_command(&ctx.source, &ctx.conn, args, now).await,
        Route::Gains => gains_command(&ctx.source, &ctx.conn, args, now).await,
        Route::Reset => reset_command(&ctx.source, &ctx.conn, args, now).await,
        Route::Untrack => untrack_command(&ctx.conn, args),
        Route::Rename => rename_command(&ctx.conn, args),
        Route::Anagram => anagram_command(&ctx.conn, args, ctx.settings.max_clue_matches),
        Route::Cipher => cipher_command(&ctx.conn, args, ctx.settings.max_clue_matches),
        Route::Cryptic => cryptic_command(&ctx.conn, args),
        Route::Xp => xp_command(args),
        Route::Help => Ok(help_text(prefix)),
    };

    Some(result.unwrap_or_else(|err| {
        log_failure(route, &err);
        err.user_message()
    }))
}

fn log_failure(route: Route, err: &HighscoreError) {
    match err {
        HighscoreError::MalformedData(_)
        | HighscoreError::Store(_)
        | HighscoreError::LabelMismatch { .. } => log::error!("{route:?} failed: {err}"),
        HighscoreError::FetchTimeout | HighscoreError::FetchUnavailable(_) => {
            log::warn!("{route:?} failed: {err}")
        }
        _ => log::info!("{route:?} rejected: {err}"),
    }
}
