pub mod analysis;
pub mod commands;
pub mod error;
pub mod models;
pub mod report;

use commands::{
    db::get_db_connection,
    dispatch::{dispatch, BotContext},
    highscores::HttpSnapshotSource,
    settings::load_bot_settings,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Serve commands from stdin until it closes. State lives under
/// `<data_dir>/.osrs_helper/`.
pub async fn run(data_dir: &str) -> Result<(), String> {
    let settings = load_bot_settings(data_dir)?;

    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(settings.log_level)
        .init();

    log::info!("OSRS Helper starting up in {data_dir}");

    let conn = get_db_connection(data_dir).map_err(|e| format!("DB error: {e}"))?;
    let source = HttpSnapshotSource::new(
        &settings.highscores_base_url,
        settings.request_timeout,
        &settings.user_agent,
    )?;
    let ctx = BotContext {
        source,
        conn,
        settings,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("Failed to read stdin: {e}"))?
    {
        if let Some(reply) = dispatch(&ctx, &line, chrono::Utc::now()).await {
            println!("{reply}");
        }
    }

    log::info!("stdin closed, shutting down");
    Ok(())
}
