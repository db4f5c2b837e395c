use thiserror::Error;

/// Every failure a highscores command can hit, from fetch to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighscoreError {
    #[error("account does not exist on the highscores")]
    AccountNotFound,

    #[error("no {variant} highscores for {username}")]
    NoHighscoresForVariant { username: String, variant: &'static str },

    #[error("highscores request timed out")]
    FetchTimeout,

    #[error("highscores unavailable: {0}")]
    FetchUnavailable(String),

    #[error("malformed highscores data: {0}")]
    MalformedData(String),

    #[error("activity row count changed from {old} to {new}")]
    SchemaMismatch { old: usize, new: usize },

    #[error("{table} table has {labels} labels for {rows} rows")]
    LabelMismatch {
        table: &'static str,
        labels: usize,
        rows: usize,
    },

    #[error("{username} is not being tracked")]
    NotTracked { username: String },

    #[error("{username} is already being tracked")]
    AlreadyTracked { username: String },

    #[error("invalid account type: {0}")]
    InvalidAccountType(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(String),
}

impl HighscoreError {
    /// Reply text shown to the chat user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::AccountNotFound => {
                "Could not find any highscores with that username.".to_string()
            }
            Self::NoHighscoresForVariant { .. } => {
                "Could not find any highscores with that account type or username.".to_string()
            }
            Self::FetchTimeout | Self::FetchUnavailable(_) => {
                "Osrs highscores answer too slowly. Try again later.".to_string()
            }
            Self::MalformedData(_) | Self::Store(_) => {
                "Something went wrong while handling the highscores. The error has been logged."
                    .to_string()
            }
            Self::SchemaMismatch { .. } => {
                "The highscores have changed since the last save. Stats were saved again, \
                 gains will be shown normally next time."
                    .to_string()
            }
            Self::LabelMismatch { .. } => {
                "The highscores layout is newer than this bot knows. An operator needs to \
                 update the activity names."
                    .to_string()
            }
            Self::NotTracked { .. } => "This user is not being tracked.".to_string(),
            Self::AlreadyTracked { .. } => "This user is already being tracked.".to_string(),
            Self::InvalidAccountType(_) => "Invalid account type.".to_string(),
            Self::InvalidInput(reason) => reason.clone(),
        }
    }
}

impl From<rusqlite::Error> for HighscoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for HighscoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("snapshot serialization: {err}"))
    }
}
