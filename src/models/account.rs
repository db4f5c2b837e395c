use serde::{Deserialize, Serialize};

use crate::error::HighscoreError;

/// Highscores partition an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountVariant {
    Normal,
    Ironman,
    Ultimate,
    Hardcore,
    Deadman,
    Seasonal,
    Tournament,
}

impl AccountVariant {
    pub const ALL: [AccountVariant; 7] = [
        AccountVariant::Normal,
        AccountVariant::Ironman,
        AccountVariant::Ultimate,
        AccountVariant::Hardcore,
        AccountVariant::Deadman,
        AccountVariant::Seasonal,
        AccountVariant::Tournament,
    ];

    /// Path segment of the upstream `index_lite.ws` endpoint.
    pub fn highscores_segment(self) -> &'static str {
        match self {
            Self::Normal => "hiscore_oldschool",
            Self::Ironman => "hiscore_oldschool_ironman",
            Self::Ultimate => "hiscore_oldschool_ultimate",
            Self::Hardcore => "hiscore_oldschool_hardcore_ironman",
            Self::Deadman => "hiscore_oldschool_deadman",
            Self::Seasonal => "hiscore_oldschool_seasonal",
            Self::Tournament => "hiscore_oldschool_tournament",
        }
    }

    /// Tag written to the `account_type` column.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Ironman => "ironman",
            Self::Ultimate => "uim",
            Self::Hardcore => "hcim",
            Self::Deadman => "dmm",
            Self::Seasonal => "seasonal",
            Self::Tournament => "tournament",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, HighscoreError> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_tag() == tag)
            .ok_or_else(|| HighscoreError::InvalidAccountType(tag.to_string()))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Ironman => "Ironman",
            Self::Ultimate => "Ultimate ironman",
            Self::Hardcore => "Hardcore ironman",
            Self::Deadman => "Deadman",
            Self::Seasonal => "Seasonal",
            Self::Tournament => "Tournament",
        }
    }

    /// Variant selected by a `<prefix>stats` command name, e.g. `ironstats`.
    pub fn from_stats_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "" => Some(Self::Normal),
            "iron" => Some(Self::Ironman),
            "uim" => Some(Self::Ultimate),
            "hc" => Some(Self::Hardcore),
            "dmm" => Some(Self::Deadman),
            "season" => Some(Self::Seasonal),
            "tournament" => Some(Self::Tournament),
            _ => None,
        }
    }

    /// Variant named in `track` arguments. Users reach for many spellings.
    pub fn from_track_arg(arg: &str) -> Result<Self, HighscoreError> {
        match arg.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "im" | "iron" | "ironman" => Ok(Self::Ironman),
            "hc" | "hcim" | "hardcore" => Ok(Self::Hardcore),
            "uim" | "ultimate" => Ok(Self::Ultimate),
            other => Err(HighscoreError::InvalidAccountType(other.to_string())),
        }
    }

    /// Only the four permanent partitions keep their snapshots comparable.
    pub fn is_trackable(self) -> bool {
        matches!(
            self,
            Self::Normal | Self::Ironman | Self::Hardcore | Self::Ultimate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_for_every_variant() {
        for variant in AccountVariant::ALL {
            assert_eq!(AccountVariant::from_tag(variant.as_tag()), Ok(variant));
        }
    }

    #[test]
    fn stats_prefixes_select_partitions() {
        assert_eq!(AccountVariant::from_stats_prefix(""), Some(AccountVariant::Normal));
        assert_eq!(
            AccountVariant::from_stats_prefix("hc"),
            Some(AccountVariant::Hardcore)
        );
        assert_eq!(AccountVariant::from_stats_prefix("foo"), None);
    }

    #[test]
    fn track_arguments_accept_abbreviations() {
        assert_eq!(AccountVariant::from_track_arg("IM"), Ok(AccountVariant::Ironman));
        assert_eq!(
            AccountVariant::from_track_arg("hardcore"),
            Ok(AccountVariant::Hardcore)
        );
        assert!(AccountVariant::from_track_arg("dmm").is_err());
        assert!(!AccountVariant::Seasonal.is_trackable());
    }
}
