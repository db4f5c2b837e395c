pub mod clues;
pub mod db;
pub mod dispatch;
pub mod highscores;
pub mod settings;
pub mod tracking;
pub mod xp;
