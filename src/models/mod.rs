pub mod account;
pub mod clue;
pub mod gains;
pub mod snapshot;
pub mod tracked;
