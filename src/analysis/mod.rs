pub mod combat;
pub mod experience;
pub mod gains;
