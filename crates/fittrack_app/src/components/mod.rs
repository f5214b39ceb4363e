//! Presentational components: pure functions from data to text.

pub mod exercise_card;
pub mod layout;
pub mod stat_card;
pub mod workout_card;

pub use exercise_card::exercise_card;
pub use layout::{footer, header};
pub use stat_card::stat_card;
pub use workout_card::workout_card;
