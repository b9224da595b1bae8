use crate::utils::AppError;

pub mod availability;
pub mod booking;
pub mod content;
pub mod course;
pub mod pricing;
pub mod pro_request;
pub mod profile;

pub const MIN_PLAYERS: i32 = 1;
pub const MAX_PLAYERS: i32 = 4;
pub const LESSON_HOLES: [i32; 2] = [9, 18];

pub fn validate_players(players: i32) -> Result<(), AppError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(AppError::ValidationError(format!(
            "Number of players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }
    Ok(())
}

pub fn validate_holes(holes: i32) -> Result<(), AppError> {
    if !LESSON_HOLES.contains(&holes) {
        return Err(AppError::ValidationError(
            "Holes must be either 9 or 18".to_string(),
        ));
    }
    Ok(())
}
