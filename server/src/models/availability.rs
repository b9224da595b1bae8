use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{MAX_PLAYERS, MIN_PLAYERS};
use crate::utils::AppError;

/// A bookable (course, date, time range) unit offered by a pro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProAvailability {
    pub id: Uuid,
    pub pro_id: Uuid,
    pub golf_course_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_players: i32,
    pub current_bookings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProAvailability {
    pub fn remaining_places(&self) -> i32 {
        (self.max_players - self.current_bookings).max(0)
    }

    pub fn can_accommodate(&self, players: i32) -> bool {
        players <= self.remaining_places()
    }

    /// Rejects a party that would push `current_bookings` past `max_players`.
    pub fn ensure_capacity(&self, players: i32) -> Result<(), AppError> {
        if self.can_accommodate(players) {
            Ok(())
        } else {
            Err(AppError::CapacityExceeded)
        }
    }
}

fn validate_max_players(max_players: i32) -> Result<(), AppError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&max_players) {
        return Err(AppError::ValidationError(format!(
            "max_players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub golf_course_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_players: i32,
}

impl CreateAvailabilityRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), AppError> {
        if self.start_time >= self.end_time {
            return Err(AppError::ValidationError(
                "start_time must be before end_time".to_string(),
            ));
        }
        if self.date < today {
            return Err(AppError::ValidationError(
                "Cannot open a slot in the past".to_string(),
            ));
        }
        validate_max_players(self.max_players)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub max_players: i32,
}

impl UpdateAvailabilityRequest {
    /// The new capacity must still hold the players already booked.
    pub fn validate_against(&self, slot: &ProAvailability) -> Result<(), AppError> {
        validate_max_players(self.max_players)?;
        if self.max_players < slot.current_bookings {
            return Err(AppError::Conflict(format!(
                "{} players are already booked on this slot",
                slot.current_bookings
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub course_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AvailabilityQuery {
    /// Lower bound never earlier than today: past slots are not bookable.
    pub fn window(&self, today: NaiveDate) -> Result<(NaiveDate, Option<NaiveDate>), AppError> {
        let from = self.from.map_or(today, |from| from.max(today));
        if let Some(to) = self.to {
            if to < from {
                return Err(AppError::ValidationError(
                    "'to' must not be before 'from'".to_string(),
                ));
            }
        }
        Ok((from, self.to))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn slot(max_players: i32, current_bookings: i32) -> ProAvailability {
        let now = Utc::now();
        ProAvailability {
            id: Uuid::new_v4(),
            pro_id: Uuid::new_v4(),
            golf_course_id: Uuid::new_v4(),
            date: now.date_naive(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            max_players,
            current_bookings,
            created_at: now,
            updated_at: now,
        }
    }
}
