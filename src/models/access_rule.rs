//! Access rule model
//!
//! An access rule grants a membership entry to a set of zones during a
//! time-of-day window. Among the rules that are valid at a given moment,
//! only the one with the highest priority is consulted.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    clock::Moment,
    error::{AppError, AppResult},
};

/// Access rule record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AccessRule {
    pub id: Uuid,
    /// Owning membership
    pub membership_id: Uuid,
    /// Zone labels this rule grants (case-sensitive)
    pub zones: Vec<String>,
    /// Start of the daily window (inclusive)
    pub valid_from_time: NaiveTime,
    /// End of the daily window (inclusive)
    pub valid_to_time: NaiveTime,
    /// ISO day digits (1 = Monday .. 7 = Sunday). A rule is NOT valid on the
    /// days listed here, despite the field name.
    pub allowed_days: String,
    /// Higher wins among valid rules
    pub priority: i32,
}

/// Create access rule request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAccessRule {
    pub zones: Vec<String>,
    /// Window start (HH:MM or HH:MM:SS)
    pub valid_from_time: String,
    /// Window end (HH:MM or HH:MM:SS)
    pub valid_to_time: String,
    /// Digits 1-7, e.g. "67"
    #[serde(default)]
    #[validate(custom(function = "validate_allowed_days"))]
    pub allowed_days: String,
    #[serde(default)]
    pub priority: i32,
}

fn validate_allowed_days(days: &str) -> Result<(), ValidationError> {
    if days.chars().all(|c| ('1'..='7').contains(&c)) {
        Ok(())
    } else {
        Err(ValidationError::new("allowed_days")
            .with_message("allowed_days may only contain digits 1-7".into()))
    }
}

/// Parse a time of day given as HH:MM:SS or HH:MM
pub fn parse_time_of_day(field: &str, value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}

impl AccessRule {
    /// Build a new rule bound to `membership_id` from a validated request
    pub fn from_request(membership_id: Uuid, data: &CreateAccessRule) -> AppResult<Self> {
        data.validate()?;

        let mut zones: Vec<String> = Vec::with_capacity(data.zones.len());
        for zone in &data.zones {
            if !zones.contains(zone) {
                zones.push(zone.clone());
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            membership_id,
            zones,
            valid_from_time: parse_time_of_day("valid_from_time", &data.valid_from_time)?,
            valid_to_time: parse_time_of_day("valid_to_time", &data.valid_to_time)?,
            allowed_days: data.allowed_days.clone(),
            priority: data.priority,
        })
    }

    /// Whether `now` falls inside the inclusive daily window.
    /// A window with from > to never matches; windows do not wrap midnight.
    pub fn is_within_window(&self, now: NaiveTime) -> bool {
        !(now < self.valid_from_time || now > self.valid_to_time)
    }

    /// Whether the rule applies on the given ISO weekday.
    /// A day listed in `allowed_days` makes the rule invalid.
    pub fn is_day_valid(&self, iso_weekday: u32) -> bool {
        !self.allowed_days.contains(&iso_weekday.to_string())
    }

    pub fn is_valid_at(&self, now: &Moment) -> bool {
        self.is_within_window(now.time_of_day()) && self.is_day_valid(now.iso_weekday())
    }

    /// Exact, case-sensitive zone match
    pub fn grants(&self, zone: &str) -> bool {
        self.zones.iter().any(|z| z == zone)
    }
}
