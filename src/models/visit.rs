//! Visit model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A check-in to a zone, closed by a check-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: Uuid,
    pub membership_id: Uuid,
    /// Zone visited
    pub zone: String,
    pub entry_time: NaiveDateTime,
    /// Absent while the visit is open
    pub exit_time: Option<NaiveDateTime>,
}

impl Visit {
    /// Open a new visit at `entry_time`
    pub fn check_in(membership_id: Uuid, zone: impl Into<String>, entry_time: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            membership_id,
            zone: zone.into(),
            entry_time,
            exit_time: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }
}

/// Check-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVisit {
    #[validate(length(min = 1, message = "Zone must not be empty"))]
    pub zone: String,
}

/// Visit count response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VisitCount {
    pub membership_id: Uuid,
    pub count: i64,
}
