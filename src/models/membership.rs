//! Membership model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Membership held by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Membership {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Plan label (e.g. "monthly", "annual")
    pub kind: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Create membership request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMembership {
    #[validate(length(min = 1, message = "Kind must not be empty"))]
    pub kind: String,
    /// Start date (YYYY-MM-DD)
    pub start_date: String,
    /// End date (YYYY-MM-DD)
    pub end_date: String,
}

impl Membership {
    pub fn from_request(client_id: Uuid, data: &CreateMembership) -> AppResult<Self> {
        data.validate()?;

        let start_date = NaiveDate::parse_from_str(&data.start_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid start_date".to_string()))?;
        let end_date = NaiveDate::parse_from_str(&data.end_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid end_date".to_string()))?;

        if end_date < start_date {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            client_id,
            kind: data.kind.clone(),
            start_date,
            end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> CreateMembership {
        CreateMembership {
            kind: "monthly".into(),
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    #[test]
    fn test_from_request() {
        let client_id = Uuid::new_v4();
        let membership = Membership::from_request(client_id, &request("2025-01-01", "2025-01-31"))
            .expect("valid request");
        assert_eq!(membership.client_id, client_id);
        assert_eq!(membership.kind, "monthly");
    }

    #[test]
    fn test_rejects_reversed_dates() {
        let err = Membership::from_request(Uuid::new_v4(), &request("2025-02-01", "2025-01-31"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_malformed_date() {
        let err = Membership::from_request(Uuid::new_v4(), &request("01/02/2025", "2025-01-31"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
