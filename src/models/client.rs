//! Client model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Club client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: Uuid,
    pub full_name: String,
    /// Unique when present
    pub email: Option<String>,
    pub is_blocked: bool,
}

/// Create client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub is_blocked: Option<bool>,
}

/// Update client request. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub is_blocked: Option<bool>,
}

/// Block / unblock request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BlockStatus {
    pub blocked: bool,
}

/// Client activity response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientActivity {
    pub client_id: Uuid,
    pub active: bool,
}

impl Client {
    pub fn new(data: &CreateClient) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: data.full_name.clone(),
            email: data.email.clone(),
            is_blocked: data.is_blocked.unwrap_or(false),
        }
    }

    pub fn apply(&mut self, data: &UpdateClient) {
        if let Some(ref full_name) = data.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(ref email) = data.email {
            self.email = Some(email.clone());
        }
        if let Some(blocked) = data.is_blocked {
            self.is_blocked = blocked;
        }
    }
}
