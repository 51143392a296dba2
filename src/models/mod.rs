//! Data models for the club attendance server

pub mod access_rule;
pub mod client;
pub mod membership;
pub mod visit;

// Re-export commonly used types
pub use access_rule::{AccessRule, CreateAccessRule};
pub use client::{Client, CreateClient, UpdateClient};
pub use membership::{CreateMembership, Membership};
pub use visit::{CreateVisit, Visit};
