//! Shared API response types

use serde::{Deserialize, Serialize};

use crate::models::{BlogPost, Course};

/// Name reported by the liveness route
pub const SERVICE_NAME: &str = "elev8-api";

/// Liveness payload
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }
}

/// Bare success indicator
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoursesResponse {
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<BlogPost>,
}

/// Result of a stored contact submission
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,
    pub id: String,
}
