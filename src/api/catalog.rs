//! Course and blog listing endpoints
//!
//! Both listings are returned whole: no filtering, paging or sorting.

use axum::{extract::State, Json};

use crate::api::middleware::AppState;
use crate::api::responses::{CoursesResponse, PostsResponse};

/// GET /courses
pub async fn list_courses(State(state): State<AppState>) -> Json<CoursesResponse> {
    Json(CoursesResponse {
        courses: state.catalog_service.courses().to_vec(),
    })
}

/// GET /blogs
pub async fn list_blogs(State(state): State<AppState>) -> Json<PostsResponse> {
    Json(PostsResponse {
        posts: state.catalog_service.posts().to_vec(),
    })
}
