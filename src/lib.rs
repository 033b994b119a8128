//! Elev8 API - backend for the Elev8 AI upskilling platform
//!
//! Serves the course and blog catalogs and stores contact form submissions.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
