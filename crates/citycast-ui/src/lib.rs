//! Terminal front end for Citycast: query session, rendering and the CLI glue.

pub mod bridge;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod services;
