pub mod config;
pub mod hash;
pub mod health;
pub mod middleware;
pub mod tracing;
