//! Services backing the non-CRUD endpoints

pub mod health;

pub use health::HealthService;
