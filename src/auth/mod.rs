pub mod auth_model;
pub mod context;
