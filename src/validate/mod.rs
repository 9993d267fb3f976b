pub mod schema;
pub mod validate_model;
