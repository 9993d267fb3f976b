pub mod classify;
pub mod machine;
pub mod submission_model;
