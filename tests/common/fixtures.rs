use std::sync::Arc;

use autousata_forms::{
    storage::store::{KeyValueStore, MemoryStore},
    trace::logger::TraceLogger,
    validate::{
        schema::{FieldSpec, Schema},
        validate_model::{FormInput, ValidInput},
    },
};

pub fn email_schema() -> Schema {
    Schema::new().field(FieldSpec::new("email", "Email address").required().email())
}

pub fn valid_email(email: &str) -> ValidInput {
    email_schema()
        .validate(&FormInput::new().with("email", email))
        .expect("fixture email must be valid")
}

pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

pub fn capturing_tracer() -> Arc<TraceLogger> {
    Arc::new(TraceLogger::in_memory())
}

pub fn card(number: &str) -> FormInput {
    FormInput::new()
        .with("holder", "Jane Doe")
        .with("number", number)
        .with("expiry", "12/29")
        .with("cvc", "123")
}
