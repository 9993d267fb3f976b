pub mod checkout;
pub mod forgot_password;
pub mod login;
pub mod page_model;
