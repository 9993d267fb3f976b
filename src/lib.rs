//! Form submission flows for the Autousata vehicle-auction marketplace.
//!
//! Every page (forgot password, login, mock checkout) drives a single
//! [`SubmissionMachine`](submission::machine::SubmissionMachine):
//!
//! ```text
//! FormInput ──Schema::validate──► ValidInput ──begin──► Loading
//!                │                                        │
//!                ▼                                 ApiClient::call
//!         field errors                                    │
//!      (nothing is sent)            ┌─────────────┬───────┴──────┐
//!                                   ▼             ▼              ▼
//!                               Success      Recoverable      NotFound
//!                                               │  reset         │ reset
//!                                               └──► Idle ◄──────┘
//! ```
//!
//! The network, auth, localization and storage are injected as traits
//! ([`ApiClient`](api::client::ApiClient), [`AuthContext`](auth::context::AuthContext),
//! [`LanguageContext`](locale::language::LanguageContext),
//! [`KeyValueStore`](storage::store::KeyValueStore)).

pub mod api;
pub mod auth;
pub mod cli;
pub mod locale;
pub mod pages;
pub mod payment;
pub mod storage;
pub mod submission;
pub mod trace;
pub mod validate;
