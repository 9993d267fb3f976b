use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::{
    api::{
        api_model::endpoints,
        client::{ApiClient, clear_tokens, store_tokens},
        error::NETWORK_ERROR,
    },
    auth::auth_model::{LoginResult, User},
    storage::store::KeyValueStore,
};

pub const LOGIN_FAILED: &str = "Login failed";

/// Authentication capability handed to pages.
pub trait AuthContext {
    fn login(&self, identifier: &str, secret: &str) -> LoginResult;
    fn logout(&self);
    fn current_user(&self) -> Option<User>;
}

/// Logs in against the marketplace API and keeps the session tokens in a store.
pub struct ApiAuthContext {
    client: Arc<dyn ApiClient>,
    store: Arc<dyn KeyValueStore>,
    user: Mutex<Option<User>>,
}

impl ApiAuthContext {
    pub fn new(client: Arc<dyn ApiClient>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            store,
            user: Mutex::new(None),
        }
    }

    fn remember(&self, user: Option<User>) {
        if let Ok(mut current) = self.user.lock() {
            *current = user;
        }
    }
}

impl AuthContext for ApiAuthContext {
    fn login(&self, identifier: &str, secret: &str) -> LoginResult {
        let payload = json!({ "email": identifier, "password": secret });

        let response = match self.client.call(endpoints::LOGIN, &payload) {
            Ok(r) => r,
            Err(_) => return LoginResult::failed(NETWORK_ERROR),
        };

        if response.is_failure() {
            return LoginResult::failed(response.error.as_deref().unwrap_or(LOGIN_FAILED))
                .with_code(response.code);
        }

        let data = response.data.unwrap_or(Value::Null);
        let user = match serde_json::from_value::<User>(data["user"].clone()) {
            Ok(u) => u,
            Err(_) => return LoginResult::failed(LOGIN_FAILED),
        };

        let access = data["accessToken"].as_str().or_else(|| data["token"].as_str());
        if let Some(access) = access {
            let refresh = data["refreshToken"].as_str().unwrap_or_default();
            if !store_tokens(self.store.as_ref(), access, refresh) {
                eprintln!("Warning: could not persist session tokens");
            }
        }

        self.remember(Some(user.clone()));
        LoginResult::succeeded(user)
    }

    fn logout(&self) {
        if let Err(e) = self.client.call(endpoints::LOGOUT, &json!({})) {
            eprintln!("Logout error: {}", e);
        }
        clear_tokens(self.store.as_ref());
        self.remember(None);
    }

    fn current_user(&self) -> Option<User> {
        self.user.lock().ok().and_then(|u| u.clone())
    }
}
