use std::collections::HashMap;

use serde_json::{Value, json};

use crate::{
    api::{
        api_model::{ApiResponse, endpoints},
        client::{ApiClient, REQUEST_FAILED},
        error::TransportError,
    },
    auth::auth_model::{Role, User},
    submission::submission_model::NOT_FOUND_CODE,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Offline stand-in for the marketplace API with a fixed set of accounts.
pub struct MockApiClient {
    accounts: HashMap<String, (User, String)>,
}

impl Default for MockApiClient {
    fn default() -> Self {
        let mut client = Self {
            accounts: HashMap::new(),
        };
        client.add_account("buyer@autousata.test", "BuyerPass1!", Role::Buyer);
        client.add_account("seller@autousata.test", "SellerPass1!", Role::Seller);
        client.add_account("dealer@autousata.test", "DealerPass1!", Role::Dealer);
        client.add_account("admin@autousata.test", "AdminPass1!", Role::Admin);
        client
    }
}

impl MockApiClient {
    pub fn empty() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    pub fn add_account(&mut self, email: &str, password: &str, role: Role) {
        let user = User {
            id: format!("user-{}", self.accounts.len() + 1),
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            role,
        };
        self.accounts
            .insert(email.to_lowercase(), (user, password.to_string()));
    }

    fn forgot_password(&self, payload: &Value) -> ApiResponse {
        let email = payload["email"].as_str().unwrap_or_default();
        if email.is_empty() {
            return ApiResponse::failure("Email required");
        }

        if self.accounts.contains_key(&email.to_lowercase()) {
            ApiResponse::ok(json!({ "success": true, "message": "Password reset link sent." }))
        } else {
            ApiResponse::failure("Email not found").with_code(NOT_FOUND_CODE)
        }
    }

    fn login(&self, payload: &Value) -> ApiResponse {
        let email = payload["email"].as_str().unwrap_or_default().to_lowercase();
        let password = payload["password"].as_str().unwrap_or_default();

        match self.accounts.get(&email) {
            None => ApiResponse::failure("User not found"),
            Some((_, expected)) if expected != password => ApiResponse::failure(INVALID_CREDENTIALS),
            Some((user, _)) => ApiResponse::ok(json!({
                "user": user,
                "accessToken": format!("mock-access-{}", user.id),
                "refreshToken": format!("mock-refresh-{}", user.id),
            })),
        }
    }
}

impl ApiClient for MockApiClient {
    fn call(&self, endpoint: &str, payload: &Value) -> Result<ApiResponse, TransportError> {
        let response = match endpoint {
            endpoints::FORGOT_PASSWORD => self.forgot_password(payload),
            endpoints::LOGIN => self.login(payload),
            endpoints::LOGOUT => ApiResponse::empty(),
            _ => ApiResponse::failure(REQUEST_FAILED),
        };
        Ok(response)
    }
}
