use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Guest,
    Buyer,
    Seller,
    Dealer,
    Admin,
    Bank,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    pub success: bool,
    pub user: Option<User>,
    pub error: Option<String>,
    /// Machine-readable error code from the backend, if any
    pub code: Option<String>,
}

impl LoginResult {
    pub fn succeeded(user: User) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
            code: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(error.to_string()),
            code: None,
        }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    AdminArea,
    SellerDashboard,
    Browse,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::AdminArea => "/admin",
            Destination::SellerDashboard => "/dashboard",
            Destination::Browse => "/browse",
        }
    }
}

pub fn route_for_role(role: Role) -> Destination {
    match role {
        Role::Admin => Destination::AdminArea,
        Role::Seller | Role::Dealer => Destination::SellerDashboard,
        _ => Destination::Browse,
    }
}
