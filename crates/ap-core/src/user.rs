use serde::{Deserialize, Serialize};

use crate::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// The signed-in user. Authentication is bypassed, so this always comes
/// from configuration or [`User::development_admin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: UserId,
    pub name: String,
    pub avatar_url: String,
    pub role: Role,
}

impl User {
    pub const DEVELOPMENT_UID: &'static str = "mock-admin-uid-12345";

    pub fn development_admin() -> Self {
        Self {
            uid: UserId::from(Self::DEVELOPMENT_UID),
            name: "Admin User".to_string(),
            avatar_url: format!("https://i.pravatar.cc/150?u={}", Self::DEVELOPMENT_UID),
            role: Role::Admin,
        }
    }
}
