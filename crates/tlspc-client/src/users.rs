//! User lookup by email

use crate::client::{Client, decode, single};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub id: String,
}

impl Client {
    /// Resolve a user by email; exactly one match is expected.
    pub async fn get_user(&self, email: &str) -> Result<User> {
        let raw = self.get(&format!("/v1/users/username/{}", email)).await?;
        let users: Users = decode(&raw)?;
        single(users.users, "users")
    }
}

#[derive(Debug, Deserialize)]
struct Users {
    #[serde(default)]
    users: Vec<User>,
}
