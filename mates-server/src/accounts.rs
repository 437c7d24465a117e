use std::sync::Arc;

use mates_common::Username;

use crate::error::{AppError, Result};
use crate::store::{UserRecord, UserStore};

/// Registration and credential checks. Credentials are opaque strings that
/// are only ever compared for equality; hashing and session state live in the
/// deployment's auth layer, not here.
#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn UserStore>,
}

impl Accounts {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Creates an account. The display name falls back to the username when
    /// it is missing or empty.
    pub fn register(&self, username: &str, password: &str, name: Option<&str>) -> Result<Username> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::bad_request("username or password is empty"));
        }
        let username = Username::new(username);
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => username.as_str().to_string(),
        };
        let record = UserRecord::new(username.clone(), name, password.to_string());
        if !self.store.create_user(&record)? {
            return Err(AppError::UsernameTaken);
        }
        tracing::info!(%username, "account created");
        Ok(username)
    }

    /// Stateless credential check. Unknown users and wrong passwords get the
    /// same answer, so callers cannot tell which usernames exist.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let user = self.store.get_user(&Username::new(username))?;
        Ok(user.map(|record| record.credential == password).unwrap_or(false))
    }
}
