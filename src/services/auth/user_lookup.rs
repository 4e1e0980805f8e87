use std::{future::Future, pin::Pin};
use tracing::error;

use crate::error::AppError;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::context::UserRecord;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type UserLookupOutput = Result<Option<UserRecord>, AppError>;

/// Source of [`UserRecord`]s for token issuance and request authentication.
///
/// - `Ok(None)`: no such user
/// - `Err(_)`: backend failure (callers fail closed)
pub trait UserLookup: Send + Sync {
    fn find_user(&self, id: i64) -> BoxFuture<'_, UserLookupOutput>;
}

impl UserLookup for UserRepo {
    fn find_user(&self, id: i64) -> BoxFuture<'_, UserLookupOutput> {
        Box::pin(async move {
            let row = self.find_by_id(id).await.map_err(|e| {
                error!(user_id = id, error = %e, "Failed to look up user");
                AppError::Internal
            })?;
            Ok(row.map(UserRecord::from))
        })
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Fixed user table for handler/service tests.
    #[derive(Default)]
    pub struct InMemoryUsers {
        users: HashMap<i64, UserRecord>,
    }

    impl InMemoryUsers {
        pub fn with(mut self, user: UserRecord) -> Self {
            self.users.insert(user.id, user);
            self
        }
    }

    impl UserLookup for InMemoryUsers {
        fn find_user(&self, id: i64) -> BoxFuture<'_, UserLookupOutput> {
            let found = self.users.get(&id).cloned();
            Box::pin(async move { Ok(found) })
        }
    }

    pub fn user(id: i64, name: &str, role_id: Option<&str>, center_id: Option<i64>) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            password_hash: "stored-hash".to_string(),
            password_salt: "stored-salt".to_string(),
            role_id: role_id.map(str::to_string),
            center_id,
            tenant_id: Some(100),
            group_id: Some(200),
            part_id: None,
            email: format!("{name}@example.com"),
        }
    }
}
