/*
 * Responsibility
 * - UserRecord (persisted user) -> AuthContext (authenticated principal) への変換
 * - authority / role label の導出
 * - 純粋関数のみ (I/O なし、状態なし)
 */
use std::fmt;

use thiserror::Error;

/// Label granted to every authenticated user.
pub const BASE_ROLE: &str = "ROLE_USER";
/// Prefix prepended to `role_id` to form the second authority.
pub const ROLE_PREFIX: &str = "ROLE_";
/// `center_id` substituted when the record has none.
pub const DEFAULT_CENTER_ID: i64 = 1;

/// A user row as handed over by the lookup layer. Never mutated here.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
    pub password_salt: String,
    pub role_id: Option<String>,
    pub center_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub group_id: Option<i64>,
    pub part_id: Option<i64>,
    pub email: String,
}

// Keep hash/salt out of logs.
impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("role_id", &self.role_id)
            .field("center_id", &self.center_id)
            .field("tenant_id", &self.tenant_id)
            .field("group_id", &self.group_id)
            .field("part_id", &self.part_id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A capability label such as `ROLE_ADMIN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority(String);

impl Authority {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication-bearing view of a user, rebuilt for every request.
///
/// - `center_id` is always set (defaults to [`DEFAULT_CENTER_ID`])
/// - `authorities` has one or two entries, `ROLE_USER` first
/// - `password_hash` / `password_salt` are carried for the authentication
///   collaborator and hidden from `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
    pub password_salt: String,
    pub role_id: Option<String>,
    pub center_id: i64,
    pub tenant_id: Option<i64>,
    pub group_id: Option<i64>,
    pub part_id: Option<i64>,
    pub email: String,
    pub authorities: Vec<Authority>,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub enabled: bool,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("role_id", &self.role_id)
            .field("center_id", &self.center_id)
            .field("tenant_id", &self.tenant_id)
            .field("group_id", &self.group_id)
            .field("part_id", &self.part_id)
            .field("email", &self.email)
            .field("authorities", &self.authorities)
            .field("account_non_expired", &self.account_non_expired)
            .field("account_non_locked", &self.account_non_locked)
            .field("credentials_non_expired", &self.credentials_non_expired)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    pub fn has_authority(&self, label: &str) -> bool {
        self.authorities.iter().any(|a| a.label() == label)
    }

    /// True when none of the account-status flags blocks authentication.
    pub fn is_usable(&self) -> bool {
        self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
            && self.enabled
    }

    pub fn authority_labels(&self) -> Vec<String> {
        self.authorities
            .iter()
            .map(|a| a.label().to_string())
            .collect()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthContextError {
    #[error("cannot build an auth context without a user record")]
    MissingUser,
}

/// Stateless converter from [`UserRecord`] to [`AuthContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthContextBuilder;

impl AuthContextBuilder {
    pub fn build_auth_context(user: &UserRecord) -> AuthContext {
        AuthContext {
            id: user.id,
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            password_salt: user.password_salt.clone(),
            role_id: user.role_id.clone(),
            center_id: user.center_id.unwrap_or(DEFAULT_CENTER_ID),
            tenant_id: user.tenant_id,
            group_id: user.group_id,
            part_id: user.part_id,
            email: user.email.clone(),
            authorities: Self::derive_authorities(user),
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            enabled: true,
        }
    }

    /// Fail-fast entry point for callers holding the raw lookup result.
    pub fn build_from_lookup(user: Option<&UserRecord>) -> Result<AuthContext, AuthContextError> {
        user.map(Self::build_auth_context)
            .ok_or(AuthContextError::MissingUser)
    }

    pub fn derive_authorities(user: &UserRecord) -> Vec<Authority> {
        Self::derive_role_labels(user)
            .into_iter()
            .map(Authority)
            .collect()
    }

    /// Plain-string form of [`Self::derive_authorities`], used for token claims.
    pub fn derive_role_labels(user: &UserRecord) -> Vec<String> {
        let mut roles = vec![BASE_ROLE.to_string()];
        if let Some(role_id) = &user.role_id {
            roles.push(format!("{ROLE_PREFIX}{role_id}"));
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, role_id: Option<&str>, center_id: Option<i64>) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            password_hash: "hash".to_string(),
            password_salt: "salt".to_string(),
            role_id: role_id.map(str::to_string),
            center_id,
            tenant_id: Some(10),
            group_id: None,
            part_id: Some(30),
            email: format!("{name}@x.com"),
        }
    }

    #[test]
    fn user_without_role_gets_only_base_authority() {
        let user = record(1, "carol", None, None);

        let authorities = AuthContextBuilder::derive_authorities(&user);

        assert_eq!(authorities, vec![Authority::new("ROLE_USER")]);
    }

    #[test]
    fn role_id_appends_prefixed_authority_after_base() {
        let user = record(1, "carol", Some("MANAGER"), None);

        let labels: Vec<String> = AuthContextBuilder::derive_authorities(&user)
            .iter()
            .map(|a| a.label().to_string())
            .collect();

        assert_eq!(labels, vec!["ROLE_USER", "ROLE_MANAGER"]);
    }

    #[test]
    fn role_labels_match_authority_labels() {
        for role in [None, Some("ADMIN"), Some("USER"), Some("")] {
            let user = record(2, "dave", role, Some(4));
            let ctx = AuthContextBuilder::build_auth_context(&user);

            assert_eq!(
                AuthContextBuilder::derive_role_labels(&user),
                ctx.authority_labels()
            );
        }
    }

    #[test]
    fn role_equal_to_base_is_not_deduplicated() {
        let user = record(3, "erin", Some("USER"), None);

        assert_eq!(
            AuthContextBuilder::derive_role_labels(&user),
            vec!["ROLE_USER", "ROLE_USER"]
        );
    }

    #[test]
    fn missing_center_defaults_to_one() {
        let ctx = AuthContextBuilder::build_auth_context(&record(4, "frank", None, None));

        assert_eq!(ctx.center_id, DEFAULT_CENTER_ID);
    }

    #[test]
    fn present_center_is_kept() {
        let ctx = AuthContextBuilder::build_auth_context(&record(4, "frank", None, Some(0)));

        assert_eq!(ctx.center_id, 0);
    }

    #[test]
    fn status_flags_are_always_true() {
        let ctx = AuthContextBuilder::build_auth_context(&record(5, "gina", Some("X"), Some(9)));

        assert!(ctx.account_non_expired);
        assert!(ctx.account_non_locked);
        assert!(ctx.credentials_non_expired);
        assert!(ctx.enabled);
        assert!(ctx.is_usable());
    }

    #[test]
    fn alice_admin_without_center() {
        let user = UserRecord {
            id: 7,
            name: "alice".to_string(),
            password_hash: "h".to_string(),
            password_salt: "s".to_string(),
            role_id: Some("ADMIN".to_string()),
            center_id: None,
            tenant_id: None,
            group_id: None,
            part_id: None,
            email: "a@x.com".to_string(),
        };

        let ctx = AuthContextBuilder::build_auth_context(&user);

        assert_eq!(ctx.authority_labels(), vec!["ROLE_USER", "ROLE_ADMIN"]);
        assert_eq!(ctx.center_id, 1);
        assert!(ctx.is_usable());
        assert!(ctx.has_authority("ROLE_ADMIN"));
    }

    #[test]
    fn bob_without_role_in_center_three() {
        let user = record(8, "bob", None, Some(3));

        let ctx = AuthContextBuilder::build_auth_context(&user);

        assert_eq!(ctx.authority_labels(), vec!["ROLE_USER"]);
        assert_eq!(ctx.center_id, 3);
        assert!(!ctx.has_authority("ROLE_ADMIN"));
    }

    #[test]
    fn fields_are_copied_verbatim() {
        let user = record(9, "", Some("OPS"), Some(2));

        let ctx = AuthContextBuilder::build_auth_context(&user);

        assert_eq!(ctx.id, 9);
        assert_eq!(ctx.name, "");
        assert_eq!(ctx.password_hash, "hash");
        assert_eq!(ctx.password_salt, "salt");
        assert_eq!(ctx.role_id.as_deref(), Some("OPS"));
        assert_eq!(ctx.tenant_id, Some(10));
        assert_eq!(ctx.group_id, None);
        assert_eq!(ctx.part_id, Some(30));
        assert_eq!(ctx.email, "@x.com");
    }

    #[test]
    fn absent_record_is_rejected() {
        assert_eq!(
            AuthContextBuilder::build_from_lookup(None),
            Err(AuthContextError::MissingUser)
        );

        let user = record(1, "hal", None, None);
        assert!(AuthContextBuilder::build_from_lookup(Some(&user)).is_ok());
    }

    #[test]
    fn secrets_stay_out_of_debug() {
        let user = record(1, "ivy", Some("ADMIN"), None);
        let ctx = AuthContextBuilder::build_auth_context(&user);

        let debug = format!("{user:?} {ctx:?}");
        assert!(!debug.contains("hash"));
        assert!(!debug.contains("salt"));
        assert!(debug.contains("ROLE_ADMIN"));
    }
}
