//! User service - registration and profile maintenance.
//!
//! Registration is role-gated: administrators are never created here,
//! clients must bind a free, pre-registered UNP and name their company,
//! drivers carry no company data at all.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Auditor, UnpVerifier};
use crate::domain::validation::is_blank;
use crate::domain::{NewUser, PasswordEncoder, RegisterUser, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate and store a new CLIENT or DRIVER
    async fn register(&self, input: RegisterUser) -> AppResult<User>;

    async fn get_user(&self, id: i64) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// One page of users plus the total count
    async fn list_users_paginated(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Partial update of email, company name and activity type
    async fn update_user(&self, id: i64, changes: UserChanges) -> AppResult<User>;

    /// Remove the user and everything they own
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    encoder: Arc<dyn PasswordEncoder>,
    verifier: Arc<dyn UnpVerifier>,
    auditor: Arc<dyn Auditor>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(
        uow: Arc<U>,
        encoder: Arc<dyn PasswordEncoder>,
        verifier: Arc<dyn UnpVerifier>,
        auditor: Arc<dyn Auditor>,
    ) -> Self {
        Self {
            uow,
            encoder,
            verifier,
            auditor,
        }
    }

    /// Guard clauses in the order the first failure is reported.
    async fn validate_registration(&self, input: &RegisterUser) -> AppResult<()> {
        if !input.role.is_self_registrable() {
            return Err(AppError::validation(
                "Administrator accounts cannot be registered",
            ));
        }

        if is_blank(Some(&input.username)) {
            return Err(AppError::validation("Username is required"));
        }

        if self.uow.users().exists_by_username(&input.username).await? {
            return Err(AppError::conflict(format!(
                "User with username {}",
                input.username
            )));
        }

        match input.role {
            UserRole::Client => self.validate_client(input).await,
            UserRole::Driver => {
                if !is_blank(input.name.as_deref()) {
                    return Err(AppError::validation(
                        "Drivers cannot be registered with a company name",
                    ));
                }
                Ok(())
            }
            UserRole::Admin => Ok(()),
        }
    }

    async fn validate_client(&self, input: &RegisterUser) -> AppResult<()> {
        let unp = match input.unp.as_deref() {
            Some(value) if !is_blank(Some(value)) => value,
            _ => return Err(AppError::validation("UNP is required for clients")),
        };

        if !self.verifier.verify(unp) {
            return Err(AppError::validation("UNP must consist of exactly 9 digits"));
        }

        let unp_row = self
            .uow
            .unps()
            .find_by_value(unp)
            .await?
            .ok_or_else(|| AppError::validation(format!("UNP {} is not registered", unp)))?;

        if self.uow.users().exists_by_unp_id(unp_row.id).await? {
            return Err(AppError::conflict(format!("User with UNP {}", unp)));
        }

        if is_blank(input.name.as_deref()) {
            return Err(AppError::validation("Company name is required for clients"));
        }

        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, input: RegisterUser) -> AppResult<User> {
        self.validate_registration(&input).await?;

        let password_hash = self.encoder.encode(&input.password)?.into_string();

        let mut new_user = NewUser {
            username: input.username,
            password_hash,
            role: input.role,
            name: input.name,
            email: input.email,
            activity_type: input.activity_type,
            unp_id: None,
            verified: true,
            created_by: self.auditor.current_auditor(),
        };

        match input.role {
            UserRole::Client => {
                // Validation guarantees the UNP is present
                let unp = input.unp.unwrap_or_default();
                new_user.verified = self.verifier.verify(&unp);
                new_user.unp_id = self
                    .uow
                    .unps()
                    .find_by_value(&unp)
                    .await?
                    .map(|row| row.id);
            }
            UserRole::Driver => {
                new_user.name = None;
                new_user.activity_type = None;
            }
            UserRole::Admin => {}
        }

        let user = self.uow.users().create(new_user).await?;
        tracing::info!(user_id = user.id, role = %user.role, "User registered");

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("User with id {} not found", id))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn list_users_paginated(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        self.uow.users().list_paginated(&params).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        self.uow.users().list_by_role(role).await
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        self.uow.users().exists_by_username(username).await
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.uow.users().exists_by_email(email).await
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> AppResult<User> {
        self.get_user(id).await?;
        self.uow.users().update(id, changes).await
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.get_user(id).await?;
        self.uow.users().delete_with_dependents(id).await?;
        tracing::info!(user_id = id, "User deleted with dependent records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Unp;
    use crate::infra::unit_of_work::testing::{MockRepositories, MockUnitOfWork};
    use crate::services::test_support::{sample_user, PlainEncoder};
    use crate::services::{FormatUnpVerifier, MockUnpVerifier, StaticAuditor};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn manager(repos: MockRepositories) -> UserManager<MockUnitOfWork> {
        UserManager::new(
            Arc::new(repos.build()),
            Arc::new(PlainEncoder),
            Arc::new(FormatUnpVerifier),
            Arc::new(StaticAuditor::new("tester")),
        )
    }

    fn client_input() -> RegisterUser {
        RegisterUser {
            username: "acme1".to_string(),
            password: "secret".to_string(),
            role: UserRole::Client,
            name: Some("ACME Logistics".to_string()),
            email: Some("office@acme.example".to_string()),
            activity_type: Some("Freight".to_string()),
            unp: Some("190000001".to_string()),
        }
    }

    fn driver_input() -> RegisterUser {
        RegisterUser {
            username: "driver1".to_string(),
            password: "secret".to_string(),
            role: UserRole::Driver,
            name: None,
            email: None,
            activity_type: Some("Long haul".to_string()),
            unp: Some("190000001".to_string()),
        }
    }

    fn unp_row() -> Unp {
        Unp {
            id: 11,
            unp: "190000001".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Echo the stored record back as the created user.
    fn stored(new_user: NewUser) -> User {
        let mut user = sample_user(1, new_user.role);
        user.username = new_user.username;
        user.password_hash = new_user.password_hash;
        user.name = new_user.name;
        user.email = new_user.email;
        user.activity_type = new_user.activity_type;
        user.unp = new_user.unp_id.map(|_| "190000001".to_string());
        user.verified = new_user.verified;
        user.created_by = Some(new_user.created_by);
        user
    }

    #[tokio::test]
    async fn test_register_admin_is_rejected_before_any_lookup() {
        // No expectations: touching a repository would panic
        let service = manager(MockRepositories::default());
        let input = RegisterUser {
            role: UserRole::Admin,
            ..client_input()
        };

        let result = service.register(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_blank_username() {
        let service = manager(MockRepositories::default());
        let input = RegisterUser {
            username: "  ".to_string(),
            ..client_input()
        };

        let result = service.register(input).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("Username")));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(true));

        let result = manager(repos).register(client_input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_client_success() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repos
            .unps
            .expect_find_by_value()
            .times(2)
            .returning(|_| Ok(Some(unp_row())));
        repos
            .users
            .expect_exists_by_unp_id()
            .with(eq(11))
            .returning(|_| Ok(false));
        repos
            .users
            .expect_create()
            .withf(|u| {
                u.unp_id == Some(11)
                    && u.verified
                    && u.password_hash == "hashed:secret"
                    && u.created_by == "tester"
            })
            .times(1)
            .returning(|u| Ok(stored(u)));

        let user = manager(repos).register(client_input()).await.unwrap();
        assert_eq!(user.role, UserRole::Client);
        assert_eq!(user.unp.as_deref(), Some("190000001"));
        assert_eq!(user.name.as_deref(), Some("ACME Logistics"));
    }

    #[tokio::test]
    async fn test_register_client_without_unp() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));

        let input = RegisterUser {
            unp: Some(" ".to_string()),
            ..client_input()
        };

        let result = manager(repos).register(input).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("required")));
    }

    #[tokio::test]
    async fn test_register_client_with_malformed_unp() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));

        let input = RegisterUser {
            unp: Some("12345".to_string()),
            ..client_input()
        };

        let result = manager(repos).register(input).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("9 digits")));
    }

    #[tokio::test]
    async fn test_register_client_with_unknown_unp() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repos.unps.expect_find_by_value().returning(|_| Ok(None));

        let result = manager(repos).register(client_input()).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("not registered")));
    }

    #[tokio::test]
    async fn test_register_client_with_bound_unp() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repos
            .unps
            .expect_find_by_value()
            .returning(|_| Ok(Some(unp_row())));
        repos
            .users
            .expect_exists_by_unp_id()
            .returning(|_| Ok(true));

        let result = manager(repos).register(client_input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_client_without_company_name() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repos
            .unps
            .expect_find_by_value()
            .returning(|_| Ok(Some(unp_row())));
        repos
            .users
            .expect_exists_by_unp_id()
            .returning(|_| Ok(false));

        let input = RegisterUser {
            name: None,
            ..client_input()
        };

        let result = manager(repos).register(input).await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("Company name")));
    }

    #[tokio::test]
    async fn test_register_driver_with_company_name() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));

        let input = RegisterUser {
            name: Some("Not allowed".to_string()),
            ..driver_input()
        };

        let result = manager(repos).register(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_driver_clears_company_fields() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repos
            .users
            .expect_create()
            .withf(|u| {
                u.role == UserRole::Driver
                    && u.name.is_none()
                    && u.activity_type.is_none()
                    && u.unp_id.is_none()
                    && u.verified
            })
            .times(1)
            .returning(|u| Ok(stored(u)));

        let user = manager(repos).register(driver_input()).await.unwrap();
        assert!(user.name.is_none());
        assert!(user.unp.is_none());
        assert!(user.activity_type.is_none());
    }

    #[tokio::test]
    async fn test_verifier_decides_verified_flag() {
        let mut verifier = MockUnpVerifier::new();
        // Accepted by the format gate, refused on the second consultation
        let mut seq = mockall::Sequence::new();
        verifier
            .expect_verify()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| true);
        verifier
            .expect_verify()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| false);

        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repos
            .unps
            .expect_find_by_value()
            .returning(|_| Ok(Some(unp_row())));
        repos
            .users
            .expect_exists_by_unp_id()
            .returning(|_| Ok(false));
        repos
            .users
            .expect_create()
            .withf(|u| !u.verified)
            .returning(|u| Ok(stored(u)));

        let service = UserManager::new(
            Arc::new(repos.build()),
            Arc::new(PlainEncoder),
            Arc::new(verifier),
            Arc::new(StaticAuditor::new("tester")),
        );

        let user = service.register(client_input()).await.unwrap();
        assert!(!user.verified);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let result = manager(repos).get_user(42).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user_skips_cascade() {
        let mut repos = MockRepositories::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));
        repos.users.expect_delete_with_dependents().never();

        let result = manager(repos).delete_user(5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_runs_cascade() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::Client))));
        repos
            .users
            .expect_delete_with_dependents()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(()));

        assert!(manager(repos).delete_user(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_user_passes_only_present_fields() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::Client))));
        repos
            .users
            .expect_update()
            .withf(|id, changes| {
                *id == 3 && changes.email.as_deref() == Some("new@acme.example") && changes.name.is_none()
            })
            .returning(|id, changes| {
                let mut user = sample_user(id, UserRole::Client);
                user.email = changes.email;
                Ok(user)
            });

        let changes = UserChanges {
            email: Some("new@acme.example".to_string()),
            ..UserChanges::default()
        };

        let user = manager(repos).update_user(3, changes).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("new@acme.example"));
    }
}
