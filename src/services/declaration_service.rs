//! Declaration service - customs declaration lifecycle.
//!
//! Declarations are numbered `TD-<year>-<n>` where `n` follows the highest
//! sequence issued that year, so deleted declarations never free a number.
//! The number column is unique: a concurrent writer that took the same
//! candidate makes the insert fail with a conflict and the sequence is read
//! again.
//!
//! Edits, reviews and deletes are written with a `status = PENDING`
//! condition, so a declaration processed in the meantime is never touched.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::sync::Arc;

use super::Auditor;
use crate::config::DECLARATION_NUMBER_ATTEMPTS;
use crate::domain::validation::is_blank;
use crate::domain::{
    format_declaration_number, Declaration, DeclarationFields, DeclarationInput,
    DeclarationStats, DeclarationStatus, NewDeclaration,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DeclarationService: Send + Sync {
    /// Validate, number and store a new PENDING declaration
    async fn create_declaration(&self, input: DeclarationInput) -> AppResult<Declaration>;

    async fn get_declaration(&self, id: i64) -> AppResult<Declaration>;

    async fn list_declarations(&self) -> AppResult<Vec<Declaration>>;

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Declaration>>;

    async fn list_by_status(&self, status: DeclarationStatus) -> AppResult<Vec<Declaration>>;

    /// Replace the mutable fields of a PENDING declaration
    async fn update_declaration(&self, id: i64, input: DeclarationInput)
        -> AppResult<Declaration>;

    /// Review a PENDING declaration into APPROVED or REJECTED
    async fn change_status(&self, id: i64, status: DeclarationStatus) -> AppResult<Declaration>;

    /// Delete a PENDING declaration
    async fn delete_declaration(&self, id: i64) -> AppResult<()>;

    async fn client_stats(&self, client_id: i64) -> AppResult<DeclarationStats>;
}

pub struct DeclarationManager<U: UnitOfWork> {
    uow: Arc<U>,
    auditor: Arc<dyn Auditor>,
}

impl<U: UnitOfWork> DeclarationManager<U> {
    pub fn new(uow: Arc<U>, auditor: Arc<dyn Auditor>) -> Self {
        Self { uow, auditor }
    }

    async fn ensure_client_exists(&self, client_id: i64) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(client_id)
            .await?
            .ok_or_not_found(format!("Client with id {} not found", client_id))
            .map(|_| ())
    }

    /// Insert under the next free number, retrying on collisions.
    async fn insert_numbered(
        &self,
        fields: DeclarationFields,
        client_id: i64,
    ) -> AppResult<Declaration> {
        let year = Utc::now().year();
        let created_by = self.auditor.current_auditor();

        for attempt in 0..DECLARATION_NUMBER_ATTEMPTS {
            let latest = self.uow.declarations().latest_sequence(year).await?;
            let declaration_number = format_declaration_number(year, latest + 1);
            let candidate = NewDeclaration {
                declaration_number: declaration_number.clone(),
                fields: fields.clone(),
                client_id,
                submitted_at: Utc::now(),
                created_by: created_by.clone(),
            };

            match self.uow.declarations().create(candidate).await {
                Err(AppError::Conflict(_)) => {
                    tracing::warn!(%declaration_number, attempt, "Declaration number taken, retrying");
                }
                result => return result,
            }
        }

        Err(AppError::internal(format!(
            "No free declaration number after {} attempts",
            DECLARATION_NUMBER_ATTEMPTS
        )))
    }

    /// Error for a PENDING-only write that matched nothing.
    async fn not_pending(&self, id: i64, action: &str) -> AppError {
        match self.get_declaration(id).await {
            Ok(current) => AppError::invalid_state(format!(
                "Cannot {} declaration {}: it is no longer pending ({})",
                action, current.declaration_number, current.status
            )),
            Err(e) => e,
        }
    }
}

fn validate_fields(input: &DeclarationInput) -> AppResult<()> {
    if is_blank(input.declaration_type.as_deref()) {
        return Err(AppError::validation("Declaration type is required"));
    }
    if is_blank(input.product_description.as_deref()) {
        return Err(AppError::validation("Product description is required"));
    }
    if input.product_value.is_some_and(|value| value < 0.0) {
        return Err(AppError::validation("Product value cannot be negative"));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> DeclarationService for DeclarationManager<U> {
    async fn create_declaration(&self, input: DeclarationInput) -> AppResult<Declaration> {
        let client_id = input
            .client_id
            .ok_or_else(|| AppError::validation("Client id is required"))?;
        validate_fields(&input)?;
        self.ensure_client_exists(client_id).await?;

        let declaration = self
            .insert_numbered(DeclarationFields::from(input), client_id)
            .await?;
        tracing::info!(
            declaration_id = declaration.id,
            number = %declaration.declaration_number,
            client_id,
            "Declaration submitted"
        );

        Ok(declaration)
    }

    async fn get_declaration(&self, id: i64) -> AppResult<Declaration> {
        self.uow
            .declarations()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("Declaration with id {} not found", id))
    }

    async fn list_declarations(&self) -> AppResult<Vec<Declaration>> {
        self.uow.declarations().list().await
    }

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<Declaration>> {
        self.uow.declarations().list_by_client(client_id).await
    }

    async fn list_by_status(&self, status: DeclarationStatus) -> AppResult<Vec<Declaration>> {
        self.uow.declarations().list_by_status(status).await
    }

    async fn update_declaration(
        &self,
        id: i64,
        input: DeclarationInput,
    ) -> AppResult<Declaration> {
        let existing = self.get_declaration(id).await?;
        existing.ensure_editable("update")?;
        validate_fields(&input)?;

        match self
            .uow
            .declarations()
            .update_pending(id, DeclarationFields::from(input))
            .await?
        {
            Some(declaration) => Ok(declaration),
            None => Err(self.not_pending(id, "update").await),
        }
    }

    async fn change_status(&self, id: i64, status: DeclarationStatus) -> AppResult<Declaration> {
        let existing = self.get_declaration(id).await?;

        if !existing.status.can_transition_to(status) {
            return Err(AppError::invalid_state(format!(
                "Declaration {} cannot move from {} to {}",
                existing.declaration_number, existing.status, status
            )));
        }

        let declaration = match self
            .uow
            .declarations()
            .review_pending(id, status, Utc::now())
            .await?
        {
            Some(declaration) => declaration,
            None => return Err(self.not_pending(id, "review").await),
        };
        tracing::info!(declaration_id = id, %status, "Declaration reviewed");

        Ok(declaration)
    }

    async fn delete_declaration(&self, id: i64) -> AppResult<()> {
        let existing = self.get_declaration(id).await?;
        existing.ensure_editable("delete")?;

        if !self.uow.declarations().delete_pending(id).await? {
            return Err(self.not_pending(id, "delete").await);
        }
        Ok(())
    }

    async fn client_stats(&self, client_id: i64) -> AppResult<DeclarationStats> {
        self.ensure_client_exists(client_id).await?;

        let declarations = self.uow.declarations();
        Ok(DeclarationStats {
            total_declarations: declarations.count_by_client(client_id).await?,
            pending: declarations
                .count_by_client_and_status(client_id, DeclarationStatus::Pending)
                .await?,
            approved: declarations
                .count_by_client_and_status(client_id, DeclarationStatus::Approved)
                .await?,
            rejected: declarations
                .count_by_client_and_status(client_id, DeclarationStatus::Rejected)
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::unit_of_work::testing::{MockRepositories, MockUnitOfWork};
    use crate::services::test_support::{sample_declaration, sample_user};
    use crate::services::StaticAuditor;
    use mockall::predicate::{always, eq};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn manager(repos: MockRepositories) -> DeclarationManager<MockUnitOfWork> {
        DeclarationManager::new(Arc::new(repos.build()), Arc::new(StaticAuditor::new("tester")))
    }

    fn input() -> DeclarationInput {
        DeclarationInput {
            client_id: Some(1),
            declaration_type: Some("IM40".to_string()),
            product_description: Some("Truck spare parts".to_string()),
            ..DeclarationInput::default()
        }
    }

    fn with_client(repos: &mut MockRepositories) {
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::Client))));
    }

    /// Echo the stored record back as the created declaration.
    fn stored(new: NewDeclaration) -> Declaration {
        let mut declaration = sample_declaration(40, DeclarationStatus::Pending);
        declaration.declaration_number = new.declaration_number;
        declaration.product_value = new.fields.product_value;
        declaration.net_weight = new.fields.net_weight;
        declaration.quantity = new.fields.quantity;
        declaration.client_id = new.client_id;
        declaration
    }

    #[tokio::test]
    async fn test_create_defaults_and_numbering() {
        let year = Utc::now().year();
        let mut repos = MockRepositories::default();
        with_client(&mut repos);
        repos
            .declarations
            .expect_latest_sequence()
            .with(eq(year))
            .returning(|_| Ok(41));
        repos
            .declarations
            .expect_create()
            .withf(move |d| {
                d.declaration_number == format_declaration_number(year, 42)
                    && d.fields.product_value == 0.0
                    && d.fields.net_weight == 0.0
                    && d.fields.quantity == 0
                    && d.created_by == "tester"
            })
            .times(1)
            .returning(|d| Ok(stored(d)));

        let declaration = manager(repos).create_declaration(input()).await.unwrap();
        assert_eq!(declaration.status, DeclarationStatus::Pending);
        assert_eq!(declaration.declaration_number, format!("TD-{}-00042", year));
    }

    #[tokio::test]
    async fn test_create_continues_after_highest_sequence() {
        // Oldest declarations deleted: five stored, numbered 6..=10
        let year = Utc::now().year();
        let mut repos = MockRepositories::default();
        with_client(&mut repos);
        repos
            .declarations
            .expect_latest_sequence()
            .returning(|_| Ok(10));
        repos
            .declarations
            .expect_create()
            .withf(move |d| d.declaration_number == format_declaration_number(year, 11))
            .times(1)
            .returning(|d| Ok(stored(d)));

        let declaration = manager(repos).create_declaration(input()).await.unwrap();
        assert_eq!(declaration.declaration_number, format!("TD-{}-00011", year));
    }

    #[tokio::test]
    async fn test_create_retries_taken_number() {
        let year = Utc::now().year();
        let mut repos = MockRepositories::default();
        with_client(&mut repos);
        // A concurrent writer takes sequence 1 between read and insert
        let mut latest = 0;
        repos
            .declarations
            .expect_latest_sequence()
            .times(2)
            .returning(move |_| {
                let current = latest;
                latest += 1;
                Ok(current)
            });
        repos
            .declarations
            .expect_create()
            .withf(move |d| d.declaration_number == format_declaration_number(year, 1))
            .times(1)
            .returning(|_| Err(AppError::conflict("Declaration number")));
        repos
            .declarations
            .expect_create()
            .withf(move |d| d.declaration_number == format_declaration_number(year, 2))
            .times(1)
            .returning(|d| Ok(stored(d)));

        let declaration = manager(repos).create_declaration(input()).await.unwrap();
        assert_eq!(declaration.declaration_number, format!("TD-{}-00002", year));
    }

    #[tokio::test]
    async fn test_create_gives_up_after_attempts() {
        let mut repos = MockRepositories::default();
        with_client(&mut repos);
        repos
            .declarations
            .expect_latest_sequence()
            .returning(|_| Ok(0));
        repos
            .declarations
            .expect_create()
            .times(DECLARATION_NUMBER_ATTEMPTS as usize)
            .returning(|_| Err(AppError::conflict("Declaration number")));

        let result = manager(repos).create_declaration(input()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_value() {
        let result = manager(MockRepositories::default())
            .create_declaration(DeclarationInput {
                product_value: Some(-1.0),
                ..input()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_type_and_description() {
        let service = manager(MockRepositories::default());

        let no_type = service
            .create_declaration(DeclarationInput {
                declaration_type: Some(" ".to_string()),
                ..input()
            })
            .await;
        let no_description = service
            .create_declaration(DeclarationInput {
                product_description: None,
                ..input()
            })
            .await;
        let no_client = service
            .create_declaration(DeclarationInput {
                client_id: None,
                ..input()
            })
            .await;

        assert!(matches!(no_type, Err(AppError::Validation(_))));
        assert!(matches!(no_description, Err(AppError::Validation(_))));
        assert!(matches!(no_client, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_for_missing_client() {
        let mut repos = MockRepositories::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));
        repos.declarations.expect_create().never();

        let result = manager(repos).create_declaration(input()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_processed_declaration_is_refused() {
        let mut repos = MockRepositories::default();
        repos
            .declarations
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_declaration(id, DeclarationStatus::Approved))));
        repos.declarations.expect_update_pending().never();

        let result = manager(repos).update_declaration(3, input()).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_processed_declaration_is_refused() {
        let mut repos = MockRepositories::default();
        repos
            .declarations
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_declaration(id, DeclarationStatus::Rejected))));
        repos.declarations.expect_delete_pending().never();

        let result = manager(repos).delete_declaration(3).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_pending_declaration() {
        let mut repos = MockRepositories::default();
        repos
            .declarations
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_declaration(id, DeclarationStatus::Pending))));
        repos
            .declarations
            .expect_delete_pending()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(true));

        assert!(manager(repos).delete_declaration(3).await.is_ok());
    }

    #[tokio::test]
    async fn test_approve_stamps_review_time() {
        let before = Utc::now();
        let mut repos = MockRepositories::default();
        repos
            .declarations
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_declaration(id, DeclarationStatus::Pending))));
        repos
            .declarations
            .expect_review_pending()
            .withf(move |id, status, reviewed_at| {
                *id == 3 && *status == DeclarationStatus::Approved && *reviewed_at >= before
            })
            .times(1)
            .returning(|id, status, reviewed_at| {
                let mut declaration = sample_declaration(id, status);
                declaration.reviewed_at = Some(reviewed_at);
                Ok(Some(declaration))
            });

        let declaration = manager(repos)
            .change_status(3, DeclarationStatus::Approved)
            .await
            .unwrap();

        assert_eq!(declaration.status, DeclarationStatus::Approved);
        assert!(declaration.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_reviewed_declaration_cannot_change_status() {
        let mut repos = MockRepositories::default();
        repos
            .declarations
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_declaration(id, DeclarationStatus::Approved))));
        repos.declarations.expect_review_pending().never();

        let result = manager(repos)
            .change_status(3, DeclarationStatus::Rejected)
            .await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    /// Reads return PENDING `stale_reads` times, then the persisted status.
    fn racing_store(
        repos: &mut MockRepositories,
        persisted: Arc<Mutex<DeclarationStatus>>,
        stale_reads: usize,
    ) {
        let reads = AtomicUsize::new(0);
        repos.declarations.expect_find_by_id().returning(move |id| {
            let status = if reads.fetch_add(1, Ordering::SeqCst) < stale_reads {
                DeclarationStatus::Pending
            } else {
                *persisted.lock().unwrap()
            };
            Ok(Some(sample_declaration(id, status)))
        });
    }

    #[tokio::test]
    async fn test_concurrent_reviews_only_one_is_written() {
        let persisted = Arc::new(Mutex::new(DeclarationStatus::Pending));
        let writes = Arc::new(AtomicUsize::new(0));
        let mut repos = MockRepositories::default();
        racing_store(&mut repos, persisted.clone(), 2);
        let (store, written) = (persisted.clone(), writes.clone());
        repos
            .declarations
            .expect_review_pending()
            .times(2)
            .returning(move |id, status, reviewed_at| {
                let mut current = store.lock().unwrap();
                if *current != DeclarationStatus::Pending {
                    return Ok(None);
                }
                *current = status;
                written.fetch_add(1, Ordering::SeqCst);
                let mut declaration = sample_declaration(id, status);
                declaration.reviewed_at = Some(reviewed_at);
                Ok(Some(declaration))
            });
        let service = manager(repos);

        let (approve, reject) = tokio::join!(
            service.change_status(3, DeclarationStatus::Approved),
            service.change_status(3, DeclarationStatus::Rejected)
        );

        assert!(approve.is_ok());
        assert!(matches!(reject, Err(AppError::InvalidState(_))));
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(*persisted.lock().unwrap(), DeclarationStatus::Approved);
    }

    #[tokio::test]
    async fn test_update_after_concurrent_review_is_refused() {
        let persisted = Arc::new(Mutex::new(DeclarationStatus::Approved));
        let mut repos = MockRepositories::default();
        racing_store(&mut repos, persisted, 1);
        repos
            .declarations
            .expect_update_pending()
            .with(eq(3), always())
            .times(1)
            .returning(|_, _| Ok(None));

        let result = manager(repos).update_declaration(3, input()).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_after_concurrent_review_is_refused() {
        let persisted = Arc::new(Mutex::new(DeclarationStatus::Rejected));
        let mut repos = MockRepositories::default();
        racing_store(&mut repos, persisted, 1);
        repos
            .declarations
            .expect_delete_pending()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(false));

        let result = manager(repos).delete_declaration(3).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_of_vanished_declaration_is_not_found() {
        let mut repos = MockRepositories::default();
        let reads = AtomicUsize::new(0);
        repos.declarations.expect_find_by_id().returning(move |id| {
            Ok((reads.fetch_add(1, Ordering::SeqCst) == 0)
                .then(|| sample_declaration(id, DeclarationStatus::Pending)))
        });
        repos
            .declarations
            .expect_delete_pending()
            .returning(|_| Ok(false));

        let result = manager(repos).delete_declaration(3).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_client_stats() {
        let mut repos = MockRepositories::default();
        with_client(&mut repos);
        repos.declarations.expect_count_by_client().returning(|_| Ok(6));
        repos
            .declarations
            .expect_count_by_client_and_status()
            .returning(|_, status| {
                Ok(match status {
                    DeclarationStatus::Pending => 3,
                    DeclarationStatus::Approved => 2,
                    DeclarationStatus::Rejected => 1,
                })
            });

        let stats = manager(repos).client_stats(1).await.unwrap();
        assert_eq!(
            stats,
            DeclarationStats {
                total_declarations: 6,
                pending: 3,
                approved: 2,
                rejected: 1,
            }
        );
    }
}
