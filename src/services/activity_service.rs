//! Activity service - per-user activity log.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::Arc;

use super::Auditor;
use crate::config::{DEFAULT_RECENT_ACTIVITY_LIMIT, MAX_PAGE_SIZE};
use crate::domain::{Activity, ActivityChanges, ActivityInput, ActivityStats, NewActivity, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Log an activity for `input.user_id`
    async fn create_activity(&self, input: ActivityInput) -> AppResult<Activity>;

    /// Log an activity for the user with the given login name
    async fn create_for_username(&self, username: &str, input: ActivityInput)
        -> AppResult<Activity>;

    async fn get_activity(&self, id: i64) -> AppResult<Activity>;

    async fn list_activities(&self) -> AppResult<Vec<Activity>>;

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Activity>>;

    /// Newest first; `limit` defaults to 5 and is clamped to `1..=100`
    async fn recent_by_user(&self, user_id: i64, limit: Option<u64>) -> AppResult<Vec<Activity>>;

    async fn list_by_user_paginated(
        &self,
        user_id: i64,
        params: PaginationParams,
    ) -> AppResult<(Vec<Activity>, u64)>;

    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>>;

    async fn list_by_user_and_date_range(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>>;

    async fn search(&self, user_id: i64, keyword: &str) -> AppResult<Vec<Activity>>;

    async fn update_activity(&self, id: i64, changes: ActivityChanges) -> AppResult<Activity>;

    async fn delete_activity(&self, id: i64) -> AppResult<()>;

    /// Number of removed entries
    async fn delete_all_for_user(&self, user_id: i64) -> AppResult<u64>;

    async fn user_stats(&self, user_id: i64) -> AppResult<ActivityStats>;
}

pub struct ActivityManager<U: UnitOfWork> {
    uow: Arc<U>,
    auditor: Arc<dyn Auditor>,
}

impl<U: UnitOfWork> ActivityManager<U> {
    pub fn new(uow: Arc<U>, auditor: Arc<dyn Auditor>) -> Self {
        Self { uow, auditor }
    }

    async fn require_user(&self, user_id: i64) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found(format!("User with id {} not found", user_id))
    }

    async fn store(&self, user: &User, input: ActivityInput) -> AppResult<Activity> {
        let new_activity = NewActivity {
            user_id: user.id,
            description: input.description,
            activity_date: input.activity_date.unwrap_or_else(Utc::now),
            created_by: self.auditor.current_auditor(),
        };

        let activity = self.uow.activities().create(new_activity).await?;
        tracing::debug!(activity_id = activity.id, user_id = user.id, "Activity logged");

        Ok(activity)
    }
}

fn ensure_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if start > end {
        return Err(AppError::validation(
            "Start date must not be after end date",
        ));
    }
    Ok(())
}

/// `[00:00, next 00:00)` of the current UTC day
fn today_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[async_trait]
impl<U: UnitOfWork> ActivityService for ActivityManager<U> {
    async fn create_activity(&self, input: ActivityInput) -> AppResult<Activity> {
        let user_id = input
            .user_id
            .ok_or_else(|| AppError::validation("User id is required"))?;
        let user = self.require_user(user_id).await?;

        self.store(&user, input).await
    }

    async fn create_for_username(
        &self,
        username: &str,
        input: ActivityInput,
    ) -> AppResult<Activity> {
        let user = self
            .uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_not_found(format!("User {} not found", username))?;

        self.store(&user, input).await
    }

    async fn get_activity(&self, id: i64) -> AppResult<Activity> {
        self.uow
            .activities()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("Activity with id {} not found", id))
    }

    async fn list_activities(&self) -> AppResult<Vec<Activity>> {
        self.uow.activities().list().await
    }

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Activity>> {
        self.uow.activities().list_by_user(user_id).await
    }

    async fn recent_by_user(&self, user_id: i64, limit: Option<u64>) -> AppResult<Vec<Activity>> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_ACTIVITY_LIMIT)
            .clamp(1, MAX_PAGE_SIZE);
        self.uow.activities().list_recent_by_user(user_id, limit).await
    }

    async fn list_by_user_paginated(
        &self,
        user_id: i64,
        params: PaginationParams,
    ) -> AppResult<(Vec<Activity>, u64)> {
        self.uow
            .activities()
            .list_by_user_paginated(user_id, &params)
            .await
    }

    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>> {
        ensure_ordered(start, end)?;
        self.uow.activities().list_by_date_range(start, end).await
    }

    async fn list_by_user_and_date_range(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>> {
        ensure_ordered(start, end)?;
        self.uow
            .activities()
            .list_by_user_and_date_range(user_id, start, end)
            .await
    }

    async fn search(&self, user_id: i64, keyword: &str) -> AppResult<Vec<Activity>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::validation("Search keyword is required"));
        }
        self.uow.activities().search_by_user(user_id, keyword).await
    }

    async fn update_activity(&self, id: i64, changes: ActivityChanges) -> AppResult<Activity> {
        self.get_activity(id).await?;
        self.uow.activities().update(id, changes).await
    }

    async fn delete_activity(&self, id: i64) -> AppResult<()> {
        if !self.uow.activities().delete(id).await? {
            return Err(AppError::not_found(format!(
                "Activity with id {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: i64) -> AppResult<u64> {
        self.require_user(user_id).await?;
        let removed = self.uow.activities().delete_by_user(user_id).await?;
        tracing::info!(user_id, removed, "Activities cleared for user");
        Ok(removed)
    }

    async fn user_stats(&self, user_id: i64) -> AppResult<ActivityStats> {
        self.require_user(user_id).await?;

        let (start, end) = today_bounds();
        let activities = self.uow.activities();
        Ok(ActivityStats {
            total_activities: activities.count_by_user(user_id).await?,
            today_activities: activities
                .count_by_user_between(user_id, start, end)
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::unit_of_work::testing::{MockRepositories, MockUnitOfWork};
    use crate::services::test_support::{sample_activity, sample_user};
    use crate::services::StaticAuditor;
    use mockall::predicate::eq;

    fn manager(repos: MockRepositories) -> ActivityManager<MockUnitOfWork> {
        ActivityManager::new(Arc::new(repos.build()), Arc::new(StaticAuditor::new("tester")))
    }

    fn with_user(repos: &mut MockRepositories) {
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::Driver))));
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let result = manager(MockRepositories::default())
            .create_activity(ActivityInput {
                description: "Loaded cargo".to_string(),
                ..ActivityInput::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_for_missing_user() {
        let mut repos = MockRepositories::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(repos)
            .create_activity(ActivityInput {
                user_id: Some(3),
                description: "Loaded cargo".to_string(),
                activity_date: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_defaults_date_to_now() {
        let before = Utc::now();
        let mut repos = MockRepositories::default();
        with_user(&mut repos);
        repos
            .activities
            .expect_create()
            .withf(move |a| a.activity_date >= before && a.user_id == 3 && a.created_by == "tester")
            .times(1)
            .returning(|a| {
                let mut activity = sample_activity(1, a.user_id);
                activity.description = a.description;
                activity.activity_date = a.activity_date;
                Ok(activity)
            });

        let activity = manager(repos)
            .create_activity(ActivityInput {
                user_id: Some(3),
                description: "Loaded cargo".to_string(),
                activity_date: None,
            })
            .await
            .unwrap();

        assert_eq!(activity.description, "Loaded cargo");
    }

    #[tokio::test]
    async fn test_create_for_username_only_checks_the_user() {
        let mut repos = MockRepositories::default();
        repos
            .users
            .expect_find_by_username()
            .withf(|username| username == "driver1")
            .returning(|_| Ok(Some(sample_user(3, UserRole::Driver))));
        repos
            .activities
            .expect_create()
            .withf(|a| a.user_id == 3 && a.description.is_empty())
            .times(1)
            .returning(|a| {
                let mut activity = sample_activity(1, a.user_id);
                activity.description = a.description;
                Ok(activity)
            });

        let activity = manager(repos)
            .create_for_username("driver1", ActivityInput::default())
            .await
            .unwrap();

        assert_eq!(activity.user_id, 3);
    }

    #[tokio::test]
    async fn test_create_for_unknown_username() {
        let mut repos = MockRepositories::default();
        repos.users.expect_find_by_username().returning(|_| Ok(None));

        let result = manager(repos)
            .create_for_username(
                "ghost",
                ActivityInput {
                    description: "Loaded cargo".to_string(),
                    ..ActivityInput::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_recent_limit_is_defaulted_and_clamped() {
        let mut repos = MockRepositories::default();
        repos
            .activities
            .expect_list_recent_by_user()
            .with(eq(3), eq(DEFAULT_RECENT_ACTIVITY_LIMIT))
            .times(1)
            .returning(|_, _| Ok(vec![]));
        repos
            .activities
            .expect_list_recent_by_user()
            .with(eq(3), eq(MAX_PAGE_SIZE))
            .times(1)
            .returning(|_, _| Ok(vec![]));
        repos
            .activities
            .expect_list_recent_by_user()
            .with(eq(3), eq(1))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = manager(repos);
        service.recent_by_user(3, None).await.unwrap();
        service.recent_by_user(3, Some(10_000)).await.unwrap();
        service.recent_by_user(3, Some(0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_inverted_date_range_is_rejected() {
        let service = manager(MockRepositories::default());
        let end = Utc::now();
        let start = end + Duration::hours(1);

        let global = service.list_by_date_range(start, end).await;
        let per_user = service.list_by_user_and_date_range(1, start, end).await;

        assert!(matches!(global, Err(AppError::Validation(_))));
        assert!(matches!(per_user, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_search_keyword_is_rejected() {
        let result = manager(MockRepositories::default()).search(1, "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_trims_keyword() {
        let mut repos = MockRepositories::default();
        repos
            .activities
            .expect_search_by_user()
            .withf(|user_id, keyword| *user_id == 1 && keyword.to_string() == "customs")
            .returning(|user_id, _| Ok(vec![sample_activity(1, user_id)]));

        let found = manager(repos).search(1, "  customs ").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_for_missing_user() {
        let mut repos = MockRepositories::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));
        repos.activities.expect_delete_by_user().never();

        let result = manager(repos).delete_all_for_user(2).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_all_for_user_reports_count() {
        let mut repos = MockRepositories::default();
        with_user(&mut repos);
        repos
            .activities
            .expect_delete_by_user()
            .with(eq(2))
            .returning(|_| Ok(4));

        assert_eq!(manager(repos).delete_all_for_user(2).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_user_stats_counts_today_in_utc() {
        let mut repos = MockRepositories::default();
        with_user(&mut repos);
        repos.activities.expect_count_by_user().returning(|_| Ok(12));
        repos
            .activities
            .expect_count_by_user_between()
            .withf(|user_id, start, end| {
                *user_id == 2 && *end - *start == Duration::days(1) && *start <= Utc::now()
            })
            .returning(|_, _, _| Ok(2));

        let stats = manager(repos).user_stats(2).await.unwrap();
        assert_eq!(
            stats,
            ActivityStats {
                total_activities: 12,
                today_activities: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_missing_activity() {
        let mut repos = MockRepositories::default();
        repos.activities.expect_delete().returning(|_| Ok(false));

        let result = manager(repos).delete_activity(5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
