//! Unp command - UNP reference table maintenance.

use crate::cli::args::{UnpAction, UnpArgs};
use crate::config::Config;
use crate::domain::validation::is_valid_unp_format;
use crate::domain::Unp;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, UnpRepository, UnpStore};

/// Execute the unp command
pub async fn execute(args: UnpArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let store = UnpStore::new(db.get_connection());

    match args.action {
        UnpAction::Add { value } => {
            let unp = register_unp(&store, &value).await?;
            println!("Registered UNP {} (id {})", unp.unp, unp.id);
        }
        UnpAction::List => {
            for unp in store.list().await? {
                println!("{}\t{}\t{}", unp.id, unp.unp, unp.created_at.to_rfc3339());
            }
        }
    }

    Ok(())
}

/// Validate the format and insert a reference entry.
pub async fn register_unp(store: &dyn UnpRepository, value: &str) -> AppResult<Unp> {
    let value = value.trim();
    if !is_valid_unp_format(value) {
        return Err(AppError::validation("UNP must consist of exactly 9 digits"));
    }

    let unp = store.create(value).await?;
    tracing::info!(unp = %unp.unp, "UNP registered");
    Ok(unp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUnpRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_register_rejects_malformed_value() {
        let mut store = MockUnpRepository::new();
        store.expect_create().never();

        let result = register_unp(&store, "12345").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_non_ascii_digits() {
        let mut store = MockUnpRepository::new();
        store.expect_create().never();

        let result = register_unp(&store, "١٢٣٤٥٦٧٨٩").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_trims_and_stores() {
        let mut store = MockUnpRepository::new();
        store
            .expect_create()
            .withf(|value| value.to_string() == "190000001")
            .times(1)
            .returning(|value| {
                Ok(Unp {
                    id: 7,
                    unp: value.to_string(),
                    created_at: Utc::now(),
                })
            });

        let unp = register_unp(&store, " 190000001 ").await.unwrap();
        assert_eq!(unp.id, 7);
        assert_eq!(unp.unp, "190000001");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let mut store = MockUnpRepository::new();
        store
            .expect_create()
            .returning(|value| Err(AppError::conflict(format!("UNP {}", value))));

        let result = register_unp(&store, "190000001").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
