//! Customs declaration entity and its status lifecycle.
//!
//! A declaration starts as `PENDING` and is reviewed exactly once, ending
//! in `APPROVED` or `REJECTED`. Only pending declarations can be edited or
//! deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    DECLARATION_NUMBER_PREFIX, DECLARATION_SEQUENCE_WIDTH, STATUS_APPROVED, STATUS_PENDING,
    STATUS_REJECTED,
};
use crate::errors::{AppError, AppResult};

/// Review status of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeclarationStatus {
    Pending,
    Approved,
    Rejected,
}

impl DeclarationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationStatus::Pending => STATUS_PENDING,
            DeclarationStatus::Approved => STATUS_APPROVED,
            DeclarationStatus::Rejected => STATUS_REJECTED,
        }
    }

    /// Fields can be edited and the record deleted
    pub fn is_editable(&self) -> bool {
        matches!(self, DeclarationStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_editable()
    }

    /// Only a pending declaration can be reviewed, and only into a terminal state.
    pub fn can_transition_to(&self, next: DeclarationStatus) -> bool {
        matches!(
            (self, next),
            (DeclarationStatus::Pending, DeclarationStatus::Approved)
                | (DeclarationStatus::Pending, DeclarationStatus::Rejected)
        )
    }
}

/// Unknown stored values are treated as reviewed, so they stay read-only.
impl From<&str> for DeclarationStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_PENDING => DeclarationStatus::Pending,
            STATUS_APPROVED => DeclarationStatus::Approved,
            _ => DeclarationStatus::Rejected,
        }
    }
}

impl std::fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `TD-<year>-<sequence>` with the sequence zero-padded to five digits.
pub fn format_declaration_number(year: i32, sequence: u64) -> String {
    format!(
        "{}-{}-{:0width$}",
        DECLARATION_NUMBER_PREFIX,
        year,
        sequence,
        width = DECLARATION_SEQUENCE_WIDTH
    )
}

/// `TD-<year>-`, shared by every number issued in `year`.
pub fn declaration_number_prefix(year: i32) -> String {
    format!("{}-{}-", DECLARATION_NUMBER_PREFIX, year)
}

/// Sequence part of a number issued in `year`, if it is one.
pub fn declaration_sequence(number: &str, year: i32) -> Option<u64> {
    number
        .strip_prefix(&declaration_number_prefix(year))?
        .parse()
        .ok()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub id: i64,
    pub declaration_number: String,
    pub declaration_type: String,
    pub tnved_code: Option<String>,
    pub product_description: String,
    pub product_value: f64,
    pub net_weight: f64,
    pub quantity: i32,
    pub country_of_origin: Option<String>,
    pub country_of_destination: Option<String>,
    pub customs_office: Option<String>,
    pub status: DeclarationStatus,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Declaration {
    /// Fail unless the declaration is still pending.
    pub fn ensure_editable(&self, action: &str) -> AppResult<()> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(AppError::invalid_state(format!(
                "Cannot {} declaration {}: it has already been processed ({})",
                action, self.declaration_number, self.status
            )))
        }
    }
}

/// Declaration input for both create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationInput {
    /// Required on create, ignored on update
    pub client_id: Option<i64>,
    pub declaration_type: Option<String>,
    pub tnved_code: Option<String>,
    pub product_description: Option<String>,
    pub product_value: Option<f64>,
    pub net_weight: Option<f64>,
    pub quantity: Option<i32>,
    pub country_of_origin: Option<String>,
    pub country_of_destination: Option<String>,
    pub customs_office: Option<String>,
}

/// Mutable declaration fields with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationFields {
    pub declaration_type: String,
    pub tnved_code: Option<String>,
    pub product_description: String,
    pub product_value: f64,
    pub net_weight: f64,
    pub quantity: i32,
    pub country_of_origin: Option<String>,
    pub country_of_destination: Option<String>,
    pub customs_office: Option<String>,
}

impl From<DeclarationInput> for DeclarationFields {
    /// Missing value, weight and quantity become zero.
    fn from(input: DeclarationInput) -> Self {
        Self {
            declaration_type: input.declaration_type.unwrap_or_default(),
            tnved_code: input.tnved_code,
            product_description: input.product_description.unwrap_or_default(),
            product_value: input.product_value.unwrap_or(0.0),
            net_weight: input.net_weight.unwrap_or(0.0),
            quantity: input.quantity.unwrap_or(0),
            country_of_origin: input.country_of_origin,
            country_of_destination: input.country_of_destination,
            customs_office: input.customs_office,
        }
    }
}

/// Validated declaration ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeclaration {
    pub declaration_number: String,
    pub fields: DeclarationFields,
    pub client_id: i64,
    pub submitted_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "TD-2024-00001")]
    pub declaration_number: String,
    #[schema(example = "IM40")]
    pub declaration_type: String,
    #[schema(example = "8708999709")]
    pub tnved_code: Option<String>,
    #[schema(example = "Truck spare parts")]
    pub product_description: String,
    #[schema(example = 15000.0)]
    pub product_value: f64,
    #[schema(example = 820.5)]
    pub net_weight: f64,
    #[schema(example = 40)]
    pub quantity: i32,
    #[schema(example = "DE")]
    pub country_of_origin: Option<String>,
    #[schema(example = "BY")]
    pub country_of_destination: Option<String>,
    #[schema(example = "Minsk regional customs")]
    pub customs_office: Option<String>,
    pub status: DeclarationStatus,
    #[schema(example = 1)]
    pub client_id: i64,
    pub client_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<Declaration> for DeclarationResponse {
    fn from(declaration: Declaration) -> Self {
        Self {
            id: declaration.id,
            declaration_number: declaration.declaration_number,
            declaration_type: declaration.declaration_type,
            tnved_code: declaration.tnved_code,
            product_description: declaration.product_description,
            product_value: declaration.product_value,
            net_weight: declaration.net_weight,
            quantity: declaration.quantity,
            country_of_origin: declaration.country_of_origin,
            country_of_destination: declaration.country_of_destination,
            customs_office: declaration.customs_office,
            status: declaration.status,
            client_id: declaration.client_id,
            client_name: declaration.client_name,
            submitted_at: declaration.submitted_at,
            reviewed_at: declaration.reviewed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationStats {
    pub total_declarations: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_number_format() {
        assert_eq!(format_declaration_number(2024, 1), "TD-2024-00001");
        assert_eq!(format_declaration_number(2025, 4217), "TD-2025-04217");
        // Wider sequences are not truncated
        assert_eq!(format_declaration_number(2025, 123456), "TD-2025-123456");
    }

    #[test]
    fn test_declaration_sequence() {
        assert_eq!(declaration_sequence("TD-2025-00042", 2025), Some(42));
        assert_eq!(declaration_sequence("TD-2025-123456", 2025), Some(123456));
        assert_eq!(declaration_sequence("TD-2024-00042", 2025), None);
        assert_eq!(declaration_sequence("TD-2025-", 2025), None);
        assert_eq!(declaration_sequence("TD-2025-00x1", 2025), None);
        assert_eq!(declaration_sequence("TD-2030-00007", 2030), Some(7));
    }

    #[test]
    fn test_only_pending_can_be_reviewed() {
        use DeclarationStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Approved, Rejected] {
            assert!(terminal.is_terminal());
            for next in [Pending, Approved, Rejected] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_status_storage_values() {
        assert_eq!(DeclarationStatus::from("PENDING"), DeclarationStatus::Pending);
        assert_eq!(DeclarationStatus::from("APPROVED"), DeclarationStatus::Approved);
        assert_eq!(DeclarationStatus::from("REJECTED"), DeclarationStatus::Rejected);
        assert!(DeclarationStatus::from("garbage").is_terminal());
    }

    #[test]
    fn test_missing_quantities_default_to_zero() {
        let fields = DeclarationFields::from(DeclarationInput {
            declaration_type: Some("IM40".to_string()),
            product_description: Some("Parts".to_string()),
            ..DeclarationInput::default()
        });

        assert_eq!(fields.product_value, 0.0);
        assert_eq!(fields.net_weight, 0.0);
        assert_eq!(fields.quantity, 0);
    }
}
