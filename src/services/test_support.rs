//! Fixtures shared by the service unit tests.

use chrono::Utc;

use crate::domain::{
    Activity, Declaration, DeclarationStatus, Password, PasswordEncoder, User, UserRole, Vehicle,
};
use crate::errors::AppResult;

/// Reversible stand-in for argon2 so tests can assert on the stored hash.
pub struct PlainEncoder;

impl PasswordEncoder for PlainEncoder {
    fn encode(&self, plain_text: &str) -> AppResult<Password> {
        Ok(Password::from_hash(format!("hashed:{}", plain_text)))
    }

    fn matches(&self, plain_text: &str, password: &Password) -> bool {
        password.as_str() == format!("hashed:{}", plain_text)
    }
}

pub fn sample_user(id: i64, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id,
        username: format!("user{}", id),
        password_hash: "hashed:secret".to_string(),
        role,
        name: Some("ACME Logistics".to_string()),
        email: None,
        activity_type: None,
        unp: None,
        verified: true,
        created_by: Some("tester".to_string()),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_vehicle(id: i64, client_id: i64, plate: &str) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        id,
        license_plate: plate.to_string(),
        model: Some("Volvo FH16".to_string()),
        vehicle_type: Some("Truck".to_string()),
        year_of_manufacture: Some(2019),
        capacity: Some(20.0),
        client_id,
        client_name: Some("ACME Logistics".to_string()),
        created_by: Some("tester".to_string()),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_activity(id: i64, user_id: i64) -> Activity {
    let now = Utc::now();
    Activity {
        id,
        user_id,
        user_name: Some("ACME Logistics".to_string()),
        description: "Submitted transit documents".to_string(),
        activity_date: now,
        created_by: Some("tester".to_string()),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_declaration(id: i64, status: DeclarationStatus) -> Declaration {
    let now = Utc::now();
    Declaration {
        id,
        declaration_number: format!("TD-2024-{:05}", id),
        declaration_type: "IM40".to_string(),
        tnved_code: None,
        product_description: "Truck spare parts".to_string(),
        product_value: 1500.0,
        net_weight: 80.0,
        quantity: 4,
        country_of_origin: Some("DE".to_string()),
        country_of_destination: Some("BY".to_string()),
        customs_office: None,
        status,
        client_id: 1,
        client_name: Some("ACME Logistics".to_string()),
        submitted_at: now,
        reviewed_at: None,
        created_by: Some("tester".to_string()),
        created_at: now,
        updated_at: now,
    }
}
