//! Profile model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError, ValidationErrors};

/// Values accepted for `gender`
pub const GENDERS: [&str; 4] = ["male", "female", "other", "prefer-not-to-say"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub occupation: Option<String>,
    pub organization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration form payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfile {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    pub phone: String,

    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,

    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub occupation: Option<String>,
    pub organization: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: Profile,
}

impl CreateProfile {
    /// Trim every field, lowercase the email and drop blank optionals
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            age: self.age,
            gender: non_blank(self.gender).map(|g| g.to_ascii_lowercase()),
            address: non_blank(self.address),
            city: non_blank(self.city),
            state: non_blank(self.state),
            occupation: non_blank(self.occupation),
            organization: non_blank(self.organization),
        }
    }

    /// Field rules plus the gender whitelist
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(gender) = &self.gender {
            if !GENDERS.contains(&gender.as_str()) {
                let mut err = ValidationError::new("gender");
                err.message = Some("Gender must be one of male, female, other, prefer-not-to-say".into());
                errors.add("gender", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Emails are unique case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Profile {
    /// Build a fresh record (used by stores that do not generate ids themselves)
    pub fn from_new(data: CreateProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name: data.full_name,
            email: data.email,
            phone: data.phone,
            age: data.age,
            gender: data.gender,
            address: data.address,
            city: data.city,
            state: data.state,
            occupation: data.occupation,
            organization: data.organization,
            created_at: now,
            updated_at: now,
        }
    }

    /// Insert unless the email is taken. `None` means conflict.
    pub async fn insert(pool: &PgPool, data: &CreateProfile) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (full_name, email, phone, age, gender, address, city, state, occupation, organization)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#
        )
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.age)
        .bind(&data.gender)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.occupation)
        .bind(&data.organization)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateProfile {
        CreateProfile {
            full_name: "  Meera Iyer ".to_string(),
            email: " Meera.Iyer@Example.org ".to_string(),
            phone: "+91 98450 00000".to_string(),
            age: Some(34),
            gender: Some("Female".to_string()),
            city: Some("   ".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalized() {
        let profile = form().normalized();
        assert_eq!(profile.full_name, "Meera Iyer");
        assert_eq!(profile.email, "meera.iyer@example.org");
        assert_eq!(profile.gender.as_deref(), Some("female"));
        assert_eq!(profile.city, None);
        assert!(profile.check().is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = CreateProfile::default().check().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_age_out_of_range() {
        let mut data = form().normalized();
        data.age = Some(151);
        assert!(data.check().is_err());
        data.age = Some(0);
        assert!(data.check().is_err());
        data.age = None;
        assert!(data.check().is_ok());
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let mut data = form().normalized();
        data.gender = Some("robot".to_string());
        let errors = data.check().unwrap_err();
        assert!(errors.field_errors().contains_key("gender"));
    }

    #[test]
    fn test_from_new_stamps_times() {
        let profile = Profile::from_new(form().normalized());
        assert_eq!(profile.created_at, profile.updated_at);
        assert_eq!(profile.email, "meera.iyer@example.org");
    }
}
