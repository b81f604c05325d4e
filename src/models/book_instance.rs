//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Availability status of a copy. DB stores the single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    /// Return the single-letter code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl From<&str> for LoanStatus {
    fn from(s: &str) -> Self {
        match s {
            "o" => LoanStatus::OnLoan,
            "a" => LoanStatus::Available,
            "r" => LoanStatus::Reserved,
            _ => LoanStatus::Maintenance,
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// One physical, loanable copy of a book. The id is a UUID generated when
/// the copy is registered and never changes afterwards. Listings order
/// copies by due-back date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: String,
    // Computed field (populated when queried with a JOIN, None otherwise)
    #[sqlx(default)]
    #[serde(default)]
    pub book_title: Option<String>,
}

impl BookInstance {
    /// Status as the closed enumeration
    pub fn status(&self) -> LoanStatus {
        LoanStatus::from(self.status.as_str())
    }
}

impl std::fmt::Display for BookInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.book_title.as_deref().unwrap_or("-"))
    }
}

/// Create book instance request. Status defaults to Maintenance.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
}

/// Update book instance request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: Option<String>,
    pub status: Option<LoanStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        assert_eq!(LoanStatus::Maintenance.as_code(), "m");
        assert_eq!(LoanStatus::OnLoan.as_code(), "o");
        assert_eq!(LoanStatus::Available.as_code(), "a");
        assert_eq!(LoanStatus::Reserved.as_code(), "r");
        for code in ["m", "o", "a", "r"] {
            assert_eq!(LoanStatus::from(code).as_code(), code);
        }
    }

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
        assert_eq!(LoanStatus::default().label(), "Maintenance");
    }

    #[test]
    fn unknown_code_falls_back_to_maintenance() {
        assert_eq!(LoanStatus::from("z"), LoanStatus::Maintenance);
    }

    #[test]
    fn status_serializes_as_letter_code() {
        assert_eq!(
            serde_json::to_value(LoanStatus::OnLoan).unwrap(),
            serde_json::json!("o")
        );
        let status: LoanStatus = serde_json::from_value(serde_json::json!("r")).unwrap();
        assert_eq!(status, LoanStatus::Reserved);
    }

    #[test]
    fn renders_as_id_and_title() {
        let id = Uuid::new_v4();
        let copy = BookInstance {
            id,
            book_id: Some(1),
            imprint: "Ace Books, 1990".to_string(),
            due_back: None,
            status: "m".to_string(),
            book_title: Some("Dune".to_string()),
        };
        assert_eq!(copy.to_string(), format!("{} (Dune)", id));
        assert_eq!(copy.status(), LoanStatus::Maintenance);
    }
}
