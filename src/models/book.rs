//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::author::Author;
use super::genre::Genre;
use super::language::Language;
use super::publisher::Publisher;
use crate::routes;

/// Full book model. A book can have several authors, genres and languages;
/// the relations are loaded separately from the junction tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub publisher_id: Option<i32>,
    // Relations (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[sqlx(skip)]
    #[serde(default)]
    pub authors: Vec<Author>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[sqlx(skip)]
    #[serde(default)]
    pub languages: Vec<Language>,
}

impl Book {
    /// Address of the detail page for this book
    pub fn detail_url(&self) -> String {
        routes::book_detail(self.id)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub publisher_name: Option<String>,
    pub nb_instances: Option<i64>,
    pub nb_available: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 200, message = "Summary must be at most 200 characters"))]
    pub summary: String,
    #[validate(custom(function = validate_isbn))]
    pub isbn: String,
    pub publisher_id: Option<i32>,
    #[serde(default)]
    pub author_ids: Vec<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub language_ids: Vec<i32>,
}

/// Update book request. Relation lists, when present, replace the existing
/// junction rows.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 200, message = "Summary must be at most 200 characters"))]
    pub summary: Option<String>,
    #[validate(custom(function = validate_isbn))]
    pub isbn: Option<String>,
    pub publisher_id: Option<i32>,
    pub author_ids: Option<Vec<i32>>,
    pub genre_ids: Option<Vec<i32>>,
    pub language_ids: Option<Vec<i32>>,
}

/// Check that a string is a well-formed ISBN-10 or ISBN-13, checksum included.
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    let valid = match isbn.len() {
        10 => isbn10_checksum_ok(isbn),
        13 => isbn13_checksum_ok(isbn),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("isbn");
        err.message = Some("Invalid ISBN".into());
        Err(err)
    }
}

fn isbn10_checksum_ok(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            // 'X' stands for 10, check digit position only
            'X' if i == 9 => 10,
            _ => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn isbn13_checksum_ok(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            _ => return false,
        };
        sum += value * if i % 2 == 0 { 1 } else { 3 };
    }
    sum % 10 == 0
}
