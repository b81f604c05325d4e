//! LocalLibrary Catalog
//!
//! The data layer of the LocalLibrary catalog: PostgreSQL schema, entity
//! models and repositories for books, authors, genres, publishers, languages
//! and the individual loanable book copies.
//!
//! Request handling, templates and authentication live in the application
//! layer on top of this crate; everything here is schema, constraints and
//! CRUD access.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::Repository;
