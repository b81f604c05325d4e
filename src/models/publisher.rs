//! Publisher model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Publisher record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub website: String,
    pub city: String,
}

impl std::fmt::Display for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Create publisher request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePublisher {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(url(message = "Invalid website URL"), length(max = 200))]
    pub website: String,
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: String,
}

/// Update publisher request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePublisher {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(url(message = "Invalid website URL"), length(max = 200))]
    pub website: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn renders_as_name() {
        let publisher = Publisher {
            id: 1,
            name: "Ace Books".to_string(),
            website: "https://acebooks.example.com".to_string(),
            city: "New York".to_string(),
        };
        assert_eq!(publisher.to_string(), "Ace Books");
    }

    #[test]
    fn website_must_be_a_url() {
        let payload = CreatePublisher {
            name: "Ace Books".to_string(),
            website: "not a url".to_string(),
            city: "New York".to_string(),
        };
        assert!(payload.validate().is_err());

        let payload = CreatePublisher {
            name: "Ace Books".to_string(),
            website: "https://acebooks.example.com".to_string(),
            city: "New York".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
