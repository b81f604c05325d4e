//! Catalog integration tests against a live PostgreSQL database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::NaiveDate;
use uuid::Uuid;

use locallibrary_catalog::{
    db,
    error::AppError,
    models::author::CreateAuthor,
    models::book::CreateBook,
    models::book_instance::{CreateBookInstance, LoanStatus},
    models::genre::CreateGenre,
    models::publisher::CreatePublisher,
    AppConfig, Repository,
};

/// Connect to the test database and make sure the schema is applied
async fn repository() -> Repository {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().expect("Failed to load configuration");
    let pool = db::connect(&config.database)
        .await
        .expect("Failed to connect to database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    Repository::new(pool)
}

/// Unique tag so parallel test runs do not collide on unique columns
fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Build a valid ISBN-13 from a random 12-digit body
fn random_isbn13() -> String {
    let mut digits: Vec<u32> = Uuid::new_v4()
        .as_bytes()
        .iter()
        .map(|b| (*b % 10) as u32)
        .take(12)
        .collect();
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    digits.push((10 - sum % 10) % 10);
    digits.into_iter().map(|d| d.to_string()).collect()
}

async fn create_book(repo: &Repository, title: &str, publisher_id: Option<i32>) -> i32 {
    repo.books
        .create(&CreateBook {
            title: title.to_string(),
            summary: "A test book".to_string(),
            isbn: random_isbn13(),
            publisher_id,
            author_ids: vec![],
            genre_ids: vec![],
            language_ids: vec![],
        })
        .await
        .expect("Failed to create book")
        .id
}

#[tokio::test]
#[ignore]
async fn genre_names_collide_case_insensitively() {
    let repo = repository().await;
    let name = format!("Fantasy-{}", tag());

    repo.genres
        .create(&CreateGenre { name: name.clone() })
        .await
        .expect("Failed to create genre");

    let result = repo.genres.create(&CreateGenre { name: name.to_lowercase() }).await;
    assert!(
        matches!(result, Err(AppError::Conflict(_))),
        "case-variant duplicate must be rejected, got {:?}",
        result.map(|g| g.name)
    );

    assert!(repo
        .genres
        .name_exists(&name.to_uppercase(), None)
        .await
        .expect("name_exists failed"));
}

#[tokio::test]
#[ignore]
async fn deleting_publisher_clears_book_reference() {
    let repo = repository().await;

    let publisher = repo
        .publishers
        .create(&CreatePublisher {
            name: format!("Ace Books {}", tag()),
            website: "https://acebooks.example.com".to_string(),
            city: "New York".to_string(),
        })
        .await
        .expect("Failed to create publisher");

    let book_id = create_book(&repo, "Dune", Some(publisher.id)).await;

    repo.publishers
        .delete(publisher.id)
        .await
        .expect("Failed to delete publisher");

    // The book survives with its publisher cleared
    let book = repo.books.get_by_id(book_id).await.expect("Book disappeared");
    assert_eq!(book.publisher_id, None);
    assert!(book.publisher.is_none());
}

#[tokio::test]
#[ignore]
async fn deleting_book_with_copies_is_restricted() {
    let repo = repository().await;
    let book_id = create_book(&repo, "The Dispossessed", None).await;

    let copy = repo
        .book_instances
        .create(
            book_id,
            &CreateBookInstance {
                imprint: "First edition".to_string(),
                due_back: None,
                status: None,
            },
        )
        .await
        .expect("Failed to create book instance");

    let result = repo.books.delete(book_id).await;
    assert!(
        matches!(result, Err(AppError::Restricted(_))),
        "delete must be blocked while copies exist"
    );

    // Once the copy is gone the book can be deleted
    repo.book_instances
        .delete(copy.id)
        .await
        .expect("Failed to delete book instance");
    repo.books.delete(book_id).await.expect("Failed to delete book");
}

#[tokio::test]
#[ignore]
async fn new_copy_gets_unique_id_and_maintenance_status() {
    let repo = repository().await;
    let book_id = create_book(&repo, "A Wizard of Earthsea", None).await;

    let first = repo
        .book_instances
        .create(
            book_id,
            &CreateBookInstance {
                imprint: "Parnassus Press".to_string(),
                due_back: None,
                status: None,
            },
        )
        .await
        .expect("Failed to create first copy");
    let second = repo
        .book_instances
        .create(
            book_id,
            &CreateBookInstance {
                imprint: "Parnassus Press".to_string(),
                due_back: None,
                status: Some(LoanStatus::Available),
            },
        )
        .await
        .expect("Failed to create second copy");

    assert_ne!(first.id, second.id);
    assert_eq!(first.status, "m");
    assert_eq!(first.status(), LoanStatus::Maintenance);
    assert_eq!(second.status, "a");
    assert_eq!(first.book_title.as_deref(), Some("A Wizard of Earthsea"));
}

#[tokio::test]
#[ignore]
async fn duplicate_isbn_is_rejected() {
    let repo = repository().await;
    let isbn = random_isbn13();

    repo.books
        .create(&CreateBook {
            title: "Original".to_string(),
            summary: String::new(),
            isbn: isbn.clone(),
            publisher_id: None,
            author_ids: vec![],
            genre_ids: vec![],
            language_ids: vec![],
        })
        .await
        .expect("Failed to create book");

    let result = repo
        .books
        .create(&CreateBook {
            title: "Copycat".to_string(),
            summary: String::new(),
            isbn: isbn.clone(),
            publisher_id: None,
            author_ids: vec![],
            genre_ids: vec![],
            language_ids: vec![],
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(repo.books.isbn_exists(&isbn, None).await.expect("isbn_exists failed"));
}

#[tokio::test]
#[ignore]
async fn copies_are_listed_by_due_back_ascending() {
    let repo = repository().await;
    let book_id = create_book(&repo, "Left Hand of Darkness", None).await;

    let dates = [
        Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
        None,
        Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()),
        Some(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()),
    ];
    for due_back in dates {
        repo.book_instances
            .create(
                book_id,
                &CreateBookInstance {
                    imprint: "Walker & Co".to_string(),
                    due_back,
                    status: Some(LoanStatus::OnLoan),
                },
            )
            .await
            .expect("Failed to create copy");
    }

    let copies = repo
        .book_instances
        .list_for_book(book_id)
        .await
        .expect("Failed to list copies");
    let due_backs: Vec<_> = copies.iter().map(|c| c.due_back).collect();
    assert_eq!(
        due_backs,
        vec![
            Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()),
            Some(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()),
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
            None,
        ]
    );
}

#[tokio::test]
#[ignore]
async fn authors_are_listed_by_last_then_first_name() {
    let repo = repository().await;
    let last = format!("Zz{}", tag());

    let mut created = Vec::new();
    for (first, last_name) in [
        ("Nora", format!("{}b", last)),
        ("Ann", format!("{}a", last)),
        ("Ben", format!("{}a", last)),
    ] {
        let author = repo
            .authors
            .create(&CreateAuthor {
                first_name: first.to_string(),
                last_name,
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .expect("Failed to create author");
        created.push(author.id);
    }

    let authors = repo.authors.list().await.expect("Failed to list authors");
    let ours: Vec<String> = authors
        .iter()
        .filter(|a| created.contains(&a.id))
        .map(|a| a.to_string())
        .collect();
    assert_eq!(
        ours,
        vec![
            format!("{}a, Ann", last),
            format!("{}a, Ben", last),
            format!("{}b, Nora", last),
        ]
    );
}

#[tokio::test]
#[ignore]
async fn book_relations_survive_relation_entity_deletion() {
    let repo = repository().await;

    let genre = repo
        .genres
        .create(&CreateGenre {
            name: format!("Space Opera {}", tag()),
        })
        .await
        .expect("Failed to create genre");
    let author = repo
        .authors
        .create(&CreateAuthor {
            first_name: "Frank".to_string(),
            last_name: format!("Herbert {}", tag()),
            date_of_birth: NaiveDate::from_ymd_opt(1920, 10, 8),
            date_of_death: NaiveDate::from_ymd_opt(1986, 2, 11),
        })
        .await
        .expect("Failed to create author");

    let book = repo
        .books
        .create(&CreateBook {
            title: "Dune Messiah".to_string(),
            summary: "Sequel".to_string(),
            isbn: random_isbn13(),
            publisher_id: None,
            author_ids: vec![author.id],
            genre_ids: vec![genre.id],
            language_ids: vec![],
        })
        .await
        .expect("Failed to create book");

    assert_eq!(book.authors.len(), 1);
    assert_eq!(book.genres.len(), 1);

    // Deleting the genre only unlinks it, the book remains
    repo.genres.delete(genre.id).await.expect("Failed to delete genre");
    let book = repo.books.get_by_id(book.id).await.expect("Book disappeared");
    assert!(book.genres.is_empty());
    assert_eq!(book.authors.len(), 1);
}
