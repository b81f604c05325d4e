//! Named routes for entity detail pages.
//!
//! The application layer mounts the detail pages under `/catalog`; models
//! compute their canonical address from the entity id through these helpers.

/// Route name for the genre detail page
pub const GENRE_DETAIL: &str = "genre-detail";
/// Route name for the book detail page
pub const BOOK_DETAIL: &str = "book-detail";
/// Route name for the author detail page
pub const AUTHOR_DETAIL: &str = "author-detail";

/// Detail page address for a genre
pub fn genre_detail(id: i32) -> String {
    format!("/catalog/genre/{}", id)
}

/// Detail page address for a book
pub fn book_detail(id: i32) -> String {
    format!("/catalog/book/{}", id)
}

/// Detail page address for an author
pub fn author_detail(id: i32) -> String {
    format!("/catalog/author/{}", id)
}

/// Resolve a named route to its address. The id is passed as a string, the
/// way the application layer carries path parameters.
pub fn reverse(name: &str, id: &str) -> Option<String> {
    match name {
        GENRE_DETAIL => Some(format!("/catalog/genre/{}", id)),
        BOOK_DETAIL => Some(format!("/catalog/book/{}", id)),
        AUTHOR_DETAIL => Some(format!("/catalog/author/{}", id)),
        _ => None,
    }
}
