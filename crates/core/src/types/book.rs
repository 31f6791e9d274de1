//! Catalog book records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Separator used when collapsing a list of genres into one display string.
pub const GENRE_SEPARATOR: &str = ", ";

/// A book's genre as supplied by the dataset.
///
/// Source records carry either a single genre string or an ordered list of
/// genres. [`Genre::normalize`] collapses the list form so every book served
/// to clients has a single display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genre {
    /// A single genre string.
    Single(String),
    /// An ordered list of genres.
    Multiple(Vec<String>),
}

impl Genre {
    /// Collapse into the single-string form, preserving list order.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Single(genre) => Self::Single(genre),
            Self::Multiple(genres) => Self::Single(genres.join(GENRE_SEPARATOR)),
        }
    }
}

/// A catalog identifier in the JSON form the dataset used.
///
/// Datasets key books by string or by number; either is served back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Text(String),
    Number(Number),
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(id) => f.write_str(id),
            Self::Number(id) => write!(f, "{id}"),
        }
    }
}

/// A read-only catalog entry.
///
/// Only the fields the service reasons about are typed. Every other
/// descriptive field in the source record (description, year, cover image,
/// ...) is carried in `attributes` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Book {
    /// Return the book with its genre collapsed into a single string.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.genre = self.genre.map(Genre::normalize);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(genre: Value) -> Book {
        serde_json::from_value(json!({
            "id": "b1",
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": genre,
            "year": 1965
        }))
        .unwrap()
    }

    #[test]
    fn test_list_genre_is_joined_in_order() {
        let normalized = book(json!(["Science Fiction", "Adventure", "Classic"])).normalized();
        assert_eq!(
            normalized.genre,
            Some(Genre::Single("Science Fiction, Adventure, Classic".to_string()))
        );
    }

    #[test]
    fn test_scalar_genre_is_unchanged() {
        let normalized = book(json!("Fantasy")).normalized();
        assert_eq!(normalized.genre, Some(Genre::Single("Fantasy".to_string())));
    }

    #[test]
    fn test_single_element_list() {
        let normalized = book(json!(["Horror"])).normalized();
        assert_eq!(normalized.genre, Some(Genre::Single("Horror".to_string())));
    }

    #[test]
    fn test_missing_genre_passes_through() {
        let book: Book = serde_json::from_value(json!({"id": "b2", "title": "Untitled"})).unwrap();
        let normalized = book.normalized();
        assert_eq!(normalized.genre, None);

        let value = serde_json::to_value(&normalized).unwrap();
        assert!(value.get("genre").is_none());
    }

    #[test]
    fn test_numeric_id_is_kept() {
        let book: Book = serde_json::from_value(json!({"id": 42, "title": "Dune"})).unwrap();
        assert_eq!(book.id, BookId::Number(42.into()));
        assert_eq!(book.id.to_string(), "42");

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["id"], json!(42));
    }

    #[test]
    fn test_string_id_is_kept() {
        let value = serde_json::to_value(book(json!("Fantasy"))).unwrap();
        assert_eq!(value["id"], json!("b1"));
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let value = serde_json::to_value(book(json!(["A", "B"])).normalized()).unwrap();
        assert_eq!(value["genre"], json!("A, B"));
        assert_eq!(value["year"], json!(1965));
        assert_eq!(value["author"], json!("Frank Herbert"));
    }
}
