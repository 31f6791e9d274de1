//! Static book catalog.
//!
//! The catalog is loaded once at startup, either from the dataset embedded
//! in the binary (`data/books.json`) or from a JSON file named by
//! `BOOKSTORE_CATALOG_PATH`. Records are normalized at load time so every
//! request serves the same read-only snapshot.

use std::path::Path;
use std::sync::Arc;

use bookstore_core::Book;

/// The dataset compiled into the binary.
const EMBEDDED_DATASET: &str = include_str!("../data/books.json");

/// Errors that can occur while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory, read-only book collection.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Arc<Vec<Book>>,
}

impl Catalog {
    /// Load the catalog from `path`, or the embedded dataset when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of books.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_json(&json)?
            }
            None => Self::embedded()?,
        };

        tracing::info!(books = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Load the dataset compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded dataset is malformed.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    /// Parse and normalize a JSON array of book records.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the input is not a JSON array of books.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let books: Vec<Book> = serde_json::from_str(json)?;
        Ok(Self::from_books(books))
    }

    /// Build a catalog from raw records.
    #[must_use]
    pub fn from_books(books: Vec<Book>) -> Self {
        Self {
            books: Arc::new(books.into_iter().map(Book::normalized).collect()),
        }
    }

    /// All books, genre normalized, in dataset order.
    #[must_use]
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
