use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::service::Resource;
use crate::utils;

/// A catalogued book.
///
/// `authorId` and `categoryId` are free references; nothing checks that the
/// author or category exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub category_id: String,
    /// Unique among books at creation time
    #[serde(default)]
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: Option<String>,
    pub author_id: Option<String>,
    pub category_id: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
}

impl CreateBook {
    /// Any of title, authorId, or categoryId absent or empty.
    pub fn missing_required_fields(&self) -> bool {
        [&self.title, &self.author_id, &self.category_id]
            .iter()
            .any(|field| field.as_deref().map_or(true, str::is_empty))
    }
}

/// Partial update for a book. Fields left out, or sent as `null`, are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author_id: Option<String>,
    pub category_id: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
}

impl UpdateBook {
    /// One of title, authorId, or categoryId supplied as an empty string.
    pub fn blanks_required_field(&self) -> bool {
        [&self.title, &self.author_id, &self.category_id]
            .iter()
            .any(|field| field.as_deref() == Some(""))
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author_id.is_none()
            && self.category_id.is_none()
            && self.isbn.is_none()
            && self.published_year.is_none()
            && self.genre.is_none()
            && self.description.is_none()
    }
}

/// Rule violations for a set of book fields.
pub fn validate(
    title: &str,
    author_id: &str,
    category_id: &str,
    published_year: Option<i32>,
) -> Vec<String> {
    let mut errors = Vec::new();

    if utils::is_blank(title) {
        errors.push("Title is required".to_string());
    }
    if utils::is_blank(author_id) {
        errors.push("authorId is required".to_string());
    }
    if utils::is_blank(category_id) {
        errors.push("categoryId is required".to_string());
    }
    if let Some(year) = published_year {
        if !(1000..=utils::current_year()).contains(&year) {
            errors.push("Published year must be between 1000 and current year".to_string());
        }
    }

    errors
}

impl Resource for Book {
    type Create = CreateBook;
    type Update = UpdateBook;

    const LABEL: &'static str = "Book";
    const REJECT_EMPTY_UPDATE: bool = true;
    const VALIDATE_MERGED_UPDATE: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(input: CreateBook, now: DateTime<Utc>) -> Self {
        Self {
            id: utils::new_id(),
            title: input.title.unwrap_or_default(),
            author_id: input.author_id.unwrap_or_default(),
            category_id: input.category_id.unwrap_or_default(),
            isbn: input.isbn.unwrap_or_default(),
            published_year: input.published_year,
            genre: input.genre,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn violations(&self) -> Vec<String> {
        validate(
            &self.title,
            &self.author_id,
            &self.category_id,
            self.published_year,
        )
    }

    fn conflict(&self, existing: &[Self]) -> Option<String> {
        existing
            .iter()
            .any(|book| book.isbn == self.isbn)
            .then(|| "Book with this ISBN already exists".to_string())
    }

    fn is_empty_update(update: &UpdateBook) -> bool {
        update.is_empty()
    }

    fn apply(&mut self, update: UpdateBook) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author_id) = update.author_id {
            self.author_id = author_id;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(isbn) = update.isbn {
            self.isbn = isbn;
        }
        if let Some(year) = update.published_year {
            self.published_year = Some(year);
        }
        if let Some(genre) = update.genre {
            self.genre = Some(genre);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}
