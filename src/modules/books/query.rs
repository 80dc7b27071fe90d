//! Filtering, sorting, and pagination for the book listing.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::models::Book;
use crate::utils;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Raw query string of `GET /api/books`.
///
/// Kept as strings so that a bad `page` or `limit` falls back to its default
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    AuthorId,
    CategoryId,
    Isbn,
    PublishedYear,
    Genre,
    Description,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "id" => Self::Id,
            "title" => Self::Title,
            "author" | "authorId" => Self::AuthorId,
            "categoryId" => Self::CategoryId,
            "isbn" => Self::Isbn,
            "publishedYear" => Self::PublishedYear,
            "genre" => Self::Genre,
            "description" => Self::Description,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }

    fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Title => a.title.cmp(&b.title),
            Self::AuthorId => a.author_id.cmp(&b.author_id),
            Self::CategoryId => a.category_id.cmp(&b.category_id),
            Self::Isbn => a.isbn.cmp(&b.isbn),
            // None < Some for Option, so absent values come first
            Self::PublishedYear => a.published_year.cmp(&b.published_year),
            Self::Genre => a.genre.cmp(&b.genre),
            Self::Description => a.description.cmp(&b.description),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A parsed listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    /// Lowercased genre substring
    pub genre: Option<String>,
    /// Lowercased author substring
    pub author: Option<String>,
    pub sort: Option<SortField>,
    pub order: SortOrder,
    pub page: usize,
    pub limit: usize,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            genre: None,
            author: None,
            sort: None,
            order: SortOrder::Asc,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<ListParams> for BookQuery {
    fn from(params: ListParams) -> Self {
        let order = match params.order.as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };

        Self {
            genre: filter_term(params.genre),
            author: filter_term(params.author),
            sort: params.sort.as_deref().and_then(SortField::parse),
            order,
            page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }
}

fn filter_term(raw: Option<String>) -> Option<String> {
    raw.filter(|term| !term.is_empty())
        .map(|term| term.to_lowercase())
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_books: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}

impl BookQuery {
    fn matches(&self, book: &Book, author_names: &HashMap<String, String>) -> bool {
        let genre_ok = match &self.genre {
            None => true,
            Some(term) => book
                .genre
                .as_deref()
                .is_some_and(|genre| utils::contains_lowercase(genre, term)),
        };

        let author_ok = match &self.author {
            None => true,
            Some(term) => {
                utils::contains_lowercase(&book.author_id, term)
                    || author_names
                        .get(&book.author_id)
                        .is_some_and(|name| utils::contains_lowercase(name, term))
            }
        };

        genre_ok && author_ok
    }

    /// Filter, sort, and cut one page out of `books`.
    ///
    /// `author_names` maps author ids to names so the author filter can match
    /// on either.
    pub fn run(&self, books: Vec<Book>, author_names: &HashMap<String, String>) -> BookPage {
        let mut filtered: Vec<Book> = books
            .into_iter()
            .filter(|book| self.matches(book, author_names))
            .collect();

        if let Some(field) = self.sort {
            // sort_by is stable, ties keep their relative order
            match self.order {
                SortOrder::Asc => filtered.sort_by(|a, b| field.compare(a, b)),
                SortOrder::Desc => filtered.sort_by(|a, b| field.compare(b, a)),
            }
        }

        let total = filtered.len();
        let start = (self.page - 1).saturating_mul(self.limit);
        let end = self.page.saturating_mul(self.limit);

        let books = filtered
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect();

        BookPage {
            books,
            pagination: Pagination {
                current_page: self.page,
                total_pages: total.div_ceil(self.limit),
                total_books: total,
                has_next: end < total,
                has_prev: start > 0,
            },
        }
    }
}
