use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::models::Book;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub oldest: Option<i32>,
    pub newest: Option<i32>,
}

/// Summary of the whole book collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub total_books: usize,
    pub genre_distribution: BTreeMap<String, usize>,
    pub author_count: usize,
    pub year_range: YearRange,
    pub average_year: Option<i64>,
}

impl BookStats {
    /// Books without a year count as `current_year` for the oldest bound,
    /// as 0 for the newest bound and the average. The year fields are `None`
    /// for an empty collection.
    pub fn from_books(books: &[Book], current_year: i32) -> Self {
        let mut genre_distribution = BTreeMap::new();
        for book in books {
            let genre = book
                .genre
                .as_deref()
                .filter(|genre| !genre.is_empty())
                .unwrap_or("Unknown");
            *genre_distribution.entry(genre.to_string()).or_insert(0) += 1;
        }

        let author_count = books
            .iter()
            .map(|book| book.author_id.as_str())
            .filter(|author| !author.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let oldest = books
            .iter()
            .map(|book| book.published_year.unwrap_or(current_year))
            .min();
        let newest = books
            .iter()
            .map(|book| book.published_year.unwrap_or(0))
            .max();

        let average_year = if books.is_empty() {
            None
        } else {
            let sum: i64 = books
                .iter()
                .map(|book| i64::from(book.published_year.unwrap_or(0)))
                .sum();
            Some((sum as f64 / books.len() as f64).round() as i64)
        };

        Self {
            total_books: books.len(),
            genre_distribution,
            author_count,
            year_range: YearRange { oldest, newest },
            average_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(author_id: &str, year: Option<i32>, genre: Option<&str>) -> Book {
        let now = Utc::now();
        Book {
            id: crate::utils::new_id(),
            title: "t".to_string(),
            author_id: author_id.to_string(),
            category_id: "c".to_string(),
            isbn: crate::utils::new_id(),
            published_year: year,
            genre: genre.map(str::to_string),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn aggregates_over_the_whole_collection() {
        let books = vec![
            book("a1", Some(1965), Some("Science Fiction")),
            book("a1", Some(1951), Some("Science Fiction")),
            book("a2", Some(1815), None),
        ];

        let stats = BookStats::from_books(&books, 2026);
        assert_eq!(stats.total_books, 3);
        assert_eq!(stats.author_count, 2);
        assert_eq!(stats.genre_distribution["Science Fiction"], 2);
        assert_eq!(stats.genre_distribution["Unknown"], 1);
        assert_eq!(stats.year_range.oldest, Some(1815));
        assert_eq!(stats.year_range.newest, Some(1965));
        // (1965 + 1951 + 1815) / 3 = 1910.33
        assert_eq!(stats.average_year, Some(1910));
    }

    #[test]
    fn blank_genre_counts_as_unknown() {
        let books = vec![book("a1", None, Some("")), book("a2", None, None)];

        let stats = BookStats::from_books(&books, 2026);
        assert_eq!(stats.genre_distribution.len(), 1);
        assert_eq!(stats.genre_distribution["Unknown"], 2);
    }

    #[test]
    fn missing_years_use_fallbacks() {
        let books = vec![book("a1", None, None), book("a2", Some(2000), None)];

        let stats = BookStats::from_books(&books, 2026);
        assert_eq!(stats.year_range.oldest, Some(2000));
        assert_eq!(stats.year_range.newest, Some(2000));
        assert_eq!(stats.average_year, Some(1000));
    }

    #[test]
    fn empty_collection_yields_null_years() {
        let stats = BookStats::from_books(&[], 2026);
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.author_count, 0);
        assert!(stats.genre_distribution.is_empty());
        assert_eq!(stats.average_year, None);

        let value = serde_json::to_value(&stats).unwrap();
        assert!(value["averageYear"].is_null());
        assert!(value["yearRange"]["oldest"].is_null());
    }
}
