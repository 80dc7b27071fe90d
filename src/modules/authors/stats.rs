use std::collections::BTreeMap;

use serde::Serialize;

use super::models::Author;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearRange {
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub total_authors: usize,
    pub nationality_distribution: BTreeMap<String, usize>,
    pub birth_year_range: BirthYearRange,
}

impl AuthorStats {
    pub fn from_authors(authors: &[Author]) -> Self {
        let mut nationality_distribution = BTreeMap::new();
        for author in authors {
            let nationality = author
                .nationality
                .as_deref()
                .filter(|nationality| !nationality.is_empty())
                .unwrap_or("Unknown");
            *nationality_distribution
                .entry(nationality.to_string())
                .or_insert(0) += 1;
        }

        let years = || authors.iter().filter_map(|author| author.birth_year);

        Self {
            total_authors: authors.len(),
            nationality_distribution,
            birth_year_range: BirthYearRange {
                earliest: years().min(),
                latest: years().max(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::models::CreateAuthor;
    use crate::service::Resource;
    use chrono::Utc;

    fn author(nationality: Option<&str>, birth_year: Option<i32>) -> Author {
        Author::create(
            CreateAuthor {
                name: Some("someone".to_string()),
                birth_year,
                nationality: nationality.map(str::to_string),
                biography: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn distribution_and_range_skip_missing_years() {
        let authors = vec![
            author(Some("British"), Some(1775)),
            author(Some("British"), None),
            author(None, Some(1920)),
        ];

        let stats = AuthorStats::from_authors(&authors);
        assert_eq!(stats.total_authors, 3);
        assert_eq!(stats.nationality_distribution["British"], 2);
        assert_eq!(stats.nationality_distribution["Unknown"], 1);
        assert_eq!(
            stats.birth_year_range,
            BirthYearRange {
                earliest: Some(1775),
                latest: Some(1920)
            }
        );
    }

    #[test]
    fn empty_nationality_counts_as_unknown() {
        let stats = AuthorStats::from_authors(&[author(Some(""), None), author(None, None)]);
        assert_eq!(stats.nationality_distribution.len(), 1);
        assert_eq!(stats.nationality_distribution["Unknown"], 2);
    }

    #[test]
    fn no_birth_years_gives_empty_range() {
        let stats = AuthorStats::from_authors(&[author(None, None)]);
        assert_eq!(stats.birth_year_range.earliest, None);
        assert_eq!(stats.birth_year_range.latest, None);
    }
}
