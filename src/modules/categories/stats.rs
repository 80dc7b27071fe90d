use serde::Serialize;

use super::models::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total_categories: usize,
    pub with_description: usize,
    pub without_description: usize,
}

impl CategoryStats {
    pub fn from_categories(categories: &[Category]) -> Self {
        let with_description = categories
            .iter()
            .filter(|category| {
                category
                    .description
                    .as_deref()
                    .is_some_and(|text| !text.trim().is_empty())
            })
            .count();

        Self {
            total_categories: categories.len(),
            with_description,
            without_description: categories.len() - with_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::categories::models::CreateCategory;
    use crate::service::Resource;
    use chrono::Utc;

    #[test]
    fn blank_descriptions_count_as_missing() {
        let categories: Vec<Category> = [Some("Made-up stories"), Some("  "), None]
            .into_iter()
            .map(|description| {
                Category::create(
                    CreateCategory {
                        name: Some("Fiction".to_string()),
                        description: description.map(str::to_string),
                    },
                    Utc::now(),
                )
            })
            .collect();

        let stats = CategoryStats::from_categories(&categories);
        assert_eq!(
            stats,
            CategoryStats {
                total_categories: 3,
                with_description: 1,
                without_description: 2,
            }
        );
    }
}
