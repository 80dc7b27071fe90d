use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::service::Resource;
use crate::utils;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    pub name: Option<String>,
    pub birth_year: Option<i32>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
}

/// Partial update; an empty patch only refreshes `updatedAt`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthor {
    pub name: Option<String>,
    pub birth_year: Option<i32>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
}

impl Resource for Author {
    type Create = CreateAuthor;
    type Update = UpdateAuthor;

    const LABEL: &'static str = "Author";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(input: CreateAuthor, now: DateTime<Utc>) -> Self {
        Self {
            id: utils::new_id(),
            name: input.name.unwrap_or_default(),
            birth_year: input.birth_year,
            nationality: input.nationality,
            biography: input.biography,
            created_at: now,
            updated_at: now,
        }
    }

    fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if utils::is_blank(&self.name) {
            errors.push("Name is required".to_string());
        }
        if self.birth_year.is_some_and(|year| year > utils::current_year()) {
            errors.push("Birth year cannot be in the future".to_string());
        }
        errors
    }

    fn is_empty_update(update: &UpdateAuthor) -> bool {
        update.name.is_none()
            && update.birth_year.is_none()
            && update.nationality.is_none()
            && update.biography.is_none()
    }

    fn apply(&mut self, update: UpdateAuthor) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(year) = update.birth_year {
            self.birth_year = Some(year);
        }
        if let Some(nationality) = update.nationality {
            self.nationality = Some(nationality);
        }
        if let Some(biography) = update.biography {
            self.biography = Some(biography);
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}
