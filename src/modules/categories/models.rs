use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::service::Resource;
use crate::utils;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Resource for Category {
    type Create = CreateCategory;
    type Update = UpdateCategory;

    const LABEL: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(input: CreateCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: utils::new_id(),
            name: input.name.unwrap_or_default(),
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn violations(&self) -> Vec<String> {
        if utils::is_blank(&self.name) {
            vec!["Name is required".to_string()]
        } else {
            Vec::new()
        }
    }

    fn is_empty_update(update: &UpdateCategory) -> bool {
        update.name.is_none() && update.description.is_none()
    }

    fn apply(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}
