pub mod models;
pub mod stats;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use shelf_http::ApiResponse;
use shelf_kernel::{InitCtx, Module};

use super::crud;
use crate::service::{ResourceService, Services};
use models::Category;
use stats::CategoryStats;

pub struct CategoriesModule {
    service: Arc<ResourceService<Category>>,
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let records = self.service.list_all().await.len();
        let file = ctx.settings.storage.categories_path();
        tracing::info!(
            module = self.name(),
            records,
            file = %file.display(),
            "categories module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(crud::list::<Category>).post(crud::create::<Category>),
            )
            .route("/stats", get(category_stats))
            .route(
                "/{id}",
                get(crud::get::<Category>)
                    .put(crud::update::<Category>)
                    .delete(crud::delete::<Category>),
            )
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let id = json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": { "summary": "List categories", "tags": ["Categories"], "responses": { "200": { "description": "All categories" } } },
                    "post": { "summary": "Create a category", "tags": ["Categories"], "responses": { "201": { "description": "Created" }, "400": { "description": "Validation failed" } } }
                },
                "/stats": {
                    "get": { "summary": "Category statistics", "tags": ["Categories"], "responses": { "200": { "description": "Totals" } } }
                },
                "/{id}": {
                    "get": { "summary": "Get a category", "tags": ["Categories"], "parameters": id.clone(), "responses": { "200": { "description": "Found" }, "404": { "description": "Category not found" } } },
                    "put": { "summary": "Update a category", "tags": ["Categories"], "parameters": id.clone(), "responses": { "200": { "description": "Updated" }, "404": { "description": "Category not found" } } },
                    "delete": { "summary": "Delete a category", "tags": ["Categories"], "parameters": id, "responses": { "200": { "description": "Deleted" }, "404": { "description": "Category not found" } } }
                }
            },
            "components": {
                "schemas": {
                    "Category": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "description": { "type": "string" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "createdAt", "updatedAt"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module stopped");
        Ok(())
    }
}

async fn category_stats(
    State(service): State<Arc<ResourceService<Category>>>,
) -> Json<ApiResponse<CategoryStats>> {
    let categories = service.list_all().await;
    Json(ApiResponse::ok(CategoryStats::from_categories(&categories)))
}

pub fn create_module(services: &Services) -> Arc<dyn Module> {
    Arc::new(CategoriesModule {
        service: services.categories.clone(),
    })
}
