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
use models::Author;
use stats::AuthorStats;

pub struct AuthorsModule {
    service: Arc<ResourceService<Author>>,
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let records = self.service.list_all().await.len();
        let file = ctx.settings.storage.authors_path();
        tracing::info!(
            module = self.name(),
            records,
            file = %file.display(),
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(crud::list::<Author>).post(crud::create::<Author>))
            .route("/stats", get(author_stats))
            .route(
                "/{id}",
                get(crud::get::<Author>)
                    .put(crud::update::<Author>)
                    .delete(crud::delete::<Author>),
            )
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let envelope = json!({
            "description": "Author envelope",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "message": { "type": "string" },
                            "data": { "$ref": "#/components/schemas/Author" }
                        }
                    }
                }
            }
        });
        let error = json!({
            "description": "Error envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/AuthorInput" }
                }
            }
        });
        let id = json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": { "200": { "description": "All authors" } }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": body.clone(),
                        "responses": { "201": envelope.clone(), "400": error.clone() }
                    }
                },
                "/stats": {
                    "get": {
                        "summary": "Author statistics",
                        "tags": ["Authors"],
                        "responses": { "200": { "description": "Totals, nationality distribution, birth year range" } }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "parameters": id.clone(),
                        "responses": { "200": envelope.clone(), "404": error.clone() }
                    },
                    "put": {
                        "summary": "Update an author",
                        "tags": ["Authors"],
                        "parameters": id.clone(),
                        "requestBody": body,
                        "responses": { "200": envelope.clone(), "400": error.clone(), "404": error.clone() }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "parameters": id,
                        "responses": { "200": envelope, "404": error }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "birthYear": { "type": "integer" },
                            "nationality": { "type": "string" },
                            "biography": { "type": "string" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "createdAt", "updatedAt"]
                    },
                    "AuthorInput": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "birthYear": { "type": "integer" },
                            "nationality": { "type": "string" },
                            "biography": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

async fn author_stats(
    State(service): State<Arc<ResourceService<Author>>>,
) -> Json<ApiResponse<AuthorStats>> {
    let authors = service.list_all().await;
    Json(ApiResponse::ok(AuthorStats::from_authors(&authors)))
}

pub fn create_module(services: &Services) -> Arc<dyn Module> {
    Arc::new(AuthorsModule {
        service: services.authors.clone(),
    })
}
