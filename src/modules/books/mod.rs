pub mod handlers;
pub mod models;
pub mod query;
pub mod stats;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::json;
use shelf_kernel::{InitCtx, Module};

use crate::service::Services;
use handlers::BooksState;

/// Book catalogue with filtered, sorted, paginated listing
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(state: BooksState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let records = self.state.books.list_all().await.len();
        let file = ctx.settings.storage.books_path();
        tracing::info!(
            module = self.name(),
            records,
            file = %file.display(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        // /stats is registered as a static segment so it wins over /{id}
        Router::new()
            .route("/", get(handlers::list).post(handlers::create))
            .route("/stats", get(handlers::stats))
            .route(
                "/{id}",
                get(handlers::get)
                    .put(handlers::update)
                    .delete(handlers::delete),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let book = json!({
            "description": "Book envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                }
            }
        });
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let query_param = |name: &str, description: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": description,
                "schema": { "type": "string" }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            query_param("genre", "Case-insensitive genre substring"),
                            query_param("author", "Case-insensitive author id or name substring"),
                            query_param("sort", "Field to sort by"),
                            query_param("order", "asc (default) or desc"),
                            query_param("page", "Page number, default 1"),
                            query_param("limit", "Page size, default 10")
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of books with pagination metadata",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookPage" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": book.clone(),
                            "400": error.clone(),
                            "409": error.clone(),
                            "500": error.clone()
                        }
                    }
                },
                "/stats": {
                    "get": {
                        "summary": "Book statistics",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Aggregates over the whole collection",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookStats" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": { "200": book.clone(), "404": error.clone() }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": book.clone(),
                            "400": error.clone(),
                            "404": error.clone(),
                            "500": error.clone()
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": { "200": book, "404": error.clone(), "500": error }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "authorId": { "type": "string" },
                            "categoryId": { "type": "string" },
                            "isbn": { "type": "string" },
                            "publishedYear": { "type": "integer" },
                            "genre": { "type": "string" },
                            "description": { "type": "string" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "authorId", "categoryId", "isbn", "createdAt", "updatedAt"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "authorId": { "type": "string" },
                            "categoryId": { "type": "string" },
                            "isbn": { "type": "string" },
                            "publishedYear": { "type": "integer", "minimum": 1000 },
                            "genre": { "type": "string" },
                            "description": { "type": "string" }
                        }
                    },
                    "BookEnvelope": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "message": { "type": "string" },
                            "data": { "$ref": "#/components/schemas/Book" }
                        }
                    },
                    "BookPage": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "data": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            },
                            "pagination": {
                                "type": "object",
                                "properties": {
                                    "currentPage": { "type": "integer" },
                                    "totalPages": { "type": "integer" },
                                    "totalBooks": { "type": "integer" },
                                    "hasNext": { "type": "boolean" },
                                    "hasPrev": { "type": "boolean" }
                                }
                            }
                        }
                    },
                    "BookStats": {
                        "type": "object",
                        "properties": {
                            "totalBooks": { "type": "integer" },
                            "genreDistribution": {
                                "type": "object",
                                "additionalProperties": { "type": "integer" }
                            },
                            "authorCount": { "type": "integer" },
                            "yearRange": {
                                "type": "object",
                                "properties": {
                                    "oldest": { "type": "integer", "nullable": true },
                                    "newest": { "type": "integer", "nullable": true }
                                }
                            },
                            "averageYear": { "type": "integer", "nullable": true }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the shared services
pub fn create_module(services: &Services) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(BooksState {
        books: services.books.clone(),
        authors: services.authors.clone(),
    }))
}
