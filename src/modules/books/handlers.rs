use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shelf_http::{ApiJson, ApiResponse, AppError, AppResult};

use super::models::{Book, CreateBook, UpdateBook};
use super::query::{BookQuery, ListParams};
use super::stats::BookStats;
use crate::modules::authors::models::Author;
use crate::service::ResourceService;
use crate::utils;

const MISSING_REQUIRED: &str = "Missing some required fields: title, authorId, categoryId";

#[derive(Clone)]
pub struct BooksState {
    pub books: Arc<ResourceService<Book>>,
    /// Read only, to resolve author names for the `author` filter
    pub authors: Arc<ResourceService<Author>>,
}

/// `GET /api/books`
pub async fn list(
    State(state): State<BooksState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let query = BookQuery::from(params);

    let author_names: HashMap<String, String> = if query.author.is_some() {
        state
            .authors
            .list_all()
            .await
            .into_iter()
            .map(|author| (author.id, author.name))
            .collect()
    } else {
        HashMap::new()
    };

    let page = query.run(state.books.list_all().await, &author_names);
    Json(ApiResponse::paginated(page.books, page.pagination))
}

/// `GET /api/books/stats`
pub async fn stats(State(state): State<BooksState>) -> impl IntoResponse {
    let books = state.books.list_all().await;
    Json(ApiResponse::ok(BookStats::from_books(&books, utils::current_year())))
}

/// `GET /api/books/{id}`
pub async fn get(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.books.get_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(book)))
}

/// `POST /api/books`
pub async fn create(
    State(state): State<BooksState>,
    ApiJson(input): ApiJson<CreateBook>,
) -> AppResult<impl IntoResponse> {
    if input.missing_required_fields() {
        return Err(AppError::bad_request(MISSING_REQUIRED));
    }

    let book = state.books.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(book).with_message("Book created successfully")),
    ))
}

/// `PUT /api/books/{id}`
pub async fn update(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UpdateBook>,
) -> AppResult<Json<ApiResponse<Book>>> {
    if patch.blanks_required_field() {
        return Err(AppError::bad_request(MISSING_REQUIRED));
    }

    let book = state.books.update(&id, patch).await?;
    Ok(Json(
        ApiResponse::ok(book).with_message("Book updated successfully"),
    ))
}

/// `DELETE /api/books/{id}`
pub async fn delete(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.books.remove(&id).await?;
    Ok(Json(
        ApiResponse::ok(book).with_message("Book deleted successfully"),
    ))
}
