use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use shelf_app::{app, Services};
use shelf_http::App;
use shelf_kernel::settings::{Environment, Settings};
use tower::ServiceExt;

fn router(services: &Services) -> App {
    app(services, &Settings::default()).unwrap()
}

async fn send(router: &App, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn dune() -> Value {
    json!({
        "title": "Dune",
        "authorId": "a1",
        "categoryId": "c1",
        "isbn": "978-0",
        "publishedYear": 1965
    })
}

#[tokio::test]
async fn create_book_returns_201_with_fresh_id() {
    let router = router(&Services::in_memory());

    let (status, body) = send(&router, "POST", "/api/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Book created successfully");
    assert_eq!(body["data"]["publishedYear"], 1965);
    assert!(!body["data"]["id"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["createdAt"], body["data"]["updatedAt"]);
}

#[tokio::test]
async fn out_of_range_year_update_is_rejected_and_book_unchanged() {
    let router = router(&Services::in_memory());
    let (_, created) = send(&router, "POST", "/api/books", Some(dune())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/books/{id}");

    let (status, body) = send(&router, "PUT", &uri, Some(json!({ "publishedYear": 3000 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"],
        json!(["Published year must be between 1000 and current year"])
    );

    let (status, stored) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["data"], created["data"]);
}

#[tokio::test]
async fn partial_update_merges_and_keeps_identity() {
    let router = router(&Services::in_memory());
    let (_, created) = send(&router, "POST", "/api/books", Some(dune())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/api/books/{id}"),
        Some(json!({ "genre": "Science Fiction", "title": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["data"]["genre"], "Science Fiction");
    assert_eq!(body["data"]["title"], "Dune");
    assert_eq!(body["data"]["id"], created["data"]["id"]);
    assert_eq!(body["data"]["createdAt"], created["data"]["createdAt"]);
}

#[tokio::test]
async fn empty_book_update_is_a_bad_request() {
    let router = router(&Services::in_memory());
    let (_, created) = send(&router, "POST", "/api/books", Some(dune())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&router, "PUT", &format!("/api/books/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No valid fields to update");
}

#[tokio::test]
async fn missing_required_fields_are_rejected_before_validation() {
    let router = router(&Services::in_memory());

    let (status, body) = send(&router, "POST", "/api/books", Some(json!({ "title": "Dune" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Missing some required fields: title, authorId, categoryId"
    );

    let (_, created) = send(&router, "POST", "/api/books", Some(dune())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = send(&router, "PUT", &format!("/api/books/{id}"), Some(json!({ "authorId": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_isbn_is_a_conflict() {
    let router = router(&Services::in_memory());
    send(&router, "POST", "/api/books", Some(dune())).await;

    let (status, body) = send(&router, "POST", "/api/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Book with this ISBN already exists");

    let (_, listed) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(listed["pagination"]["totalBooks"], 1);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request_envelope() {
    let router = router(&Services::in_memory());
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let router = router(&Services::in_memory());

    for (method, uri, message) in [
        ("GET", "/api/books/nope", "Book not found"),
        ("DELETE", "/api/books/nope", "Book not found"),
        ("GET", "/api/authors/nope", "Author not found"),
        ("DELETE", "/api/categories/nope", "Category not found"),
    ] {
        let (status, body) = send(&router, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }

    let (status, _) = send(&router, "PUT", "/api/books/nope", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unmatched_route_reports_url_and_method() {
    let router = router(&Services::in_memory());

    let (status, body) = send(&router, "PATCH", "/api/shelves?x=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Route not found",
            "requestedUrl": "/api/shelves?x=1",
            "method": "PATCH"
        })
    );
}

#[tokio::test]
async fn listing_filters_sorts_and_paginates() {
    let router = router(&Services::in_memory());
    let (_, author) = send(&router, "POST", "/api/authors", Some(json!({ "name": "Frank Herbert" }))).await;
    let herbert = author["data"]["id"].as_str().unwrap().to_string();

    for (isbn, title, author_id, year, genre) in [
        ("1", "Dune", herbert.as_str(), 1965, "Science Fiction"),
        ("2", "Emma", "a2", 1815, "Romance"),
        ("3", "Foundation", "a3", 1951, "Science Fiction"),
        ("4", "Children of Dune", herbert.as_str(), 1976, "science fiction"),
    ] {
        let (status, _) = send(
            &router,
            "POST",
            "/api/books",
            Some(json!({
                "title": title,
                "authorId": author_id,
                "categoryId": "c1",
                "isbn": isbn,
                "publishedYear": year,
                "genre": genre
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &router,
        "GET",
        "/api/books?genre=FIC&sort=publishedYear&order=desc&limit=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Children of Dune", "Dune"]);
    assert_eq!(
        body["pagination"],
        json!({
            "currentPage": 1,
            "totalPages": 2,
            "totalBooks": 3,
            "hasNext": true,
            "hasPrev": false
        })
    );

    let (_, by_author) = send(&router, "GET", "/api/books?author=herbert", None).await;
    assert_eq!(by_author["pagination"]["totalBooks"], 2);

    let (_, past_end) = send(&router, "GET", "/api/books?page=3&limit=2", None).await;
    assert_eq!(past_end["data"], json!([]));
    assert_eq!(past_end["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn stats_route_is_not_mistaken_for_an_id() {
    let router = router(&Services::in_memory());

    let (status, body) = send(&router, "GET", "/api/books/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalBooks"], 0);
    assert!(body["data"]["averageYear"].is_null());

    send(&router, "POST", "/api/books", Some(dune())).await;
    let (_, body) = send(&router, "GET", "/api/books/stats", None).await;
    assert_eq!(body["data"]["totalBooks"], 1);
    assert_eq!(body["data"]["averageYear"], 1965);
    assert_eq!(body["data"]["genreDistribution"]["Unknown"], 1);

    let (status, body) = send(&router, "GET", "/api/authors/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalAuthors"], 0);

    let (status, body) = send(&router, "GET", "/api/categories/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCategories"], 0);
}

#[tokio::test]
async fn author_and_category_crud() {
    let router = router(&Services::in_memory());

    let (status, body) = send(&router, "POST", "/api/categories", Some(json!({ "description": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Name is required"]));

    let (status, category) = send(&router, "POST", "/api/categories", Some(json!({ "name": "Fiction" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["message"], "Category created successfully");
    let id = category["data"]["id"].as_str().unwrap().to_string();

    let (status, updated) = send(&router, "PUT", &format!("/api/categories/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Fiction");

    let (status, author) = send(
        &router,
        "POST",
        "/api/authors",
        Some(json!({ "name": "Jane Austen", "birthYear": 1775, "nationality": "British" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let author_id = author["data"]["id"].as_str().unwrap().to_string();

    let (_, listed) = send(&router, "GET", "/api/authors", None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let (status, removed) = send(&router, "DELETE", &format!("/api/authors/{author_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["data"]["name"], "Jane Austen");

    let (status, _) = send(&router, "GET", &format!("/api/authors/{author_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn writes_land_in_pretty_printed_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.data_dir = dir.path().to_path_buf();

    let services = Services::open(&settings.storage);
    let router = app(&services, &settings).unwrap();

    let (status, created) = send(&router, "POST", "/api/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CREATED);

    let raw = std::fs::read_to_string(settings.storage.books_path()).unwrap();
    assert!(raw.starts_with("[\n  {"));
    let stored: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, json!([created["data"].clone()]));

    // a fresh set of services reads back what the first one wrote
    let reopened = router_from(&settings);
    let id = created["data"]["id"].as_str().unwrap();
    let (status, body) = send(&reopened, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Dune");
}

#[tokio::test]
async fn corrupt_collection_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.data_dir = dir.path().to_path_buf();
    std::fs::write(settings.storage.books_path(), "{ not json").unwrap();

    let router = router_from(&settings);
    let (status, body) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalBooks"], 0);
}

fn router_from(settings: &Settings) -> App {
    app(&Services::open(&settings.storage), settings).unwrap()
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_routes() {
    let router = router(&Services::in_memory());
    send(&router, "POST", "/api/books", Some(dune())).await;

    let (status, body) = send(&router, "GET", "/api/books/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalBooks"], 1);

    let (status, body) = send(&router, "GET", "/api/authors/stats/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let mut settings = Settings::default();
    settings.server.body_limit_bytes = 64;
    let router = app(&Services::in_memory(), &settings).unwrap();

    let mut book = dune();
    book["description"] = json!("x".repeat(1024));
    let (status, body) = send(&router, "POST", "/api/books", Some(book)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);

    let (_, listed) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(listed["pagination"]["totalBooks"], 0);
}

#[tokio::test]
async fn body_without_content_type_is_unsupported_media_type() {
    let router = router(&Services::in_memory());
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/categories")
                .body(Body::from(json!({ "name": "Poetry" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

/// Settings whose data dir is a regular file, so every save fails
fn unwritable(dir: &tempfile::TempDir, environment: Environment) -> Settings {
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let mut settings = Settings::default();
    settings.environment = environment;
    settings.storage.data_dir = blocker;
    settings
}

#[tokio::test]
async fn storage_failure_detail_depends_on_environment() {
    let dir = tempfile::tempdir().unwrap();
    let production = router_from(&unwritable(&dir, Environment::Production));
    // built after the production router, in the same process
    let local = router_from(&unwritable(&dir, Environment::Local));

    let category = json!({ "name": "Poetry" });

    let (status, body) = send(&production, "POST", "/api/categories", Some(category.clone())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to persist collection" })
    );

    let (status, body) = send(&local, "POST", "/api/categories", Some(category)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to persist collection");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("i/o failure on"));
}

#[tokio::test]
async fn explicit_detail_setting_overrides_environment() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = unwritable(&dir, Environment::Local);
    settings.server.expose_error_details = Some(false);
    let router = router_from(&settings);

    let (status, body) = send(&router, "POST", "/api/authors", Some(json!({ "name": "Basho" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("detail").is_none());
}

#[tokio::test]
async fn empty_author_update_on_a_legacy_record_only_touches_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.data_dir = dir.path().to_path_buf();
    let stamp = "2020-01-01T00:00:00.000Z";
    std::fs::write(
        settings.storage.authors_path(),
        json!([{ "id": "a1", "name": "", "createdAt": stamp, "updatedAt": stamp }]).to_string(),
    )
    .unwrap();

    let router = router_from(&settings);
    let (status, body) = send(&router, "PUT", "/api/authors/a1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "");
    assert_eq!(body["data"]["createdAt"], stamp);
    assert_ne!(body["data"]["updatedAt"], stamp);
}
