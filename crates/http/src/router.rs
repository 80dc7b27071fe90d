//! Router builder for the shelf HTTP server

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, OriginalUri, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use shelf_kernel::ModuleRegistry;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Builder for constructing the main HTTP router
///
/// Routes are collected first; middleware is applied once in [`RouterBuilder::build`]
/// so that every route and the fallback sit behind the same stack.
pub struct RouterBuilder {
    router: Router,
    tracing: bool,
    cors: bool,
    request_id: bool,
    catch_panic: bool,
    timeout: Option<Duration>,
    body_limit: Option<usize>,
    error_details: bool,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            tracing: false,
            cors: false,
            request_id: false,
            catch_panic: false,
            timeout: None,
            body_limit: None,
            error_details: false,
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api_path = format!("/api/{}", module_name);
        self.router = self.router.nest(&api_path, module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Turn handler panics into 500 envelopes
    pub fn with_catch_panic(mut self) -> Self {
        self.catch_panic = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Cap request body size
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = Some(bytes);
        self
    }

    /// Copy the cause chain of 5xx failures into the response body as `detail`
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.error_details = expose;
        self
    }

    /// Serve a merged OpenAPI document collected from all modules
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = collect_openapi(registry);

        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "merged OpenAPI document is not valid, serving a stub");
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("shelf API")
                            .version(env!("CARGO_PKG_VERSION"))
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        self.router = self.router.route(
            "/api-docs",
            get(move || async move { Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let mut router = self.router.fallback(route_not_found);

        if let Some(bytes) = self.body_limit {
            router = router.layer(DefaultBodyLimit::max(bytes));
        }
        if let Some(timeout) = self.timeout {
            router = router.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));
        }
        if self.catch_panic {
            router = router.layer(CatchPanicLayer::custom(panic_response));
        }
        router = router.layer(middleware::map_response_with_state(
            self.error_details,
            finish_error_response,
        ));
        if self.request_id {
            router = router.layer(PropagateRequestIdLayer::x_request_id());
        }
        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }
        if self.request_id {
            router = router.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        }
        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(AnyOrigin)
                    .allow_methods(AnyOrigin)
                    .allow_headers(AnyOrigin),
            );
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_openapi(registry: &ModuleRegistry) -> serde_json::Value {
    let mut openapi_spec = json!({
        "openapi": "3.0.0",
        "info": {
            "title": "shelf API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Books, authors, and categories backed by flat-file collections"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean" },
            "message": { "type": "string" },
            "errors": { "type": "array", "items": { "type": "string" } },
            "detail": { "type": "string" }
        },
        "required": ["success", "message"]
    });

    openapi_spec["paths"]["/health"] = json!({
        "get": {
            "summary": "Health check",
            "responses": { "200": { "description": "OK" } }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                // "/" maps onto the bare mount point
                let prefixed_path = match path.as_str() {
                    "/" => format!("/api/{}", module.name()),
                    _ => format!("/api/{}{}", module.name(), path),
                };
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// Fallback for anything no module claimed
async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
            "requestedUrl": uri.to_string(),
            "method": method.as_str(),
        })),
    )
}

/// Last touch on failed responses leaving the router.
///
/// Middleware errors (timeouts, 405s) come back with an empty body and get the
/// standard envelope. Server failures carrying an [`ErrorDetail`] get it as
/// `detail` when this router exposes details.
async fn finish_error_response(State(expose): State<bool>, response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    if !response.headers().contains_key(header::CONTENT_TYPE) {
        let message = status.canonical_reason().unwrap_or("Request failed");
        let body = ErrorBody {
            success: false,
            message: message.to_string(),
            errors: None,
        };
        let (mut parts, _) = response.into_parts();
        parts.headers.remove(header::CONTENT_LENGTH);
        let rendered = (status, Json(body)).into_response();
        let (rendered_parts, body) = rendered.into_parts();
        parts.headers.extend(rendered_parts.headers);
        return Response::from_parts(parts, body);
    }

    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };
    if !expose {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to buffer error body");
            return Response::from_parts(parts, axum::body::Body::empty());
        }
    };
    let mut envelope: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(_) => return Response::from_parts(parts, axum::body::Body::from(bytes)),
    };
    envelope["detail"] = serde_json::Value::String(detail);

    parts.headers.remove(header::CONTENT_LENGTH);
    let rendered = Json(envelope).into_response();
    let (rendered_parts, body) = rendered.into_parts();
    parts.headers.extend(rendered_parts.headers);
    Response::from_parts(parts, body)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("handler panicked: {reason}")).into_response()
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
