use crate::domain::Product;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{comparison_token, entity_headers, persisted_id};
use crate::transport::http::types::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

fn json_body(request: Result<Json<Product>, JsonRejection>) -> Result<Product, ApiError> {
    request
        .map(|Json(product)| product)
        .map_err(ApiError::from)
}

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products ordered by id", body = [Product]),
        (status = 500, description = "Repository failure")
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.product_service.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found; ETag carries the product id", body = Product),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Repository failure")
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let product = state
        .product_service
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let id = persisted_id(&product)?;
    // The ETag of a plain read is the id, not the version.
    let headers = entity_headers(id, id)?;
    Ok((StatusCode::OK, headers, Json(product)).into_response())
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = Product,
    responses(
        (status = 201, description = "Product created; ETag carries the version", body = Product),
        (status = 400, description = "Body is not a readable Product"),
        (status = 415, description = "Body is not sent as JSON"),
        (status = 500, description = "Repository failure")
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ApiError> {
    let payload = json_body(request)?;
    tracing::info!(name = %payload.name, "Adding new product");

    // Client-supplied id and version are ignored.
    let product = Product::new(payload.name, payload.description, payload.quantity);
    let created = state.product_service.save(product).await?;

    let id = persisted_id(&created)?;
    let headers = entity_headers(created.version, id)?;
    Ok((StatusCode::CREATED, headers, Json(created)).into_response())
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    request_body = Product,
    params(
        ("id" = i32, Path, description = "Product id"),
        ("If-Match" = i32, Header, description = "Comparison token; a value equal to the stored version is rejected with 409")
    ),
    responses(
        (status = 200, description = "Product updated; ETag carries the stored version", body = Product),
        (status = 400, description = "Body is not a readable Product, or the comparison token header is missing or not an integer"),
        (status = 404, description = "No product with this id"),
        (status = 409, description = "Comparison token equals the stored version"),
        (status = 415, description = "Body is not sent as JSON"),
        (status = 500, description = "Repository failure")
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    request: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ApiError> {
    let payload = json_body(request)?;
    let token = comparison_token(&headers)?;

    let mut existing = state
        .product_service
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    // Conflict on equality, not on mismatch.
    if existing.version == token {
        return Err(ApiError::VersionConflict(token));
    }

    tracing::info!(name = %existing.name, id, "Updating product");
    existing.apply_update(payload);

    // The record can disappear between the lookup and the write.
    let updated = state
        .product_service
        .update(existing)
        .await?
        .ok_or(ApiError::NotFound)?;

    let id = persisted_id(&updated)?;
    let headers = entity_headers(updated.version, id)?;
    Ok((StatusCode::OK, headers, Json(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted (empty body)"),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Repository failure")
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(id, "Deleting product");
    if state.product_service.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    state.product_service.delete(id).await?;
    Ok(StatusCode::OK)
}
