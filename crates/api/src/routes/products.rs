//! Catalog and review handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use clementine_core::{Price, ProductId};

use crate::{
    db::{NewProduct, ProductPatch, ProductRepository, RepositoryError, ReviewRepository},
    error::{AppError, Result},
    middleware::{RequireAdmin, RequireAuth},
    models::ProductDetail,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

/// `GET /products`
///
/// The full catalog, oldest first. Public.
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /products/{id}`
///
/// One product with its reviews and derived average rating. Public.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;
    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;
    Ok(Json(ProductDetail::new(product, reviews)))
}

/// `POST /products` (admin)
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    if req.stock < 0 {
        return Err(AppError::BadRequest(
            "stock cannot be negative".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: req.name,
            description: req.description,
            price: req.price,
            category: req.category,
            stock: req.stock,
            image_url: req.image_url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}` (admin)
///
/// Partial update: absent fields keep their current values.
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    if let Some(stock) = req.stock
        && stock < 0
    {
        return Err(AppError::BadRequest(
            "stock cannot be negative".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .update(
            id,
            &ProductPatch {
                name: req.name,
                description: req.description,
                price: req.price,
                category: req.category,
                stock: req.stock,
                image_url: req.image_url,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("product not found".to_owned()),
            other => other.into(),
        })?;
    Ok(Json(product))
}

/// `DELETE /products/{id}` (admin)
///
/// Past order lines keep their snapshot of the product's name and price,
/// so deletion never rewrites history.
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("product not found".to_owned()));
    }
    Ok(Json(json!({ "message": "product removed" })))
}

/// `POST /products/{id}/reviews` (authenticated)
pub async fn create_review(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ));
    }

    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    // The insert can still lose a race with a product delete; the FK
    // violation surfaces as the same 404 the pre-check gives.
    let review = ReviewRepository::new(state.pool())
        .create(caller.user_id(), id, req.rating, &req.comment)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("product not found".to_owned()),
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(review)))
}
