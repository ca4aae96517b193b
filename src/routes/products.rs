use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::ReturnDocument,
    Database,
};
use serde::Deserialize;
use std::fmt::Display;
use tracing::error;

use crate::models::{validate_category, validate_ratings};
use crate::routes::common::{
    document_id, error_response, get_f64, get_string, json_response, object_id, ApiResult,
};

#[derive(Deserialize)]
pub(crate) struct ProductListQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    #[serde(rename = "Discounted_price")]
    discounted_price: Option<f64>,
    category: Option<String>,
    picture: Option<String>,
    ratings: Option<f64>,
}

/// Response shape for a product document: `_id` flattened to its hex string,
/// optional fields omitted when absent.
pub(crate) fn map_product(doc: &Document) -> Document {
    let mut out = Document::new();
    out.insert("_id", document_id(doc).unwrap_or_default());
    out.insert("name", get_string(doc, "name").unwrap_or_default());
    out.insert("description", get_string(doc, "description").unwrap_or_default());
    out.insert("price", get_f64(doc, "price").unwrap_or(0.0));
    if let Some(discounted) = get_f64(doc, "Discounted_price") {
        out.insert("Discounted_price", discounted);
    }
    out.insert("category", get_string(doc, "category").unwrap_or_default());
    out.insert("picture", get_string(doc, "picture").unwrap_or_default());
    if let Some(ratings) = get_f64(doc, "ratings") {
        out.insert("ratings", ratings);
    }
    out
}

fn fetch_error<E: Display>(err: E) -> (StatusCode, Json<Document>) {
    error!("Error fetching products: {}", err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An error occurred while fetching products",
    )
}

async fn find_products(
    db: &Database,
    filter: Document,
    sort: Option<Document>,
) -> Result<Vec<Bson>, (StatusCode, Json<Document>)> {
    let collection = db.collection::<Document>("products");
    let mut find = collection.find(filter);
    if let Some(sort) = sort {
        find = find.sort(sort);
    }
    let mut cursor = find.await.map_err(fetch_error)?;

    let mut products: Vec<Bson> = Vec::new();
    while let Some(product) = cursor.try_next().await.map_err(fetch_error)? {
        products.push(Bson::Document(map_product(&product)));
    }
    Ok(products)
}

// GET /getAllProducts?category=Casual Wear
pub(crate) async fn get_all_products(
    State(db): State<Database>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult {
    let filter = match query.category {
        Some(category) => doc! { "category": category },
        None => doc! {},
    };
    let products = find_products(&db, filter, None).await?;
    Ok(json_response(Bson::Array(products)))
}

// Newest first: `_id` order stands in for creation order, the product
// schema has no timestamp field.
async fn newest_products(State(db): State<Database>) -> ApiResult {
    let products = find_products(&db, doc! {}, Some(doc! { "_id": -1 })).await?;
    Ok(json_response(Bson::Array(products)))
}

async fn oldest_products(State(db): State<Database>) -> ApiResult {
    let products = find_products(&db, doc! {}, Some(doc! { "_id": 1 })).await?;
    Ok(json_response(Bson::Array(products)))
}

async fn price_high(State(db): State<Database>) -> ApiResult {
    let products = find_products(&db, doc! {}, Some(doc! { "price": -1 })).await?;
    Ok(json_response(Bson::Array(products)))
}

async fn price_low(State(db): State<Database>) -> ApiResult {
    let products = find_products(&db, doc! {}, Some(doc! { "price": 1 })).await?;
    Ok(json_response(Bson::Array(products)))
}

// GET /{id}
async fn get_product(Path(id): Path<String>, State(db): State<Database>) -> ApiResult {
    let Some(oid) = object_id(&id) else {
        return Err(error_response(StatusCode::BAD_REQUEST, "Invalid product ID format"));
    };

    let collection = db.collection::<Document>("products");
    let product = collection.find_one(doc! { "_id": oid }).await.map_err(|e| {
        error!("Error fetching product: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while fetching the product",
        )
    })?;

    let Some(product_doc) = product else {
        return Err(error_response(StatusCode::NOT_FOUND, "Product not found"));
    };
    Ok(json_response(Bson::Document(map_product(&product_doc))))
}

// PUT /admin/products/{id} — partial update, provided fields re-validated.
async fn update_product(
    Path(id): Path<String>,
    State(db): State<Database>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult {
    let Some(oid) = object_id(&id) else {
        return Err(error_response(StatusCode::BAD_REQUEST, "Invalid product ID format"));
    };

    let mut update_doc = Document::new();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(error_response(StatusCode::BAD_REQUEST, "name is required"));
        }
        update_doc.insert("name", name);
    }
    if let Some(description) = payload.description {
        if description.trim().is_empty() {
            return Err(error_response(StatusCode::BAD_REQUEST, "description is required"));
        }
        update_doc.insert("description", description);
    }
    if let Some(price) = payload.price {
        update_doc.insert("price", price);
    }
    if let Some(discounted) = payload.discounted_price {
        update_doc.insert("Discounted_price", discounted);
    }
    if let Some(category) = payload.category {
        validate_category(&category)
            .map_err(|message| error_response(StatusCode::BAD_REQUEST, &message))?;
        update_doc.insert("category", category);
    }
    if let Some(picture) = payload.picture {
        update_doc.insert("picture", picture);
    }
    if let Some(ratings) = payload.ratings {
        validate_ratings(Some(ratings))
            .map_err(|message| error_response(StatusCode::BAD_REQUEST, &message))?;
        update_doc.insert("ratings", ratings);
    }

    let collection = db.collection::<Document>("products");

    // An empty body updates nothing but still reports the current document
    if update_doc.is_empty() {
        let existing = collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;
        let Some(product_doc) = existing else {
            return Err(error_response(StatusCode::NOT_FOUND, "Product not found"));
        };
        return Ok(json_response(Bson::Document(map_product(&product_doc))));
    }

    let updated = collection
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": update_doc })
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;

    let Some(product_doc) = updated else {
        return Err(error_response(StatusCode::NOT_FOUND, "Product not found"));
    };
    Ok(json_response(Bson::Document(map_product(&product_doc))))
}

// DELETE /admin/products/{id}
async fn delete_product(Path(id): Path<String>, State(db): State<Database>) -> ApiResult {
    let Some(oid) = object_id(&id) else {
        return Err(error_response(StatusCode::BAD_REQUEST, "Invalid product ID format"));
    };

    let collection = db.collection::<Document>("products");
    let deleted = collection
        .find_one_and_delete(doc! { "_id": oid })
        .await
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    if deleted.is_none() {
        return Err(error_response(StatusCode::NOT_FOUND, "Product not found"));
    }
    Ok(json_response(Bson::Document(
        doc! { "message": "Product deleted successfully" },
    )))
}

pub fn products_router(db: Database) -> Router {
    Router::new()
        .route("/getAllProducts", get(get_all_products))
        .route("/newest", get(newest_products))
        .route("/oldest", get(oldest_products))
        .route("/price-high", get(price_high))
        .route("/price-low", get(price_low))
        .route("/admin/products/{id}", put(update_product).delete(delete_product))
        .route("/{id}", get(get_product))
        .with_state(db)
}
