use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use mongodb::{
    bson::{doc, oid::ObjectId, to_document, Bson, Document},
    Database,
};
use std::path::PathBuf;
use tracing::error;

use crate::models::Product;
use crate::routes::common::{error_response, json_response_with_status, ApiResult};
use crate::routes::products::{get_all_products, map_product};
use crate::upload;

// Cap on the multipart request body, image included.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
struct AdminState {
    db: Database,
    uploads_dir: PathBuf,
}

fn bad_request(message: &str) -> (StatusCode, axum::Json<Document>) {
    error_response(StatusCode::BAD_REQUEST, message)
}

// POST /admin/products — multipart form with a `picture` file field plus the
// product text fields. "Admin" is path convention only, there is no access
// control on this surface.
async fn create_product(State(state): State<AdminState>, mut multipart: Multipart) -> ApiResult {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut price_raw: Option<String> = None;
    let mut discounted_raw: Option<String> = None;
    let mut category: Option<String> = None;
    let mut ratings_raw: Option<String> = None;
    let mut picture: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&e.to_string()))?
    {
        let Some(field_name) = field.name().map(|s| s.to_string()) else {
            continue;
        };

        if field_name == "picture" {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let mime = field.content_type().unwrap_or_default().to_string();
            if !upload::is_allowed_image(&mime, &original_name) {
                return Err(bad_request("Only images are allowed"));
            }
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(&e.to_string()))?;
            let stored_path = upload::store_image(&state.uploads_dir, &original_name, &data)
                .await
                .map_err(|e| {
                    error!("Failed to store upload: {}", e);
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store image")
                })?;
            picture = Some(stored_path);
        } else {
            let value = field.text().await.map_err(|e| bad_request(&e.to_string()))?;
            match field_name.as_str() {
                "name" => name = Some(value),
                "description" => description = Some(value),
                "price" => price_raw = Some(value),
                "Discounted_price" => discounted_raw = Some(value),
                "category" => category = Some(value),
                "ratings" => ratings_raw = Some(value),
                _ => {}
            }
        }
    }

    let Some(picture) = picture else {
        return Err(bad_request("Image is required"));
    };

    let price = match price_raw {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| bad_request("price must be a number"))?,
        None => return Err(bad_request("price is required")),
    };
    let discounted_price = match discounted_raw {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| bad_request("Discounted_price must be a number"))?,
        ),
        None => None,
    };
    let ratings = match ratings_raw {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| bad_request("ratings must be a number"))?,
        ),
        None => None,
    };

    let product = Product {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        price,
        discounted_price,
        category: category.unwrap_or_default(),
        picture,
        ratings,
    };
    product
        .validate()
        .map_err(|message| bad_request(&message))?;

    let mut product_doc = to_document(&product)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    product_doc.insert("_id", ObjectId::new());

    state
        .db
        .collection::<Document>("products")
        .insert_one(product_doc.clone())
        .await
        .map_err(|e| bad_request(&e.to_string()))?;

    Ok(json_response_with_status(
        StatusCode::CREATED,
        Bson::Document(map_product(&product_doc)),
    ))
}

pub fn admin_router(db: Database, uploads_dir: PathBuf) -> Router {
    let state = AdminState {
        db: db.clone(),
        uploads_dir,
    };
    Router::new()
        .route("/admin/products", post(create_product))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
        .merge(
            // same list surface the product router exposes, second mount
            Router::new()
                .route("/getAllProducts", get(get_all_products))
                .with_state(db),
        )
}
