use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Database,
};
use serde::Deserialize;
use tracing::error;

use crate::routes::common::{
    document_id, error_response, get_f64, get_i64, get_string, iso_from_bson, json_response,
    json_response_with_status, now_datetime, object_id, ApiResult,
};
use crate::routes::products::map_product;

#[derive(Deserialize)]
struct OrderLineItem {
    #[serde(rename = "productId")]
    product_id: Option<String>,
    quantity: Option<i64>,
}

// Every field optional at the deserialization layer: missing data is reported
// through the handler's own error path, which answers 500 for any failure on
// this surface, validation included.
#[derive(Deserialize)]
struct CreateOrderRequest {
    #[serde(rename = "customerName")]
    customer_name: Option<String>,
    #[serde(rename = "customerEmail")]
    customer_email: Option<String>,
    #[serde(rename = "customerPhone")]
    customer_phone: Option<String>,
    #[serde(rename = "customerAddress")]
    customer_address: Option<String>,
    #[serde(rename = "totalPrice")]
    total_price: Option<f64>,
    products: Option<Vec<OrderLineItem>>,
}

fn server_error(message: &str) -> (StatusCode, Json<Document>) {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn require<T>(value: Option<T>, message: &str) -> Result<T, (StatusCode, Json<Document>)> {
    value.ok_or_else(|| server_error(message))
}

/// Response shape for an order document; line items keep `productId` as the
/// referenced hex id.
fn map_order(doc: &Document) -> Document {
    let mut out = Document::new();
    out.insert("_id", document_id(doc).unwrap_or_default());
    out.insert("customerName", get_string(doc, "customerName").unwrap_or_default());
    out.insert("customerEmail", get_string(doc, "customerEmail").unwrap_or_default());
    out.insert("customerPhone", get_string(doc, "customerPhone").unwrap_or_default());
    out.insert("customerAddress", get_string(doc, "customerAddress").unwrap_or_default());
    out.insert("totalPrice", get_f64(doc, "totalPrice").unwrap_or(0.0));

    let mut items: Vec<Bson> = Vec::new();
    if let Ok(products) = doc.get_array("products") {
        for item in products {
            if let Bson::Document(item_doc) = item {
                let product_id = item_doc
                    .get_object_id("productId")
                    .map(|oid| Bson::String(oid.to_hex()))
                    .unwrap_or(Bson::Null);
                items.push(Bson::Document(doc! {
                    "productId": product_id,
                    "quantity": get_i64(item_doc, "quantity").unwrap_or(0),
                }));
            }
        }
    }
    out.insert("products", Bson::Array(items));

    if let Some(created) = doc.get("createdAt").and_then(iso_from_bson) {
        out.insert("createdAt", created);
    }
    if let Some(updated) = doc.get("updatedAt").and_then(iso_from_bson) {
        out.insert("updatedAt", updated);
    }
    out
}

/// `map_order` with each line item's `productId` swapped for the referenced
/// product document. Dangling references resolve to null; the reference is
/// weak and deleting a product does not touch the orders that mention it.
async fn map_order_expanded(
    db: &Database,
    order: &Document,
) -> Result<Document, (StatusCode, Json<Document>)> {
    let mut out = map_order(order);
    let products_coll = db.collection::<Document>("products");

    let mut items: Vec<Bson> = Vec::new();
    if let Ok(line_items) = order.get_array("products") {
        for item in line_items {
            let Bson::Document(item_doc) = item else {
                continue;
            };
            let expanded = match item_doc.get_object_id("productId") {
                Ok(oid) => products_coll
                    .find_one(doc! { "_id": oid })
                    .await
                    .map_err(|e| {
                        error!("Error fetching orders: {}", e);
                        server_error(&e.to_string())
                    })?
                    .map(|product| Bson::Document(map_product(&product)))
                    .unwrap_or(Bson::Null),
                Err(_) => Bson::Null,
            };
            items.push(Bson::Document(doc! {
                "productId": expanded,
                "quantity": get_i64(item_doc, "quantity").unwrap_or(0),
            }));
        }
    }
    out.insert("products", Bson::Array(items));
    Ok(out)
}

// POST / — totalPrice is stored as supplied; it is never checked against the
// line items.
async fn create_order(
    State(db): State<Database>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult {
    let customer_name = require(payload.customer_name, "customerName is required")?;
    let customer_email = require(payload.customer_email, "customerEmail is required")?;
    let customer_phone = require(payload.customer_phone, "customerPhone is required")?;
    let customer_address = require(payload.customer_address, "customerAddress is required")?;
    let total_price = require(payload.total_price, "totalPrice is required")?;

    let mut items: Vec<Bson> = Vec::new();
    for line_item in payload.products.unwrap_or_default() {
        let raw_id = require(line_item.product_id, "productId is required")?;
        let quantity = require(line_item.quantity, "quantity is required")?;
        let oid = object_id(&raw_id)
            .ok_or_else(|| server_error(&format!("invalid product id `{}`", raw_id)))?;
        items.push(Bson::Document(doc! {
            "productId": oid,
            "quantity": quantity,
        }));
    }

    let now = now_datetime();
    let order_doc = doc! {
        "_id": ObjectId::new(),
        "customerName": customer_name,
        "customerEmail": customer_email,
        "customerPhone": customer_phone,
        "customerAddress": customer_address,
        "totalPrice": total_price,
        "products": Bson::Array(items),
        "createdAt": now,
        "updatedAt": now,
    };

    let orders = db.collection::<Document>("orders");
    orders.insert_one(order_doc.clone()).await.map_err(|e| {
        error!("Order creation error: {}", e);
        server_error(&e.to_string())
    })?;

    Ok(json_response_with_status(
        StatusCode::CREATED,
        Bson::Document(doc! {
            "message": "Order placed successfully",
            "order": map_order(&order_doc),
        }),
    ))
}

// GET / — all orders, newest first, product references expanded for display.
// Unbounded result set.
async fn list_orders(State(db): State<Database>) -> ApiResult {
    let collection = db.collection::<Document>("orders");
    let mut cursor = collection
        .find(doc! {})
        .sort(doc! { "createdAt": -1 })
        .await
        .map_err(|e| {
            error!("Error fetching orders: {}", e);
            server_error(&e.to_string())
        })?;

    let mut orders: Vec<Bson> = Vec::new();
    while let Some(order) = cursor.try_next().await.map_err(|e| {
        error!("Error fetching orders: {}", e);
        server_error(&e.to_string())
    })? {
        orders.push(Bson::Document(map_order_expanded(&db, &order).await?));
    }

    Ok(json_response(Bson::Document(
        doc! { "orders": Bson::Array(orders) },
    )))
}

// POST /{id}/delete — the route name is historical; the effect is an
// unconditional hard delete.
async fn delete_order(Path(id): Path<String>, State(db): State<Database>) -> ApiResult {
    let Some(oid) = object_id(&id) else {
        return Err(error_response(StatusCode::BAD_REQUEST, "Invalid order ID format"));
    };

    let collection = db.collection::<Document>("orders");
    let deleted = collection
        .find_one_and_delete(doc! { "_id": oid })
        .await
        .map_err(|e| {
            error!("Error deleting order: {}", e);
            server_error(&e.to_string())
        })?;

    let Some(order_doc) = deleted else {
        return Err((StatusCode::NOT_FOUND, Json(doc! { "message": "Order not found" })));
    };

    Ok(json_response(Bson::Document(doc! {
        "message": "Order deleted successfully",
        "order": map_order(&order_doc),
    })))
}

pub fn orders_router(db: Database) -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/{id}/delete", post(delete_order))
        .with_state(db)
}
