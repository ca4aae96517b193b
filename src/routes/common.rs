use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use std::time::{SystemTime, UNIX_EPOCH};

pub type ApiResult = Result<Response, (StatusCode, Json<Document>)>;

pub fn json_response(value: Bson) -> Response {
    Json(value).into_response()
}

pub fn json_response_with_status(status: StatusCode, value: Bson) -> Response {
    (status, Json(value)).into_response()
}

pub fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Document>) {
    (status, Json(doc! { "error": message }))
}

/// Parse a document id, accepting only the 24-character hex form. Handlers
/// reject anything else before the store is queried.
pub fn object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

pub fn get_string(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Bson::as_str).map(|s| s.to_string())
}

pub fn get_f64(doc: &Document, key: &str) -> Option<f64> {
    match doc.get(key) {
        Some(Bson::Double(v)) => Some(*v),
        Some(Bson::Int32(v)) => Some(*v as f64),
        Some(Bson::Int64(v)) => Some(*v as f64),
        _ => None,
    }
}

pub fn get_i64(doc: &Document, key: &str) -> Option<i64> {
    doc.get(key).and_then(Bson::as_i64)
}

pub fn document_id(doc: &Document) -> Option<String> {
    doc.get_object_id("_id").ok().map(|oid| oid.to_hex())
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

pub fn now_datetime() -> DateTime {
    DateTime::from_millis(now_millis())
}

pub fn iso_from_bson(value: &Bson) -> Option<String> {
    match value {
        Bson::DateTime(dt) => Some(dt.to_string()),
        Bson::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_accepts_24_hex_characters() {
        assert!(object_id("0123456789abcdef01234567").is_some());
        assert!(object_id("ABCDEF0123456789abcdef01").is_some());
    }

    #[test]
    fn object_id_rejects_everything_else() {
        assert!(object_id("").is_none());
        assert!(object_id("0123456789abcdef0123456").is_none()); // 23 chars
        assert!(object_id("0123456789abcdef012345678").is_none()); // 25 chars
        assert!(object_id("zzzzzzzzzzzzzzzzzzzzzzzz").is_none()); // non-hex
        assert!(object_id("not-an-id").is_none());
    }

    #[test]
    fn document_id_maps_object_ids_to_hex() {
        let oid = ObjectId::new();
        let doc = doc! { "_id": oid };
        assert_eq!(document_id(&doc), Some(oid.to_hex()));
        assert_eq!(document_id(&doc! { "name": "x" }), None);
    }

    #[test]
    fn iso_from_bson_handles_datetimes_and_strings() {
        let dt = DateTime::from_millis(0);
        assert_eq!(
            iso_from_bson(&Bson::DateTime(dt)),
            Some(dt.to_string())
        );
        assert_eq!(
            iso_from_bson(&Bson::String("2024-01-01".to_string())),
            Some("2024-01-01".to_string())
        );
        assert_eq!(iso_from_bson(&Bson::Int32(3)), None);
    }
}
