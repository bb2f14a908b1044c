pub mod bookings;
pub mod parking_spots;

use axum::Json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Parses a path identifier. A malformed id cannot name an existing row, so it
/// is reported as not found for that parameter.
pub(crate) fn parse_id(raw: &str, param: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(param))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "bookingId").unwrap(), id);
        assert!(matches!(
            parse_id("not-a-uuid", "bookingId"),
            Err(AppError::NotFound { param: "bookingId" })
        ));
    }
}
