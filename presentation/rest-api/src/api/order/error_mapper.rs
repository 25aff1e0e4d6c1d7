use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::order::errors::OrderError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for OrderError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let message = self.to_string();
        let (status, response) = match &self {
            OrderError::InvalidRequest(invalid) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("ValidationError", &message).with_field(invalid.field()),
            ),
            OrderError::ProductNotFound { line, product_id } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("ProductNotFound", &message)
                    .with_field(Some(format!("items.{line}.product_id")))
                    .with_detail(product_id.to_string()),
            ),
            OrderError::InsufficientStock {
                line,
                product_id,
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("InsufficientStock", &message)
                    .with_field(Some(format!("items.{line}.quantity")))
                    .with_detail(format!(
                        "product {product_id}: requested {requested}, available {available}"
                    )),
            ),
            OrderError::InvalidTransition { from, to } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("InvalidTransition", &message)
                    .with_field(Some("status".to_string()))
                    .with_detail(format!("{from} -> {to}")),
            ),
            OrderError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NotFound", &message),
            ),
            OrderError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("Forbidden", &message),
            ),
            OrderError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("InternalError", &message),
            ),
        };

        (status, Json(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::errors::RepositoryError;
    use business::domain::order::errors::InvalidOrderRequest;
    use business::domain::order::value_objects::OrderStatus;
    use uuid::Uuid;

    #[test]
    fn should_point_insufficient_stock_at_failing_line() {
        let (status, Json(body)) = OrderError::InsufficientStock {
            line: 1,
            product_id: Uuid::nil(),
            requested: 3,
            available: 2,
        }
        .into_error_response();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.message, "order.insufficient_stock");
        assert_eq!(body.field.as_deref(), Some("items.1.quantity"));
        assert!(body.detail.unwrap().contains("requested 3, available 2"));
    }

    #[test]
    fn should_map_invalid_request_to_bad_request_with_field() {
        let (status, Json(body)) =
            OrderError::from(InvalidOrderRequest::NonPositiveQuantity { line: 0 })
                .into_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "order.non_positive_quantity");
        assert_eq!(body.field.as_deref(), Some("items.0.quantity"));
    }

    #[test]
    fn should_describe_rejected_transition() {
        let (status, Json(body)) = OrderError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Processing,
        }
        .into_error_response();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.detail.as_deref(), Some("completed -> processing"));
    }

    #[test]
    fn should_hide_repository_details() {
        let (status, Json(body)) =
            OrderError::Repository(RepositoryError::DatabaseError).into_error_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.name, "InternalError");
        assert!(body.detail.is_none());
    }

    #[test]
    fn should_map_access_errors() {
        assert_eq!(OrderError::Forbidden.into_error_response().0, StatusCode::FORBIDDEN);
        assert_eq!(OrderError::NotFound.into_error_response().0, StatusCode::NOT_FOUND);
    }
}
