use uuid::Uuid;

use super::value_objects::OrderStatus;

/// Malformed placement input. Detected before any stock is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOrderRequest {
    #[error("order.empty_items")]
    EmptyItems,
    #[error("order.non_positive_quantity")]
    NonPositiveQuantity { line: usize },
    #[error("order.quantity_too_large")]
    QuantityTooLarge { line: usize },
    #[error("order.total_overflow")]
    TotalOverflow,
}

impl InvalidOrderRequest {
    /// Request field the error refers to, in `items.{n}.{field}` form.
    pub fn field(&self) -> Option<String> {
        match self {
            InvalidOrderRequest::EmptyItems => Some("items".to_string()),
            InvalidOrderRequest::NonPositiveQuantity { line }
            | InvalidOrderRequest::QuantityTooLarge { line } => {
                Some(format!("items.{line}.quantity"))
            }
            InvalidOrderRequest::TotalOverflow => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    InvalidRequest(#[from] InvalidOrderRequest),
    #[error("order.product_not_found")]
    ProductNotFound { line: usize, product_id: Uuid },
    #[error("order.insufficient_stock")]
    InsufficientStock {
        line: usize,
        product_id: Uuid,
        requested: u32,
        available: u32,
    },
    #[error("order.invalid_transition")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("order.not_found")]
    NotFound,
    #[error("order.forbidden")]
    Forbidden,
    #[error("repository.persistence")]
    Repository(#[from] crate::domain::errors::RepositoryError),
}

impl OrderError {
    /// Zero-based request line that caused a placement failure, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            OrderError::ProductNotFound { line, .. } | OrderError::InsufficientStock { line, .. } => {
                Some(*line)
            }
            OrderError::InvalidRequest(
                InvalidOrderRequest::NonPositiveQuantity { line }
                | InvalidOrderRequest::QuantityTooLarge { line },
            ) => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_point_quantity_errors_at_their_line() {
        let err = InvalidOrderRequest::NonPositiveQuantity { line: 2 };
        assert_eq!(err.field().as_deref(), Some("items.2.quantity"));
    }

    #[test]
    fn should_expose_line_of_stock_failures() {
        let err = OrderError::InsufficientStock {
            line: 1,
            product_id: Uuid::new_v4(),
            requested: 3,
            available: 1,
        };
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.to_string(), "order.insufficient_stock");
    }

    #[test]
    fn should_render_invalid_request_transparently() {
        let err: OrderError = InvalidOrderRequest::EmptyItems.into();
        assert_eq!(err.to_string(), "order.empty_items");
        assert_eq!(err.line(), None);
    }
}
