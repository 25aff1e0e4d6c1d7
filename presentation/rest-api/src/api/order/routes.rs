use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};
use uuid::Uuid;

use business::domain::order::use_cases::get_all::{GetAllOrdersParams, GetAllOrdersUseCase};
use business::domain::order::use_cases::get_by_id::{GetOrderByIdParams, GetOrderByIdUseCase};
use business::domain::order::use_cases::place::{PlaceOrderParams, PlaceOrderUseCase};
use business::domain::order::use_cases::update_status::{
    UpdateOrderStatusParams, UpdateOrderStatusUseCase,
};
use business::domain::shared::pagination::PageRequest;

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::order::dto::{
    OrderPageResponse, OrderResponse, PlaceOrderRequest, UpdateOrderStatusRequest,
};
use crate::api::security::FirebaseBearer;
use crate::api::tags::ApiTags;

pub struct OrderApi {
    place_use_case: Arc<dyn PlaceOrderUseCase>,
    get_all_use_case: Arc<dyn GetAllOrdersUseCase>,
    get_by_id_use_case: Arc<dyn GetOrderByIdUseCase>,
    update_status_use_case: Arc<dyn UpdateOrderStatusUseCase>,
}

impl OrderApi {
    pub fn new(
        place_use_case: Arc<dyn PlaceOrderUseCase>,
        get_all_use_case: Arc<dyn GetAllOrdersUseCase>,
        get_by_id_use_case: Arc<dyn GetOrderByIdUseCase>,
        update_status_use_case: Arc<dyn UpdateOrderStatusUseCase>,
    ) -> Self {
        Self {
            place_use_case,
            get_all_use_case,
            get_by_id_use_case,
            update_status_use_case,
        }
    }
}

/// Order API
///
/// Placing an order reserves stock for every line or for none of them.
/// Cancelling returns the reserved stock.
#[OpenApi]
impl OrderApi {
    /// Place an order
    ///
    /// Lines are reserved in request order. The first line that cannot be
    /// satisfied is reported in `field` (e.g. `items.1.quantity`) and no stock changes.
    #[oai(path = "/orders", method = "post", tag = "ApiTags::Orders")]
    async fn place_order(
        &self,
        auth: FirebaseBearer,
        body: Json<PlaceOrderRequest>,
    ) -> PlaceOrderResponse {
        let params = PlaceOrderParams {
            user_id: auth.0.into_caller().user_id,
            items: body.0.items.into_iter().map(Into::into).collect(),
        };

        match self.place_use_case.execute(params).await {
            Ok(order) => PlaceOrderResponse::Created(Json(order.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => PlaceOrderResponse::BadRequest(json),
                    422 => PlaceOrderResponse::UnprocessableEntity(json),
                    _ => PlaceOrderResponse::InternalError(json),
                }
            }
        }
    }

    /// List orders
    ///
    /// Customers see their own orders, administrators see every order. Newest first.
    #[oai(path = "/orders", method = "get", tag = "ApiTags::Orders")]
    async fn get_all_orders(
        &self,
        auth: FirebaseBearer,
        /// 1-based page number (default: 1)
        page: Query<Option<u32>>,
        /// Orders per page (default: 10, max: 100)
        per_page: Query<Option<u32>>,
    ) -> GetAllOrdersResponse {
        let params = GetAllOrdersParams {
            caller: auth.0.into_caller(),
            page: PageRequest::new(page.0, per_page.0),
        };

        match self.get_all_use_case.execute(params).await {
            Ok(page) => GetAllOrdersResponse::Ok(Json(page.into())),
            Err(err) => {
                let (_status, json) = err.into_error_response();
                GetAllOrdersResponse::InternalError(json)
            }
        }
    }

    /// Get an order by ID
    #[oai(path = "/orders/:id", method = "get", tag = "ApiTags::Orders")]
    async fn get_order_by_id(&self, auth: FirebaseBearer, id: Path<String>) -> GetOrderByIdResponse {
        let Ok(uuid) = Uuid::parse_str(&id.0) else {
            return GetOrderByIdResponse::BadRequest(ErrorResponse::invalid_id("order.invalid_id"));
        };

        let params = GetOrderByIdParams {
            caller: auth.0.into_caller(),
            id: uuid,
        };

        match self.get_by_id_use_case.execute(params).await {
            Ok(order) => GetOrderByIdResponse::Ok(Json(order.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    403 => GetOrderByIdResponse::Forbidden(json),
                    404 => GetOrderByIdResponse::NotFound(json),
                    _ => GetOrderByIdResponse::InternalError(json),
                }
            }
        }
    }

    /// Change an order's status
    ///
    /// Administrators only. Allowed moves: pending to processing or cancelled,
    /// processing to completed or cancelled. Cancelling restores every item's stock.
    #[oai(path = "/orders/:id/status", method = "patch", tag = "ApiTags::Orders")]
    async fn update_order_status(
        &self,
        auth: FirebaseBearer,
        id: Path<String>,
        body: Json<UpdateOrderStatusRequest>,
    ) -> UpdateOrderStatusResponse {
        let Ok(uuid) = Uuid::parse_str(&id.0) else {
            return UpdateOrderStatusResponse::BadRequest(ErrorResponse::invalid_id(
                "order.invalid_id",
            ));
        };

        let params = UpdateOrderStatusParams {
            caller: auth.0.into_caller(),
            id: uuid,
            status: body.0.status.into(),
        };

        match self.update_status_use_case.execute(params).await {
            Ok(order) => UpdateOrderStatusResponse::Ok(Json(order.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    403 => UpdateOrderStatusResponse::Forbidden(json),
                    404 => UpdateOrderStatusResponse::NotFound(json),
                    422 => UpdateOrderStatusResponse::UnprocessableEntity(json),
                    _ => UpdateOrderStatusResponse::InternalError(json),
                }
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum PlaceOrderResponse {
    #[oai(status = 201)]
    Created(Json<OrderResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),
    #[oai(status = 422)]
    UnprocessableEntity(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetAllOrdersResponse {
    #[oai(status = 200)]
    Ok(Json<OrderPageResponse>),
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetOrderByIdResponse {
    #[oai(status = 200)]
    Ok(Json<OrderResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum UpdateOrderStatusResponse {
    #[oai(status = 200)]
    Ok(Json<OrderResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 422)]
    UnprocessableEntity(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}
