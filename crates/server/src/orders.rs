//! Order and payment API endpoints.

use api_types::{
    ApiResponse,
    order::{OrderCreated, OrderNew, OrderStatus, OrderVerify, OrderView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{Order, PaymentPayload};

use crate::{ServerError, server::ServerState, user};

fn map_status(status: engine::OrderStatus) -> OrderStatus {
    match status {
        engine::OrderStatus::Pending => OrderStatus::Pending,
        engine::OrderStatus::Paid => OrderStatus::Paid,
        engine::OrderStatus::Failed => OrderStatus::Failed,
        engine::OrderStatus::Cancelled => OrderStatus::Cancelled,
    }
}

pub(crate) fn map_order(order: Order) -> OrderView {
    OrderView {
        id: order.id,
        rental_request_id: order.rental_request_id,
        tenant_id: order.tenant_id,
        amount_minor: order.amount_minor,
        status: map_status(order.status),
        transaction_id: order.transaction_id,
        created_at: order.created_at,
    }
}

/// Creates an order for an approved request and opens checkout at the
/// gateway. The amount always comes from the listing, never the caller.
pub async fn create(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OrderNew>,
) -> Result<(StatusCode, Json<ApiResponse<OrderCreated>>), ServerError> {
    user::require_role(&caller, "tenant")?;

    let order = state
        .engine
        .create_order(&caller.id, &payload.rental_request_id)
        .await?;

    let checkout = state
        .payments
        .make_payment(&PaymentPayload {
            order_id: order.id.to_string(),
            amount_minor: order.amount_minor,
            currency: "BDT".to_string(),
            customer_name: caller.name.clone(),
            customer_phone: caller.phone.clone(),
            idempotency_key: order.idempotency_key.clone(),
        })
        .await?;

    state
        .engine
        .record_payment_initiated(order.id, &checkout.transaction_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Order created successfully",
            OrderCreated {
                order_id: order.id,
                checkout_url: checkout.checkout_url,
            },
        )),
    ))
}

/// Asks the gateway for the verdict on an order and settles it.
pub async fn verify(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<OrderVerify>,
) -> Result<Json<ApiResponse<OrderView>>, ServerError> {
    user::require_any_role(&caller, &["tenant", "admin"])?;

    // Tenants settle only their own orders; admins settle any.
    let scope = (caller.role != "admin").then_some(caller.id.as_str());

    let verifications = state.payments.verify_payment(&params.order_id).await?;
    let order = state
        .engine
        .settle_order(&params.order_id, scope, &verifications)
        .await?;
    Ok(Json(ApiResponse::new(
        "Order verified successfully",
        map_order(order),
    )))
}
