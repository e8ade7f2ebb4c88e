//! Rental request API endpoints.

use std::collections::HashMap;

use api_types::{
    ApiResponse,
    request::{RequestDecision, RequestNew, RequestRespond, RequestStatus, RequestView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{RentalRequest, RequestWithHouse};

use crate::{ServerError, listings, server::ServerState, user};

fn map_status(status: engine::RequestStatus) -> RequestStatus {
    match status {
        engine::RequestStatus::Pending => RequestStatus::Pending,
        engine::RequestStatus::Approved => RequestStatus::Approved,
        engine::RequestStatus::Rejected => RequestStatus::Rejected,
    }
}

fn map_request(request: RentalRequest, house: Option<engine::RentalHouse>) -> RequestView {
    RequestView {
        id: request.id,
        rental_house_id: request.rental_house_id,
        tenant_id: request.tenant_id,
        status: map_status(request.status),
        message: request.message,
        phone: request.phone,
        created_at: request.created_at,
        rental_house: house.map(|house| listings::map_listing(house, None)),
    }
}

fn map_request_with_house(entry: RequestWithHouse) -> RequestView {
    map_request(entry.request, entry.house)
}

pub async fn create(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RequestNew>,
) -> Result<(StatusCode, Json<ApiResponse<RequestView>>), ServerError> {
    user::require_role(&caller, "tenant")?;

    let request = state
        .engine
        .create_request(&caller.id, &payload.rental_house_id, payload.message)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Rental request submitted successfully",
            map_request(request, None),
        )),
    ))
}

pub async fn mine(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<RequestView>>>, ServerError> {
    user::require_role(&caller, "tenant")?;

    let (requests, meta) = state.engine.tenant_requests(&caller.id, &params).await?;
    let requests = requests.into_iter().map(map_request_with_house).collect();
    Ok(Json(ApiResponse::with_meta(
        "Tenant requests retrieved successfully",
        requests,
        listings::map_meta(meta),
    )))
}

pub async fn incoming(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<RequestView>>>, ServerError> {
    user::require_role(&caller, "landlord")?;

    let (requests, meta) = state.engine.landlord_requests(&caller.id, &params).await?;
    let requests = requests.into_iter().map(map_request_with_house).collect();
    Ok(Json(ApiResponse::with_meta(
        "Landlord requests retrieved successfully",
        requests,
        listings::map_meta(meta),
    )))
}

pub async fn respond(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(request_id): Path<String>,
    Json(payload): Json<RequestRespond>,
) -> Result<Json<ApiResponse<RequestView>>, ServerError> {
    user::require_role(&caller, "landlord")?;

    let decision = match payload.status {
        RequestDecision::Approved => engine::RequestDecision::Approved,
        RequestDecision::Rejected => engine::RequestDecision::Rejected,
    };
    let request = state
        .engine
        .respond_to_request(
            &request_id,
            &caller.id,
            decision,
            payload.phone_number.as_deref(),
        )
        .await?;
    Ok(Json(ApiResponse::new(
        "Rental request responded to successfully",
        map_request(request, None),
    )))
}
