use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pagination block attached to list responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_page: u64,
}

/// Standard success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
            meta: None,
        }
    }

    pub fn with_meta(message: &str, data: T, meta: Meta) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
            meta: Some(meta),
        }
    }
}

/// Standard error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Tenant,
        Landlord,
        Admin,
    }

    /// A user as the API exposes it. Never carries the password.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub role: Role,
        pub phone: Option<String>,
        pub address: Option<String>,
    }
}

pub mod listing {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ListingStatus {
        Available,
        Rented,
    }

    /// Request body for creating a listing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ListingNew {
        pub location: String,
        pub description: String,
        pub rent_minor: i64,
        pub bedrooms: i32,
        pub image_urls: Vec<String>,
    }

    /// Request body for a partial listing update. Absent fields are
    /// left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ListingUpdate {
        pub location: Option<String>,
        pub description: Option<String>,
        pub rent_minor: Option<i64>,
        pub bedrooms: Option<i32>,
        pub status: Option<ListingStatus>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ListingView {
        pub id: Uuid,
        pub landlord_id: String,
        pub location: String,
        pub description: String,
        pub rent_minor: i64,
        pub bedrooms: i32,
        pub image_urls: Vec<String>,
        pub status: ListingStatus,
        pub created_at: DateTime<Utc>,
        /// Present when the owner was expanded and still exists.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub landlord: Option<user::UserView>,
    }
}

pub mod request {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RequestStatus {
        Pending,
        Approved,
        Rejected,
    }

    /// A landlord's decision. `pending` is deliberately not accepted.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RequestDecision {
        Approved,
        Rejected,
    }

    /// Request body for submitting a rental request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestNew {
        pub rental_house_id: String,
        pub message: Option<String>,
    }

    /// Request body for resolving a pending request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestRespond {
        pub status: RequestDecision,
        pub phone_number: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RequestView {
        pub id: Uuid,
        pub rental_house_id: Uuid,
        pub tenant_id: String,
        pub status: RequestStatus,
        pub message: Option<String>,
        pub phone: Option<String>,
        pub created_at: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub rental_house: Option<listing::ListingView>,
    }
}

pub mod order {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OrderStatus {
        Pending,
        Paid,
        Failed,
        Cancelled,
    }

    /// Request body for paying an approved rental request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderNew {
        pub rental_request_id: String,
    }

    /// Response body after checkout has been opened at the gateway.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderCreated {
        pub order_id: Uuid,
        pub checkout_url: String,
    }

    /// Query parameters for the verification endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderVerify {
        pub order_id: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub id: Uuid,
        pub rental_request_id: Uuid,
        pub tenant_id: String,
        pub amount_minor: i64,
        pub status: OrderStatus,
        pub transaction_id: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod admin {
    use super::*;

    /// Headline counts for the admin dashboard.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Summary {
        pub tenants: u64,
        pub landlords: u64,
        pub admins: u64,
        pub listings: u64,
        pub rental_requests: u64,
        pub orders: u64,
    }
}
