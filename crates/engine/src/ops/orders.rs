//! Order operations.
//!
//! An order is created from an approved rental request; the amount is
//! taken from the listing, never from the caller. Settlement maps the
//! gateway's verdict onto the order status.

use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, TransactionTrait};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    orders::{self, Order, OrderStatus},
    payment::VerificationResponse,
    rental_houses,
    rental_requests::{self, RequestStatus},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a pending order for an approved rental request.
    ///
    /// Only the tenant who filed the request may pay for it, and the
    /// charged amount is the listing's rent at order time.
    pub async fn create_order(
        &self,
        tenant_id: &str,
        rental_request_id: &str,
    ) -> ResultEngine<Order> {
        let Ok(request_id) = Uuid::parse_str(rental_request_id) else {
            return Err(EngineError::KeyNotFound("rental request".to_string()));
        };

        with_tx!(self, |tx| {
            async {
                let request = rental_requests::Entity::find_by_id(request_id.to_string())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("rental request".to_string()))?;
                if request.tenant_id != tenant_id {
                    return Err(EngineError::Forbidden(
                        "you are not authorized to pay for this request".to_string(),
                    ));
                }
                if request.status != RequestStatus::Approved.as_str() {
                    return Err(EngineError::BadRequest(
                        "rental request is not approved".to_string(),
                    ));
                }

                let house = rental_houses::Entity::find_by_id(request.rental_house_id.clone())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("rental house".to_string()))?;

                let order = Order::new(request_id, tenant_id, house.rent_minor);
                orders::ActiveModel::from(&order).insert(&tx).await?;
                Ok(order)
            }
            .await
        })
    }

    /// Stores the gateway transaction id once checkout has been opened.
    pub async fn record_payment_initiated(
        &self,
        order_id: Uuid,
        transaction_id: &str,
    ) -> ResultEngine<Order> {
        let Some(model) = orders::Entity::find_by_id(order_id.to_string())
            .one(&self.database)
            .await?
        else {
            return Err(EngineError::KeyNotFound("order".to_string()));
        };

        let mut active: orders::ActiveModel = model.into();
        active.transaction_id = ActiveValue::Set(Some(transaction_id.to_string()));
        let model = active.update(&self.database).await?;
        Order::try_from(model)
    }

    /// Applies the gateway's verification verdict to an order.
    ///
    /// When `tenant_id` is given the order must belong to that tenant;
    /// admins settle with no scope. The first verification entry decides
    /// the outcome. An empty response leaves the order untouched and
    /// surfaces as a gateway error, so a retry can settle it later.
    pub async fn settle_order(
        &self,
        order_id: &str,
        tenant_id: Option<&str>,
        verifications: &[VerificationResponse],
    ) -> ResultEngine<Order> {
        let Ok(order_id) = Uuid::parse_str(order_id) else {
            return Err(EngineError::KeyNotFound("order".to_string()));
        };
        let Some(verdict) = verifications.first() else {
            return Err(EngineError::Gateway(
                "empty verification response".to_string(),
            ));
        };

        with_tx!(self, |tx| {
            async {
                let model = orders::Entity::find_by_id(order_id.to_string())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("order".to_string()))?;
                if let Some(tenant_id) = tenant_id
                    && model.tenant_id != tenant_id
                {
                    return Err(EngineError::Forbidden(
                        "you are not authorized to verify this order".to_string(),
                    ));
                }

                let mut active: orders::ActiveModel = model.into();
                active.status =
                    ActiveValue::Set(OrderStatus::from_gateway(&verdict.status).as_str().to_string());
                active.transaction_id = ActiveValue::Set(Some(verdict.transaction_id.clone()));
                let model = active.update(&tx).await?;
                Order::try_from(model)
            }
            .await
        })
    }
}
