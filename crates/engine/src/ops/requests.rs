//! Rental request operations.
//!
//! Requests are created by tenants and resolved by the landlord who owns
//! the house. Resolution is a compare-and-set on the `pending` status, so
//! two concurrent decisions cannot both win.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, RelationTrait,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    query::{Meta, QueryBuilder},
    rental_houses::{self, RentalHouse},
    rental_requests::{self, RentalRequest, RequestDecision, RequestStatus},
    users,
};

use super::{Engine, normalize_optional_text, with_tx};

const FILTER_COLUMNS: &[(&str, rental_requests::Column)] = &[
    ("status", rental_requests::Column::Status),
    ("rental_house_id", rental_requests::Column::RentalHouseId),
];

const SORT_COLUMNS: &[(&str, rental_requests::Column)] = &[
    ("created_at", rental_requests::Column::CreatedAt),
    ("status", rental_requests::Column::Status),
];

/// A request with its house expanded, when the house still exists.
#[derive(Clone, Debug)]
pub struct RequestWithHouse {
    pub request: RentalRequest,
    pub house: Option<RentalHouse>,
}

impl Engine {
    /// Submits a rental request for a house on behalf of a tenant.
    ///
    /// A tenant holds at most one pending request per house; a second
    /// submission while the first is undecided is a conflict.
    pub async fn create_request(
        &self,
        tenant_id: &str,
        rental_house_id: &str,
        message: Option<String>,
    ) -> ResultEngine<RentalRequest> {
        let Ok(house_id) = Uuid::parse_str(rental_house_id) else {
            return Err(EngineError::KeyNotFound("rental house".to_string()));
        };

        with_tx!(self, |tx| {
            async {
                rental_houses::Entity::find_by_id(house_id.to_string())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("rental house".to_string()))?;

                let pending = rental_requests::Entity::find()
                    .filter(rental_requests::Column::TenantId.eq(tenant_id.to_string()))
                    .filter(rental_requests::Column::RentalHouseId.eq(house_id.to_string()))
                    .filter(rental_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
                    .one(&tx)
                    .await?;
                if pending.is_some() {
                    return Err(EngineError::Conflict(
                        "a pending request for this house already exists".to_string(),
                    ));
                }

                let request = RentalRequest::new(house_id, tenant_id, message);
                rental_requests::ActiveModel::from(&request).insert(&tx).await?;
                Ok(request)
            }
            .await
        })
    }

    /// Lists the tenant's own requests, each with its house expanded.
    pub async fn tenant_requests(
        &self,
        tenant_id: &str,
        params: &HashMap<String, String>,
    ) -> ResultEngine<(Vec<RequestWithHouse>, Meta)> {
        let select = rental_requests::Entity::find()
            .filter(rental_requests::Column::TenantId.eq(tenant_id.to_string()));
        let query = QueryBuilder::new(select, params)
            .filter(FILTER_COLUMNS)
            .sort(SORT_COLUMNS, rental_requests::Column::CreatedAt)
            .paginate();

        let meta = query.count_total(&self.database).await?;
        let rows = query.all(&self.database).await?;
        let requests = self.expand_houses(rows).await?;
        Ok((requests, meta))
    }

    /// Lists requests targeting any house the landlord owns.
    pub async fn landlord_requests(
        &self,
        landlord_id: &str,
        params: &HashMap<String, String>,
    ) -> ResultEngine<(Vec<RequestWithHouse>, Meta)> {
        let select = rental_requests::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                rental_requests::Relation::RentalHouses.def(),
            )
            .filter(rental_houses::Column::LandlordId.eq(landlord_id.to_string()));
        let query = QueryBuilder::new(select, params)
            .filter(FILTER_COLUMNS)
            .sort(SORT_COLUMNS, rental_requests::Column::CreatedAt)
            .paginate();

        let meta = query.count_total(&self.database).await?;
        let rows = query.all(&self.database).await?;
        let requests = self.expand_houses(rows).await?;
        Ok((requests, meta))
    }

    /// Resolves a pending request as the owning landlord.
    ///
    /// The contact phone that lands on an approved request is the
    /// landlord's stored phone when present, else the one supplied with
    /// the decision. Approval without any phone is rejected.
    ///
    /// The status write is conditional on the row still being pending.
    /// When another decision got there first the row is left untouched
    /// and the caller sees a conflict.
    pub async fn respond_to_request(
        &self,
        request_id: &str,
        landlord_id: &str,
        decision: RequestDecision,
        phone_number: Option<&str>,
    ) -> ResultEngine<RentalRequest> {
        let Ok(request_id) = Uuid::parse_str(request_id) else {
            return Err(EngineError::KeyNotFound("rental request".to_string()));
        };

        with_tx!(self, |tx| {
            async {
                let request = rental_requests::Entity::find_by_id(request_id.to_string())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("rental request".to_string()))?;
                let house = rental_houses::Entity::find_by_id(request.rental_house_id.clone())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("rental house".to_string()))?;
                let landlord = users::Entity::find_by_id(house.landlord_id.clone())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("landlord".to_string()))?;

                if landlord.id != landlord_id {
                    return Err(EngineError::Forbidden(
                        "you are not authorized to respond to this request".to_string(),
                    ));
                }

                let phone = normalize_optional_text(landlord.phone.as_deref())
                    .or_else(|| normalize_optional_text(phone_number));
                if decision == RequestDecision::Approved && phone.is_none() {
                    return Err(EngineError::BadRequest(
                        "phone number is required to approve this request".to_string(),
                    ));
                }

                let mut update = rental_requests::Entity::update_many().col_expr(
                    rental_requests::Column::Status,
                    Expr::value(decision.as_status().as_str()),
                );
                if decision == RequestDecision::Approved {
                    update =
                        update.col_expr(rental_requests::Column::Phone, Expr::value(phone.clone()));
                }
                let result = update
                    .filter(rental_requests::Column::Id.eq(request_id.to_string()))
                    .filter(rental_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
                    .exec(&tx)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(EngineError::Conflict(
                        "rental request already resolved".to_string(),
                    ));
                }

                let model = rental_requests::Entity::find_by_id(request_id.to_string())
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("rental request".to_string()))?;
                RentalRequest::try_from(model)
            }
            .await
        })
    }

    /// Joins each request row with its house via one batched lookup.
    async fn expand_houses(
        &self,
        rows: Vec<rental_requests::Model>,
    ) -> ResultEngine<Vec<RequestWithHouse>> {
        let house_ids: Vec<String> = rows.iter().map(|row| row.rental_house_id.clone()).collect();
        let houses = rental_houses::Entity::find()
            .filter(rental_houses::Column::Id.is_in(house_ids))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Ok((model.id.clone(), RentalHouse::try_from(model)?)))
            .collect::<ResultEngine<HashMap<String, RentalHouse>>>()?;

        rows.into_iter()
            .map(|row| {
                let house = houses.get(&row.rental_house_id).cloned();
                Ok(RequestWithHouse {
                    request: RentalRequest::try_from(row)?,
                    house,
                })
            })
            .collect()
    }
}
