use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, NewListing, OrderStatus, RentalRequest, RequestDecision,
    VerificationResponse,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn seed_user(db: &DatabaseConnection, id: &str, role: &str, phone: Option<&str>) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (id, name, email, password, role, phone, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            id.into(),
            format!("{id} name").into(),
            format!("{id}@example.com").into(),
            "password".into(),
            role.into(),
            phone.map(ToString::to_string).into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();
}

/// Seeds landlord, tenant, a listing at 15 000.00 and a pending request.
async fn seed_request(engine: &Engine, db: &DatabaseConnection) -> RentalRequest {
    seed_user(db, "landlord-1", "landlord", Some("017000001")).await;
    seed_user(db, "tenant-1", "tenant", None).await;
    let house = engine
        .create_listing(
            "landlord-1",
            NewListing {
                location: "Dhaka".to_string(),
                description: "two rooms".to_string(),
                rent_minor: 15_000_00,
                bedrooms: 2,
            },
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();
    engine
        .create_request("tenant-1", &house.id.to_string(), None)
        .await
        .unwrap()
}

async fn approve(engine: &Engine, request: &RentalRequest) {
    engine
        .respond_to_request(
            &request.id.to_string(),
            "landlord-1",
            RequestDecision::Approved,
            None,
        )
        .await
        .unwrap();
}

fn verdict(status: &str) -> VerificationResponse {
    VerificationResponse {
        transaction_id: "txn-1".to_string(),
        status: status.to_string(),
        amount_minor: 15_000_00,
    }
}

#[tokio::test]
async fn order_requires_an_approved_request() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;

    let err = engine
        .create_order("tenant-1", &request.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BadRequest("rental request is not approved".to_string())
    );
}

#[tokio::test]
async fn only_the_requesting_tenant_may_pay() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;
    seed_user(&db, "tenant-2", "tenant", None).await;
    approve(&engine, &request).await;

    let err = engine
        .create_order("tenant-2", &request.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("you are not authorized to pay for this request".to_string())
    );
}

#[tokio::test]
async fn amount_is_taken_from_the_listing() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;
    approve(&engine, &request).await;

    let order = engine
        .create_order("tenant-1", &request.id.to_string())
        .await
        .unwrap();
    assert_eq!(order.amount_minor, 15_000_00);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.rental_request_id, request.id);
    assert!(order.idempotency_key.is_some());
}

#[tokio::test]
async fn unknown_order_cannot_be_settled() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .settle_order("not-a-uuid", None, &[verdict("Success")])
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("order".to_string()));
    assert_eq!(err.to_string(), "order not found");
}

#[tokio::test]
async fn empty_verification_is_a_gateway_error() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;
    approve(&engine, &request).await;
    let order = engine
        .create_order("tenant-1", &request.id.to_string())
        .await
        .unwrap();

    let err = engine
        .settle_order(&order.id.to_string(), Some("tenant-1"), &[])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Gateway("empty verification response".to_string())
    );
    assert_eq!(
        err.to_string(),
        "payment gateway error: empty verification response"
    );
}

#[tokio::test]
async fn settlement_follows_the_gateway_verdict() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;
    approve(&engine, &request).await;

    for (status, expected) in [
        ("Success", OrderStatus::Paid),
        ("Cancel", OrderStatus::Cancelled),
        ("Declined", OrderStatus::Failed),
    ] {
        let order = engine
            .create_order("tenant-1", &request.id.to_string())
            .await
            .unwrap();
        let settled = engine
            .settle_order(&order.id.to_string(), Some("tenant-1"), &[verdict(status)])
            .await
            .unwrap();
        assert_eq!(settled.status, expected);
        assert_eq!(settled.transaction_id.as_deref(), Some("txn-1"));
    }
}

#[tokio::test]
async fn settlement_is_scoped_to_the_paying_tenant() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;
    approve(&engine, &request).await;
    seed_user(&db, "tenant-2", "tenant", None).await;
    let order = engine
        .create_order("tenant-1", &request.id.to_string())
        .await
        .unwrap();

    let err = engine
        .settle_order(&order.id.to_string(), Some("tenant-2"), &[verdict("Success")])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("you are not authorized to verify this order".to_string())
    );

    // An unscoped caller settles any order.
    let settled = engine
        .settle_order(&order.id.to_string(), None, &[verdict("Success")])
        .await
        .unwrap();
    assert_eq!(settled.status, OrderStatus::Paid);
}

#[tokio::test]
async fn payment_initiation_stores_the_transaction_id() {
    let (engine, db) = engine_with_db().await;
    let request = seed_request(&engine, &db).await;
    approve(&engine, &request).await;
    let order = engine
        .create_order("tenant-1", &request.id.to_string())
        .await
        .unwrap();

    let updated = engine
        .record_payment_initiated(order.id, "txn-42")
        .await
        .unwrap();
    assert_eq!(updated.transaction_id.as_deref(), Some("txn-42"));
    assert_eq!(updated.status, OrderStatus::Pending);
}
