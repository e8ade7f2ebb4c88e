use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, ListingStatus, ListingUpdate, NewListing};
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

fn new_listing(location: &str, rent_minor: i64) -> NewListing {
    NewListing {
        location: location.to_string(),
        description: "two rooms with a balcony".to_string(),
        rent_minor,
        bedrooms: 2,
    }
}

#[tokio::test]
async fn create_requires_at_least_one_image() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;

    let err = engine
        .create_listing("landlord-1", new_listing("Dhaka", 15_000_00), vec![])
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::BadRequest("images are required".to_string()));
}

#[tokio::test]
async fn create_and_get_round_trip_with_owner() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", Some("017000001")).await;

    let created = engine
        .create_listing(
            "landlord-1",
            new_listing("  Dhaka  ", 15_000_00),
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(created.location, "Dhaka");
    assert_eq!(created.status, ListingStatus::Available);

    let found = engine
        .get_listing(&created.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.listing.id, created.id);
    assert_eq!(found.listing.location, "Dhaka");
    assert_eq!(found.listing.rent_minor, 15_000_00);
    assert_eq!(found.listing.image_urls, vec!["front.jpg".to_string()]);
    assert_eq!(found.owner.unwrap().id, "landlord-1");
}

#[tokio::test]
async fn malformed_id_reads_as_absent() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.get_listing("not-a-uuid").await.unwrap().is_none());
    assert!(engine.delete_listing("not-a-uuid").await.unwrap().is_none());
}

#[tokio::test]
async fn pagination_windows_and_counts() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;

    for i in 1..=25_i64 {
        engine
            .create_listing(
                "landlord-1",
                new_listing("Dhaka", i * 1_000),
                vec!["front.jpg".to_string()],
            )
            .await
            .unwrap();
    }

    let params = HashMap::from([
        ("page".to_string(), "2".to_string()),
        ("limit".to_string(), "10".to_string()),
        ("sort_by".to_string(), "rent_minor".to_string()),
        ("sort_order".to_string(), "asc".to_string()),
    ]);
    let (page, meta) = engine.list_listings(&params).await.unwrap();

    let rents: Vec<i64> = page.iter().map(|l| l.rent_minor).collect();
    assert_eq!(rents, (11..=20).map(|i| i * 1_000).collect::<Vec<i64>>());
    assert_eq!(meta.page, 2);
    assert_eq!(meta.limit, 10);
    assert_eq!(meta.total, 25);
    assert_eq!(meta.total_page, 3);
}

#[tokio::test]
async fn location_filter_ignores_reserved_and_unknown_keys() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;

    for location in ["Dhaka", "Dhaka", "Chittagong"] {
        engine
            .create_listing(
                "landlord-1",
                new_listing(location, 10_000_00),
                vec!["front.jpg".to_string()],
            )
            .await
            .unwrap();
    }

    let params = HashMap::from([
        ("location".to_string(), "Dhaka".to_string()),
        ("page".to_string(), "1".to_string()),
        ("favourite_colour".to_string(), "green".to_string()),
    ]);
    let (listings, meta) = engine.list_listings(&params).await.unwrap();
    assert_eq!(listings.len(), 2);
    assert!(listings.iter().all(|l| l.location == "Dhaka"));
    assert_eq!(meta.total, 2);
}

#[tokio::test]
async fn landlord_listings_are_scoped_and_owner_expanded() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;
    seed_user(&db, "landlord-2", "landlord", None).await;

    engine
        .create_listing(
            "landlord-1",
            new_listing("Dhaka", 10_000_00),
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();
    engine
        .create_listing(
            "landlord-2",
            new_listing("Sylhet", 12_000_00),
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();

    let (mine, meta) = engine
        .landlord_listings("landlord-1", &HashMap::new())
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].listing.landlord_id, "landlord-1");
    assert_eq!(mine[0].owner.as_ref().unwrap().id, "landlord-1");
    assert_eq!(meta.total, 1);
}

#[tokio::test]
async fn update_is_owner_scoped() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;
    seed_user(&db, "landlord-2", "landlord", None).await;

    let listing = engine
        .create_listing(
            "landlord-1",
            new_listing("Dhaka", 10_000_00),
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();
    let id = listing.id.to_string();

    let err = engine
        .update_listing(
            &id,
            "landlord-2",
            ListingUpdate {
                rent_minor: Some(11_000_00),
                ..ListingUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("rental house".to_string()));

    let updated = engine
        .update_listing(
            &id,
            "landlord-1",
            ListingUpdate {
                rent_minor: Some(11_000_00),
                status: Some(ListingStatus::Rented),
                ..ListingUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rent_minor, 11_000_00);
    assert_eq!(updated.status, ListingStatus::Rented);
    assert_eq!(updated.location, "Dhaka");
}

#[tokio::test]
async fn empty_update_leaves_the_listing_unchanged() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;

    let listing = engine
        .create_listing(
            "landlord-1",
            new_listing("Dhaka", 10_000_00),
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();

    let updated = engine
        .update_listing(
            &listing.id.to_string(),
            "landlord-1",
            ListingUpdate::default(),
        )
        .await
        .unwrap();
    assert_eq!(updated.location, listing.location);
    assert_eq!(updated.rent_minor, listing.rent_minor);
    assert_eq!(updated.status, listing.status);
    assert_eq!(updated.image_urls, listing.image_urls);
}

#[tokio::test]
async fn delete_returns_the_deleted_listing_once() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "landlord-1", "landlord", None).await;

    let listing = engine
        .create_listing(
            "landlord-1",
            new_listing("Dhaka", 10_000_00),
            vec!["front.jpg".to_string()],
        )
        .await
        .unwrap();
    let id = listing.id.to_string();

    let deleted = engine.delete_listing(&id).await.unwrap().unwrap();
    assert_eq!(deleted.id, listing.id);
    assert!(engine.delete_listing(&id).await.unwrap().is_none());
    assert!(engine.get_listing(&id).await.unwrap().is_none());
}
