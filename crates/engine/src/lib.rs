pub use error::EngineError;
pub use ops::admin::AdminSummary;
pub use ops::listings::{ListingUpdate, ListingWithOwner, NewListing};
pub use ops::requests::RequestWithHouse;
pub use ops::{Engine, EngineBuilder};
pub use orders::{Order, OrderStatus};
pub use payment::{
    PaymentClient, PaymentConfig, PaymentPayload, PaymentResponse, VerificationResponse,
};
pub use query::{Meta, QueryBuilder};
pub use rental_houses::{ListingStatus, RentalHouse};
pub use rental_requests::{RentalRequest, RequestDecision, RequestStatus};
pub use users::{PublicUser, Role};

mod error;
mod ops;
mod orders;
mod payment;
mod query;
mod rental_houses;
mod rental_requests;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
