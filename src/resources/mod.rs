//! Thin wrappers over the backend collections
//!
//! Every call goes through [`ApiClient::execute`](crate::ApiClient::execute),
//! so all of them share the refresh-and-retry behavior. Create and update
//! payloads are passed through untouched.

mod faces;
mod outlets;
mod photos;
mod pricings;
mod reports;
mod time_operations;
mod transactions;
mod units;
mod users;

pub use faces::{FaceSearch, Faces};
pub use outlets::Outlets;
pub use photos::Photos;
pub use pricings::Pricings;
pub use reports::Reports;
pub use time_operations::TimeOperations;
pub use transactions::Transactions;
pub use units::Units;
pub use users::Users;
