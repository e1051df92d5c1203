//! Types shared by every service taking part in the order saga.

mod types;

pub use types::{OrderId, ParseOrderIdError};
