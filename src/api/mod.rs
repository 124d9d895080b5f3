pub mod client;
pub mod error;
pub mod poller;
pub mod traits;

pub use client::ApiClient;
pub use error::ApiError;
pub use poller::Poller;
pub use traits::ListingSource;
