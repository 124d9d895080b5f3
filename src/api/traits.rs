use crate::api::ApiError;
use crate::models::Property;
use async_trait::async_trait;

/// Anything the public listing pages can pull properties from
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_properties(&self) -> Result<Vec<Property>, ApiError>;

    /// Name used in log lines
    fn source_name(&self) -> &'static str;
}
