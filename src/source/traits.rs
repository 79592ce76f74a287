use crate::model::{RawListing, SearchRequest, SourceError};

#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self, req: &SearchRequest) -> Result<Vec<RawListing>, SourceError>;
}
