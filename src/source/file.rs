use crate::model::{RawListing, SearchRequest, SourceError};
use crate::source::traits::ListingSource;
use crate::utils::to_kebab_case;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Reads previously captured search results from `<dir>/<kebab-case term>.json`.
pub struct JsonFileSource {
    dir: PathBuf,
}

/// Either a bare array of listings or a search response with `itemSummaries`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingFile {
    Listings(Vec<RawListing>),
    SearchResponse {
        #[serde(rename = "itemSummaries", default)]
        item_summaries: Vec<RawListing>,
    },
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, req: &SearchRequest) -> PathBuf {
        self.dir.join(format!("{}.json", to_kebab_case(&req.term)))
    }
}

#[async_trait::async_trait]
impl ListingSource for JsonFileSource {
    async fn fetch(&self, req: &SearchRequest) -> Result<Vec<RawListing>, SourceError> {
        let path = self.path_for(req);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No listings captured for '{}' at {}", req.term, path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let listings = match serde_json::from_str::<ListingFile>(&content)? {
            ListingFile::Listings(listings) => listings,
            ListingFile::SearchResponse { item_summaries } => item_summaries,
        };
        debug!("Read {} listings for '{}'", listings.len(), req.term);
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(term: &str) -> SearchRequest {
        SearchRequest { term: term.into() }
    }

    #[tokio::test]
    async fn reads_array_and_search_response_shapes() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("lenovo-tiny.json"),
            r#"[{"title": "Lenovo i5-8500T", "itemId": "1"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("optiplex-micro.json"),
            r#"{"total": 2, "itemSummaries": [{"title": "a"}, {"title": "b"}]}"#,
        )
        .unwrap();

        let source = JsonFileSource::new(dir.path());
        let tiny = source.fetch(&request("Lenovo Tiny")).await.unwrap();
        assert_eq!(tiny.len(), 1);
        assert_eq!(tiny[0].item_id.as_deref(), Some("1"));

        let micro = source.fetch(&request("optiplex micro")).await.unwrap();
        assert_eq!(micro.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_result() {
        let dir = tempdir().unwrap();
        let source = JsonFileSource::new(dir.path());
        assert!(source.fetch(&request("nothing here")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "[{").unwrap();
        let source = JsonFileSource::new(dir.path());
        assert!(matches!(
            source.fetch(&request("broken")).await,
            Err(SourceError::Json(_))
        ));
    }
}
