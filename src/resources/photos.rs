use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{ListQuery, PhotoPage};
use serde_json::Value;

/// `/photos` collection
pub struct Photos<'a> {
    client: &'a ApiClient,
}

impl<'a> Photos<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Photos are paged but not searchable; `query.search` is ignored.
    pub async fn list(&self, query: &ListQuery) -> Result<PhotoPage> {
        let request = RequestSpec::get("/photos/")
            .query("page", query.page)
            .query("limit", query.limit);
        self.client.execute(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/photos/{id}")))
            .await
    }
}
