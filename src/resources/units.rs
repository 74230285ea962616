use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{ListQuery, Paginated, Unit};
use serde::Serialize;
use serde_json::Value;

/// `/units` collection
pub struct Units<'a> {
    client: &'a ApiClient,
}

impl<'a> Units<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paginated<Unit>> {
        let request = RequestSpec::get("/units/").query_pairs(query.to_pairs());
        self.client.execute(&request).await
    }

    /// The backend takes the new unit's fields as query parameters.
    pub async fn create(&self, name: &str, location: &str) -> Result<Value> {
        let request = RequestSpec::post("/units/")
            .query("name", name)
            .query("location", location);
        self.client.execute(&request).await
    }

    pub async fn get(&self, id: &str) -> Result<Unit> {
        self.client
            .execute(&RequestSpec::get(format!("/units/{id}")))
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Value> {
        let request = RequestSpec::put(format!("/units/{id}")).json(body)?;
        self.client.execute(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/units/{id}")))
            .await
    }
}
