use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{ListQuery, Outlet, OutletsByUnit, Paginated};
use serde::Serialize;
use serde_json::Value;

/// `/outlets` collection
pub struct Outlets<'a> {
    client: &'a ApiClient,
}

impl<'a> Outlets<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paginated<Outlet>> {
        let request = RequestSpec::get("/outlets/").query_pairs(query.to_pairs());
        self.client.execute(&request).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value> {
        let request = RequestSpec::post("/outlets/").json(body)?;
        self.client.execute(&request).await
    }

    pub async fn get(&self, id: &str) -> Result<Outlet> {
        self.client
            .execute(&RequestSpec::get(format!("/outlets/{id}")))
            .await
    }

    pub async fn by_unit(&self, unit_id: &str) -> Result<OutletsByUnit> {
        self.client
            .execute(&RequestSpec::get(format!(
                "/outlets/get-outlets-by-unit/{unit_id}"
            )))
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Value> {
        let request = RequestSpec::put(format!("/outlets/{id}")).json(body)?;
        self.client.execute(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/outlets/{id}")))
            .await
    }
}
