use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{ListQuery, Paginated, PhotoPrice, PhotoPricePage, PhotoType};
use serde::Serialize;
use serde_json::Value;

/// Photo types (`/photo_types`) and per-unit photo prices (`/photo_prices`)
pub struct Pricings<'a> {
    client: &'a ApiClient,
}

impl<'a> Pricings<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_photo_types(&self, query: &ListQuery) -> Result<Paginated<PhotoType>> {
        let request = RequestSpec::get("/photo_types/").query_pairs(query.to_pairs());
        self.client.execute(&request).await
    }

    pub async fn get_photo_type(&self, id: &str) -> Result<PhotoType> {
        self.client
            .execute(&RequestSpec::get(format!("/photo_types/{id}")))
            .await
    }

    pub async fn create_photo_type<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value> {
        let request = RequestSpec::post("/photo_types/").json(body)?;
        self.client.execute(&request).await
    }

    pub async fn update_photo_type<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Value> {
        let request = RequestSpec::put(format!("/photo_types/{id}")).json(body)?;
        self.client.execute(&request).await
    }

    pub async fn delete_photo_type(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/photo_types/{id}")))
            .await
    }

    pub async fn list_photo_prices(&self, query: &ListQuery) -> Result<PhotoPricePage> {
        let request = RequestSpec::get("/photo_prices/").query_pairs(query.to_pairs());
        self.client.execute(&request).await
    }

    /// Prices configured for one unit. The id goes in both the path and the query.
    pub async fn prices_by_unit(&self, unit_id: &str) -> Result<Value> {
        let request = RequestSpec::get(format!("/photo_prices/by-unit/{unit_id}"))
            .query("unit_id", unit_id);
        self.client.execute(&request).await
    }

    pub async fn get_photo_price(&self, id: &str) -> Result<PhotoPrice> {
        self.client
            .execute(&RequestSpec::get(format!("/photo_prices/{id}")))
            .await
    }

    pub async fn create_photo_price<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value> {
        let request = RequestSpec::post("/photo_prices/").json(body)?;
        self.client.execute(&request).await
    }

    pub async fn update_photo_price<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Value> {
        let request = RequestSpec::put(format!("/photo_prices/{id}")).json(body)?;
        self.client.execute(&request).await
    }

    pub async fn delete_photo_price(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/photo_prices/{id}")))
            .await
    }
}
