use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{ListQuery, Paginated, User};
use serde::Serialize;
use serde_json::Value;

/// `/users` collection
pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in account as the backend currently sees it
    pub async fn me(&self) -> Result<User> {
        self.client.execute(&RequestSpec::get("/users/me")).await
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paginated<User>> {
        let request = RequestSpec::get("/users").query_pairs(query.to_pairs());
        self.client.execute(&request).await
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.client
            .execute(&RequestSpec::get(format!("/users/{id}")))
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Value> {
        let request = RequestSpec::put(format!("/users/{id}")).json(body)?;
        self.client.execute(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/users/{id}")))
            .await
    }
}
