use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{Paginated, Transaction};
use serde_json::Value;

/// `/transactions` collection
pub struct Transactions<'a> {
    client: &'a ApiClient,
}

impl<'a> Transactions<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List with arbitrary filter parameters, passed through as given.
    pub async fn list<I, K, V>(&self, params: I) -> Result<Paginated<Transaction>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let request = RequestSpec::get("/transactions/")
            .query_pairs(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self.client.execute(&request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .execute(&RequestSpec::delete(format!("/transactions/{id}")))
            .await
    }

    /// Delete on the backend, then drop the row from a page already on screen.
    pub async fn delete_from(&self, page: &mut Paginated<Transaction>, id: &str) -> Result<()> {
        self.delete(id).await?;
        page.remove_where(|tx| tx.id == id);
        Ok(())
    }
}
