use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{TimeOperation, TimeOperationCreate, TimeOperationUpdate, UnitStatus};
use serde_json::Value;

/// Opening hours per unit (`/time_operation`)
pub struct TimeOperations<'a> {
    client: &'a ApiClient,
}

impl<'a> TimeOperations<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<TimeOperation>> {
        self.client
            .execute(&RequestSpec::get("/time_operation/"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<TimeOperation> {
        self.client
            .execute(&RequestSpec::get(format!("/time_operation/{id}")))
            .await
    }

    pub async fn by_unit(&self, unit_id: &str) -> Result<TimeOperation> {
        self.client
            .execute(&RequestSpec::get(format!("/time_operation/unit/{unit_id}")))
            .await
    }

    pub async fn create(&self, body: &TimeOperationCreate) -> Result<TimeOperation> {
        let request = RequestSpec::post("/time_operation").json(body)?;
        self.client.execute(&request).await
    }

    pub async fn update(&self, id: &str, body: &TimeOperationUpdate) -> Result<TimeOperation> {
        let request = RequestSpec::put(format!("/time_operation/{id}")).json(body)?;
        self.client.execute(&request).await
    }

    /// Create or replace the hours of a unit
    pub async fn set_unit_hours(
        &self,
        unit_id: &str,
        body: &TimeOperationCreate,
    ) -> Result<TimeOperation> {
        let request =
            RequestSpec::post(format!("/time_operation/unit/{unit_id}/set-hours")).json(body)?;
        self.client.execute(&request).await
    }

    /// Soft delete on the backend
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _: Value = self
            .client
            .execute(&RequestSpec::delete(format!("/time_operation/{id}")))
            .await?;
        Ok(())
    }

    /// Whether a unit is open right now, with its hours
    pub async fn unit_status(&self, unit_id: &str) -> Result<UnitStatus> {
        self.client
            .execute(&RequestSpec::get(format!(
                "/time_operation/unit/{unit_id}/current-status"
            )))
            .await
    }
}
