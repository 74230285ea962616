use crate::api_client::{ApiClient, RequestSpec};
use crate::error::Result;
use crate::models::{
    AllUnitReport, DashboardStatistics, DateRange, OutletReport, TransactionsReport, UnitReport,
};

/// Read-only statistics under `/statistics`
pub struct Reports<'a> {
    client: &'a ApiClient,
}

impl<'a> Reports<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Revenue and transaction totals for the dashboard landing page
    pub async fn dashboard(&self) -> Result<DashboardStatistics> {
        self.client.execute(&RequestSpec::get("/statistics/")).await
    }

    pub async fn transactions(&self, range: &DateRange) -> Result<TransactionsReport> {
        let request =
            RequestSpec::get("/statistics/reports/transactions").query_pairs(range.to_pairs()?);
        self.client.execute(&request).await
    }

    pub async fn all_units(&self, range: &DateRange) -> Result<AllUnitReport> {
        let request = RequestSpec::get("/statistics/reports/transactions-all-unit")
            .query_pairs(range.to_pairs()?);
        self.client.execute(&request).await
    }

    pub async fn by_unit(&self, unit_id: &str, range: &DateRange) -> Result<UnitReport> {
        let request = RequestSpec::get("/statistics/reports/transactions-by-unit")
            .query("unit_id", unit_id)
            .query_pairs(range.to_pairs()?);
        self.client.execute(&request).await
    }

    pub async fn by_outlet(&self, outlet_id: &str, range: &DateRange) -> Result<OutletReport> {
        let request = RequestSpec::get("/statistics/reports/transactions-by-outlet-id")
            .query("outlet_id", outlet_id)
            .query_pairs(range.to_pairs()?);
        self.client.execute(&request).await
    }
}
