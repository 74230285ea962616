//! Backend entity models
//!
//! These mirror what the dashboard backend returns. The client does not
//! validate them: every field is optional or defaulted so a schema change on
//! the server degrades to missing data rather than a decode error. Explicit
//! `null`s read as the field's default and ids may arrive as numbers.

use crate::error::{ClientError, Result};
use crate::types::{id_string, null_as_default, string_or_number};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 25;

/// Paginated collection response: `{data, total, page, limit}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit: u32,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl<T> Paginated<T> {
    /// Drop matching items from this page and shrink `total` to match.
    ///
    /// Returns how many items were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.data.len();
        self.data.retain(|item| !pred(item));
        let removed = before - self.data.len();
        self.total = self.total.saturating_sub(removed as u64);
        removed
    }
}

/// Paging and search parameters shared by list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
        }
    }
}

impl ListQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query pairs; an empty search is not sent.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs
    }
}

/// Inclusive report date range. Either bound may be left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let range = Self {
            start: Some(start),
            end: Some(end),
        };
        range.validate()?;
        Ok(range)
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ClientError::InvalidRequest(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }
        Ok(())
    }

    /// `start_date` / `end_date` pairs in ISO format, open bounds omitted
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>> {
        self.validate()?;
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start_date".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        Ok(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub location: Option<String>,
    pub api_key: Option<String>,
    pub created_at: Option<String>,
}

/// Unit reference embedded in other entities
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitRef {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Outlet {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub kode_folder: Option<String>,
    pub unit: Option<UnitRef>,
    pub created_at: Option<String>,
}

/// Outlet row as listed under a unit; `unit` is the unit name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutletListItem {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub kode_folder: Option<String>,
    pub unit: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutletsByUnit {
    pub status_code: Option<u16>,
    pub status: Option<String>,
    pub message: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub outlets: Vec<OutletListItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub filename: Option<String>,
    pub original_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub is_public: Option<bool>,
    pub uploaded_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub bounding_boxes: Vec<Value>,
    pub unit_price: Option<f64>,
    pub unit_name: Option<String>,
    pub photo_type: Option<String>,
}

/// `GET /photos/` response: a page plus a status envelope
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhotoPage {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub page: Paginated<Photo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoType {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPrice {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub unit_name: Option<String>,
    pub photo_type_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
}

/// `GET /photo_prices/` response; items live under `photo_prices`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPricePage {
    #[serde(deserialize_with = "null_as_default")]
    pub photo_prices: Vec<PhotoPrice>,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub picture: Option<String>,
    pub created_at: Option<String>,
    pub email_verified: Option<bool>,
    pub total_spent: Option<f64>,
    pub is_active: Option<bool>,
    #[serde(deserialize_with = "string_or_number")]
    pub unit_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOperation {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub unit_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub opening_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub closing_time: String,
    pub notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    pub created_at: Option<String>,
    pub unit_name: Option<String>,
    pub unit_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeOperationCreate {
    pub unit_id: String,
    pub opening_time: String,
    pub closing_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeOperationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingHours {
    #[serde(deserialize_with = "null_as_default")]
    pub opening_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub closing_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitStatus {
    #[serde(deserialize_with = "id_string")]
    pub unit_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_open: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub current_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub operating_hours: OperatingHours,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionPhoto {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub filename: Option<String>,
    pub original_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub trx_code: String,
    pub user: Option<TransactionUser>,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: Vec<TransactionPhoto>,
    pub unit: Option<UnitRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub paid: bool,
    pub paid_at: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub discount_id: Option<String>,
    pub discount_amount: Option<f64>,
    pub promo_code_used: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub final_price: f64,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

/// One row of the daily transactions report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionReportRow {
    #[serde(deserialize_with = "null_as_default")]
    pub tanggal: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub outlet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub photo_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub foto_terjual: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllUnitReport {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<TransactionReportRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionData {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub trx_code: String,
    pub user: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub foto_terjual: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub final_price: f64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitReport {
    #[serde(deserialize_with = "id_string")]
    pub unit_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub jumlah_transaksi: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub jumlah_foto_terjual: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<TransactionData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutletPhotoTypeTotal {
    #[serde(deserialize_with = "null_as_default")]
    pub photo_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub jumlah_transaksi: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutletReport {
    #[serde(deserialize_with = "id_string")]
    pub outlet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub outlet_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub jumlah_transaksi: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub jumlah_foto_terjual: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<OutletPhotoTypeTotal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionsReport {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub jumlah_transaksi: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<TransactionData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueByUnit {
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueByDay {
    #[serde(deserialize_with = "null_as_default")]
    pub tanggal: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueByMonth {
    #[serde(deserialize_with = "null_as_default")]
    pub bulan: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentTransaction {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub final_price: f64,
    pub created_at: Option<String>,
    pub user_name: Option<String>,
    pub unit_name: Option<String>,
    pub email: Option<String>,
}

/// `GET /statistics/` dashboard summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStatistics {
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan_hari_ini: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan_minggu_ini: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan_bulan_ini: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pendapatan_tahun_ini: f64,

    #[serde(deserialize_with = "null_as_default")]
    pub total_transaksi_hari_ini: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_transaksi_minggu_ini: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_transaksi_bulan_ini: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_transaksi_tahun_ini: u64,

    #[serde(deserialize_with = "null_as_default")]
    pub pendapatan_per_unit: Vec<RevenueByUnit>,
    #[serde(deserialize_with = "null_as_default")]
    pub pendapatan_per_hari: Vec<RevenueByDay>,
    #[serde(deserialize_with = "null_as_default")]
    pub pendapatan_per_bulan: Vec<RevenueByMonth>,

    #[serde(deserialize_with = "null_as_default")]
    pub total_user: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub transaksi_terakhir: Vec<RecentTransaction>,
}
