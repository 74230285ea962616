use crate::api_client::{ApiClient, RequestSpec};
use crate::error::{ClientError, Result};
use crate::models::{DateRange, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::upload::{MultipartUpload, UploadFile};
use serde_json::Value;
use tracing::warn;

/// Form field the backend reads uploaded photos from
const UPLOAD_FIELD: &str = "files";

/// Filters for the signed-in user's face search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSearch {
    pub page: u32,
    pub limit: u32,
    pub range: DateRange,
}

impl Default for FaceSearch {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            range: DateRange::unbounded(),
        }
    }
}

/// Photo upload and face search (`/faces`)
pub struct Faces<'a> {
    client: &'a ApiClient,
}

impl<'a> Faces<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<Value> {
        self.send_upload(MultipartUpload::new(UPLOAD_FIELD, files))
            .await
    }

    /// Upload, reporting whole-percent progress of bytes sent.
    pub async fn upload_with_progress(
        &self,
        files: Vec<UploadFile>,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<Value> {
        self.send_upload(MultipartUpload::new(UPLOAD_FIELD, files).with_progress(on_progress))
            .await
    }

    async fn send_upload(&self, upload: MultipartUpload) -> Result<Value> {
        if upload.files.is_empty() {
            return Err(ClientError::InvalidRequest("no files to upload".to_string()));
        }
        let request = RequestSpec::post("/faces/upload").multipart(upload);
        self.client.execute(&request).await
    }

    /// Face matches for the signed-in user.
    ///
    /// The user id comes from the cached login snapshot; without one the
    /// session is ended.
    pub async fn search(&self, search: &FaceSearch) -> Result<Value> {
        let range = search.range.to_pairs()?;

        let Some(user_id) = self.client.auth().current_user().and_then(|u| u.id) else {
            warn!("No cached user id for face search, ending session");
            self.client.auth().logout();
            return Err(ClientError::NotAuthenticated);
        };

        let request = RequestSpec::get("/faces/search")
            .query("user_id", user_id)
            .query("page", search.page)
            .query("limit", search.limit)
            .query_pairs(range);
        self.client.execute(&request).await
    }
}
