//! Plant-care endpoints
//!
//! Maps to the backend `/plant-care` router: an owner asks a caretaker to
//! look after a plant between two dates, the caretaker accepts or refuses,
//! then documents the care with a start and an end photo.

use crate::client::PlantsitterClient;
use crate::error::ApiResult;
use crate::operation::Operation;
use crate::upload::PhotoUpload;
use chrono::NaiveDateTime;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plant-care API interface
#[derive(Clone)]
pub struct PlantCareApi {
    client: PlantsitterClient,
}

impl PlantCareApi {
    /// Create a new plant-care API interface
    pub(crate) fn new(client: PlantsitterClient) -> Self {
        Self { client }
    }

    /// Ask someone to look after a plant
    ///
    /// POST /plant-care/
    pub async fn create(&self, care: &NewPlantCare) -> ApiResult<PlantCare> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::POST, "plant-care/"))?
            .json(care);
        self.client.execute(Operation::CreatePlantCare, request).await
    }

    /// List plant-care requests
    ///
    /// GET /plant-care/?skip=&limit=&status=&as_owner=
    pub async fn list(&self, params: &ListPlantCaresParams) -> ApiResult<Vec<PlantCare>> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::GET, "plant-care/"))?
            .query(params);
        self.client.execute(Operation::ListPlantCares, request).await
    }

    /// Get a single plant-care request
    ///
    /// GET /plant-care/{id}
    pub async fn get(&self, id: i64) -> ApiResult<PlantCare> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::GET, &format!("plant-care/{id}")))?;
        self.client.execute(Operation::GetPlantCare, request).await
    }

    /// Move a request to a new status (accept, refuse, cancel...)
    ///
    /// PUT /plant-care/{id}/status?status=
    pub async fn update_status(&self, id: i64, status: CareStatus) -> ApiResult<PlantCare> {
        let request = self
            .client
            .authorize(
                self.client
                    .request_builder(Method::PUT, &format!("plant-care/{id}/status")),
            )?
            .query(&[("status", status)]);
        self.client.execute(Operation::UpdateCareStatus, request).await
    }

    /// Upload the photo taken when the caretaker picks up the plant
    ///
    /// POST /plant-care/{id}/photos/start
    pub async fn upload_start_photo(&self, id: i64, photo: &PhotoUpload) -> ApiResult<PlantCare> {
        self.upload_photo(id, "start", photo).await
    }

    /// Upload the photo taken when the plant is handed back
    ///
    /// POST /plant-care/{id}/photos/end
    pub async fn upload_end_photo(&self, id: i64, photo: &PhotoUpload) -> ApiResult<PlantCare> {
        self.upload_photo(id, "end", photo).await
    }

    async fn upload_photo(&self, id: i64, stage: &str, photo: &PhotoUpload) -> ApiResult<PlantCare> {
        let form = Form::new().part("photo", photo.to_part()?);
        let request = self
            .client
            .authorize(
                self.client
                    .request_builder(Method::POST, &format!("plant-care/{id}/photos/{stage}")),
            )?
            .multipart(form);
        self.client.execute(Operation::UploadCarePhoto, request).await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Lifecycle of a plant-care request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareStatus {
    Pending,
    Accepted,
    Refused,
    InProgress,
    Completed,
    Cancelled,
}

impl CareStatus {
    /// Wire name of the status
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition is expected
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Refused | Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for CareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plant-care request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlantCare {
    pub plant_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caretaker_id: Option<i64>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(rename = "localisation", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_instructions: Option<String>,
}

impl NewPlantCare {
    pub fn new(plant_id: i64, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            plant_id,
            caretaker_id: None,
            start_date,
            end_date,
            location: None,
            care_instructions: None,
        }
    }

    pub fn with_caretaker(mut self, caretaker_id: i64) -> Self {
        self.caretaker_id = Some(caretaker_id);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.care_instructions = Some(instructions.into());
        self
    }
}

/// Parameters for listing plant-care requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPlantCaresParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CareStatus>,
    /// `true`: requests I own, `false`: requests I look after, unset: all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_owner: Option<bool>,
}

impl ListPlantCaresParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: CareStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only requests for my own plants
    pub fn as_owner(mut self) -> Self {
        self.as_owner = Some(true);
        self
    }

    /// Only requests where I am the caretaker
    pub fn as_caretaker(mut self) -> Self {
        self.as_owner = Some(false);
        self
    }

    pub fn with_page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }
}

/// Plant-care request record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantCare {
    pub id: i64,
    pub plant_id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub caretaker_id: Option<i64>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: CareStatus,
    #[serde(default)]
    pub care_instructions: Option<String>,
    #[serde(rename = "localisation", default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_photo_url: Option<String>,
    #[serde(default)]
    pub end_photo_url: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub plant: Option<PlantSummary>,
}

/// Plant embedded in a plant-care record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSummary {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "espece", default)]
    pub species: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}
