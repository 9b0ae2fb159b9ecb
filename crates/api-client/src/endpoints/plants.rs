//! Plant endpoints
//!
//! Maps to the backend `/plants` router which provides:
//! - List plants with pagination and owner filter
//! - Get single plant by ID
//! - Create a plant (multipart, optional photo)
//! - Update an existing plant
//! - Delete a plant

use crate::client::PlantsitterClient;
use crate::error::ApiResult;
use crate::operation::Operation;
use crate::upload::PhotoUpload;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Plants API interface
#[derive(Clone)]
pub struct PlantsApi {
    client: PlantsitterClient,
}

impl PlantsApi {
    /// Create a new plants API interface
    pub(crate) fn new(client: PlantsitterClient) -> Self {
        Self { client }
    }

    /// List plants with the backend's default paging
    ///
    /// GET /plants/
    pub async fn list(&self) -> ApiResult<Vec<Plant>> {
        self.list_with(&ListPlantsParams::default()).await
    }

    /// List plants with filters and pagination
    ///
    /// GET /plants/?skip=&limit=&owner_id=
    pub async fn list_with(&self, params: &ListPlantsParams) -> ApiResult<Vec<Plant>> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::GET, "plants/"))?
            .query(params);
        self.client.execute(Operation::ListPlants, request).await
    }

    /// Get a single plant by ID
    ///
    /// GET /plants/{id}
    pub async fn get(&self, id: i64) -> ApiResult<Plant> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::GET, &format!("plants/{id}")))?;
        self.client.execute(Operation::GetPlant, request).await
    }

    /// Create a new plant, uploading its photo if one is attached
    ///
    /// POST /plants/ (multipart)
    pub async fn create(&self, plant: &NewPlant) -> ApiResult<Plant> {
        let form = plant.to_form()?;
        let request = self
            .client
            .authorize(self.client.request_builder(Method::POST, "plants/"))?
            .multipart(form);
        self.client.execute(Operation::CreatePlant, request).await
    }

    /// Update an existing plant
    ///
    /// PUT /plants/{id}
    pub async fn update(&self, id: i64, update: &PlantUpdate) -> ApiResult<Plant> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::PUT, &format!("plants/{id}")))?
            .json(update);
        self.client.execute(Operation::UpdatePlant, request).await
    }

    /// Delete a plant, returning the removed record
    ///
    /// DELETE /plants/{id}
    pub async fn delete(&self, id: i64) -> ApiResult<Plant> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::DELETE, &format!("plants/{id}")))?;
        self.client.execute(Operation::DeletePlant, request).await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Parameters for listing plants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPlantsParams {
    /// Number of records to skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    /// Page size limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only plants belonging to this user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

impl ListPlantsParams {
    /// Create new params with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pagination window
    pub fn with_page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }

    /// Filter by owner
    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

/// Plant creation request, sent as multipart form data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlant {
    pub name: String,
    pub species: Option<String>,
    pub description: Option<String>,
    pub photo: Option<PhotoUpload>,
}

impl NewPlant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: None,
            description: None,
            photo: None,
        }
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_photo(mut self, photo: PhotoUpload) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Multipart body. Missing text fields go out as empty strings.
    fn to_form(&self) -> ApiResult<Form> {
        let mut form = Form::new()
            .text("nom", self.name.clone())
            .text("espece", self.species.clone().unwrap_or_default())
            .text("description", self.description.clone().unwrap_or_default());

        if let Some(ref photo) = self.photo {
            form = form.part("photo", photo.to_part()?);
        }

        Ok(form)
    }
}

/// Partial plant update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantUpdate {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "espece", skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Photo path as stored by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Plant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "espece", default)]
    pub species: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Photo path, relative to the API root unless absolute
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
}

impl Plant {
    /// Absolute URL of the plant's photo, empty when it has none
    #[must_use]
    pub fn photo_url(&self, client: &PlantsitterClient) -> String {
        client.build_photo_url(self.photo.as_deref())
    }
}
