//! API client for the Plantsitter backend
//!
//! This crate wraps the Plantsitter REST API: accounts, plant records and
//! plant-care requests (asking another user to look after a plant).
//!
//! # Features
//!
//! - **Environment-based configuration**: Load the API URL and options from environment variables
//! - **Injected session storage**: The bearer token lives in a [`session::TokenStore`] of your choice
//! - **Uniform results**: Every call returns an [`ApiResult`], convertible into the
//!   serializable [`ApiResponse`] envelope for UI code
//! - **Request correlation**: Each request carries a unique `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use plantsitter_api_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlantsitterClient::new()?;
//!
//!     client
//!         .auth()
//!         .login(&Credentials::new("marie@example.com", "s3cret"))
//!         .await?;
//!
//!     for plant in client.plants().list().await? {
//!         println!("{} -> {}", plant.name, plant.photo_url(&client));
//!     }
//!
//!     let envelope: ApiResponse<_> = client.auth().current_user().await.into();
//!     println!("{}", serde_json::to_string(&envelope)?);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod operation;
pub mod session;
pub mod upload;

pub use client::PlantsitterClient;
pub use config::{ClientConfig, Locale};
pub use error::{ApiError, ApiResponse, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::PlantsitterClient;
    pub use crate::config::{ClientConfig, Locale};
    pub use crate::endpoints::auth::{Credentials, NewUser, TokenResponse, User};
    pub use crate::endpoints::plant_care::{
        CareStatus, ListPlantCaresParams, NewPlantCare, PlantCare,
    };
    pub use crate::endpoints::plants::{ListPlantsParams, NewPlant, Plant, PlantUpdate};
    pub use crate::endpoints::{AuthApi, PlantCareApi, PlantsApi};
    pub use crate::error::{ApiError, ApiResponse, ApiResult};
    pub use crate::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
    pub use crate::upload::PhotoUpload;
}
