//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific set of backend endpoints.
//!
//! ## Mapping to the backend routers
//!
//! | Module | Router | Description |
//! |--------|--------|-------------|
//! | `auth` | `/auth` | Login, registration, current user |
//! | `plants` | `/plants` | Plant records CRUD |
//! | `plant_care` | `/plant-care` | Plant-sitting requests and their photos |

pub mod auth;
pub mod plant_care;
pub mod plants;

pub use auth::AuthApi;
pub use plant_care::PlantCareApi;
pub use plants::PlantsApi;
