//! Operation identities and backend error message extraction

use crate::config::Locale;
use serde_json::Value;
use std::fmt;

/// Every backend call the client can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// POST /auth/login
    Login,
    /// POST /auth/register
    Register,
    /// GET /auth/me
    CurrentUser,
    /// GET /plants/
    ListPlants,
    /// GET /plants/{id}
    GetPlant,
    /// POST /plants/
    CreatePlant,
    /// PUT /plants/{id}
    UpdatePlant,
    /// DELETE /plants/{id}
    DeletePlant,
    /// POST /plant-care/
    CreatePlantCare,
    /// GET /plant-care/
    ListPlantCares,
    /// GET /plant-care/{id}
    GetPlantCare,
    /// PUT /plant-care/{id}/status
    UpdateCareStatus,
    /// POST /plant-care/{id}/photos/{start,end}
    UploadCarePhoto,
}

impl Operation {
    /// Message used when the backend rejects a call without a usable `detail`
    #[must_use]
    pub fn fallback_message(self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => match self {
                Self::Login => "Login failed",
                Self::Register => "Registration failed",
                Self::CurrentUser => "Failed to load the current user",
                Self::ListPlants => "Failed to load plants",
                Self::GetPlant => "Failed to load the plant",
                Self::CreatePlant => "Failed to create the plant",
                Self::UpdatePlant => "Failed to update the plant",
                Self::DeletePlant => "Failed to delete the plant",
                Self::CreatePlantCare => "Failed to create the plant care request",
                Self::ListPlantCares => "Failed to load plant care requests",
                Self::GetPlantCare => "Failed to load the plant care request",
                Self::UpdateCareStatus => "Failed to update the plant care status",
                Self::UploadCarePhoto => "Failed to upload the plant care photo",
            },
            Locale::French => match self {
                Self::Login => "Erreur de connexion",
                Self::Register => "Erreur lors de l'inscription",
                Self::CurrentUser => "Erreur lors de la récupération de l'utilisateur",
                Self::ListPlants => "Erreur lors de la récupération des plantes",
                Self::GetPlant => "Erreur lors de la récupération de la plante",
                Self::CreatePlant => "Erreur lors de la création de la plante",
                Self::UpdatePlant => "Erreur lors de la mise à jour de la plante",
                Self::DeletePlant => "Erreur lors de la suppression de la plante",
                Self::CreatePlantCare => "Erreur lors de la création de la garde",
                Self::ListPlantCares => "Erreur lors de la récupération des gardes",
                Self::GetPlantCare => "Erreur lors de la récupération de la garde",
                Self::UpdateCareStatus => "Erreur lors de la mise à jour de la garde",
                Self::UploadCarePhoto => "Erreur lors de l'envoi de la photo",
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::CurrentUser => "current_user",
            Self::ListPlants => "list_plants",
            Self::GetPlant => "get_plant",
            Self::CreatePlant => "create_plant",
            Self::UpdatePlant => "update_plant",
            Self::DeletePlant => "delete_plant",
            Self::CreatePlantCare => "create_plant_care",
            Self::ListPlantCares => "list_plant_cares",
            Self::GetPlantCare => "get_plant_care",
            Self::UpdateCareStatus => "update_care_status",
            Self::UploadCarePhoto => "upload_care_photo",
        };
        f.write_str(name)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}` and FastAPI validation errors
/// (`{"detail": [{"msg": "..."}, ...]}`). A JSON body without a usable
/// `detail` yields `Ok(None)`; a body that is not JSON at all is an error.
pub fn extract_detail(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    let detail = match value.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    };
    Ok(detail)
}
