//! Specialist catalogue handler

use axum::Json;
use serde::Serialize;
use soudan_auth::AuthUser;

use crate::domain::specialists::{SpecialistType, CATALOGUE};

#[derive(Debug, Serialize)]
pub struct SpecialistResponse {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl From<SpecialistType> for SpecialistResponse {
    fn from(s: SpecialistType) -> Self {
        Self {
            id: s.as_str(),
            name: s.display_name(),
            description: s.description(),
            icon: s.icon(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpecialistListResponse {
    pub specialists: Vec<SpecialistResponse>,
}

/// List the specialists a conversation can be started with
pub async fn list_specialists(AuthUser(_user): AuthUser) -> Json<SpecialistListResponse> {
    Json(SpecialistListResponse {
        specialists: CATALOGUE.into_iter().map(Into::into).collect(),
    })
}
