//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, ChampionshipId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entity::championship::{
    Category, CategoryDraft, Championship, ChampionshipDraft, ChampionshipFilter,
    ChampionshipPatch, Stage, StageDraft,
};
use crate::domain::value_object::Amount;

pub use crate::domain::entity::account::PublicAccount;

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`)
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Auth
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub identity: String,
    pub display_name: String,
    pub secret: String,
    pub secret_confirmation: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identity: String,
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub identity: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub secret: String,
}

/// Plain acknowledgment
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub identity: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChampionshipRequest {
    pub championship_id: ChampionshipId,
}

// ============================================================================
// Championships
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRequest {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: String,
    pub track_layout: Option<String>,
    /// Cents
    #[serde(default)]
    pub price: i64,
    pub image: Option<String>,
}

impl From<StageRequest> for StageDraft {
    fn from(req: StageRequest) -> Self {
        Self {
            name: req.name,
            date: req.date,
            location: req.location,
            track_layout: req.track_layout,
            price_cents: req.price,
            image: req.image,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub capacity: i64,
}

impl From<CategoryRequest> for CategoryDraft {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            capacity: req.capacity,
        }
    }
}

/// Create championship request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChampionshipRequest {
    pub creator_id: AccountId,
    pub name: String,
    pub organizer: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub logo_image: Option<String>,
    pub rules_url: Option<String>,
    /// Cents
    #[serde(default)]
    pub registration_fee: i64,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub stages: Vec<StageRequest>,
    #[serde(default)]
    pub categories: Vec<CategoryRequest>,
}

impl CreateChampionshipRequest {
    pub fn into_parts(self) -> (AccountId, ChampionshipDraft) {
        let draft = ChampionshipDraft {
            name: self.name,
            organizer: self.organizer,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            state: self.state,
            city: self.city,
            venue: self.venue,
            description: self.description,
            cover_image: self.cover_image,
            logo_image: self.logo_image,
            rules_url: self.rules_url,
            registration_fee_cents: self.registration_fee,
            date: self.date,
            stages: self.stages.into_iter().map(StageDraft::from).collect(),
            categories: self.categories.into_iter().map(CategoryDraft::from).collect(),
        };
        (self.creator_id, draft)
    }
}

/// Update championship request
///
/// Optional text fields accept `null` to clear them. The creator cannot be
/// changed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChampionshipRequest {
    pub acting_account_id: AccountId,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub organizer: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub contact_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub venue: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub logo_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rules_url: Option<Option<String>>,
    pub registration_fee: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub date: Option<Option<NaiveDate>>,
    pub stages: Option<Vec<StageRequest>>,
    pub categories: Option<Vec<CategoryRequest>>,
}

impl UpdateChampionshipRequest {
    pub fn into_parts(self) -> (AccountId, ChampionshipPatch) {
        let patch = ChampionshipPatch {
            name: self.name,
            organizer: self.organizer,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            state: self.state,
            city: self.city,
            venue: self.venue,
            description: self.description,
            cover_image: self.cover_image,
            logo_image: self.logo_image,
            rules_url: self.rules_url,
            registration_fee_cents: self.registration_fee,
            date: self.date,
            stages: self
                .stages
                .map(|stages| stages.into_iter().map(StageDraft::from).collect()),
            categories: self
                .categories
                .map(|categories| categories.into_iter().map(CategoryDraft::from).collect()),
        };
        (self.acting_account_id, patch)
    }
}

/// `GET /championships` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipListQuery {
    pub state: Option<String>,
    pub city: Option<String>,
    pub creator_id: Option<AccountId>,
}

impl From<ChampionshipListQuery> for ChampionshipFilter {
    fn from(query: ChampionshipListQuery) -> Self {
        Self {
            creator_id: query.creator_id,
            state: query.state,
            city: query.city,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResponse {
    pub position: u32,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub track_layout: Option<String>,
    pub price: Amount,
    pub image: Option<String>,
}

impl From<&Stage> for StageResponse {
    fn from(stage: &Stage) -> Self {
        Self {
            position: stage.position,
            name: stage.name.clone(),
            date: stage.date,
            location: stage.location.clone(),
            track_layout: stage.track_layout.clone(),
            price: stage.price,
            image: stage.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub position: u32,
    pub name: String,
    pub capacity: u32,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            position: category.position,
            name: category.name.clone(),
            capacity: category.capacity,
        }
    }
}

/// Championship response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipResponse {
    pub id: ChampionshipId,
    pub creator_id: AccountId,
    pub name: String,
    pub organizer: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub logo_image: Option<String>,
    pub rules_url: Option<String>,
    pub registration_fee: Amount,
    pub date: Option<NaiveDate>,
    pub stages: Vec<StageResponse>,
    pub categories: Vec<CategoryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Championship> for ChampionshipResponse {
    fn from(championship: &Championship) -> Self {
        Self {
            id: championship.championship_id,
            creator_id: championship.creator_id,
            name: championship.name.clone(),
            organizer: championship.organizer.clone(),
            contact_phone: championship.contact_phone.clone(),
            contact_email: championship.contact_email.clone(),
            state: championship.state.clone(),
            city: championship.city.clone(),
            venue: championship.venue.clone(),
            description: championship.description.clone(),
            cover_image: championship.cover_image.clone(),
            logo_image: championship.logo_image.clone(),
            rules_url: championship.rules_url.clone(),
            registration_fee: championship.registration_fee,
            date: championship.date,
            stages: championship.stages.iter().map(StageResponse::from).collect(),
            categories: championship
                .categories
                .iter()
                .map(CategoryResponse::from)
                .collect(),
            created_at: championship.created_at,
            updated_at: championship.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_null_vs_absent() {
        let req: UpdateChampionshipRequest = serde_json::from_value(json!({
            "actingAccountId": AccountId::new(),
            "description": null,
            "city": "Campinas"
        }))
        .unwrap();

        assert_eq!(req.description, Some(None));
        assert_eq!(req.city, Some(Some("Campinas".to_string())));
        assert_eq!(req.venue, None);
        assert_eq!(req.date, None);
        assert!(req.stages.is_none());
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateChampionshipRequest = serde_json::from_value(json!({
            "creatorId": AccountId::new(),
            "name": "Copa Kart",
            "stages": [{ "name": "Etapa 1", "date": "2025-06-01" }]
        }))
        .unwrap();

        let (_, draft) = req.into_parts();
        assert_eq!(draft.registration_fee_cents, 0);
        assert_eq!(draft.stages[0].price_cents, 0);
        assert_eq!(
            draft.stages[0].date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(draft.categories.is_empty());
    }
}
