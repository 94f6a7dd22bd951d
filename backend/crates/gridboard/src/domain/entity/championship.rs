//! Championship Entity
//!
//! A multi-stage competition with its entrant categories. Stages and
//! categories are owned children identified by their position and are always
//! replaced as a whole.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, ChampionshipId};

use crate::domain::value_object::Amount;
use crate::error::{GridboardError, GridboardResult};

pub const CHAMPIONSHIP_NAME_MAX_LENGTH: usize = 200;

/// Largest capacity every store can hold (Postgres `INTEGER`)
pub const CATEGORY_CAPACITY_MAX: i64 = i32::MAX as i64;

// ============================================================================
// Children
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub position: u32,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub track_layout: Option<String>,
    pub price: Amount,
    pub image: Option<String>,
}

/// Unvalidated stage as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDraft {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub track_layout: Option<String>,
    pub price_cents: i64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub position: u32,
    pub name: String,
    pub capacity: u32,
}

/// Unvalidated category as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub capacity: i64,
}

impl Stage {
    /// Validate drafts and assign positions in submission order
    pub fn from_drafts(drafts: &[StageDraft]) -> GridboardResult<Vec<Self>> {
        drafts
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let name = required_text(&draft.name, "Stage name")?;
                let price = Amount::from_cents(draft.price_cents).map_err(|_| {
                    GridboardError::validation(format!(
                        "Stage '{}' has a negative price",
                        name
                    ))
                })?;

                Ok(Self {
                    position: position(index)?,
                    name,
                    date: draft.date,
                    location: draft.location.trim().to_string(),
                    track_layout: optional_text(draft.track_layout.clone()),
                    price,
                    image: optional_text(draft.image.clone()),
                })
            })
            .collect()
    }
}

impl Category {
    pub fn from_drafts(drafts: &[CategoryDraft]) -> GridboardResult<Vec<Self>> {
        drafts
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let name = required_text(&draft.name, "Category name")?;
                if draft.capacity > CATEGORY_CAPACITY_MAX {
                    return Err(GridboardError::validation(format!(
                        "Category '{}' capacity must be at most {}",
                        name, CATEGORY_CAPACITY_MAX
                    )));
                }
                let capacity = u32::try_from(draft.capacity)
                    .ok()
                    .filter(|capacity| *capacity > 0)
                    .ok_or_else(|| {
                        GridboardError::validation(format!(
                            "Category '{}' must have a positive capacity",
                            name
                        ))
                    })?;

                Ok(Self {
                    position: position(index)?,
                    name,
                    capacity,
                })
            })
            .collect()
    }
}

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Championship {
    pub championship_id: ChampionshipId,
    /// Fixed at creation
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
    /// Headline date
    pub date: Option<NaiveDate>,
    /// `date` follows the first stage until one is set explicitly
    pub date_derived: bool,
    pub stages: Vec<Stage>,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for a new championship, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChampionshipDraft {
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
    pub registration_fee_cents: i64,
    pub date: Option<NaiveDate>,
    pub stages: Vec<StageDraft>,
    pub categories: Vec<CategoryDraft>,
}

/// Partial update
///
/// Outer `None` leaves a field untouched. For clearable fields
/// `Some(None)` clears the value. `stages` and `categories` replace the
/// whole collection when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChampionshipPatch {
    pub name: Option<String>,
    pub organizer: Option<Option<String>>,
    pub contact_phone: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub venue: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub cover_image: Option<Option<String>>,
    pub logo_image: Option<Option<String>>,
    pub rules_url: Option<Option<String>>,
    pub registration_fee_cents: Option<i64>,
    pub date: Option<Option<NaiveDate>>,
    pub stages: Option<Vec<StageDraft>>,
    pub categories: Option<Vec<CategoryDraft>>,
}

impl Championship {
    /// Validate a draft into a new aggregate owned by `creator_id`
    ///
    /// Without an explicit headline date, the first submitted stage's date
    /// is used and keeps tracking the first stage on later stage updates.
    pub fn create(creator_id: AccountId, draft: ChampionshipDraft) -> GridboardResult<Self> {
        let name = championship_name(&draft.name)?;
        let registration_fee = registration_fee(draft.registration_fee_cents)?;
        let stages = Stage::from_drafts(&draft.stages)?;
        let categories = Category::from_drafts(&draft.categories)?;
        let date_derived = draft.date.is_none();
        let date = draft.date.or_else(|| first_stage_date(&stages));

        let now = Utc::now();
        Ok(Self {
            championship_id: ChampionshipId::new(),
            creator_id,
            name,
            organizer: optional_text(draft.organizer),
            contact_phone: optional_text(draft.contact_phone),
            contact_email: optional_text(draft.contact_email),
            state: optional_text(draft.state),
            city: optional_text(draft.city),
            venue: optional_text(draft.venue),
            description: optional_text(draft.description),
            cover_image: optional_text(draft.cover_image),
            logo_image: optional_text(draft.logo_image),
            rules_url: optional_text(draft.rules_url),
            registration_fee,
            date,
            date_derived,
            stages,
            categories,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_created_by(&self, account_id: &AccountId) -> bool {
        self.creator_id == *account_id
    }

    /// Build the patched aggregate
    ///
    /// Everything is validated before anything is assigned, so an error
    /// leaves no partial result. `self` is never modified.
    pub fn apply_patch(&self, patch: &ChampionshipPatch) -> GridboardResult<Self> {
        let name = patch.name.as_deref().map(championship_name).transpose()?;
        let registration_fee = patch
            .registration_fee_cents
            .map(registration_fee)
            .transpose()?;
        let stages = patch.stages.as_deref().map(Stage::from_drafts).transpose()?;
        let categories = patch
            .categories
            .as_deref()
            .map(Category::from_drafts)
            .transpose()?;

        let mut next = self.clone();
        if let Some(name) = name {
            next.name = name;
        }
        patch_text(&mut next.organizer, &patch.organizer);
        patch_text(&mut next.contact_phone, &patch.contact_phone);
        patch_text(&mut next.contact_email, &patch.contact_email);
        patch_text(&mut next.state, &patch.state);
        patch_text(&mut next.city, &patch.city);
        patch_text(&mut next.venue, &patch.venue);
        patch_text(&mut next.description, &patch.description);
        patch_text(&mut next.cover_image, &patch.cover_image);
        patch_text(&mut next.logo_image, &patch.logo_image);
        patch_text(&mut next.rules_url, &patch.rules_url);
        if let Some(fee) = registration_fee {
            next.registration_fee = fee;
        }
        if let Some(stages) = stages {
            next.stages = stages;
            if next.date_derived {
                next.date = first_stage_date(&next.stages);
            }
        }
        // An explicit date, or an explicit clear, ends derivation
        if let Some(date) = patch.date {
            next.date = date;
            next.date_derived = false;
        }
        if let Some(categories) = categories {
            next.categories = categories;
        }
        next.updated_at = Utc::now();

        Ok(next)
    }
}

/// Listing filter; every `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChampionshipFilter {
    pub creator_id: Option<AccountId>,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl ChampionshipFilter {
    pub fn by_creator(creator_id: AccountId) -> Self {
        Self {
            creator_id: Some(creator_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, championship: &Championship) -> bool {
        self.creator_id
            .is_none_or(|creator_id| championship.creator_id == creator_id)
            && self
                .state
                .as_deref()
                .is_none_or(|state| championship.state.as_deref() == Some(state))
            && self
                .city
                .as_deref()
                .is_none_or(|city| championship.city.as_deref() == Some(city))
    }
}

// ============================================================================
// Field rules
// ============================================================================

fn first_stage_date(stages: &[Stage]) -> Option<NaiveDate> {
    stages.first().map(|stage| stage.date)
}

fn championship_name(raw: &str) -> GridboardResult<String> {
    let name = required_text(raw, "Championship name")?;
    let char_count = name.chars().count();
    if char_count > CHAMPIONSHIP_NAME_MAX_LENGTH {
        return Err(GridboardError::validation(format!(
            "Championship name must be at most {} characters (got {})",
            CHAMPIONSHIP_NAME_MAX_LENGTH, char_count
        )));
    }
    Ok(name)
}

fn registration_fee(cents: i64) -> GridboardResult<Amount> {
    Amount::from_cents(cents)
        .map_err(|_| GridboardError::validation("Registration fee cannot be negative"))
}

fn required_text(raw: &str, field: &str) -> GridboardResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(GridboardError::validation(format!("{} cannot be empty", field)));
    }
    Ok(text.to_string())
}

/// Trimmed, with blank treated as absent
fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn patch_text(field: &mut Option<String>, patch: &Option<Option<String>>) {
    if let Some(value) = patch {
        *field = optional_text(value.clone());
    }
}

fn position(index: usize) -> GridboardResult<u32> {
    u32::try_from(index).map_err(|_| GridboardError::validation("Too many entries"))
}
