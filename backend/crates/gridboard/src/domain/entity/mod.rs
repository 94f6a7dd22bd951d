//! Domain Entities

pub mod account;
pub mod championship;

pub use account::{Account, AccountChanges, PublicAccount};
pub use championship::{
    Category, CategoryDraft, Championship, ChampionshipDraft, ChampionshipFilter,
    ChampionshipPatch, Stage, StageDraft,
};
