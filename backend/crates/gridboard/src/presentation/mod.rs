//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors and router.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use handlers::{GridboardAppState, GridboardStore};
pub use router::{gridboard_router, gridboard_router_generic};
