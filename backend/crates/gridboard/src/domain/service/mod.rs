//! Domain Services
//!
//! Rules that span more than one aggregate.

pub mod ownership;

pub use ownership::authorize_mutation;
