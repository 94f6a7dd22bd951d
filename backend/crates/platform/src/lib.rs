//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic utilities (secure random tokens, SHA-256, Base64)
//! - Password hashing (Argon2id)

pub mod crypto;
pub mod password;
