//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64/hex codecs,
//!   constant-time comparison)
//! - TTL cache with an injected clock (no ambient module state)

pub mod cache;
pub mod crypto;
