//! Token validation for the externally issued session JWTs.

pub mod jwt;
