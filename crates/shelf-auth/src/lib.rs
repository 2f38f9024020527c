//! # shelf-auth
//!
//! Identity boundary for comic-shelf. Tokens are issued by an external
//! identity store and signed with a shared HS256 secret; this crate only
//! validates them and extracts the user id.
//!
//! ## Modules
//!
//! - `jwt`: claims, validation, and token minting for development and tests

pub mod jwt;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
