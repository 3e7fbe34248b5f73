//! Bearer token validation for identifying the viewer.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenService};
