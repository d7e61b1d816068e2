use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of the signed session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // user ID
    pub name: String, // full name shown on pages
    pub adm: bool,    // admin flag
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}
