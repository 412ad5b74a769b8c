//! Resolution of complete service credentials from a provider

mod credential_resolver;

pub use credential_resolver::{CredentialResolver, API_KEY, BASE_URL, PASSWORD, USERNAME};
