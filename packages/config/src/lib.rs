// ABOUTME: Environment variable names and credential loading
// ABOUTME: Shared by the CLI, publishing adapters and the outreach mailer

pub mod constants;
pub mod credentials;
pub mod env;

pub use credentials::ServiceCredentials;
pub use env::{env_non_empty, env_with_fallback, parse_env_or_default};
