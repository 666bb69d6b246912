pub mod error;
pub mod user_token_repo;
