pub mod factory;
pub mod memory;
pub mod postgres;
pub mod realm;
pub mod sweeper;
pub mod token_generator;
pub mod types;

pub use factory::build_realm;
pub use memory::InMemoryRealm;
pub use postgres::PgTokenRealm;
pub use realm::{AuthError, TokenRealm};
pub use sweeper::spawn_purge_task;
pub use types::{Principal, Token};
