use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    jwt::JwtKeys, memory::MemoryUserStore, password::CredentialHasher, repo::PgUserStore,
    repo::UserStore, service::AccountService,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn from_parts(store: Arc<dyn UserStore>, config: &AppConfig) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new()?;
        let keys = JwtKeys::from(&config.jwt);
        let accounts = Arc::new(AccountService::new(store, hasher, keys));
        Ok(Self { accounts })
    }

    /// State backed by PostgreSQL.
    pub fn postgres(db: PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        Self::from_parts(Arc::new(PgUserStore::new(db)), config)
    }

    /// State backed by an in-process store; nothing survives a restart.
    pub fn in_memory(config: &AppConfig) -> anyhow::Result<Self> {
        Self::from_parts(Arc::new(MemoryUserStore::new()), config)
    }
}
