use std::sync::Arc;

use crate::{
    config::Config, services::audit_log::AuditLogService, session::SessionPolicy,
    store::DocumentStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub policy: SessionPolicy,
    pub store: Arc<dyn DocumentStore>,
    pub audit: AuditLogService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>, audit: AuditLogService) -> Self {
        let policy = SessionPolicy::from_config(&config);
        Self {
            config,
            policy,
            store,
            audit,
        }
    }
}
