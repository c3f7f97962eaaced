use sea_orm::DatabaseConnection;

use crate::infra::db::DbOrderRepository;
use crate::infra::relay::SpawnRelayTrigger;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn intake_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn relay_trigger(&self) -> SpawnRelayTrigger {
        SpawnRelayTrigger {
            db: self.db.clone(),
        }
    }
}
