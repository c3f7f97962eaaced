use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::domain::repository::RelayTrigger;
use crate::infra::db::DbOrderRepository;
use crate::usecase::relay::RelayOutboxUseCase;

/// Fire-and-forget relay trigger: runs the relay usecase on the runtime
/// without making the caller wait. If the spawned task fails, the outbox row
/// stays unpublished and the sweeper picks it up.
#[derive(Clone)]
pub struct SpawnRelayTrigger {
    pub db: DatabaseConnection,
}

impl RelayTrigger for SpawnRelayTrigger {
    fn trigger(&self, event_id: Uuid) -> Result<(), anyhow::Error> {
        let repo = DbOrderRepository {
            db: self.db.clone(),
        };
        tokio::spawn(async move {
            let usecase = RelayOutboxUseCase { repo };
            if let Err(e) = usecase.execute(event_id).await {
                tracing::error!(error = %e, %event_id, "relay failed, event left unpublished");
            }
        });
        Ok(())
    }
}
