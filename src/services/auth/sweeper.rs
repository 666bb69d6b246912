//! Background removal of expired tokens.
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::realm::TokenRealm;

pub fn spawn_purge_task(realm: Arc<dyn TokenRealm>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match realm.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => {
                    tracing::debug!(realm = realm.name(), removed, "purged expired tokens")
                }
                Err(err) => {
                    tracing::warn!(realm = realm.name(), error = %err, "token purge failed")
                }
            }
        }
    })
}
