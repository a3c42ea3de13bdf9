//! Transfer notification hook.
//!
//! Fire-and-forget: the engine invokes the hook after a transfer commits,
//! consumes no return value, and a misbehaving notifier can never fail the
//! transfer.

use crate::entities::transfer;
use crate::money;
use async_trait::async_trait;
use tracing::info;

/// Collaborator notified of completed transfers.
#[async_trait]
pub trait TransferNotifier: Send + Sync {
    /// Delivers a notification for a completed transfer. Infallible by
    /// contract; implementations swallow and log their own errors.
    async fn notify(&self, transfer: &transfer::Model);
}

/// Log-only notifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl TransferNotifier for LoggingNotifier {
    async fn notify(&self, transfer: &transfer::Model) {
        info!(
            "Notify transfer id={} amount={} from={} to={}",
            transfer.id,
            money::format(transfer.amount),
            transfer.from_card_id,
            transfer.to_card_id
        );
    }
}
