use std::sync::Arc;

use async_trait::async_trait;

use aquaflow_core::{DomainError, DomainResult, LocationId, NotificationId, OrgId, ProductId};

use crate::mail::{MailMessage, MailTransport};

/// A notification about to be sent and recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub org_id: OrgId,
    pub location_id: Option<LocationId>,
    pub product_id: Option<ProductId>,
    pub subject: String,
    pub message: String,
    pub sent_to: String,
}

/// Persistence seam for notification rows; implemented by the store crate.
#[async_trait]
pub trait NotificationLog: Send + Sync {
    async fn record(&self, notification: &NewNotification) -> DomainResult<NotificationId>;
}

/// Sends a notification over the mail transport, then records it.
///
/// The record is written only after the transport accepted the message; a
/// transport failure surfaces as a dependency failure and leaves no row.
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    log: Arc<dyn NotificationLog>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, log: Arc<dyn NotificationLog>) -> Self {
        Self { transport, log }
    }

    pub async fn dispatch(&self, notification: NewNotification) -> DomainResult<NotificationId> {
        let mail = MailMessage::new(
            notification.sent_to.clone(),
            notification.subject.clone(),
            notification.message.clone(),
        );

        self.transport
            .send(&mail)
            .await
            .map_err(|e| DomainError::dependency(e.to_string()))?;

        let id = self.log.record(&notification).await?;
        tracing::info!(
            notification_id = %id,
            org_id = %notification.org_id,
            subject = %notification.subject,
            "notification dispatched"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MailError;
    use std::sync::Mutex;

    struct RecordingTransport {
        sent: Mutex<Vec<MailMessage>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, mail: &MailMessage) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("relay unreachable".to_string()));
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        recorded: Mutex<Vec<NewNotification>>,
    }

    #[async_trait]
    impl NotificationLog for RecordingLog {
        async fn record(&self, notification: &NewNotification) -> DomainResult<NotificationId> {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.push(notification.clone());
            Ok(NotificationId::new(recorded.len() as i64))
        }
    }

    fn low_stock_alert() -> NewNotification {
        NewNotification {
            org_id: OrgId::new(1),
            location_id: Some(LocationId::new(4)),
            product_id: Some(ProductId::new(9)),
            subject: "Low Stock Alert".to_string(),
            message: "Stock level for product 9 is below 20% of target level".to_string(),
            sent_to: "ops@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn dispatch_sends_then_records_exactly_once() {
        let transport = Arc::new(RecordingTransport::new(false));
        let log = Arc::new(RecordingLog::default());
        let dispatcher = Dispatcher::new(transport.clone(), log.clone());

        let id = dispatcher.dispatch(low_stock_alert()).await.unwrap();
        assert_eq!(id, NotificationId::new(1));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.com");
        assert!(sent[0].html.contains(&sent[0].text));

        assert_eq!(log.recorded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_leaves_no_record() {
        let transport = Arc::new(RecordingTransport::new(true));
        let log = Arc::new(RecordingLog::default());
        let dispatcher = Dispatcher::new(transport, log.clone());

        let err = dispatcher.dispatch(low_stock_alert()).await.unwrap_err();
        assert!(matches!(err, DomainError::Dependency(_)));
        assert!(log.recorded.lock().unwrap().is_empty());
    }
}
