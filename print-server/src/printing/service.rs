//! Print service
//!
//! Entry point for POS terminals: validates requests, gates them on printer
//! reachability and hands accepted jobs to the [`PrintQueue`]. Also exposes
//! the printer state published by the [`PrinterStateWatcher`].

use std::sync::Arc;

use pos_printer::{DeviceProbe, PrinterInfo};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::error::{PrintError, PrintResult};
use super::payload::{KitchenOrder, SaleTicket, TicketPayload};
use super::queue::{PrintQueue, QueueStatus};
use super::translations::Translations;
use super::types::{Job, JobId, TicketType};
use super::watcher::PrinterStateWatcher;

/// Result of a single ticket submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub warnings: Vec<String>,
}

/// One kitchen slip of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub target: String,
    pub order: KitchenOrder,
}

/// Result of a batch submission, collected per item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub accepted: bool,
    pub success_count: usize,
    pub job_ids: Vec<JobId>,
    pub warnings: Vec<String>,
}

pub struct PrintService {
    queue: PrintQueue,
    probe: Arc<dyn DeviceProbe>,
    watcher: Arc<PrinterStateWatcher>,
}

impl PrintService {
    pub fn new(
        queue: PrintQueue,
        probe: Arc<dyn DeviceProbe>,
        watcher: Arc<PrinterStateWatcher>,
    ) -> Self {
        Self {
            queue,
            probe,
            watcher,
        }
    }

    /// Submit one ticket
    ///
    /// Only validation problems are errors. An unreachable printer is a
    /// normal `accepted = false` answer carrying a warning.
    pub async fn submit_ticket(
        &self,
        ticket_type: TicketType,
        target: &str,
        payload: TicketPayload,
        translations: Translations,
    ) -> PrintResult<SubmitResponse> {
        let target = validate_target(target)?;
        if !payload.matches(ticket_type) {
            return Err(PrintError::Validation(format!(
                "{} ticket needs a different payload than {}",
                ticket_type,
                payload.kind()
            )));
        }

        if !self.probe.is_reachable(target).await {
            tracing::warn!(printer = %target, ticket_type = %ticket_type, "Print request rejected, printer unavailable");
            return Ok(SubmitResponse {
                accepted: false,
                job_id: None,
                warnings: vec![PrintError::PrinterUnavailable(target.to_string()).to_string()],
            });
        }

        let receipt = self
            .queue
            .submit(Job::new(ticket_type, target, payload, translations));

        Ok(SubmitResponse {
            accepted: true,
            job_id: Some(receipt.id),
            warnings: Vec::new(),
        })
    }

    /// Submit kitchen slips for several printers
    ///
    /// Each item is checked on its own; accepted items are queued
    /// individually as order slips.
    pub async fn submit_batch(
        &self,
        items: Vec<BatchItem>,
        translations: Translations,
    ) -> PrintResult<BatchResponse> {
        if items.is_empty() {
            return Err(PrintError::Validation("batch contains no print jobs".into()));
        }

        let mut job_ids = Vec::with_capacity(items.len());
        let mut warnings = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            let target = item.target.trim();
            if target.is_empty() {
                warnings.push(format!("Job {}: printer name is missing", index + 1));
                continue;
            }
            if !self.probe.is_reachable(target).await {
                warnings.push(PrintError::PrinterUnavailable(target.to_string()).to_string());
                continue;
            }

            let job = Job::new(
                TicketType::OrderSlip,
                target,
                TicketPayload::Order(item.order),
                translations.clone(),
            );
            job_ids.push(self.queue.submit(job).id);
        }

        let success_count = job_ids.len();
        tracing::info!(
            success_count,
            rejected = warnings.len(),
            "Batch print request processed"
        );

        Ok(BatchResponse {
            accepted: success_count > 0,
            success_count,
            job_ids,
            warnings,
        })
    }

    /// Print the built-in sample sale on a printer
    pub async fn submit_test_print(
        &self,
        target: &str,
        translations: Translations,
    ) -> PrintResult<SubmitResponse> {
        self.submit_ticket(
            TicketType::TestPrint,
            target,
            TicketPayload::Sale(SaleTicket::sample()),
            translations,
        )
        .await
    }

    /// Latest printer list published by the watcher
    pub fn printer_snapshot(&self) -> Vec<PrinterInfo> {
        self.watcher.snapshot()
    }

    pub fn on_printer_state_changed<F>(&self, callback: F)
    where
        F: Fn(&[PrinterInfo]) + Send + Sync + 'static,
    {
        self.watcher.on_change(callback);
    }

    pub fn subscribe_printer_state(&self) -> watch::Receiver<Vec<PrinterInfo>> {
        self.watcher.subscribe()
    }

    pub fn queue_status(&self) -> QueueStatus {
        self.queue.status()
    }
}

fn validate_target(target: &str) -> PrintResult<&str> {
    let target = target.trim();
    if target.is_empty() {
        return Err(PrintError::Validation("printer name is required".into()));
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::queue::QueueSettings;
    use async_trait::async_trait;
    use pos_printer::{DispatchAdapter, PrinterResult};

    struct OnlyKitchen;

    #[async_trait]
    impl DeviceProbe for OnlyKitchen {
        async fn is_reachable(&self, printer_name: &str) -> bool {
            printer_name == "COCINA"
        }

        async fn enumerate(&self) -> PrinterResult<Vec<PrinterInfo>> {
            Ok(Vec::new())
        }
    }

    struct Discard;

    #[async_trait]
    impl DispatchAdapter for Discard {
        async fn dispatch(&self, _printer_name: &str, _data: &[u8]) -> PrinterResult<()> {
            Ok(())
        }
    }

    // No worker is spawned: accepted jobs stay pending
    fn service() -> PrintService {
        let probe: Arc<dyn DeviceProbe> = Arc::new(OnlyKitchen);
        let queue = PrintQueue::new(probe.clone(), Arc::new(Discard), QueueSettings::default());
        let watcher = Arc::new(PrinterStateWatcher::new(probe.clone()));
        PrintService::new(queue, probe, watcher)
    }

    fn order() -> KitchenOrder {
        KitchenOrder {
            slip_number: None,
            area: "Cocina".into(),
            table: Some("4".into()),
            waiter: "Luis".into(),
            date: "2024-05-01 13:40".into(),
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_printer_name_is_validation_error() {
        let err = service()
            .submit_test_print("  ", Translations::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::Validation(_)));
    }

    #[tokio::test]
    async fn test_payload_mismatch_is_validation_error() {
        let service = service();
        let err = service
            .submit_ticket(
                TicketType::OrderSlip,
                "COCINA",
                TicketPayload::Sale(SaleTicket::sample()),
                Translations::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::Validation(_)));
        assert_eq!(service.queue_status().pending, 0);
    }

    #[tokio::test]
    async fn test_unreachable_printer_is_not_accepted() {
        let service = service();
        let response = service
            .submit_test_print("BARRA", Translations::new())
            .await
            .unwrap();

        assert!(!response.accepted);
        assert_eq!(response.job_id, None);
        assert_eq!(response.warnings, vec!["Printer BARRA is not connected or not active"]);
        assert_eq!(service.queue_status().pending, 0);
    }

    #[tokio::test]
    async fn test_accepted_ticket_is_queued() {
        let service = service();
        let response = service
            .submit_ticket(
                TicketType::OrderSlip,
                "COCINA",
                TicketPayload::Order(order()),
                Translations::new(),
            )
            .await
            .unwrap();

        assert!(response.accepted);
        assert!(response.job_id.is_some());
        assert!(response.warnings.is_empty());
        assert_eq!(service.queue_status().pending, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_is_validation_error() {
        let err = service()
            .submit_batch(Vec::new(), Translations::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::Validation(_)));
    }

    #[tokio::test]
    async fn test_batch_item_without_printer_is_rejected() {
        let service = service();
        let items = vec![
            BatchItem {
                target: String::new(),
                order: order(),
            },
            BatchItem {
                target: "COCINA".into(),
                order: order(),
            },
        ];
        let response = service.submit_batch(items, Translations::new()).await.unwrap();

        assert!(response.accepted);
        assert_eq!(response.success_count, 1);
        assert_eq!(response.warnings, vec!["Job 1: printer name is missing"]);
    }

    #[test]
    fn test_response_serialization() {
        let response = BatchResponse {
            accepted: false,
            success_count: 0,
            job_ids: Vec::new(),
            warnings: vec!["Printer BARRA is not connected or not active".into()],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["successCount"], 0);
        assert_eq!(json["accepted"], false);
    }
}
