//! 批量打印提交测试 (多个厨房打印机)

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakePrinters, order, queue};
use print_server::printing::{BatchItem, PrintError, PrintService, PrinterStateWatcher, Translations};
use tokio_util::sync::CancellationToken;

fn service(printers: &Arc<FakePrinters>) -> PrintService {
    let queue = queue(printers, Duration::from_millis(2000));
    let watcher = Arc::new(PrinterStateWatcher::new(printers.clone()));
    PrintService::new(queue, printers.clone(), watcher)
}

fn batch(targets: &[&str]) -> Vec<BatchItem> {
    targets
        .iter()
        .enumerate()
        .map(|(i, target)| BatchItem {
            target: target.to_string(),
            order: order(&(i + 1).to_string()),
        })
        .collect()
}

#[tokio::test]
async fn test_partial_batch_is_accepted() {
    let printers = Arc::new(FakePrinters::new(&["A", "C"]));
    let service = service(&printers);

    let response = service
        .submit_batch(batch(&["A", "B", "C"]), Translations::new())
        .await
        .unwrap();

    assert!(response.accepted);
    assert_eq!(response.success_count, 2);
    assert_eq!(response.job_ids.len(), 2);
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("B"));
    assert!(!response.warnings[0].contains("A"));
    assert_eq!(service.queue_status().pending, 2);
}

#[tokio::test]
async fn test_batch_with_no_reachable_printer() {
    let printers = Arc::new(FakePrinters::new(&[]));
    let service = service(&printers);

    let response = service
        .submit_batch(batch(&["A", "B", "C"]), Translations::new())
        .await
        .unwrap();

    assert!(!response.accepted);
    assert_eq!(response.success_count, 0);
    assert_eq!(
        response.warnings,
        vec![
            "Printer A is not connected or not active",
            "Printer B is not connected or not active",
            "Printer C is not connected or not active",
        ]
    );
    assert_eq!(service.queue_status().pending, 0);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let printers = Arc::new(FakePrinters::new(&["A"]));
    let err = service(&printers)
        .submit_batch(Vec::new(), Translations::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PrintError::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn test_accepted_items_print_in_submission_order() {
    let printers = Arc::new(FakePrinters::new(&["A", "C"]));
    let queue = queue(&printers, Duration::from_millis(2000));
    let watcher = Arc::new(PrinterStateWatcher::new(printers.clone()));
    let service = PrintService::new(queue.clone(), printers.clone(), watcher);

    let token = CancellationToken::new();
    let worker = tokio::spawn(queue.run(token.clone()));

    let response = service
        .submit_batch(batch(&["C", "B", "A"]), Translations::new())
        .await
        .unwrap();
    assert_eq!(response.success_count, 2);

    // Two jobs of 300 ms each plus cool-downs
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(printers.printed_on(), vec!["C", "A"]);
    assert_eq!(service.queue_status().pending, 0);
    assert!(!service.queue_status().is_busy);

    token.cancel();
    worker.await.unwrap();
}
