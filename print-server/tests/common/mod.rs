//! 测试用打印机替身
//!
//! 同时实现 `DeviceProbe` 和 `DispatchAdapter`，记录每次发送的起止时间。

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pos_printer::{DeviceProbe, DispatchAdapter, PrinterError, PrinterInfo, PrinterResult};
use print_server::printing::{KitchenOrder, OrderItem, SaleTicket};
use print_server::{PrintQueue, QueueSettings};
use tokio::time::Instant;

/// One recorded dispatch
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub printer: String,
    pub bytes: Vec<u8>,
    pub started: Instant,
    pub finished: Instant,
}

pub struct FakePrinters {
    reachable: Mutex<HashSet<String>>,
    /// Simulated time the printer needs per job
    dispatch_time: Duration,
    /// Dispatching to these printers panics
    panicking: HashSet<String>,
    /// Dispatching to these printers fails
    failing: HashSet<String>,
    dispatches: Mutex<Vec<Dispatch>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakePrinters {
    pub fn new(reachable: &[&str]) -> Self {
        Self {
            reachable: Mutex::new(reachable.iter().map(|s| s.to_string()).collect()),
            dispatch_time: Duration::from_millis(300),
            panicking: HashSet::new(),
            failing: HashSet::new(),
            dispatches: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn panicking_on(mut self, printer: &str) -> Self {
        self.panicking.insert(printer.to_string());
        self
    }

    pub fn failing_on(mut self, printer: &str) -> Self {
        self.failing.insert(printer.to_string());
        self
    }

    pub fn disconnect(&self, printer: &str) {
        self.reachable.lock().remove(printer);
    }

    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.dispatches.lock().clone()
    }

    pub fn printed_on(&self) -> Vec<String> {
        self.dispatches.lock().iter().map(|d| d.printer.clone()).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceProbe for FakePrinters {
    async fn is_reachable(&self, printer_name: &str) -> bool {
        self.reachable.lock().contains(printer_name)
    }

    async fn enumerate(&self) -> PrinterResult<Vec<PrinterInfo>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl DispatchAdapter for FakePrinters {
    async fn dispatch(&self, printer_name: &str, data: &[u8]) -> PrinterResult<()> {
        if self.panicking.contains(printer_name) {
            panic!("driver crashed on {}", printer_name);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let started = Instant::now();
        tokio::time::sleep(self.dispatch_time).await;
        let finished = Instant::now();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(printer_name) {
            return Err(PrinterError::Offline(printer_name.to_string()));
        }

        self.dispatches.lock().push(Dispatch {
            printer: printer_name.to_string(),
            bytes: data.to_vec(),
            started,
            finished,
        });
        Ok(())
    }
}

pub fn queue(printers: &Arc<FakePrinters>, cooldown: Duration) -> PrintQueue {
    PrintQueue::new(
        printers.clone(),
        printers.clone(),
        QueueSettings {
            cooldown,
            ..QueueSettings::default()
        },
    )
}

pub fn order(table: &str) -> KitchenOrder {
    KitchenOrder {
        slip_number: None,
        area: "Cocina".into(),
        table: Some(table.into()),
        waiter: "Luis".into(),
        date: "2024-05-01 13:40".into(),
        items: vec![OrderItem {
            quantity: 1,
            name: "Lomo saltado".into(),
            modifiers: Vec::new(),
            note: None,
        }],
    }
}

pub fn sale() -> SaleTicket {
    SaleTicket::sample()
}
