//! 打印机状态监视器
//!
//! 定时调用 [`DeviceProbe::enumerate`]，仅在快照变化时发布。
//! 订阅方式：
//! - [`PrinterStateWatcher::on_change`] 注册回调
//! - [`PrinterStateWatcher::subscribe`] 获取 `watch::Receiver`

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use pos_printer::{DeviceProbe, PrinterInfo};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::core::tasks::panic_message;

/// 状态变化回调
pub type StateCallback = Arc<dyn Fn(&[PrinterInfo]) + Send + Sync>;

pub struct PrinterStateWatcher {
    probe: Arc<dyn DeviceProbe>,
    /// 最近一次发布的快照
    state: watch::Sender<Vec<PrinterInfo>>,
    callbacks: RwLock<Vec<StateCallback>>,
}

impl PrinterStateWatcher {
    pub fn new(probe: Arc<dyn DeviceProbe>) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            probe,
            state,
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// 注册状态变化回调
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&[PrinterInfo]) + Send + Sync + 'static,
    {
        self.callbacks.write().push(Arc::new(callback));
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<PrinterInfo>> {
        self.state.subscribe()
    }

    /// 当前快照
    pub fn snapshot(&self) -> Vec<PrinterInfo> {
        self.state.borrow().clone()
    }

    /// 轮询一次，返回是否发布了新快照
    pub async fn poll_once(&self) -> bool {
        let printers = match self.probe.enumerate().await {
            Ok(printers) => printers,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to enumerate printers");
                return false;
            }
        };

        let changed = self.state.send_if_modified(|current| {
            if *current == printers {
                false
            } else {
                *current = printers.clone();
                true
            }
        });

        if changed {
            tracing::info!(count = printers.len(), "Printer state changed");
            self.notify(&printers);
        }
        changed
    }

    /// 调用回调时不持有锁，回调内可以再注册回调
    fn notify(&self, printers: &[PrinterInfo]) {
        let callbacks: Vec<StateCallback> = self.callbacks.read().clone();
        for callback in &callbacks {
            if let Err(panic_info) =
                std::panic::catch_unwind(AssertUnwindSafe(|| callback(printers)))
            {
                tracing::error!(
                    panic = %panic_message(panic_info.as_ref()),
                    "Printer state callback panicked"
                );
            }
        }
    }

    /// 运行轮询循环（阻塞直到取消）
    pub async fn run(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) {
        tracing::info!(interval_ms = interval.as_millis() as u64, "Printer state watcher started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
            }
        }

        tracing::info!("Printer state watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pos_printer::{PrinterError, PrinterResult, PrinterStatus};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// `None` makes enumeration fail
    #[derive(Default)]
    struct ScriptedProbe {
        printers: Mutex<Option<Vec<PrinterInfo>>>,
    }

    impl ScriptedProbe {
        fn set(&self, printers: Option<Vec<PrinterInfo>>) {
            *self.printers.lock() = printers;
        }
    }

    #[async_trait]
    impl DeviceProbe for ScriptedProbe {
        async fn is_reachable(&self, _printer_name: &str) -> bool {
            true
        }

        async fn enumerate(&self) -> PrinterResult<Vec<PrinterInfo>> {
            self.printers
                .lock()
                .clone()
                .ok_or_else(|| PrinterError::Connection("lpstat exited with 1".into()))
        }
    }

    fn printer(status: PrinterStatus) -> PrinterInfo {
        PrinterInfo {
            name: "EPSON_TM_T20".into(),
            status,
            is_default: true,
            port: Some("usb://EPSON/TM-T20".into()),
            physically_connected: true,
        }
    }

    fn watcher() -> (Arc<ScriptedProbe>, PrinterStateWatcher, Arc<AtomicUsize>) {
        let probe = Arc::new(ScriptedProbe::default());
        let watcher = PrinterStateWatcher::new(probe.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        watcher.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (probe, watcher, calls)
    }

    #[tokio::test]
    async fn test_publishes_only_on_change() {
        let (probe, watcher, calls) = watcher();

        probe.set(Some(vec![printer(PrinterStatus::Connected)]));
        assert!(watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Same snapshot again
        assert!(!watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        probe.set(Some(vec![printer(PrinterStatus::Printing)]));
        assert!(watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(watcher.snapshot()[0].status, PrinterStatus::Printing);
    }

    #[tokio::test]
    async fn test_enumeration_error_keeps_snapshot() {
        let (probe, watcher, calls) = watcher();

        probe.set(Some(vec![printer(PrinterStatus::Connected)]));
        watcher.poll_once().await;

        probe.set(None);
        assert!(!watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(watcher.snapshot(), vec![printer(PrinterStatus::Connected)]);
    }

    #[tokio::test]
    async fn test_panicking_callback_does_not_block_others() {
        let (probe, watcher, calls) = watcher();
        watcher.on_change(|_| panic!("callback bug"));
        let after = calls.clone();
        watcher.on_change(move |_| {
            after.fetch_add(10, Ordering::SeqCst);
        });

        probe.set(Some(vec![printer(PrinterStatus::Connected)]));
        assert!(watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_callback_can_register_another_callback() {
        let (probe, watcher, calls) = watcher();
        let watcher = Arc::new(watcher);
        let handle = Arc::downgrade(&watcher);
        let registered = AtomicBool::new(false);
        let nested_calls = calls.clone();
        watcher.on_change(move |_| {
            if registered.swap(true, Ordering::SeqCst) {
                return;
            }
            if let Some(watcher) = handle.upgrade() {
                let nested_calls = nested_calls.clone();
                watcher.on_change(move |_| {
                    nested_calls.fetch_add(100, Ordering::SeqCst);
                });
            }
        });

        probe.set(Some(vec![printer(PrinterStatus::Connected)]));
        assert!(watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Late registration only sees later changes
        probe.set(Some(vec![printer(PrinterStatus::Printing)]));
        assert!(watcher.poll_once().await);
        assert_eq!(calls.load(Ordering::SeqCst), 102);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_notifies_subscribers() {
        let (probe, watcher, _) = watcher();
        let watcher = Arc::new(watcher);
        let mut rx = watcher.subscribe();
        let token = CancellationToken::new();
        let task = tokio::spawn(watcher.clone().run(Duration::from_millis(5000), token.clone()));

        probe.set(Some(vec![printer(PrinterStatus::Connected)]));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        probe.set(Some(vec![printer(PrinterStatus::Disconnected)]));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[0].status, PrinterStatus::Disconnected);

        token.cancel();
        task.await.unwrap();
    }
}
