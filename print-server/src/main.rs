use std::sync::Arc;
use std::time::Duration;

use pos_printer::{DeviceProbe, DispatchAdapter, SystemSpooler};
use print_server::{
    BackgroundTasks, PrintQueue, PrintService, PrinterStateWatcher, QueueSettings, TaskKind,
    print_banner, setup_environment,
};

const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment();

    print_banner();

    tracing::info!(
        environment = %config.environment,
        cooldown_ms = config.print_cooldown_ms,
        poll_interval_ms = config.printer_poll_interval_ms,
        "POS print server starting..."
    );

    // 2. 设备后端
    let spooler = Arc::new(SystemSpooler::new());
    let probe: Arc<dyn DeviceProbe> = spooler.clone();
    let dispatcher: Arc<dyn DispatchAdapter> = spooler;

    // 3. 队列、状态监视、服务
    let queue = PrintQueue::new(probe.clone(), dispatcher, QueueSettings::from(&config));
    let watcher = Arc::new(PrinterStateWatcher::new(probe.clone()));
    let service = PrintService::new(queue.clone(), probe, watcher.clone());

    service.on_printer_state_changed(|printers| {
        for printer in printers {
            tracing::info!(
                printer = %printer.name,
                status = ?printer.status,
                is_default = printer.is_default,
                "Printer state"
            );
        }
    });

    // 4. 后台任务
    let mut tasks = BackgroundTasks::new();
    let token = tasks.shutdown_token();
    tasks.spawn("print_queue", TaskKind::Worker, queue.run(token.clone()));
    tasks.spawn(
        "printer_state_watcher",
        TaskKind::Periodic,
        watcher.run(config.poll_interval(), token),
    );
    tasks.log_summary();

    let shutdown_signal = tokio::signal::ctrl_c();
    tokio::pin!(shutdown_signal);
    let mut health = tokio::time::interval(HEALTH_CHECK_INTERVAL);
    health.tick().await;
    loop {
        tokio::select! {
            result = &mut shutdown_signal => {
                result?;
                break;
            }
            _ = health.tick() => {
                let failed = tasks.check_health();
                if failed > 0 {
                    tracing::error!(failed, "Background tasks are down, printing may be stalled");
                }
            }
        }
    }
    tracing::info!(queue = ?service.queue_status(), "Shutdown signal received");

    tasks.shutdown().await;
    tracing::info!("POS print server stopped");
    Ok(())
}
