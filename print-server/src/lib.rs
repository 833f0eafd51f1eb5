//! POS Print Server - 餐厅收银打印服务
//!
//! # 架构概述
//!
//! 接收 POS 终端的打印请求，按优先级排队，逐个渲染为 ESC/POS 字节并
//! 发送到系统打印队列或网络打印机。
//!
//! - **打印** (`printing`): 票据模型、排版、优先级队列、状态监视
//! - **核心** (`core`): 配置、后台任务
//! - **工具** (`utils`): 日志
//!
//! 设备访问 (CUPS / Win32 spooler / TCP) 在 `pos-printer` crate 中。
//!
//! # 模块结构
//!
//! ```text
//! print-server/src/
//! ├── core/          # 配置、后台任务
//! ├── printing/      # 队列、排版、服务
//! └── utils/         # 日志
//! ```

pub mod core;
pub mod printing;
pub mod utils;

pub use self::core::{BackgroundTasks, Config, TaskKind};
pub use printing::{
    BatchItem, BatchResponse, JobOutcome, PrintError, PrintQueue, PrintResult, PrintService,
    PrinterStateWatcher, QueueSettings, SubmitResponse, TicketPayload, TicketRenderer, TicketType,
    Translations,
};
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env、读取配置并初始化日志
pub fn setup_environment() -> Config {
    // .env is optional
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____    ____       _       __
   / __ \/ __ \/ ___/   / __ \_____(_)___  / /_
  / /_/ / / / /\__ \   / /_/ / ___/ / __ \/ __/
 / ____/ /_/ /___/ /  / ____/ /  / / / / / /_
/_/    \____//____/  /_/   /_/  /_/_/ /_/\__/
    "#
    );
}
