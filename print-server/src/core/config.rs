use std::time::Duration;

use pos_printer::TextEncoding;

/// 打印服务配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | PRINT_COOLDOWN_MS | 2000 | 两个打印任务之间的冷却时间(毫秒) |
/// | PRINTER_POLL_INTERVAL_MS | 5000 | 打印机状态轮询间隔(毫秒) |
/// | PRINTER_TEXT_ENCODING | cp1252 | 打印机代码页: cp1252 \| gbk |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，存在时写入按天滚动的日志文件 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// 无效值回退到默认值。
#[derive(Debug, Clone)]
pub struct Config {
    /// 冷却时间，给打印机机械部件留出恢复时间
    pub print_cooldown_ms: u64,
    /// 打印机状态轮询间隔
    pub printer_poll_interval_ms: u64,
    /// 文本编码
    pub text_encoding: TextEncoding,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            print_cooldown_ms: std::env::var("PRINT_COOLDOWN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
            printer_poll_interval_ms: std::env::var("PRINTER_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(5000),
            text_encoding: std::env::var("PRINTER_TEXT_ENCODING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.print_cooldown_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.printer_poll_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            print_cooldown_ms: 2000,
            printer_poll_interval_ms: 5000,
            text_encoding: TextEncoding::default(),
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }
}
