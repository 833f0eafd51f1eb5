//! 打印模块
//!
//! - [`PrintService`] - 请求校验和提交
//! - [`PrintQueue`] - 优先级队列，单工作者顺序执行
//! - [`TicketRenderer`] - 票据排版 (纯函数)
//! - [`PrinterStateWatcher`] - 打印机状态轮询

pub mod error;
pub mod layout;
pub mod payload;
pub mod queue;
pub mod renderer;
pub mod service;
pub mod translations;
pub mod types;
pub mod watcher;

pub use error::{PrintError, PrintResult, RenderError};
pub use payload::{
    ClosingReport, CreditTerms, KitchenOrder, Modifier, OrderItem, Payment, SaleItem, SaleTicket,
    StoreInfo, TaxLine, Tender, TicketPayload,
};
pub use queue::{JobReceipt, PrintQueue, QueueSettings, QueueStatus};
pub use renderer::{PAPER_WIDTH, TicketRenderer};
pub use service::{BatchItem, BatchResponse, PrintService, SubmitResponse};
pub use translations::Translations;
pub use types::{Job, JobId, JobOutcome, TicketType};
pub use watcher::{PrinterStateWatcher, StateCallback};
