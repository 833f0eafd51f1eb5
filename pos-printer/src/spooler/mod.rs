//! System print spooler access
//!
//! [`SystemSpooler`] routes each printer name to a backend:
//! - `host:port` names go straight to the printer over TCP
//! - everything else goes to the OS spooler (CUPS on Unix, Win32 on Windows)

use async_trait::async_trait;
use tracing::instrument;

use crate::device::{DeviceProbe, DispatchAdapter, PrinterInfo};
use crate::error::PrinterResult;
use crate::network::NetworkPrinter;

#[cfg(unix)]
mod cups;
#[cfg(unix)]
use cups as platform;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
use win32 as platform;

#[cfg(not(any(unix, windows)))]
mod platform {
    use crate::device::PrinterInfo;
    use crate::error::{PrinterError, PrinterResult};

    pub(super) async fn is_reachable(_printer_name: &str) -> bool {
        false
    }

    pub(super) async fn enumerate() -> PrinterResult<Vec<PrinterInfo>> {
        Err(PrinterError::Unsupported)
    }

    pub(super) async fn dispatch(_printer_name: &str, _data: &[u8]) -> PrinterResult<()> {
        Err(PrinterError::Unsupported)
    }
}

/// Probe and dispatch through the operating system
#[derive(Debug, Clone, Default)]
pub struct SystemSpooler;

impl SystemSpooler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceProbe for SystemSpooler {
    #[instrument(skip(self))]
    async fn is_reachable(&self, printer_name: &str) -> bool {
        if let Some(printer) = NetworkPrinter::from_target(printer_name) {
            return printer.is_online().await;
        }
        platform::is_reachable(printer_name).await
    }

    async fn enumerate(&self) -> PrinterResult<Vec<PrinterInfo>> {
        platform::enumerate().await
    }
}

#[async_trait]
impl DispatchAdapter for SystemSpooler {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn dispatch(&self, printer_name: &str, data: &[u8]) -> PrinterResult<()> {
        if let Some(printer) = NetworkPrinter::from_target(printer_name) {
            return printer.print(data).await;
        }
        platform::dispatch(printer_name, data).await
    }
}
