//! Printer discovery model and the probe / dispatch seams

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PrinterResult;

/// Printer state as shown to POS terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrinterStatus {
    Connected,
    Printing,
    Inactive,
    Disconnected,
    Error,
    Unknown,
}

/// Queue state reported by the spooler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoolerState {
    Idle,
    Processing,
    /// Stopped, paused, offline or disabled
    Stopped,
    Error,
    Unrecognized,
}

/// Raw signals a backend gathers for one printer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSignals {
    pub state: SpoolerState,
    pub has_pending_jobs: bool,
    /// Physical link hint, `None` when the backend cannot tell
    pub link: Option<bool>,
}

impl PrinterStatus {
    /// Derive the display status from spooler signals
    pub fn classify(signals: StatusSignals) -> Self {
        match signals.state {
            SpoolerState::Error => return PrinterStatus::Error,
            SpoolerState::Unrecognized => return PrinterStatus::Unknown,
            _ => {}
        }
        if signals.state == SpoolerState::Processing || signals.has_pending_jobs {
            return PrinterStatus::Printing;
        }
        if signals.state == SpoolerState::Stopped {
            return PrinterStatus::Inactive;
        }
        if signals.link == Some(false) {
            return PrinterStatus::Disconnected;
        }
        PrinterStatus::Connected
    }
}

/// One printer known to the system spooler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub name: String,
    pub status: PrinterStatus,
    pub is_default: bool,
    pub port: Option<String>,
    pub physically_connected: bool,
}

impl PrinterInfo {
    /// Build from spooler signals, classifying the status
    pub fn from_signals(
        name: impl Into<String>,
        signals: StatusSignals,
        is_default: bool,
        port: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: PrinterStatus::classify(signals),
            is_default,
            port,
            physically_connected: signals
                .link
                .unwrap_or(signals.state != SpoolerState::Stopped),
        }
    }
}

/// Answers "can this printer take a job right now" and lists printers
#[async_trait]
pub trait DeviceProbe: Send + Sync {
    /// Unknown and offline printers both report `false`
    async fn is_reachable(&self, printer_name: &str) -> bool;

    /// All printers the spooler knows, classified
    async fn enumerate(&self) -> PrinterResult<Vec<PrinterInfo>>;
}

/// Sends a finished byte stream to a named printer, one attempt
#[async_trait]
pub trait DispatchAdapter: Send + Sync {
    async fn dispatch(&self, printer_name: &str, data: &[u8]) -> PrinterResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(state: SpoolerState, has_pending_jobs: bool, link: Option<bool>) -> StatusSignals {
        StatusSignals {
            state,
            has_pending_jobs,
            link,
        }
    }

    #[test]
    fn test_classify_table() {
        use PrinterStatus::*;
        use SpoolerState as S;

        let cases = [
            (signals(S::Error, true, Some(true)), Error),
            (signals(S::Unrecognized, false, None), Unknown),
            (signals(S::Processing, false, None), Printing),
            (signals(S::Idle, true, Some(true)), Printing),
            (signals(S::Stopped, true, None), Printing),
            (signals(S::Stopped, false, Some(true)), Inactive),
            (signals(S::Idle, false, Some(false)), Disconnected),
            (signals(S::Idle, false, Some(true)), Connected),
            (signals(S::Idle, false, None), Connected),
        ];

        for (input, expected) in cases {
            assert_eq!(PrinterStatus::classify(input), expected, "{:?}", input);
        }
    }

    #[test]
    fn test_physically_connected_defaults_from_state() {
        let idle = PrinterInfo::from_signals("A", signals(SpoolerState::Idle, false, None), false, None);
        let stopped =
            PrinterInfo::from_signals("B", signals(SpoolerState::Stopped, false, None), false, None);
        let usb = PrinterInfo::from_signals(
            "C",
            signals(SpoolerState::Stopped, false, Some(true)),
            true,
            Some("USB001".into()),
        );

        assert!(idle.physically_connected);
        assert!(!stopped.physically_connected);
        assert!(usb.physically_connected);
    }

    #[test]
    fn test_printer_info_serializes_camel_case() {
        let info = PrinterInfo::from_signals(
            "EPSON",
            signals(SpoolerState::Idle, false, None),
            true,
            None,
        );
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["isDefault"], true);
        assert_eq!(json["physicallyConnected"], true);
        assert_eq!(json["status"], "Connected");
    }
}
