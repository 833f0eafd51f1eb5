//! Network printers (raw TCP port 9100)

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

use crate::error::{PrinterError, PrinterResult};

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrinterResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrinterError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Interpret a printer name as a network target, if it is one
    pub fn from_target(name: &str) -> Option<Self> {
        Self::from_addr(name.trim()).ok()
    }

    /// Send raw ESC/POS data to the printer
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    pub async fn print(&self, data: &[u8]) -> PrinterResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrinterError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrinterError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await.map_err(|e| {
            PrinterError::Io(std::io::Error::new(e.kind(), format!("Write failed: {}", e)))
        })?;
        stream.flush().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    /// Check if the printer accepts connections
    #[instrument(fields(addr = %self.addr))]
    pub async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}
