//! Win32 spooler backend
//!
//! Uses the Win32 API to enumerate installed printers and print through
//! their drivers with the RAW datatype.

use core::ffi::c_void;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{instrument, warn};
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, EnumPrintersW, GetDefaultPrinterW,
    GetPrinterW, OpenPrinterW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_HANDLE,
    PRINTER_INFO_2W, PRINTER_STATUS_DOOR_OPEN, PRINTER_STATUS_ERROR, PRINTER_STATUS_NOT_AVAILABLE,
    PRINTER_STATUS_OFFLINE, PRINTER_STATUS_PAPER_JAM, PRINTER_STATUS_PAPER_OUT,
    PRINTER_STATUS_PAUSED, PRINTER_STATUS_PRINTING, PRINTER_STATUS_USER_INTERVENTION,
    StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use windows::core::{PCWSTR, PWSTR};

use crate::device::{PrinterInfo, SpoolerState, StatusSignals};
use crate::error::{PrinterError, PrinterResult};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn pwstr_to_string(p: PWSTR) -> String {
    if p.is_null() {
        return String::new();
    }
    unsafe { p.to_string().unwrap_or_default() }
}

/// Check if a port is a virtual printer port
fn is_virtual_port(port: &str) -> bool {
    let p = port.to_lowercase();
    p == "file:"
        || p == "portprompt:"
        || p == "xpsport:"
        || p.starts_with("onenote")
        || p == "nul:"
        || p.starts_with("wfsport:")
        || p.contains("pdf")
}

/// Map `PRINTER_INFO_2` status bits to classification signals
fn signals_from_status(status: u32, jobs: u32, port: &str) -> StatusSignals {
    let error_bits = PRINTER_STATUS_ERROR
        | PRINTER_STATUS_PAPER_JAM
        | PRINTER_STATUS_PAPER_OUT
        | PRINTER_STATUS_DOOR_OPEN
        | PRINTER_STATUS_USER_INTERVENTION;
    let stopped_bits = PRINTER_STATUS_OFFLINE | PRINTER_STATUS_PAUSED | PRINTER_STATUS_NOT_AVAILABLE;

    let state = if status & error_bits != 0 {
        SpoolerState::Error
    } else if status & stopped_bits != 0 {
        SpoolerState::Stopped
    } else if status & PRINTER_STATUS_PRINTING != 0 {
        SpoolerState::Processing
    } else {
        SpoolerState::Idle
    };

    StatusSignals {
        state,
        has_pending_jobs: jobs > 0,
        link: port.to_uppercase().starts_with("USB").then_some(true),
    }
}

/// Get the default printer name
fn default_printer() -> Option<String> {
    unsafe {
        let mut needed: u32 = 0;
        let _ = GetDefaultPrinterW(None, &mut needed);
        if needed == 0 {
            return None;
        }

        let mut buf: Vec<u16> = vec![0; needed as usize];
        if !GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed).as_bool() {
            return None;
        }
        PWSTR(buf.as_mut_ptr()).to_string().ok()
    }
}

/// List installed printers (virtual printers filtered out)
fn list_printers() -> PrinterResult<Vec<PrinterInfo>> {
    let default = default_printer();

    unsafe {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        let _ = EnumPrintersW(flags, None, 2, None, &mut needed, &mut returned);
        if needed == 0 {
            return Ok(Vec::new());
        }

        let mut buf: Vec<u8> = vec![0; needed as usize];
        EnumPrintersW(flags, None, 2, Some(buf.as_mut_slice()), &mut needed, &mut returned)
            .map_err(|e| PrinterError::WindowsPrinter(format!("EnumPrintersW failed: {}", e)))?;

        let ptr = buf.as_ptr() as *const PRINTER_INFO_2W;
        let slice = std::slice::from_raw_parts(ptr, returned as usize);

        let mut result = Vec::with_capacity(slice.len());
        for info in slice {
            let name = pwstr_to_string(info.pPrinterName);
            if name.is_empty() {
                continue;
            }
            let port = pwstr_to_string(info.pPortName);
            if is_virtual_port(&port) {
                continue;
            }

            let signals = signals_from_status(info.Status, info.cJobs, &port);
            let is_default = default.as_deref() == Some(name.as_str());
            let port = (!port.is_empty()).then_some(port);
            result.push(PrinterInfo::from_signals(name, signals, is_default, port));
        }
        Ok(result)
    }
}

/// Status bits and port of one printer
fn query_printer(name: &str) -> PrinterResult<(u32, String)> {
    unsafe {
        let mut handle = PRINTER_HANDLE::default();
        let name_w = to_wide(name);
        OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
            .map_err(|_| PrinterError::NotFound(name.to_string()))?;

        let mut needed: u32 = 0;
        let _ = GetPrinterW(handle, 2, None, &mut needed);

        let mut result = Err(PrinterError::WindowsPrinter("GetPrinterW failed".to_string()));
        if needed > 0 {
            let mut buf: Vec<u8> = vec![0; needed as usize];
            if GetPrinterW(handle, 2, Some(buf.as_mut_slice()), &mut needed).is_ok() {
                let info = &*(buf.as_ptr() as *const PRINTER_INFO_2W);
                result = Ok((info.Status, pwstr_to_string(info.pPortName)));
            }
        }

        let _ = ClosePrinter(handle);
        result
    }
}

/// Check if printer is online (includes network port detection for IP printers)
fn check_online(name: &str) -> PrinterResult<bool> {
    let (status, port) = query_printer(name)?;

    let offline_bits = PRINTER_STATUS_OFFLINE
        | PRINTER_STATUS_PAUSED
        | PRINTER_STATUS_NOT_AVAILABLE
        | PRINTER_STATUS_ERROR;
    if status & offline_bits != 0 {
        return Ok(false);
    }

    // For IP-based printers (IP_xxx port), try TCP connection
    let lower = port.to_lowercase();
    if let Some(host) = lower.strip_prefix("ip_") {
        let host = host.split(',').next().unwrap_or(host);
        let timeout = Duration::from_millis(400);
        if let Ok(mut iter) = format!("{}:9100", host).to_socket_addrs()
            && let Some(addr) = iter.next()
        {
            return Ok(TcpStream::connect_timeout(&addr, timeout).is_ok());
        }
        return Ok(false);
    }

    Ok(true)
}

fn write_raw(name: &str, data: &[u8]) -> PrinterResult<()> {
    unsafe {
        let mut handle = PRINTER_HANDLE::default();
        let name_w = to_wide(name);
        OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
            .map_err(|_| PrinterError::NotFound(name.to_string()))?;

        let doc_name_w = to_wide("POS Ticket");
        let datatype_w = to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
            let _ = ClosePrinter(handle);
            return Err(PrinterError::WindowsPrinter("StartDocPrinter failed".to_string()));
        }

        if !StartPagePrinter(handle).as_bool() {
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);
            return Err(PrinterError::WindowsPrinter("StartPagePrinter failed".to_string()));
        }

        let mut written: u32 = 0;
        let ok = WritePrinter(
            handle,
            data.as_ptr() as *const c_void,
            data.len() as u32,
            &mut written,
        );

        let _ = EndPagePrinter(handle);
        let _ = EndDocPrinter(handle);
        let _ = ClosePrinter(handle);

        if !ok.as_bool() {
            return Err(PrinterError::WindowsPrinter("WritePrinter failed".to_string()));
        }
        if written != data.len() as u32 {
            return Err(PrinterError::WindowsPrinter("Incomplete write".to_string()));
        }
        Ok(())
    }
}

// Spooler calls block, run them off the async workers

#[instrument]
pub(super) async fn is_reachable(printer_name: &str) -> bool {
    let name = printer_name.to_string();
    match tokio::task::spawn_blocking(move || check_online(&name)).await {
        Ok(Ok(online)) => online,
        Ok(Err(e)) => {
            warn!(error = %e, "printer status query failed");
            false
        }
        Err(e) => {
            warn!(error = %e, "printer status task failed");
            false
        }
    }
}

#[instrument]
pub(super) async fn enumerate() -> PrinterResult<Vec<PrinterInfo>> {
    tokio::task::spawn_blocking(list_printers)
        .await
        .map_err(|e| PrinterError::WindowsPrinter(format!("Task join failed: {}", e)))?
}

#[instrument(skip(data), fields(data_len = data.len()))]
pub(super) async fn dispatch(printer_name: &str, data: &[u8]) -> PrinterResult<()> {
    let name = printer_name.to_string();
    let data = data.to_vec();
    tokio::task::spawn_blocking(move || write_raw(&name, &data))
        .await
        .map_err(|e| PrinterError::WindowsPrinter(format!("Task join failed: {}", e)))?
}
