//! CUPS backend (Linux, macOS)
//!
//! Drives the `lpstat` and `lp` command line tools. Commands run with
//! `LC_ALL=C` so their output is parseable regardless of the system locale.

use std::collections::{HashMap, HashSet};
use std::process::{Output, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::device::{PrinterInfo, SpoolerState, StatusSignals};
use crate::error::{PrinterError, PrinterResult};

const LPSTAT: &str = "lpstat";
const LP: &str = "lp";

/// CUPS queue names cannot contain spaces
pub(crate) fn queue_name(printer_name: &str) -> String {
    printer_name.trim().replace(' ', "_")
}

fn command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.env("LC_ALL", "C").env("LANG", "C").kill_on_drop(true);
    cmd
}

fn command_error(program: &str, args: &[&str], output: &Output) -> PrinterError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    PrinterError::Spooler {
        command: format!("{} {}", program, args.join(" ")),
        message: if stderr.is_empty() {
            format!("exit status {}", output.status)
        } else {
            stderr
        },
    }
}

async fn lpstat(args: &[&str]) -> PrinterResult<String> {
    let output = command(LPSTAT)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await?;
    if !output.status.success() {
        return Err(command_error(LPSTAT, args, &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[instrument]
pub(super) async fn is_reachable(printer_name: &str) -> bool {
    let queue = queue_name(printer_name);
    match lpstat(&["-p", &queue]).await {
        Ok(out) => parse_printers(&out)
            .into_iter()
            .any(|(name, state)| name == queue && accepts_jobs(state)),
        Err(e) => {
            debug!(error = %e, "printer not found by lpstat");
            false
        }
    }
}

fn accepts_jobs(state: SpoolerState) -> bool {
    !matches!(state, SpoolerState::Stopped | SpoolerState::Error)
}

#[instrument]
pub(super) async fn enumerate() -> PrinterResult<Vec<PrinterInfo>> {
    let printers = match lpstat(&["-p"]).await {
        Ok(out) => out,
        // lpstat exits non-zero when no queue is configured at all
        Err(PrinterError::Spooler { message, .. }) if message.contains("No destinations") => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    // Supplementary details, a failure here only loses precision
    let devices = lpstat(&["-v"]).await.unwrap_or_else(|e| {
        warn!(error = %e, "lpstat -v failed");
        String::new()
    });
    let default = lpstat(&["-d"]).await.unwrap_or_default();
    let jobs = lpstat(&["-o"]).await.unwrap_or_default();

    Ok(build_printer_list(&printers, &devices, &default, &jobs))
}

#[instrument(skip(data), fields(data_len = data.len()))]
pub(super) async fn dispatch(printer_name: &str, data: &[u8]) -> PrinterResult<()> {
    let queue = queue_name(printer_name);
    let args = ["-d", queue.as_str(), "-o", "raw"];

    let mut child = command(LP)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(data).await?;
        stdin.shutdown().await?;
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(command_error(LP, &args, &output));
    }

    debug!(
        response = %String::from_utf8_lossy(&output.stdout).trim(),
        "job accepted by CUPS"
    );
    Ok(())
}

// ============================================================================
// Output parsing
// ============================================================================

/// Parse `lpstat -p` lines: `printer NAME is idle.  enabled since ...`
///
/// Continuation lines (reasons, alerts) and anything unparsable are skipped.
pub(crate) fn parse_printers(output: &str) -> Vec<(String, SpoolerState)> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("printer ")?;
            let (name, status) = rest.split_once(' ')?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), parse_state(status)))
        })
        .collect()
}

fn parse_state(status: &str) -> SpoolerState {
    if status.contains("disabled") {
        SpoolerState::Stopped
    } else if status.contains("now printing") {
        SpoolerState::Processing
    } else if status.contains("is idle") {
        SpoolerState::Idle
    } else {
        SpoolerState::Unrecognized
    }
}

/// Parse `lpstat -v` lines: `device for NAME: URI`
pub(crate) fn parse_devices(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("device for ")?;
            let (name, uri) = rest.split_once(": ")?;
            Some((name.to_string(), uri.trim().to_string()))
        })
        .collect()
}

/// Parse `lpstat -d`: `system default destination: NAME`
pub(crate) fn parse_default(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.strip_prefix("system default destination: ")
            .map(|name| name.trim().to_string())
    })
}

/// Parse `lpstat -o` lines (`NAME-42  user  1024  date`) into queue names
pub(crate) fn parse_busy_queues(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| {
            let job_id = line.split_whitespace().next()?;
            let (queue, number) = job_id.rsplit_once('-')?;
            number.parse::<u32>().ok()?;
            Some(queue.to_string())
        })
        .collect()
}

fn link_hint(uri: Option<&String>) -> Option<bool> {
    match uri {
        Some(uri) if uri.starts_with("usb:") => Some(true),
        _ => None,
    }
}

pub(crate) fn build_printer_list(
    printers: &str,
    devices: &str,
    default: &str,
    jobs: &str,
) -> Vec<PrinterInfo> {
    let devices = parse_devices(devices);
    let default = parse_default(default);
    let busy = parse_busy_queues(jobs);

    parse_printers(printers)
        .into_iter()
        .map(|(name, state)| {
            let uri = devices.get(&name);
            let signals = StatusSignals {
                state,
                has_pending_jobs: busy.contains(&name),
                link: link_hint(uri),
            };
            let is_default = default.as_deref() == Some(name.as_str());
            PrinterInfo::from_signals(name, signals, is_default, uri.cloned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::PrinterStatus;

    const PRINTERS: &str = "\
printer EPSON_TM_T20 is idle.  enabled since Mon 01 Jan 2024 10:00:00 AM UTC
printer Cocina now printing Cocina-12.  enabled since Mon 01 Jan 2024 10:00:00 AM UTC
printer Barra disabled since Mon 01 Jan 2024 10:00:00 AM UTC -
\treason unknown
garbage line
printer Caja is being serviced
";

    const DEVICES: &str = "\
device for EPSON_TM_T20: usb://EPSON/TM-T20?serial=123
device for Cocina: socket://192.168.1.50:9100
device for Barra: ipp://barra.local/ipp/print
";

    #[test]
    fn test_queue_name_replaces_spaces() {
        assert_eq!(queue_name("Cocina Principal"), "Cocina_Principal");
        assert_eq!(queue_name("EPSON"), "EPSON");
    }

    #[test]
    fn test_parse_printers_skips_unparsable_lines() {
        let printers = parse_printers(PRINTERS);
        assert_eq!(
            printers,
            vec![
                ("EPSON_TM_T20".to_string(), SpoolerState::Idle),
                ("Cocina".to_string(), SpoolerState::Processing),
                ("Barra".to_string(), SpoolerState::Stopped),
                ("Caja".to_string(), SpoolerState::Unrecognized),
            ]
        );
    }

    #[test]
    fn test_parse_default() {
        assert_eq!(
            parse_default("system default destination: EPSON_TM_T20\n"),
            Some("EPSON_TM_T20".to_string())
        );
        assert_eq!(parse_default("no system default destination\n"), None);
    }

    #[test]
    fn test_parse_busy_queues() {
        let busy = parse_busy_queues(
            "Cocina-12   pos   1024   Mon 01 Jan 2024\nBar-Terraza-7 pos 10 Mon\nnot-a-job\n",
        );
        assert!(busy.contains("Cocina"));
        assert!(busy.contains("Bar-Terraza"));
        assert_eq!(busy.len(), 2);
    }

    #[test]
    fn test_build_printer_list() {
        let list = build_printer_list(
            PRINTERS,
            DEVICES,
            "system default destination: EPSON_TM_T20",
            "",
        );

        assert_eq!(list.len(), 4);

        let epson = &list[0];
        assert_eq!(epson.status, PrinterStatus::Connected);
        assert!(epson.is_default);
        assert!(epson.physically_connected);
        assert_eq!(epson.port.as_deref(), Some("usb://EPSON/TM-T20?serial=123"));

        assert_eq!(list[1].status, PrinterStatus::Printing);
        assert_eq!(list[2].status, PrinterStatus::Inactive);
        assert!(!list[2].physically_connected);
        assert_eq!(list[3].status, PrinterStatus::Unknown);
        assert_eq!(list[3].port, None);
    }

    #[test]
    fn test_pending_jobs_mark_printing() {
        let list = build_printer_list(
            "printer EPSON_TM_T20 is idle.  enabled since today\n",
            "",
            "",
            "EPSON_TM_T20-3  pos  512  today\n",
        );
        assert_eq!(list[0].status, PrinterStatus::Printing);
    }

    #[test]
    fn test_accepts_jobs() {
        assert!(accepts_jobs(SpoolerState::Idle));
        assert!(accepts_jobs(SpoolerState::Processing));
        assert!(!accepts_jobs(SpoolerState::Stopped));
    }
}
