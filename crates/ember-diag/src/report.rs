//! Rendering integrated quantities to the console and the data log.
//!
//! # Console
//!
//! A blank line, then one `TIME= <t> <LABEL> = <value>` line per entry of
//! [`IntegratedQuantities::console_entries`]. Labels shorter than eleven
//! characters are padded so the `=` signs line up.
//!
//! # Data log
//!
//! A header of fourteen-character labels, written only when the time is
//! exactly zero, then one row per call with every value right-aligned in
//! fourteen characters.

use crate::error::DiagnosticsError;
use crate::format::{column, general, PRECISION};
use crate::quantities::IntegratedQuantities;
use crate::sink::LogSink;

/// Data-log column labels, each exactly fourteen characters.
pub const DATA_LOG_LABELS: [&str; 10] = [
    "      time    ",
    "         mass ",
    "         xmom ",
    "         ymom ",
    "         zmom ",
    "        rho_K ",
    "        rho_e ",
    "        rho_E ",
    "  flame width ",
    "  flame speed ",
];

/// The data-log header line.
pub fn data_log_header() -> String {
    let mut line = DATA_LOG_LABELS.concat();
    line.push('\n');
    line
}

/// One data-log row for `q`.
pub fn data_log_row(q: &IntegratedQuantities) -> String {
    let mut line = column(q.time);
    for v in q.data_log_values() {
        line.push_str(&column(v));
    }
    line.push('\n');
    line
}

/// The console block for `q`.
pub fn console_block(q: &IntegratedQuantities) -> String {
    let time = general(q.time, PRECISION);
    let mut out = String::from("\n");
    for (label, value) in q.console_entries() {
        out.push_str(&format!(
            "TIME= {time} {label:<11} = {}\n",
            general(value, PRECISION)
        ));
    }
    out
}

/// Writes integrated quantities to a console sink and an optional data
/// log. Lives on the I/O rank only.
pub struct DiagnosticsReporter {
    console: Box<dyn LogSink>,
    data_log: Option<Box<dyn LogSink>>,
}

impl DiagnosticsReporter {
    /// A reporter writing to `console` and, if given, `data_log`.
    pub fn new(console: Box<dyn LogSink>, data_log: Option<Box<dyn LogSink>>) -> Self {
        Self { console, data_log }
    }

    /// Whether a data log is attached.
    pub fn has_data_log(&self) -> bool {
        self.data_log.is_some()
    }

    /// Write the console block and, when attached, the data-log row.
    pub fn report(&mut self, q: &IntegratedQuantities) -> Result<(), DiagnosticsError> {
        self.console.append(&console_block(q))?;
        if let Some(log) = self.data_log.as_mut() {
            if q.time == 0.0 {
                log.append(&data_log_header())?;
            }
            log.append(&data_log_row(q))?;
        }
        Ok(())
    }
}
