//! Formatting helpers for listings and run summaries.

use std::time::Duration;

use crate::invoice::{DATE_FORMAT, InvoiceRecord};

/// Formats a byte count as a human-readable string (B, KB, MB, GB).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{b} B"),
    }
}

/// Formats a duration as a human-readable string (e.g. "5.0s", "1m 05s").
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{:01}s", secs, d.subsec_millis() / 100)
    }
}

/// One `--list-invoices` line: `date | provider | issuer | invoice id`.
#[must_use]
pub fn format_invoice_line(invoice: &InvoiceRecord) -> String {
    format!(
        "{} | {} | {} | {}",
        invoice.date_of_issue.format(DATE_FORMAT),
        invoice.provider,
        invoice.issuer_id,
        invoice.invoice_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(1_073_741_823), "1024.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
        assert_eq!(format_bytes(5 * 1_073_741_824), "5.00 GB");
    }

    #[test]
    fn format_duration_units() {
        assert_eq!(format_duration(Duration::ZERO), "0.0s");
        assert_eq!(format_duration(Duration::from_millis(500)), "0.5s");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_duration(Duration::from_secs(3665)), "61m 05s");
    }

    #[test]
    fn invoice_line() {
        let invoice = InvoiceRecord {
            provider: "Water Corp".to_string(),
            issuer_id: "123456".to_string(),
            invoice_id: "2024/001".to_string(),
            date_of_issue: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            row: 3,
        };
        assert_eq!(
            format_invoice_line(&invoice),
            "2024-03-05 | Water Corp | 123456 | 2024/001"
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn format_bytes_never_panics(bytes in 0u64..u64::MAX) {
                let _ = format_bytes(bytes);
            }

            #[test]
            fn format_duration_never_panics(millis in 0u64..1_000_000_000) {
                let _ = format_duration(Duration::from_millis(millis));
            }
        }
    }
}
