//! # Text Rendering
//!
//! Pure string builders for command output. Nothing here touches storage.
//!
//! ```text
//! INR count
//!   ₹500 ×     7       ₹3,500  │    ₹20 ×     0           ₹0
//!   ₹200 ×     0           ₹0  │    ₹10 ×     3          ₹30
//!   ...
//! Notes & coins: 10
//! Total:         ₹3,530
//! ```

use chrono::Local;
use countnote_core::money::format_amount;
use countnote_core::{
    CalculationRecord, CountState, Currency, Denomination, DenominationValue, HistorySnapshot,
    Totals,
};

/// Separator between the two table columns.
const COLUMN_GAP: &str = "  │  ";

/// `₹500`, `$0.25`.
pub fn denomination_label(currency: Currency, value: DenominationValue) -> String {
    format!("{}{}", currency.symbol(), value)
}

fn cell(currency: Currency, denomination: &Denomination, counts: &CountState, hidden: bool) -> String {
    let count = counts.get(denomination.value);
    format!(
        "{:>6} ×{:>6} {:>12}",
        denomination_label(currency, denomination.value),
        count,
        format_amount(currency, denomination.value.times(count), hidden)
    )
}

/// Two-column table of every denomination with its count and line total,
/// followed by the aggregates.
pub fn render_counts(currency: Currency, counts: &CountState, hidden: bool) -> String {
    let (left, right) = currency.table().columns();
    let mut out = format!("{} count\n", currency);

    for (i, denomination) in left.iter().enumerate() {
        out.push_str("  ");
        out.push_str(&cell(currency, denomination, counts, hidden));
        if let Some(other) = right.get(i) {
            out.push_str(COLUMN_GAP);
            out.push_str(&cell(currency, other, counts, hidden));
        }
        out.push('\n');
    }

    out.push_str(&render_totals(currency, counts.totals(), hidden));
    out
}

/// The two aggregate lines.
pub fn render_totals(currency: Currency, totals: Totals, hidden: bool) -> String {
    format!(
        "Notes & coins: {}\nTotal:         {}\n",
        totals.total_count,
        format_amount(currency, totals.total_amount, hidden)
    )
}

/// One line of `history list`.
pub fn render_snapshot_line(snapshot: &HistorySnapshot, hidden: bool) -> String {
    let mut line = format!(
        "{}  {}  {:>5} items  {:>14}",
        snapshot.id,
        snapshot.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        snapshot.total_count,
        format_amount(snapshot.currency, snapshot.total_amount, hidden)
    );
    if let Some(ref note) = snapshot.note {
        line.push_str("  ");
        line.push_str(note);
    }
    line
}

/// `history show`: header plus the non-zero denominations, largest first.
pub fn render_snapshot_detail(snapshot: &HistorySnapshot, hidden: bool) -> String {
    let currency = snapshot.currency;
    let mut out = format!(
        "Snapshot {}\nSaved:    {}\nCurrency: {}\n",
        snapshot.id,
        snapshot.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        currency
    );
    if let Some(ref note) = snapshot.note {
        out.push_str(&format!("Note:     {}\n", note));
    }

    let lines = snapshot.denomination_counts.nonzero_descending();
    if lines.is_empty() {
        out.push_str("  (nothing counted)\n");
    }
    for (value, count) in lines {
        out.push_str(&format!(
            "  {:>6} ×{:>6} {:>12}\n",
            denomination_label(currency, value),
            count,
            format_amount(currency, value.times(count), hidden)
        ));
    }

    out.push_str(&render_totals(currency, snapshot.totals(), hidden));
    out
}

/// `12 × 3 = 36`.
pub fn render_calculation(record: &CalculationRecord) -> String {
    format!("{} = {}", record.expression, record.result)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn inr_counts() -> CountState {
        Currency::Inr
            .table()
            .values()
            .map(|value| match value.minor_units() {
                50_000 => (value, 7),
                1_000 => (value, 3),
                _ => (value, 0),
            })
            .collect()
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            denomination_label(Currency::Inr, DenominationValue::from_major(500)),
            "₹500"
        );
        assert_eq!(
            denomination_label(Currency::Usd, DenominationValue::from_minor(25)),
            "$0.25"
        );
    }

    #[test]
    fn test_counts_table() {
        let table = render_counts(Currency::Inr, &inr_counts(), false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "INR count");
        // 9 INR denominations split 5 + 4, then two total lines
        assert_eq!(lines.len(), 1 + 5 + 2);
        assert!(lines[1].contains("₹500 ×     7       ₹3,500"));
        assert!(lines[1].contains(COLUMN_GAP));
        assert!(!lines[5].contains(COLUMN_GAP));
        assert_eq!(lines[6], "Notes & coins: 10");
        assert_eq!(lines[7], "Total:         ₹3,530");
    }

    #[test]
    fn test_hidden_amounts_keep_counts() {
        let table = render_counts(Currency::Inr, &inr_counts(), true);
        assert!(!table.contains("₹3,530"));
        assert!(table.contains("••••••"));
        assert!(table.contains("Notes & coins: 10"));
    }

    #[test]
    fn test_snapshot_detail_lists_nonzero_largest_first() {
        let snapshot =
            HistorySnapshot::capture(Currency::Inr, inr_counts(), Some("close".to_string()));
        let detail = render_snapshot_detail(&snapshot, false);

        assert!(detail.contains("Note:     close"));
        let first = detail.find("₹500").unwrap();
        let second = detail.find("₹10 ").unwrap();
        assert!(first < second);
        assert!(!detail.contains("₹200"));
        assert!(detail.ends_with("Total:         ₹3,530\n"));
    }

    #[test]
    fn test_snapshot_line() {
        let snapshot = HistorySnapshot::capture(Currency::Usd, CountState::new(), None);
        let line = render_snapshot_line(&snapshot, false);
        assert!(line.starts_with(&snapshot.id));
        assert!(line.contains("0 items"));
        assert!(line.ends_with("$0.00"));
    }
}
