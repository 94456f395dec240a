//! Output sink for user-visible reporting.
//!
//! Commands report through these helpers and return `Result`; the dispatch
//! boundary in `main` decides the process exit code. Nothing in here
//! terminates the process.

use serde::Serialize;

/// Print a success line.
pub fn success(message: &str) {
    println!("✓ {}", message);
}

/// Print an informational line.
pub fn info(message: &str) {
    println!("{}", message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    eprintln!("✗ {}", message);
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => error(&format!("Failed to render JSON output: {}", e)),
    }
}

/// Print a simple left-aligned text table.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<1$}", cell, widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!(
        "{}",
        render(headers.iter().map(|h| h.to_string()).collect())
    );
    println!(
        "{}",
        render(widths.iter().map(|w| "-".repeat(*w)).collect())
    );
    for row in rows {
        println!("{}", render(row.clone()));
    }
}

#[cfg(test)]
mod tests {
    // Table layout is exercised indirectly by command tests; the helpers
    // here are print-only. Keep a smoke test for width handling.
    use super::table;

    #[test]
    fn test_table_handles_ragged_rows() {
        table(
            &["A", "Long header"],
            &[
                vec!["x".to_string()],
                vec!["yy".to_string(), "z".to_string(), "extra".to_string()],
            ],
        );
    }
}
