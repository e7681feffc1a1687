//! Text rendering of errors for terminal output.

/// Render an error followed by its full cause chain, one cause per line
pub fn error_report(err: &anyhow::Error) -> String {
    let mut report = err.to_string();
    for cause in err.chain().skip(1) {
        report.push_str("\n  Caused by: ");
        report.push_str(&cause.to_string());
    }
    report
}
