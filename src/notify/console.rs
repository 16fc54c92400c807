use anyhow::Result;

use super::Notifier;
use crate::report::Report;

/// Prints the report to stdout. Always on, so dry runs still show something.
pub struct ConsoleNotifier;

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, report: &Report) -> Result<()> {
        println!("\n{}\n", report.render_plain());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
