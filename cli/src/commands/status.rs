//! Stack status table, printed before and after every change.

use nodestack_runtime::StackManager;

use crate::output;

pub async fn execute(
    manager: &StackManager,
    heading: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = manager.status().await?;
    println!("{heading}");
    println!("{}", output::status_table(&rows));
    Ok(())
}
