//! `nodestack --cleanup` — Remove every container of the stack.

use nodestack_runtime::StackManager;

pub async fn execute(manager: &StackManager) -> Result<(), Box<dyn std::error::Error>> {
    let removed = manager.cleanup().await?;
    tracing::info!(removed, "Cleanup done");
    Ok(())
}
