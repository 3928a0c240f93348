//! `nodestack --dns-update` — Rewrite /etc/hosts in every running node.

use nodestack_runtime::StackManager;

pub async fn execute(manager: &StackManager) -> Result<(), Box<dyn std::error::Error>> {
    let updated = manager.update_hosts().await?;
    if updated.is_empty() {
        tracing::warn!("No running node containers, hosts tables left untouched");
    } else {
        tracing::info!(nodes = %updated.join(","), "Hosts tables updated");
    }
    Ok(())
}
