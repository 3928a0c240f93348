//! `nodestack --create-share` — Reset the shared-storage container.

use nodestack_runtime::StackManager;

pub async fn execute(
    manager: &StackManager,
    image: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = manager.create_share(image).await?;
    tracing::info!(
        container = %manager.config().share.name,
        id = %id,
        mount_point = %manager.config().share.mount_point,
        "Share container ready"
    );
    Ok(())
}
