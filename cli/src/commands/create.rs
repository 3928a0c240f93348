//! `nodestack --create` — Recreate every node container.
//!
//! Prints the combined output of the first boot command per node when one
//! was given.

use nodestack_core::HostVolume;
use nodestack_runtime::{CreateOptions, StackManager};

pub async fn execute(
    manager: &StackManager,
    image: String,
    host_volumes: Vec<HostVolume>,
    command: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = CreateOptions {
        image,
        host_volumes,
        boot_command: command,
    };

    let results = manager.create_stack(&options).await?;

    for result in results {
        println!("{}:", result.container);
        print!("{}", result.output.output);
        if !result.output.output.is_empty() && !result.output.output.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
