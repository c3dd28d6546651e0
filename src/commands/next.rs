use crate::config::Config;
use crate::Result;
use log::debug;
use serde_json::json;
use subnetter_api::Subnetter;

/// Handle the next command: print the lowest free application subnet.
///
/// Nothing is reserved. The block only becomes taken once a stack tagged
/// with it exists, so two runs before that will print the same block.
pub async fn handle(config: &Config, json: bool) -> Result<()> {
    let sdk = Subnetter::connect(config, config.address_pool()).await?;
    debug!("Scanning {} for a free block", sdk.pool().base());

    let block = sdk.next_available_block().await?;

    if json {
        crate::display::print_json(&json!({ "subnet": block }))?;
    } else {
        println!("{}", block);
    }

    Ok(())
}
