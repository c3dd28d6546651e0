use crate::config::Config;
use crate::display::{format_state, print_info, print_json, Table};
use crate::Result;
use subnetter_api::Subnetter;
use subnetter_utils::apps_table_name;

/// Handle the apps command: application stacks with subnet and status
pub async fn handle(config: &Config, json: bool) -> Result<()> {
    let sdk = Subnetter::connect(config, config.address_pool()).await?;
    let apps = sdk.apps().await?;

    if json {
        return print_json(&apps);
    }

    if let Some(cluster) = config.cluster_name() {
        print_info(&format!(
            "Cluster {} (apps table {})",
            cluster,
            apps_table_name(&cluster)
        ));
    }

    if apps.is_empty() {
        println!("No application stacks found.");
        return Ok(());
    }

    let mut table = Table::new(&["NAME", "SUBNET", "STATUS"]);
    for app in &apps {
        table.add_row(vec![
            app.name.clone(),
            app.subnet
                .map(|block| block.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_state(app.status),
        ]);
    }
    table.print();

    Ok(())
}
