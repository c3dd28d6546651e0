use crate::config::Config;
use crate::display::{print_json, Table};
use crate::Result;
use subnetter_api::CloudFormationStacks;

/// Handle the outputs command.
///
/// With a prefix only the matching values are printed, one per line.
pub async fn handle(config: &Config, stack: &str, prefix: Option<&str>, json: bool) -> Result<()> {
    let stacks = CloudFormationStacks::from_config(config).await?;

    if let Some(prefix) = prefix {
        let values = stacks.stack_output_list(stack, prefix).await?;
        if json {
            return print_json(&values);
        }
        for value in values {
            println!("{}", value);
        }
        return Ok(());
    }

    let outputs = stacks.stack_outputs(stack).await?;
    if json {
        return print_json(&outputs);
    }

    let mut table = Table::new(&["KEY", "VALUE"]);
    for (key, value) in outputs {
        table.add_row(vec![key, value]);
    }
    table.print();

    Ok(())
}
