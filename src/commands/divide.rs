use crate::display::{print_json, Table};
use crate::Result;
use log::debug;
use serde::Serialize;
use std::net::Ipv4Addr;
use subnetter_core::{divide_block, AddressBlock, SubBlock};

#[derive(Debug, Serialize)]
struct SubBlockRow {
    index: u8,
    cidr: SubBlock,
    first: Ipv4Addr,
    last: Ipv4Addr,
}

fn rows(block: &AddressBlock, count: usize) -> Result<Vec<SubBlockRow>> {
    let rows = divide_block(block, count)?
        .into_iter()
        .map(|sub| {
            let range = sub.host_range();
            SubBlockRow {
                index: sub.index(),
                cidr: sub,
                first: Ipv4Addr::from(*range.start()),
                last: Ipv4Addr::from(*range.end()),
            }
        })
        .collect();
    Ok(rows)
}

/// Handle the divide command
pub fn handle(block: &AddressBlock, count: usize, json: bool) -> Result<()> {
    debug!("Dividing {} into {} ranges", block, count);
    let rows = rows(block, count)?;

    if json {
        return print_json(&rows);
    }

    let mut table = Table::new(&["#", "CIDR", "FIRST", "LAST"]);
    for row in &rows {
        table.add_row(vec![
            row.index.to_string(),
            row.cidr.to_string(),
            row.first.to_string(),
            row.last.to_string(),
        ]);
    }
    table.print();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let block: AddressBlock = "10.0.5.0/24".parse().unwrap();
        let rows = rows(&block, 2).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cidr.to_string(), "10.0.5.32/27");
        assert_eq!(rows[1].first, Ipv4Addr::new(10, 0, 5, 32));
        assert_eq!(rows[1].last, Ipv4Addr::new(10, 0, 5, 63));
    }

    #[test]
    fn test_too_many_divisions() {
        let block: AddressBlock = "10.0.5.0/24".parse().unwrap();
        assert!(matches!(
            rows(&block, 8),
            Err(crate::CliError::Core(subnetter_core::CoreError::TooManyDivisions { .. }))
        ));
    }
}
