use crate::errors::{ParseError, Result, UtilsError};
use subnetter_core::{AddressBlock, BaseNetwork, MAX_DIVISIONS};

/// Trait for parsing operator input
pub trait Parser {
    type Output;

    fn parse(&self, input: &str) -> Result<Self::Output>;
}

/// Address block parser
pub struct AddressBlockParser;

impl Parser for AddressBlockParser {
    type Output = AddressBlock;

    /// Accepts "10.0.5.0/24", or a bare network address with the /24 implied
    fn parse(&self, input: &str) -> Result<Self::Output> {
        let input = input.trim();
        let block = if input.contains('/') {
            input.parse::<AddressBlock>()?
        } else {
            format!("{}/{}", input, AddressBlock::PREFIX_LEN).parse::<AddressBlock>()?
        };
        Ok(block)
    }
}

/// Base network parser
pub struct BaseNetworkParser;

impl Parser for BaseNetworkParser {
    type Output = BaseNetwork;

    fn parse(&self, input: &str) -> Result<Self::Output> {
        Ok(input.trim().parse::<BaseNetwork>()?)
    }
}

/// Division count parser, bounded by `MAX_DIVISIONS`
pub struct DivisionCountParser;

impl Parser for DivisionCountParser {
    type Output = usize;

    fn parse(&self, input: &str) -> Result<Self::Output> {
        let count = input.trim().parse::<usize>().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid division count: {}", input))
        })?;

        if count == 0 || count > MAX_DIVISIONS {
            return Err(UtilsError::Parse(ParseError::InvalidValue(format!(
                "Division count must be between 1 and {}",
                MAX_DIVISIONS
            ))));
        }

        Ok(count)
    }
}

// Convenience functions
pub fn parse_address_block(input: &str) -> Result<AddressBlock> {
    AddressBlockParser.parse(input)
}

pub fn parse_base_network(input: &str) -> Result<BaseNetwork> {
    BaseNetworkParser.parse(input)
}

pub fn parse_division_count(input: &str) -> Result<usize> {
    DivisionCountParser.parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_block_parsing() {
        let parser = AddressBlockParser;

        let block = parser.parse("10.0.5.0/24").unwrap();
        assert_eq!(block.to_string(), "10.0.5.0/24");
        assert_eq!(parser.parse(" 10.0.5.0 ").unwrap(), block);

        assert!(parser.parse("10.0.5.7").is_err());
        assert!(parser.parse("10.0.5.0/16").is_err());
        assert!(matches!(parser.parse("garbage"), Err(UtilsError::Core(_))));
    }

    #[test]
    fn test_base_network_parsing() {
        assert_eq!(
            parse_base_network("192.168.0.0/16").unwrap().to_string(),
            "192.168.0.0/16"
        );
        assert!(parse_base_network("192.168.1.0/16").is_err());
    }

    #[test]
    fn test_division_count_parsing() {
        assert_eq!(parse_division_count("1").unwrap(), 1);
        assert_eq!(parse_division_count("4").unwrap(), 4);

        assert!(parse_division_count("0").is_err());
        assert!(parse_division_count("5").is_err());
        assert!(parse_division_count("two").is_err());
    }
}
