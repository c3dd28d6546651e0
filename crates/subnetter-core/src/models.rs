use crate::errors::CoreError;
use crate::status::DiagnosticSink;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Tag key describing what kind of stack this is
pub const TYPE_TAG: &str = "type";
/// Value of the `type` tag on application stacks
pub const APP_TYPE: &str = "app";
/// Tag key holding the application's address block
pub const SUBNET_TAG: &str = "subnet";

// "a.b.c.d/len" -> (address, len)
fn split_cidr(input: &str) -> Option<(Ipv4Addr, u8)> {
    let (address, prefix) = input.trim().split_once('/')?;
    Some((address.parse().ok()?, prefix.parse().ok()?))
}

fn span(network: Ipv4Addr, size: u32) -> RangeInclusive<u32> {
    let start = u32::from(network);
    start..=start + (size - 1)
}

/// The /16 network that application blocks are carved out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseNetwork {
    network: Ipv4Addr,
}

impl BaseNetwork {
    pub const PREFIX_LEN: u8 = 16;

    pub fn new(first: u8, second: u8) -> Self {
        Self {
            network: Ipv4Addr::new(first, second, 0, 0),
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// The /24 whose third octet is `index`
    pub fn block(&self, index: u8) -> AddressBlock {
        let [a, b, _, _] = self.network.octets();
        AddressBlock {
            network: Ipv4Addr::new(a, b, index, 0),
        }
    }

    pub fn contains(&self, block: &AddressBlock) -> bool {
        self.network.octets()[..2] == block.network.octets()[..2]
    }
}

impl Default for BaseNetwork {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

impl fmt::Display for BaseNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, Self::PREFIX_LEN)
    }
}

impl FromStr for BaseNetwork {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidBaseNetwork(format!("'{}' is not an a.b.0.0/16 range", s));

        let (network, prefix) = split_cidr(s).ok_or_else(invalid)?;
        let [_, _, third, fourth] = network.octets();
        if prefix != Self::PREFIX_LEN || third != 0 || fourth != 0 {
            return Err(invalid());
        }

        Ok(Self { network })
    }
}

impl TryFrom<String> for BaseNetwork {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BaseNetwork> for String {
    fn from(base: BaseNetwork) -> Self {
        base.to_string()
    }
}

/// A /24 assigned to exactly one application, e.g. `10.0.5.0/24`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AddressBlock {
    network: Ipv4Addr,
}

impl AddressBlock {
    pub const PREFIX_LEN: u8 = 24;
    pub const SIZE: u32 = 256;

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Third octet, the block's position in its pool
    pub fn index(&self) -> u8 {
        self.network.octets()[2]
    }

    pub fn host_range(&self) -> RangeInclusive<u32> {
        span(self.network, Self::SIZE)
    }

    pub(crate) fn sub_block(&self, index: u8) -> SubBlock {
        let [a, b, c, _] = self.network.octets();
        SubBlock {
            network: Ipv4Addr::new(a, b, c, index * SubBlock::SIZE as u8),
            index,
        }
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, Self::PREFIX_LEN)
    }
}

impl FromStr for AddressBlock {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidBlock(format!("'{}' is not an a.b.c.0/24 block", s));

        let (network, prefix) = split_cidr(s).ok_or_else(invalid)?;
        if prefix != Self::PREFIX_LEN || network.octets()[3] != 0 {
            return Err(invalid());
        }

        Ok(Self { network })
    }
}

impl TryFrom<String> for AddressBlock {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AddressBlock> for String {
    fn from(block: AddressBlock) -> Self {
        block.to_string()
    }
}

/// One /27 placement range inside an application block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct SubBlock {
    network: Ipv4Addr,
    index: u8,
}

impl SubBlock {
    pub const PREFIX_LEN: u8 = 27;
    pub const SIZE: u32 = 32;

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn host_range(&self) -> RangeInclusive<u32> {
        span(self.network, Self::SIZE)
    }
}

impl fmt::Display for SubBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, Self::PREFIX_LEN)
    }
}

impl From<SubBlock> for String {
    fn from(block: SubBlock) -> Self {
        block.to_string()
    }
}

/// Canonical stack lifecycle state shown to the rest of the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Creating,
    Running,
    Deleting,
    Rollback,
    Failed,
    Unknown,
}

impl LifecycleState {
    /// Look up a CloudFormation stack status. `None` for anything unmapped.
    ///
    /// `DELETE_FAILED` maps to `Running`: the stack is still live.
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "CREATE_IN_PROGRESS" => Some(Self::Creating),
            "CREATE_COMPLETE" => Some(Self::Running),
            "DELETE_FAILED" => Some(Self::Running),
            "DELETE_IN_PROGRESS" => Some(Self::Deleting),
            "ROLLBACK_IN_PROGRESS" => Some(Self::Rollback),
            "ROLLBACK_COMPLETE" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "creating",
            Self::Running => "running",
            Self::Deleting => "deleting",
            Self::Rollback => "rollback",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-neutral view of one provisioned stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    pub name: String,
    pub status: String, // Raw provider status, e.g. "CREATE_COMPLETE"
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

impl StackSummary {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn is_app(&self) -> bool {
        self.tags.get(TYPE_TAG).map(String::as_str) == Some(APP_TYPE)
    }

    pub fn allocation(&self) -> Option<AllocationRecord> {
        AllocationRecord::from_tags(&self.name, &self.tags)
    }

    pub fn lifecycle(&self, sink: &dyn DiagnosticSink) -> LifecycleState {
        crate::status::normalize(&self.status, sink)
    }
}

/// An application's claim on an address block.
///
/// Lives only as tags on the application's stack; created with the stack and
/// gone when the stack is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub app: String,
    pub block: AddressBlock,
}

impl AllocationRecord {
    pub fn new(app: impl Into<String>, block: AddressBlock) -> Self {
        Self {
            app: app.into(),
            block,
        }
    }

    /// Tags to attach when creating the application's stack
    pub fn tags(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (TYPE_TAG.to_string(), APP_TYPE.to_string()),
            (SUBNET_TAG.to_string(), self.block.to_string()),
        ])
    }

    pub fn from_tags(app: &str, tags: &BTreeMap<String, String>) -> Option<Self> {
        if tags.get(TYPE_TAG).map(String::as_str) != Some(APP_TYPE) {
            return None;
        }
        let block = tags.get(SUBNET_TAG)?.parse().ok()?;
        Some(Self::new(app, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_block() {
        let block: AddressBlock = "10.0.5.0/24".parse().unwrap();
        assert_eq!(block.index(), 5);
        assert_eq!(block.to_string(), "10.0.5.0/24");

        assert!("10.0.5.0/27".parse::<AddressBlock>().is_err());
        assert!("10.0.5.1/24".parse::<AddressBlock>().is_err());
        assert!("10.0.256.0/24".parse::<AddressBlock>().is_err());
        assert!("10.0.5.0".parse::<AddressBlock>().is_err());
        assert!("".parse::<AddressBlock>().is_err());
    }

    #[test]
    fn test_parse_base_network() {
        let base: BaseNetwork = "172.16.0.0/16".parse().unwrap();
        assert_eq!(base.to_string(), "172.16.0.0/16");
        assert_eq!(base.block(7).to_string(), "172.16.7.0/24");
        assert_eq!(BaseNetwork::default().to_string(), "10.0.0.0/16");

        assert!("10.0.1.0/16".parse::<BaseNetwork>().is_err());
        assert!("10.0.0.0/8".parse::<BaseNetwork>().is_err());
        assert!("nonsense".parse::<BaseNetwork>().is_err());
    }

    #[test]
    fn test_base_network_contains() {
        let base = BaseNetwork::default();
        assert!(base.contains(&"10.0.200.0/24".parse().unwrap()));
        assert!(!base.contains(&"10.1.200.0/24".parse().unwrap()));
    }

    #[test]
    fn test_serde_uses_cidr_strings() {
        let block: AddressBlock = "10.0.9.0/24".parse().unwrap();
        assert_eq!(serde_json::to_string(&block).unwrap(), "\"10.0.9.0/24\"");

        let parsed: AddressBlock = serde_json::from_str("\"10.0.9.0/24\"").unwrap();
        assert_eq!(parsed, block);
        assert!(serde_json::from_str::<AddressBlock>("\"10.0.9.0/25\"").is_err());

        assert_eq!(
            serde_json::to_string(&block.sub_block(1)).unwrap(),
            "\"10.0.9.32/27\""
        );
        assert_eq!(
            serde_json::to_string(&LifecycleState::Rollback).unwrap(),
            "\"rollback\""
        );
    }

    #[test]
    fn test_allocation_record_tags() {
        let record = AllocationRecord::new("web", "10.0.3.0/24".parse().unwrap());
        let tags = record.tags();
        assert_eq!(tags.get("type"), Some(&"app".to_string()));
        assert_eq!(tags.get("subnet"), Some(&"10.0.3.0/24".to_string()));

        assert_eq!(AllocationRecord::from_tags("web", &tags), Some(record));
    }

    #[test]
    fn test_allocation_requires_app_type() {
        let stack = StackSummary::new("cluster", "CREATE_COMPLETE")
            .with_tag("type", "cluster")
            .with_tag("subnet", "10.0.3.0/24");
        assert!(!stack.is_app());
        assert!(stack.allocation().is_none());

        let untagged = StackSummary::new("web", "CREATE_COMPLETE").with_tag("type", "app");
        assert!(untagged.is_app());
        assert!(untagged.allocation().is_none());
    }
}
