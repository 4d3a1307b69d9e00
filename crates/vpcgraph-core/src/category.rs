use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Resource category of a graph node.
///
/// Variant order is the processing order of the graph builder: parents come
/// before the categories that reference them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Network,
    Subnet,
    RouteTable,
    AccessControlList,
    Endpoint,
    Interface,
    /// Referenced by another record but never fetched.
    Unknown,
}

impl Category {
    /// Fetched categories, in the order the builder consumes them.
    pub const FETCHED: [Category; 6] = [
        Category::Network,
        Category::Subnet,
        Category::RouteTable,
        Category::AccessControlList,
        Category::Endpoint,
        Category::Interface,
    ];

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Field holding the provider-assigned id in a raw record.
    pub fn id_field(&self) -> Option<&'static str> {
        match self {
            Category::Network => Some("VpcId"),
            Category::Subnet => Some("SubnetId"),
            Category::RouteTable => Some("RouteTableId"),
            Category::AccessControlList => Some("NetworkAclId"),
            Category::Endpoint => Some("VpcEndpointId"),
            Category::Interface => Some("NetworkInterfaceId"),
            Category::Unknown => None,
        }
    }

    /// Top-level key of the EC2 describe response carrying the records.
    pub fn response_key(&self) -> Option<&'static str> {
        match self {
            Category::Network => Some("Vpcs"),
            Category::Subnet => Some("Subnets"),
            Category::RouteTable => Some("RouteTables"),
            Category::AccessControlList => Some("NetworkAcls"),
            Category::Endpoint => Some("VpcEndpoints"),
            Category::Interface => Some("NetworkInterfaces"),
            Category::Unknown => None,
        }
    }

    /// EC2 describe operation for this category (CLI spelling).
    pub fn describe_command(&self) -> Option<&'static str> {
        match self {
            Category::Network => Some("describe-vpcs"),
            Category::Subnet => Some("describe-subnets"),
            Category::RouteTable => Some("describe-route-tables"),
            Category::AccessControlList => Some("describe-network-acls"),
            Category::Endpoint => Some("describe-vpc-endpoints"),
            Category::Interface => Some("describe-network-interfaces"),
            Category::Unknown => None,
        }
    }

    /// Human-readable name used in tooltips and legends.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Network => "VPC",
            Category::Subnet => "Subnet",
            Category::RouteTable => "Route Table",
            Category::AccessControlList => "Network ACL",
            Category::Endpoint => "VPC Endpoint",
            Category::Interface => "ENI",
            Category::Unknown => "Unknown",
        }
    }
}
