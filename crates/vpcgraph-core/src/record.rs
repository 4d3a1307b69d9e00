//! Raw and typed resource records.
//!
//! Fetchers hand over records as untyped attribute maps. The graph builder
//! reads them through one fixed record shape per category, so every field
//! the relation rules depend on is checked at this boundary. Display-only
//! fields are read leniently: a mistyped value is treated as absent and a
//! broken list entry is dropped, never the whole record.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::category::Category;
use crate::identity::Relation;

/// One record as returned by a describe call.
pub type RawRecord = Map<String, Value>;

/// Records of one fetch session, grouped by category.
///
/// Iteration always follows [`Category`] order, independent of insertion
/// order, which keeps the builder's output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopologyRecords {
    records: BTreeMap<Category, Vec<RawRecord>>,
}

impl TopologyRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records of `category`.
    pub fn insert(&mut self, category: Category, records: Vec<RawRecord>) {
        self.records.insert(category, records);
    }

    /// Append records to `category`.
    pub fn extend<I>(&mut self, category: Category, records: I)
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.records.entry(category).or_default().extend(records);
    }

    pub fn push(&mut self, category: Category, record: RawRecord) {
        self.records.entry(category).or_default().push(record);
    }

    pub fn get(&self, category: Category) -> &[RawRecord] {
        self.records
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[RawRecord])> {
        self.records.iter().map(|(c, r)| (*c, r.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Why a record was rejected at the mapping boundary.
#[derive(Debug)]
pub enum RecordError {
    /// The record did not match the category's shape (missing or mistyped field).
    Shape(serde_json::Error),
    /// A required id field was present but empty.
    EmptyField(&'static str),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Shape(err) => write!(f, "{err}"),
            RecordError::EmptyField(field) => write!(f, "empty field `{field}`"),
        }
    }
}

impl std::error::Error for RecordError {}

/// A reference from one record to another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub target: String,
    /// Category the target is expected to have once fetched.
    pub expected: Category,
    pub relation: Relation,
}

impl Link {
    fn new(target: &str, expected: Category, relation: Relation) -> Self {
        Self {
            target: target.to_string(),
            expected,
            relation,
        }
    }
}

/// Fixed record shape of one fetched category.
pub trait ResourceRecord: DeserializeOwned {
    const CATEGORY: Category;

    fn id(&self) -> &str;

    /// Required string fields, checked for emptiness after deserialization.
    fn required(&self) -> Vec<(&'static str, &str)>;

    fn tags(&self) -> &[Tag] {
        &[]
    }

    /// Outgoing references, in declaration order.
    fn links(&self) -> Vec<Link>;

    /// Category-specific tooltip lines.
    fn summary(&self) -> Vec<String>;

    /// Value of the `Name` tag, if set.
    fn name(&self) -> Option<&str> {
        self.tags()
            .iter()
            .find(|tag| tag.key == "Name" && !tag.value.is_empty())
            .map(|tag| tag.value.as_str())
    }
}

/// Map a raw record onto the typed shape `R`.
pub fn extract<R: ResourceRecord>(raw: &RawRecord) -> Result<R, RecordError> {
    let record: R = serde_json::from_value(Value::Object(raw.clone())).map_err(RecordError::Shape)?;
    if let Some((field, _)) = record.required().into_iter().find(|(_, v)| v.is_empty()) {
        return Err(RecordError::EmptyField(field));
    }
    Ok(record)
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

/// Optional field: a value of the wrong type reads as the default.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// List field: entries that do not match `T` are dropped; a non-array reads
/// as empty.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
}

// ============================================================================
// VPC
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcRecord {
    pub vpc_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub dhcp_options_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_default: Option<bool>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<Tag>,
}

impl ResourceRecord for VpcRecord {
    const CATEGORY: Category = Category::Network;

    fn id(&self) -> &str {
        &self.vpc_id
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("VpcId", self.vpc_id.as_str())]
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn links(&self) -> Vec<Link> {
        Vec::new()
    }

    fn summary(&self) -> Vec<String> {
        vec![
            format!("CIDR: {}", or_na(&self.cidr_block)),
            format!("State: {}", or_na(&self.state)),
            format!("DHCP Options: {}", or_na(&self.dhcp_options_id)),
        ]
    }
}

// ============================================================================
// Subnet
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetRecord {
    pub subnet_id: String,
    pub vpc_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub availability_zone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<Tag>,
}

impl ResourceRecord for SubnetRecord {
    const CATEGORY: Category = Category::Subnet;

    fn id(&self) -> &str {
        &self.subnet_id
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("SubnetId", self.subnet_id.as_str()), ("VpcId", self.vpc_id.as_str())]
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn links(&self) -> Vec<Link> {
        vec![Link::new(&self.vpc_id, Category::Network, Relation::BelongsTo)]
    }

    fn summary(&self) -> Vec<String> {
        vec![
            format!("CIDR: {}", or_na(&self.cidr_block)),
            format!("AZ: {}", or_na(&self.availability_zone)),
            format!("State: {}", or_na(&self.state)),
        ]
    }
}

// ============================================================================
// Route table
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    #[serde(default, deserialize_with = "lenient")]
    pub destination_cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination_ipv6_cidr_block: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination_prefix_list_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gateway_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub nat_gateway_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub network_interface_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub transit_gateway_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vpc_peering_connection_id: Option<String>,
}

impl Route {
    pub fn destination(&self) -> &str {
        self.destination_cidr_block
            .as_deref()
            .or(self.destination_ipv6_cidr_block.as_deref())
            .or(self.destination_prefix_list_id.as_deref())
            .unwrap_or("N/A")
    }

    pub fn target(&self) -> &str {
        self.gateway_id
            .as_deref()
            .or(self.nat_gateway_id.as_deref())
            .or(self.network_interface_id.as_deref())
            .or(self.transit_gateway_id.as_deref())
            .or(self.vpc_peering_connection_id.as_deref())
            .unwrap_or("N/A")
    }
}

/// Association entry of a route table or network ACL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetAssociation {
    #[serde(default, deserialize_with = "lenient")]
    pub subnet_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableRecord {
    pub route_table_id: String,
    pub vpc_id: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub routes: Vec<Route>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub associations: Vec<SubnetAssociation>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<Tag>,
}

impl ResourceRecord for RouteTableRecord {
    const CATEGORY: Category = Category::RouteTable;

    fn id(&self) -> &str {
        &self.route_table_id
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("RouteTableId", self.route_table_id.as_str()), ("VpcId", self.vpc_id.as_str())]
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn links(&self) -> Vec<Link> {
        let mut links = vec![Link::new(&self.vpc_id, Category::Network, Relation::BelongsTo)];
        links.extend(
            self.associations
                .iter()
                .filter_map(|a| a.subnet_id.as_deref())
                .filter(|id| !id.is_empty())
                .map(|id| Link::new(id, Category::Subnet, Relation::AssociatedWith)),
        );
        links.extend(
            self.routes
                .iter()
                .filter_map(|r| r.network_interface_id.as_deref())
                .filter(|id| !id.is_empty())
                .map(|id| Link::new(id, Category::Interface, Relation::RoutesVia)),
        );
        links
    }

    fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!("VPC: {}", self.vpc_id), "Routes:".to_string()];
        lines.extend(
            self.routes
                .iter()
                .map(|r| format!("Destination: {}, Target: {}", r.destination(), r.target())),
        );
        lines
    }
}

// ============================================================================
// Network ACL
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkAclRecord {
    pub network_acl_id: String,
    pub vpc_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub is_default: Option<bool>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub associations: Vec<SubnetAssociation>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<Tag>,
}

impl ResourceRecord for NetworkAclRecord {
    const CATEGORY: Category = Category::AccessControlList;

    fn id(&self) -> &str {
        &self.network_acl_id
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("NetworkAclId", self.network_acl_id.as_str()), ("VpcId", self.vpc_id.as_str())]
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn links(&self) -> Vec<Link> {
        let mut links = vec![Link::new(&self.vpc_id, Category::Network, Relation::BelongsTo)];
        links.extend(
            self.associations
                .iter()
                .filter_map(|a| a.subnet_id.as_deref())
                .filter(|id| !id.is_empty())
                .map(|id| Link::new(id, Category::Subnet, Relation::AppliedTo)),
        );
        links
    }

    fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!("VPC: {}", self.vpc_id)];
        if self.is_default == Some(true) {
            lines.push("Default: true".to_string());
        }
        lines
    }
}

// ============================================================================
// VPC endpoint
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcEndpointRecord {
    pub vpc_endpoint_id: String,
    pub vpc_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub vpc_endpoint_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub subnet_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<Tag>,
}

impl ResourceRecord for VpcEndpointRecord {
    const CATEGORY: Category = Category::Endpoint;

    fn id(&self) -> &str {
        &self.vpc_endpoint_id
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("VpcEndpointId", self.vpc_endpoint_id.as_str()), ("VpcId", self.vpc_id.as_str())]
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn links(&self) -> Vec<Link> {
        let mut links = vec![Link::new(&self.vpc_id, Category::Network, Relation::BelongsTo)];
        links.extend(
            self.subnet_ids
                .iter()
                .filter(|id| !id.is_empty())
                .map(|id| Link::new(id, Category::Subnet, Relation::ResidesIn)),
        );
        links
    }

    fn summary(&self) -> Vec<String> {
        vec![
            format!("Type: {}", or_na(&self.vpc_endpoint_type)),
            format!("Service: {}", or_na(&self.service_name)),
            format!("State: {}", or_na(&self.state)),
        ]
    }
}

// ============================================================================
// Network interface
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateIp {
    #[serde(default, deserialize_with = "lenient")]
    pub private_ip_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicIpAssociation {
    #[serde(default, deserialize_with = "lenient")]
    pub public_ip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterfaceRecord {
    pub network_interface_id: String,
    pub subnet_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub interface_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub private_ip_addresses: Vec<PrivateIp>,
    #[serde(default, deserialize_with = "lenient")]
    pub association: Option<PublicIpAssociation>,
    /// ENIs report their tags as `TagSet`.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tag_set: Vec<Tag>,
}

impl NetworkInterfaceRecord {
    /// Endpoint this interface was created for, taken from the description
    /// EC2 writes on endpoint-managed interfaces
    /// (`VPC Endpoint Interface vpce-0abc...`).
    pub fn endpoint_id(&self) -> Option<&str> {
        if self.interface_type.as_deref() != Some("vpc_endpoint") {
            return None;
        }
        self.description
            .as_deref()?
            .split_whitespace()
            .find(|token| token.starts_with("vpce-"))
    }

    pub fn public_ip(&self) -> Option<&str> {
        self.association.as_ref()?.public_ip.as_deref()
    }
}

impl ResourceRecord for NetworkInterfaceRecord {
    const CATEGORY: Category = Category::Interface;

    fn id(&self) -> &str {
        &self.network_interface_id
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("NetworkInterfaceId", self.network_interface_id.as_str()),
            ("SubnetId", self.subnet_id.as_str()),
        ]
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn links(&self) -> Vec<Link> {
        let mut links = vec![Link::new(&self.subnet_id, Category::Subnet, Relation::AttachedTo)];
        if let Some(endpoint) = self.endpoint_id() {
            links.push(Link::new(endpoint, Category::Endpoint, Relation::Serves));
        }
        links
    }

    fn summary(&self) -> Vec<String> {
        let private_ips: Vec<&str> = self
            .private_ip_addresses
            .iter()
            .filter_map(|ip| ip.private_ip_address.as_deref())
            .collect();
        vec![
            format!("Subnet: {}", self.subnet_id),
            format!("Private IPs: {}", private_ips.join(", ")),
            format!("Public IP: {}", self.public_ip().unwrap_or("N/A")),
            format!("Status: {}", or_na(&self.status)),
        ]
    }
}
