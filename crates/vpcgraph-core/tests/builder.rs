use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use strum::IntoEnumIterator;

use vpcgraph_core::{
    Category, GraphBuilder, NodeId, RawRecord, Relation, TopologyGraph, TopologyRecords, build,
    build_with_report,
};

fn raw(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn named(name: &str) -> Value {
    json!({"Tags": [{"Key": "Name", "Value": name}]})
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Value::Object(base), Value::Object(extra)) = (&mut base, extra) {
        base.extend(extra);
    }
    base
}

fn edge_triples(graph: &TopologyGraph) -> BTreeSet<(String, String, Relation)> {
    graph
        .edges()
        .iter()
        .map(|e| (e.source().to_string(), e.target().to_string(), e.relation()))
        .collect()
}

fn node_ids(graph: &TopologyGraph) -> Vec<String> {
    graph.nodes().iter().map(|n| n.id.to_string()).collect()
}

/// A small but complete VPC: every category, every relation kind.
fn full_topology() -> TopologyRecords {
    let mut records = TopologyRecords::new();
    records.push(
        Category::Network,
        raw(merge(
            json!({"VpcId": "vpc-1", "CidrBlock": "10.0.0.0/16", "State": "available", "DhcpOptionsId": "dopt-1"}),
            named("main"),
        )),
    );
    records.push(
        Category::Subnet,
        raw(json!({"SubnetId": "subnet-a", "VpcId": "vpc-1", "CidrBlock": "10.0.1.0/24", "AvailabilityZone": "eu-west-1a", "State": "available"})),
    );
    records.push(
        Category::Subnet,
        raw(json!({"SubnetId": "subnet-b", "VpcId": "vpc-1", "CidrBlock": "10.0.2.0/24", "AvailabilityZone": "eu-west-1b", "State": "available"})),
    );
    records.push(
        Category::RouteTable,
        raw(json!({
            "RouteTableId": "rtb-1",
            "VpcId": "vpc-1",
            "Routes": [
                {"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local"},
                {"DestinationCidrBlock": "0.0.0.0/0", "NetworkInterfaceId": "eni-nat"}
            ],
            "Associations": [{"Main": true}, {"SubnetId": "subnet-a"}]
        })),
    );
    records.push(
        Category::AccessControlList,
        raw(json!({
            "NetworkAclId": "acl-1",
            "VpcId": "vpc-1",
            "IsDefault": true,
            "Associations": [{"SubnetId": "subnet-a"}, {"SubnetId": "subnet-b"}]
        })),
    );
    records.push(
        Category::Endpoint,
        raw(json!({
            "VpcEndpointId": "vpce-1",
            "VpcId": "vpc-1",
            "VpcEndpointType": "Interface",
            "ServiceName": "com.amazonaws.eu-west-1.s3",
            "State": "available",
            "SubnetIds": ["subnet-b"]
        })),
    );
    records.push(
        Category::Interface,
        raw(json!({
            "NetworkInterfaceId": "eni-nat",
            "SubnetId": "subnet-a",
            "InterfaceType": "interface",
            "Status": "in-use",
            "PrivateIpAddresses": [{"PrivateIpAddress": "10.0.1.10"}],
            "Association": {"PublicIp": "52.1.2.3"}
        })),
    );
    records.push(
        Category::Interface,
        raw(json!({
            "NetworkInterfaceId": "eni-vpce",
            "SubnetId": "subnet-b",
            "InterfaceType": "vpc_endpoint",
            "Description": "VPC Endpoint Interface vpce-1",
            "Status": "in-use",
            "PrivateIpAddresses": [{"PrivateIpAddress": "10.0.2.7"}]
        })),
    );
    records
}

#[test]
fn scenario_network_and_subnet() {
    let mut records = TopologyRecords::new();
    records.push(
        Category::Network,
        raw(merge(json!({"VpcId": "net-1"}), named("main"))),
    );
    records.push(
        Category::Subnet,
        raw(merge(
            json!({"SubnetId": "sub-1", "VpcId": "net-1"}),
            named("a"),
        )),
    );

    let graph = build(&records);

    assert_eq!(node_ids(&graph), vec!["net-1", "sub-1"]);
    assert_eq!(graph.nodes()[0].label, "main");
    assert_eq!(graph.nodes()[1].label, "a");
    assert_eq!(
        edge_triples(&graph),
        BTreeSet::from([("sub-1".to_string(), "net-1".to_string(), Relation::BelongsTo)])
    );
}

#[test]
fn scenario_dangling_network_reference() {
    let mut records = TopologyRecords::new();
    records.push(
        Category::Subnet,
        raw(json!({"SubnetId": "sub-1", "VpcId": "net-missing"})),
    );

    let (graph, report) = build_with_report(&records);

    assert_eq!(graph.node_count(), 2);
    let placeholder = graph.node(&NodeId::new("net-missing")).unwrap();
    assert_eq!(placeholder.category, Category::Unknown);
    assert!(placeholder.placeholder);
    assert_eq!(placeholder.attribute("referenced_as"), Some("network"));
    assert_eq!(report.placeholders, 1);
    assert_eq!(
        edge_triples(&graph),
        BTreeSet::from([(
            "sub-1".to_string(),
            "net-missing".to_string(),
            Relation::BelongsTo
        )])
    );
}

#[test]
fn scenario_all_categories_empty() {
    let mut records = TopologyRecords::new();
    for category in Category::FETCHED {
        records.insert(category, Vec::new());
    }

    let (graph, report) = build_with_report(&records);
    assert!(graph.is_empty());
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(report.accepted_total(), 0);
    assert!(report.skipped.is_empty());
}

#[test]
fn scenario_duplicate_subnet_page() {
    let mut records = TopologyRecords::new();
    records.push(Category::Network, raw(json!({"VpcId": "net-1"})));
    records.push(
        Category::Subnet,
        raw(json!({"SubnetId": "sub-1", "VpcId": "net-1", "State": "pending"})),
    );
    records.push(
        Category::Subnet,
        raw(json!({"SubnetId": "sub-1", "VpcId": "net-1", "State": "available"})),
    );

    let (graph, report) = build_with_report(&records);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    let subnet = graph.node(&NodeId::new("sub-1")).unwrap();
    assert_eq!(subnet.attribute("State"), Some("available"));
    assert!(subnet.summary.contains(&"State: available".to_string()));
    assert_eq!(report.duplicates, 1);
}

#[test]
fn full_topology_has_every_relation() {
    let (graph, report) = build_with_report(&full_topology());

    assert_eq!(
        node_ids(&graph),
        vec![
            "vpc-1", "subnet-a", "subnet-b", "rtb-1", "eni-nat", "acl-1", "vpce-1", "eni-vpce"
        ]
    );
    assert_eq!(report.placeholders, 1, "eni-nat is referenced before it is fetched");
    assert_eq!(report.upgraded, 1);
    assert!(graph.nodes().iter().all(|n| !n.placeholder));

    let expected: BTreeSet<(String, String, Relation)> = [
        ("subnet-a", "vpc-1", Relation::BelongsTo),
        ("subnet-b", "vpc-1", Relation::BelongsTo),
        ("rtb-1", "vpc-1", Relation::BelongsTo),
        ("rtb-1", "subnet-a", Relation::AssociatedWith),
        ("rtb-1", "eni-nat", Relation::RoutesVia),
        ("acl-1", "vpc-1", Relation::BelongsTo),
        ("acl-1", "subnet-a", Relation::AppliedTo),
        ("acl-1", "subnet-b", Relation::AppliedTo),
        ("vpce-1", "vpc-1", Relation::BelongsTo),
        ("vpce-1", "subnet-b", Relation::ResidesIn),
        ("eni-nat", "subnet-a", Relation::AttachedTo),
        ("eni-vpce", "subnet-b", Relation::AttachedTo),
        ("eni-vpce", "vpce-1", Relation::Serves),
    ]
    .into_iter()
    .map(|(s, t, r)| (s.to_string(), t.to_string(), r))
    .collect();
    assert_eq!(edge_triples(&graph), expected);

    let used: BTreeSet<Relation> = graph.edges().iter().map(|e| e.relation()).collect();
    assert_eq!(used, Relation::iter().collect());
}

#[test]
fn tooltips_carry_summary_lines() {
    let graph = build(&full_topology());

    let vpc = graph.node(&NodeId::new("vpc-1")).unwrap();
    let tooltip = vpc.tooltip();
    assert!(tooltip.starts_with("VPC: vpc-1\nCIDR: 10.0.0.0/16\nState: available\nDHCP Options: dopt-1"));
    assert!(tooltip.contains("Tags: Name=main"));

    let eni = graph.node(&NodeId::new("eni-nat")).unwrap();
    assert!(eni.tooltip().contains("Public IP: 52.1.2.3"));
    assert!(eni.tooltip().contains("Private IPs: 10.0.1.10"));
}

#[test]
fn every_edge_endpoint_is_a_node() {
    let mut records = full_topology();
    records.push(
        Category::Interface,
        raw(json!({"NetworkInterfaceId": "eni-lost", "SubnetId": "subnet-gone"})),
    );
    records.push(
        Category::RouteTable,
        raw(json!({"RouteTableId": "rtb-2", "VpcId": "vpc-other", "Associations": [{"SubnetId": "subnet-x"}]})),
    );

    let graph = build(&records);
    for edge in graph.edges() {
        assert!(graph.contains_node(edge.source()), "missing {}", edge.source());
        assert!(graph.contains_node(edge.target()), "missing {}", edge.target());
    }
    assert_eq!(
        graph.node(&NodeId::new("subnet-gone")).unwrap().category,
        Category::Unknown
    );
}

#[test]
fn building_twice_is_idempotent() {
    let records = full_topology();
    let once = build(&records);

    let mut builder = GraphBuilder::new();
    builder.ingest(&records);
    builder.ingest(&records);
    let (twice, report) = builder.finish();

    assert_eq!(node_ids(&once), node_ids(&twice));
    assert_eq!(edge_triples(&once), edge_triples(&twice));
    assert_eq!(report.duplicates, records.total());
    assert_eq!(once.nodes(), twice.nodes());
}

#[test]
fn insertion_order_of_categories_does_not_matter() {
    let forward = full_topology();

    let mut reversed = TopologyRecords::new();
    for category in Category::FETCHED.iter().rev() {
        reversed.insert(*category, forward.get(*category).to_vec());
    }

    let a = build(&forward);
    let b = build(&reversed);
    assert_eq!(node_ids(&a), node_ids(&b));
    assert_eq!(edge_triples(&a), edge_triples(&b));
}

#[test]
fn malformed_records_are_skipped_per_category() {
    let broken: [(Category, Value); 6] = [
        (Category::Network, json!({"CidrBlock": "10.9.0.0/16"})),
        (Category::Subnet, json!({"SubnetId": "subnet-orphan"})),
        (Category::RouteTable, json!({"RouteTableId": "rtb-x", "VpcId": ""})),
        (Category::AccessControlList, json!({"VpcId": "vpc-1"})),
        (Category::Endpoint, json!({"VpcEndpointId": 12, "VpcId": "vpc-1"})),
        (Category::Interface, json!({"NetworkInterfaceId": "eni-x"})),
    ];

    let mut records = full_topology();
    for (category, value) in broken {
        records.push(category, raw(value));
    }

    let reference = build(&full_topology());
    let (graph, report) = build_with_report(&records);

    for category in Category::FETCHED {
        assert_eq!(report.skipped_in(category), 1, "{category}");
    }
    assert_eq!(node_ids(&graph), node_ids(&reference));
    assert_eq!(edge_triples(&graph), edge_triples(&reference));

    let subnet_skip = report
        .skipped
        .iter()
        .find(|s| s.category == Category::Subnet)
        .unwrap();
    assert_eq!(subnet_skip.id.as_deref(), Some("subnet-orphan"));
    assert!(subnet_skip.reason.contains("VpcId"), "{}", subnet_skip.reason);
}

#[test]
fn mistyped_display_fields_keep_the_record() {
    let mut records = TopologyRecords::new();
    records.push(Category::Network, raw(json!({"VpcId": "vpc-1", "IsDefault": "false"})));
    records.push(
        Category::Subnet,
        raw(json!({"SubnetId": "subnet-1", "VpcId": "vpc-1", "Tags": [{"Value": "x"}]})),
    );

    let (graph, report) = build_with_report(&records);

    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(node_ids(&graph), vec!["vpc-1", "subnet-1"]);
    let vpc = graph.node(&NodeId::new("vpc-1")).unwrap();
    assert!(!vpc.placeholder);
    assert_eq!(vpc.category, Category::Network);
    assert_eq!(edge_triples(&graph).len(), 1);
}
