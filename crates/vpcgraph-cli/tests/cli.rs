use std::fs;
use std::path::PathBuf;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use vpcgraph::{SourceOptions, VpcgraphOptions, run_main};
use vpcgraph_error::ErrorKind;
use vpcgraph_render::RenderFormat;

fn snapshot_source() -> &'static str {
    r#"{
        "Vpcs": [{"VpcId": "vpc-1", "CidrBlock": "10.0.0.0/16"}],
        "Subnets": [
            {"SubnetId": "subnet-1", "VpcId": "vpc-1"},
            {"SubnetId": "subnet-2"}
        ],
        "RouteTables": [{
            "RouteTableId": "rtb-1",
            "VpcId": "vpc-1",
            "Routes": [{"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local"}],
            "Associations": [{"SubnetId": "subnet-1"}]
        }],
        "NetworkInterfaces": [{"NetworkInterfaceId": "eni-1", "SubnetId": "subnet-1"}]
    }"#
}

fn write_snapshot() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    fs::write(&path, snapshot_source()).expect("write snapshot");
    (dir, path)
}

#[test]
fn snapshot_to_html() {
    let (dir, snapshot) = write_snapshot();
    let output = dir.path().join("topology.html");

    let opts = VpcgraphOptions::new(&output, SourceOptions::from_snapshot(&snapshot));
    let summary = run_main(&opts).expect("run");

    assert_eq!(summary.format, RenderFormat::Html);
    assert_eq!(summary.nodes, 4);
    // subnet-2 has no VpcId.
    assert_eq!(summary.skipped, 1);
    // subnet→vpc, rtb→vpc, rtb→subnet, eni→subnet
    assert_eq!(summary.edges, 4);

    let html = fs::read_to_string(&output).expect("output written");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("\"id\":\"rtb-1\""));
}

#[test]
fn extension_selects_dot() {
    let (dir, snapshot) = write_snapshot();
    let output = dir.path().join("graphs/topology.dot");

    let opts = VpcgraphOptions::new(&output, SourceOptions::from_snapshot(&snapshot));
    let summary = run_main(&opts).expect("run");
    assert_eq!(summary.format, RenderFormat::Dot);

    let dot = fs::read_to_string(&output).expect("output written");
    assert!(dot.contains("subgraph \"cluster_vpc-1\" {"));
    assert!(dot.contains("\"rtb-1\" -> \"subnet-1\" [label=\"associated_with\"];"));
}

#[test]
fn dump_round_trips_through_input() {
    let (dir, snapshot) = write_snapshot();
    let dump = dir.path().join("dump.json");
    let first = dir.path().join("first.html");
    let second = dir.path().join("second.html");

    let mut opts = VpcgraphOptions::new(&first, SourceOptions::from_snapshot(&snapshot));
    opts.render.dump = Some(dump.clone());
    run_main(&opts).expect("first run");

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&dump).expect("dump written")).expect("json");
    assert_eq!(saved["subnet"].as_array().map(Vec::len), Some(2));

    let opts = VpcgraphOptions::new(&second, SourceOptions::from_snapshot(&dump));
    run_main(&opts).expect("second run");
    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn empty_snapshot_still_writes_a_page() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("empty.json");
    fs::write(&snapshot, "{}").unwrap();
    let output = dir.path().join("empty.html");

    let summary = run_main(&VpcgraphOptions::new(&output, SourceOptions::from_snapshot(&snapshot)))
        .expect("run");
    assert_eq!((summary.nodes, summary.edges), (0, 0));
    assert!(fs::read_to_string(&output).unwrap().contains("No network resources were found."));
}

#[test]
fn bad_style_fails_before_fetching() {
    let (dir, snapshot) = write_snapshot();
    let style = dir.path().join("style.toml");
    fs::write(&style, "background = \"not-a-color\"").unwrap();
    let output = dir.path().join("topology.html");

    let mut opts = VpcgraphOptions::new(&output, SourceOptions::from_snapshot(&snapshot));
    opts.render.style = Some(style);
    let err = run_main(&opts).expect_err("style is invalid");

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(!output.exists());
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = tempdir().unwrap();
    let opts = VpcgraphOptions::new(
        dir.path().join("out.html"),
        SourceOptions::from_snapshot(dir.path().join("missing.json")),
    );
    let err = run_main(&opts).expect_err("no snapshot");
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[cfg(unix)]
#[test]
fn aws_failure_exits_with_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let cli = dir.path().join("aws");
    fs::write(
        &cli,
        "#!/bin/sh\necho 'An error occurred (UnauthorizedOperation) when calling the DescribeVpcs operation' >&2\nexit 254\n",
    )
    .unwrap();
    fs::set_permissions(&cli, fs::Permissions::from_mode(0o755)).unwrap();

    let source = SourceOptions {
        aws_cli: cli,
        region: Some("us-east-1".to_string()),
        ..SourceOptions::default()
    };
    let output = dir.path().join("out.html");
    let err = run_main(&VpcgraphOptions::new(&output, source)).expect_err("denied");

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(err.context_value("category"), Some("network"));
    assert!(!output.exists());
}

#[test]
fn binary_warns_about_skipped_records_by_default() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{"Vpcs": [{"VpcId": "vpc-1"}], "Subnets": [{"SubnetId": "subnet-orphan"}]}"#,
    )
    .unwrap();
    let output = dir.path().join("out.html");

    let run = Command::new(env!("CARGO_BIN_EXE_vpcgraph"))
        .arg(&output)
        .arg("--input")
        .arg(&snapshot)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn vpcgraph");

    assert!(run.status.success());
    let stdout = String::from_utf8_lossy(&run.stdout);
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stdout.contains("Graph visualization saved to"), "{stdout}");
    assert!(stderr.contains("skipping malformed record"), "{stderr}");
    assert!(stderr.contains("subnet-orphan"), "{stderr}");
    assert!(stderr.contains("Skipped 1 malformed record(s)"), "{stderr}");
}
