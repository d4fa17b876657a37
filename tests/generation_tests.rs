//! End-to-end generation scenarios driven through the public API, from JSON
//! payload to emitted artifacts.

use topogen::{generate, GenerationOptions, TopologyRequest};

fn run(json: &str) -> topogen::GenerationOutput {
    let request: TopologyRequest = serde_json::from_str(json).expect("payload parses");
    generate(request, &GenerationOptions::default()).expect("generation succeeds")
}

fn run_err(json: &str) -> topogen::GenError {
    let request: TopologyRequest = serde_json::from_str(json).expect("payload parses");
    generate(request, &GenerationOptions::default()).expect_err("generation fails")
}

fn config_lines<'a>(
    output: &'a topogen::GenerationOutput,
    name: &str,
) -> &'a [String] {
    &output
        .configs
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no config for {}", name))
        .lines
}

fn route_lines(output: &topogen::GenerationOutput, name: &str) -> Vec<String> {
    config_lines(output, name)
        .iter()
        .filter(|l| l.starts_with("ip route "))
        .cloned()
        .collect()
}

/// Two routers, one bidirectional backbone: the first /30 of the base, both
/// usable hosts handed out, and no static routes because everything is
/// directly connected.
#[test]
fn test_two_routers_single_backbone() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "x": -100, "y": 0, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "x": 100, "y": 0, "data": {"type": "router", "name": "R2"}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"},
                      "routingDirection": "bidirectional"}}
        ],
        "vlans": []
    }"#,
    );

    let r1 = config_lines(&output, "R1");
    assert!(r1.contains(&"interface FastEthernet0/0".to_string()));
    assert!(r1.contains(&"ip address 19.0.0.1 255.255.255.252".to_string()));
    let r2 = config_lines(&output, "R2");
    assert!(r2.contains(&"ip address 19.0.0.2 255.255.255.252".to_string()));

    // Directly connected: no static routes, but the terminal transition
    // sequence is still present.
    for name in ["R1", "R2"] {
        assert!(route_lines(&output, name).is_empty());
        let lines = config_lines(&output, name);
        assert_eq!(lines[lines.len() - 2..], ["exit", "enable"]);
    }

    assert!(output.report.contains("R1-R2"));
    assert!(output.report.contains("|19.0.0.0\n|19.0.0.1\n|\n|19.0.0.2"));
}

/// Router + one switch with a host in VLAN10: subinterface fan-out on the
/// router, access port and trunk on the switch, DHCP pool with the fixed
/// exclusion window.
#[test]
fn test_router_switch_vlan_fanout() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "switch", "name": "SW1",
                "computers": [{"name": "pc-a", "portType": "FastEthernet",
                               "portNumber": "0/5", "vlan": "VLAN10"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}}
        ],
        "vlans": [{"name": "VLAN10", "prefix": 24}]
    }"#,
    );

    let r1 = config_lines(&output, "R1").join("\n");
    assert!(r1.contains("interface FastEthernet0/0\nno shutdown"));
    assert!(r1.contains(
        "interface FastEthernet0/0.10\nencapsulation dot1Q 10\n\
         ip address 19.0.0.254 255.255.255.0\nno shutdown"
    ));
    assert!(r1.contains("ip dhcp excluded-address 19.0.0.1 19.0.0.10"));
    assert!(r1.contains(
        "ip dhcp pool vlan10\nnetwork 19.0.0.0 255.255.255.0\ndefault-router 19.0.0.254"
    ));

    let sw1 = config_lines(&output, "SW1").join("\n");
    assert!(sw1.contains("vlan 10\nname vlan10"));
    assert!(sw1.contains("interface FastEthernet0/24\nswitchport mode trunk"));
    assert!(sw1.contains("interface FastEthernet0/5\nswitchport access vlan 10\nno shutdown"));
    // Layer-2 only: no routing, no gateways, no pools.
    assert!(!sw1.contains("ip routing"));
    assert!(!sw1.contains("ip dhcp"));
    assert!(sw1.contains("ip ssh ver 2"));

    // The synthesized host shows up in placement and DHCP activation.
    let driver = output.driver.as_deref().unwrap();
    assert!(driver.contains("addDevice(\"PC1\", \"PC-PT\""));
    assert!(driver.contains("configurePcIp(\"PC1\", true);"));
    assert!(driver.contains(
        "addLink(\"SW1\", \"FastEthernet0/5\", \"PC1\", \"FastEthernet0\", \"straight\");"
    ));
}

/// Router facing two switches with one VLAN each: every subinterface stays
/// on the router's first switch-facing interface.
#[test]
fn test_subinterfaces_share_one_physical_interface() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "switch", "name": "SW1",
                "computers": [{"name": "a", "portType": "FastEthernet",
                               "portNumber": "0/5", "vlan": "VLAN10"}]}},
            {"id": 3, "data": {"type": "switch", "name": "SW2",
                "computers": [{"name": "b", "portType": "FastEthernet",
                               "portNumber": "0/5", "vlan": "VLAN20"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}},
            {"id": "e2", "from": 1, "to": 3,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/1"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}}
        ],
        "vlans": [{"name": "VLAN10", "prefix": 24}, {"name": "VLAN20", "prefix": 24}]
    }"#,
    );

    let r1 = config_lines(&output, "R1");
    assert!(r1.contains(&"interface FastEthernet0/0.10".to_string()));
    assert!(r1.contains(&"interface FastEthernet0/0.20".to_string()));
    assert!(!r1.iter().any(|l| l.starts_with("interface FastEthernet0/1.")));
}

/// Router + core switch: the core owns the VLAN gateway (SVI + pool); the
/// router emits neither and instead routes toward the core.
#[test]
fn test_core_owns_vlans_router_abstains() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "switch_core", "name": "SWC1",
                "computers": [{"name": "srv", "portType": "GigabitEthernet",
                               "portNumber": "1/0/10", "vlan": "VLAN30"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "GigabitEthernet", "number": "1/0/1"}}}
        ],
        "vlans": [{"name": "VLAN30", "prefix": 24}]
    }"#,
    );

    let r1 = config_lines(&output, "R1").join("\n");
    assert!(!r1.contains("encapsulation dot1Q 30"));
    assert!(!r1.contains("ip dhcp pool vlan30"));

    let swc = config_lines(&output, "SWC1").join("\n");
    assert!(swc.contains("ip routing"));
    assert!(swc.contains("no switchport"));
    assert!(swc.contains("interface vlan 30\nip address 19.0.1.254 255.255.255.0\nno shutdown"));
    assert!(swc.contains("ip dhcp pool vlan30"));
    assert!(swc.contains(
        "interface GigabitEthernet1/0/10\nswitchport access vlan 30\nno shutdown"
    ));

    // The VLAN subnet is remote to R1, one hop through the core.
    let r1_routes = route_lines(&output, "R1");
    assert_eq!(r1_routes, vec!["ip route 19.0.1.0 255.255.255.0 19.0.0.2"]);
    // Nothing beyond the shared /30 is reachable from the core's side.
    assert!(route_lines(&output, "SWC1").is_empty());
}

/// Three-router unidirectional line: routes flow with the arrows only.
#[test]
fn test_unidirectional_line_route_flow() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "router", "name": "R2"}},
            {"id": 3, "data": {"type": "router", "name": "R3",
                "computers": []}},
            {"id": 4, "data": {"type": "switch", "name": "SW1",
                "computers": [{"name": "c", "portType": "FastEthernet",
                               "portNumber": "0/2", "vlan": "VLAN40"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"},
                      "routingDirection": "from-to"}},
            {"id": "e2", "from": 2, "to": 3,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/1"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"},
                      "routingDirection": "from-to"}},
            {"id": "e3", "from": 3, "to": 4,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/1"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}}
        ],
        "vlans": [{"name": "VLAN40", "prefix": 24}]
    }"#,
    );

    // R1 sees the far backbone and R3's VLAN, all via R2's near-side address.
    assert_eq!(
        route_lines(&output, "R1"),
        vec![
            "ip route 19.0.0.4 255.255.255.252 19.0.0.2",
            "ip route 19.0.1.0 255.255.255.0 19.0.0.2",
        ]
    );
    // R2 sees only R3's VLAN.
    assert_eq!(
        route_lines(&output, "R2"),
        vec!["ip route 19.0.1.0 255.255.255.0 19.0.0.6"]
    );
    // Nothing flows back up to R3.
    assert!(route_lines(&output, "R3").is_empty());
}

/// EtherChannel between two switches: LACP modes mirror across the link and
/// member ports are no longer assignable.
#[test]
fn test_etherchannel_between_switches() {
    let payload = r#"{
        "nodes": [
            {"id": 1, "data": {"type": "switch", "name": "SW1"}},
            {"id": 2, "data": {"type": "switch", "name": "SW2"}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/1"},
                      "toInterface": {"type": "FastEthernet", "number": "0/1"},
                      "connectionType": "etherchannel",
                      "etherChannel": {"protocol": "lacp", "group": 1,
                                       "fromType": "fa", "toType": "fa",
                                       "fromRange": "0/1-3", "toRange": "0/1-3"}}}
        ],
        "vlans": []
    }"#;
    let output = run(payload);

    let sw1 = config_lines(&output, "SW1").join("\n");
    assert!(sw1.contains(
        "interface range FastEthernet0/1-3\nswitchport mode trunk\n\
         channel-group 1 mode active"
    ));
    assert!(sw1.contains("interface Port-channel1\nswitchport mode trunk"));
    let sw2 = config_lines(&output, "SW2").join("\n");
    assert!(sw2.contains("channel-group 1 mode passive"));

    // One physical cable per member pair in the driver script.
    let driver = output.driver.as_deref().unwrap();
    for n in 1..=3 {
        assert!(driver.contains(&format!(
            "addLink(\"SW1\", \"FastEthernet0/{n}\", \"SW2\", \"FastEthernet0/{n}\", \"straight\");"
        )));
    }

    // A later host attachment on a member port must be rejected.
    let conflicting = payload.replace(
        r#"{"id": 1, "data": {"type": "switch", "name": "SW1"}}"#,
        r#"{"id": 1, "data": {"type": "switch", "name": "SW1",
            "computers": [{"name": "pc", "portType": "FastEthernet",
                           "portNumber": "0/2", "vlan": "VLAN10"}]}}"#,
    );
    let err = run_err(&conflicting);
    assert!(matches!(err, topogen::GenError::InterfaceConflict(_)));
}

/// Links marked `routingDirection: none` stay physical: no subnet, no route.
#[test]
fn test_unrouted_link_gets_no_subnet() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "router", "name": "R2"}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"},
                      "routingDirection": "none"}}
        ],
        "vlans": []
    }"#,
    );

    assert!(output.plan.registry.records().is_empty());
    assert!(route_lines(&output, "R1").is_empty());
    assert!(!config_lines(&output, "R1").iter().any(|l| l.starts_with("ip address")));
    // The cable is still mirrored into the simulator build.
    assert!(output.driver.as_deref().unwrap().contains(
        "addLink(\"R1\", \"FastEthernet0/0\", \"R2\", \"FastEthernet0/0\", \"straight\");"
    ));
}

/// A /30 VLAN has exactly two usable hosts; the exclusion window clamps.
#[test]
fn test_slash30_vlan_boundary() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "switch", "name": "SW1",
                "computers": [{"name": "a", "portType": "FastEthernet",
                               "portNumber": "0/1", "vlan": "VLAN7"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}}
        ],
        "vlans": [{"name": "VLAN7", "prefix": 30}]
    }"#,
    );

    let r1 = config_lines(&output, "R1").join("\n");
    assert!(r1.contains("ip address 19.0.0.2 255.255.255.252"));
    assert!(r1.contains("ip dhcp excluded-address 19.0.0.1 19.0.0.1"));
}

/// VLAN prefixes /31 and /32 are rejected outright.
#[test]
fn test_vlan_prefix_31_rejected() {
    let err = run_err(
        r#"{
        "nodes": [], "edges": [],
        "vlans": [{"name": "VLAN10", "prefix": 31}]
    }"#,
    );
    assert!(matches!(err, topogen::GenError::InvalidVlan(_)));
    assert!(err.to_string().contains("VLAN10"));
}

/// Physical mode without model tags fails, naming the device.
#[test]
fn test_physical_mode_requires_models() {
    let err = run_err(
        r#"{
        "nodes": [{"id": 1, "data": {"type": "router", "name": "R9"}}],
        "edges": [],
        "vlans": [],
        "mode": "physical"
    }"#,
    );
    assert!(matches!(
        err,
        topogen::GenError::PhysicalModelMissing { ref device } if device == "R9"
    ));
}

/// Physical mode suppresses the driver script and keeps the bundles.
#[test]
fn test_physical_mode_skips_driver() {
    let output = run(
        r#"{
        "nodes": [{"id": 1, "data": {"type": "router", "name": "R1", "model": "2900"}}],
        "edges": [],
        "vlans": [],
        "mode": "physical"
    }"#,
    );
    assert!(output.driver.is_none());
    assert!(output.bundles.routers.contains("ROUTER: R1"));
}

/// No two allocated subnets overlap, across backbones and VLANs of mixed
/// prefix lengths.
#[test]
fn test_no_subnet_overlaps() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "router", "name": "R2"}},
            {"id": 3, "data": {"type": "router", "name": "R3"}},
            {"id": 4, "data": {"type": "switch", "name": "SW1",
                "computers": [{"name": "a", "portType": "FastEthernet",
                               "portNumber": "0/1", "vlan": "VLAN10"},
                              {"name": "b", "portType": "FastEthernet",
                               "portNumber": "0/2", "vlan": "VLAN20"},
                              {"name": "c", "portType": "FastEthernet",
                               "portNumber": "0/3", "vlan": "VLAN30"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"}}},
            {"id": "e2", "from": 2, "to": 3,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/1"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"}}},
            {"id": "e3", "from": 1, "to": 4,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/1"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}}
        ],
        "vlans": [{"name": "VLAN10", "prefix": 20},
                  {"name": "VLAN20", "prefix": 24},
                  {"name": "VLAN30", "prefix": 28}]
    }"#,
    );

    let records = output.plan.registry.records();
    assert_eq!(records.len(), 5);
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            assert!(
                !(a.net.contains(&b.net.network()) || b.net.contains(&a.net.network())),
                "{} overlaps {}",
                a.net,
                b.net
            );
        }
    }
}

/// Byte-identical output across runs, including the driver script.
#[test]
fn test_full_determinism() {
    let payload = r#"{
        "nodes": [
            {"id": 1, "x": -50, "y": 20, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "x": 90, "y": -30, "data": {"type": "switch", "name": "SW1",
                "computers": [{"name": "a", "portType": "FastEthernet",
                               "portNumber": "0/1", "vlan": "VLAN10"}]}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/24"}}}
        ],
        "vlans": [{"name": "VLAN10", "prefix": 24}],
        "baseNetworkOctet": 47
    }"#;

    let first = run(payload);
    let second = run(payload);
    assert_eq!(first.bundles.full, second.bundles.full);
    assert_eq!(first.bundles.routers, second.bundles.routers);
    assert_eq!(first.report, second.report);
    assert_eq!(first.driver, second.driver);
    // The configured base octet flows into every allocation.
    assert!(first.report.contains("|47.0.0.0"));
}

/// Artifacts survive a disk round trip unchanged: UTF-8, LF line endings,
/// trailing newline.
#[test]
fn test_artifacts_write_cleanly() {
    let output = run(
        r#"{
        "nodes": [
            {"id": 1, "data": {"type": "router", "name": "R1"}},
            {"id": 2, "data": {"type": "router", "name": "R2"}}
        ],
        "edges": [
            {"id": "e1", "from": 1, "to": 2,
             "data": {"fromInterface": {"type": "FastEthernet", "number": "0/0"},
                      "toInterface": {"type": "FastEthernet", "number": "0/0"}}}
        ],
        "vlans": []
    }"#,
    );

    let dir = tempfile::tempdir().unwrap();
    for (name, content) in [
        ("config_full.txt", output.bundles.full.as_str()),
        ("subnet_report.txt", output.report.as_str()),
        ("topology_driver.txt", output.driver.as_deref().unwrap()),
    ] {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        let read_back = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_back, content);
        assert!(read_back.ends_with('\n'), "{} lacks a trailing newline", name);
        assert!(!read_back.contains('\r'), "{} has CR line endings", name);
    }
}
