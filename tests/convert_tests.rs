use base64::{engine::general_purpose::STANDARD, Engine};
use serde_yaml::{Mapping, Value};

use subrelay::convert_subscription;

fn vmess_link(json: &str) -> String {
    format!("vmess://{}", STANDARD.encode(json))
}

fn missing_template() -> std::path::PathBuf {
    std::path::PathBuf::from("definitely-missing-template.yaml")
}

fn group_members<'a>(root: &'a Mapping, group_name: &str) -> Vec<&'a str> {
    let groups = match root.get("proxy-groups") {
        Some(Value::Sequence(seq)) => seq,
        other => panic!("proxy-groups missing: {:?}", other),
    };
    for group in groups {
        let map = group.as_mapping().unwrap();
        if map.get("name").and_then(Value::as_str) == Some(group_name) {
            return match map.get("proxies") {
                Some(Value::Sequence(members)) => {
                    members.iter().filter_map(Value::as_str).collect()
                }
                _ => Vec::new(),
            };
        }
    }
    panic!("group {} not found", group_name);
}

#[actix_web::test]
async fn converts_mixed_plain_payload() {
    let payload = format!(
        "vless://uuid@example.com:443?type=tcp&security=tls&sni=example.com#MyNode\n\n{}\n",
        vmess_link(r#"{"add":"1.2.3.4","port":"8080","id":"abc","ps":"VM"}"#)
    );

    let result = convert_subscription(&payload, &missing_template())
        .await
        .expect("conversion should succeed");
    assert!(result.user_info.is_none());

    let root: Mapping = serde_yaml::from_str(&result.document).expect("document must be yaml");

    let proxies = match root.get("proxies") {
        Some(Value::Sequence(seq)) => seq,
        other => panic!("proxies missing: {:?}", other),
    };
    assert_eq!(proxies.len(), 2);

    let vless = proxies[0].as_mapping().unwrap();
    assert_eq!(vless.get("type").and_then(Value::as_str), Some("vless"));
    assert_eq!(vless.get("name").and_then(Value::as_str), Some("MyNode"));
    assert_eq!(
        vless.get("server").and_then(Value::as_str),
        Some("example.com")
    );
    assert_eq!(vless.get("port").and_then(Value::as_u64), Some(443));
    assert_eq!(vless.get("uuid").and_then(Value::as_str), Some("uuid"));
    assert_eq!(
        vless.get("servername").and_then(Value::as_str),
        Some("example.com")
    );

    let vmess = proxies[1].as_mapping().unwrap();
    assert_eq!(vmess.get("type").and_then(Value::as_str), Some("vmess"));
    assert_eq!(vmess.get("cipher").and_then(Value::as_str), Some("auto"));
    assert_eq!(vmess.get("alterId").and_then(Value::as_u64), Some(0));

    // every decoded name lands in the selectable group, and the direct
    // group keeps its manual entry
    assert_eq!(group_members(&root, "🔰国外流量"), vec!["MyNode", "VM"]);
    assert_eq!(group_members(&root, "🚀直接连接"), vec!["DIRECT"]);

    // default rules survive assembly
    let rules = match root.get("rules") {
        Some(Value::Sequence(seq)) => seq,
        other => panic!("rules missing: {:?}", other),
    };
    assert_eq!(rules.len(), 3);
}

#[actix_web::test]
async fn converts_base64_wrapped_payload() {
    let plain = format!(
        "hysteria2://pw@hk.example.com:443#HK\n{}",
        vmess_link(r#"{"add":"h","port":80,"id":"u","ps":"VM"}"#)
    );
    let payload = STANDARD.encode(plain);

    let result = convert_subscription(&payload, &missing_template())
        .await
        .expect("conversion should succeed");
    let root: Mapping = serde_yaml::from_str(&result.document).unwrap();
    assert_eq!(group_members(&root, "🔰国外流量"), vec!["HK", "VM"]);
}

#[actix_web::test]
async fn unusable_payload_still_yields_valid_document() {
    let result = convert_subscription("no links here at all", &missing_template())
        .await
        .expect("conversion should succeed");

    let root: Mapping = serde_yaml::from_str(&result.document).unwrap();
    assert_eq!(root.get("proxies"), Some(&Value::Sequence(Vec::new())));
    assert!(group_members(&root, "🔰国外流量").is_empty());
    assert_eq!(root.get("port").and_then(Value::as_u64), Some(7890));
}

#[actix_web::test]
async fn broken_and_unsupported_links_are_skipped() {
    let payload = "\
ss://unsupported-scheme\n\
trojan://also-unsupported@h:443\n\
vmess://!!!not-base64!!!\n\
hysteria2://pw@ok.example.com:443#Survivor\n";

    let result = convert_subscription(payload, &missing_template())
        .await
        .expect("conversion should succeed");
    let root: Mapping = serde_yaml::from_str(&result.document).unwrap();
    assert_eq!(group_members(&root, "🔰国外流量"), vec!["Survivor"]);
}

#[actix_web::test]
async fn custom_template_drives_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("template.yaml");
    std::fs::write(
        &template_path,
        "\
mixed-port: 7893
proxy-groups:
  - name: Select
    type: select
    proxies:
      - manual-node
rules:
  - MATCH,Select
",
    )
    .unwrap();

    let payload = "hysteria2://pw@hk.example.com:443#HK";
    let result = convert_subscription(payload, &template_path)
        .await
        .expect("conversion should succeed");

    let root: Mapping = serde_yaml::from_str(&result.document).unwrap();
    assert_eq!(root.get("mixed-port").and_then(Value::as_u64), Some(7893));
    assert_eq!(group_members(&root, "Select"), vec!["manual-node", "HK"]);
    assert_eq!(
        root.get("rules"),
        Some(&Value::Sequence(vec![Value::String(
            "MATCH,Select".to_string()
        )]))
    );
}
