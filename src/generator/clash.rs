//! Clash document assembly
//!
//! Loads the base document, injects decoded proxies and wires their names
//! into the selectable groups, then serializes the result. The base document
//! is user data: keys and values this module does not understand are carried
//! through untouched.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde_yaml::{Mapping, Value};

use crate::models::Proxy;

/// Group names that receive every decoded proxy.
pub const SELECTOR_GROUPS: [&str; 4] = ["🔰国外流量", "Proxy", "节点选择", "Select"];

fn yaml_str(s: &str) -> Value {
    Value::String(s.to_string())
}

/// Loads the base document from a template file, falling back to the
/// built-in default when the file is missing, empty, or does not parse as
/// a mapping.
pub fn load_base(path: &Path) -> Mapping {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Mapping>(&content) {
            Ok(mapping) if !mapping.is_empty() => {
                info!("using template {}", path.display());
                mapping
            }
            Ok(_) => {
                debug!("template {} is empty, using built-in default", path.display());
                default_template()
            }
            Err(e) => {
                debug!("template {} not usable ({}), using built-in default", path.display(), e);
                default_template()
            }
        },
        Err(e) => {
            debug!("no template at {} ({}), using built-in default", path.display(), e);
            default_template()
        }
    }
}

/// Built-in minimal document: one selectable group for foreign traffic, a
/// DIRECT group, and rules sending mainland traffic direct.
pub fn default_template() -> Mapping {
    let mut root = Mapping::new();
    root.insert(yaml_str("port"), Value::Number(7890.into()));
    root.insert(yaml_str("socks-port"), Value::Number(7891.into()));
    root.insert(yaml_str("allow-lan"), Value::Bool(true));
    root.insert(yaml_str("mode"), yaml_str("Rule"));
    root.insert(yaml_str("log-level"), yaml_str("info"));
    root.insert(yaml_str("external-controller"), yaml_str("0.0.0.0:9090"));
    root.insert(yaml_str("proxies"), Value::Sequence(Vec::new()));

    let mut foreign = Mapping::new();
    foreign.insert(yaml_str("name"), yaml_str("🔰国外流量"));
    foreign.insert(yaml_str("type"), yaml_str("select"));
    foreign.insert(yaml_str("proxies"), Value::Sequence(Vec::new()));

    let mut direct = Mapping::new();
    direct.insert(yaml_str("name"), yaml_str("🚀直接连接"));
    direct.insert(yaml_str("type"), yaml_str("select"));
    direct.insert(
        yaml_str("proxies"),
        Value::Sequence(vec![yaml_str("DIRECT")]),
    );

    root.insert(
        yaml_str("proxy-groups"),
        Value::Sequence(vec![Value::Mapping(foreign), Value::Mapping(direct)]),
    );

    root.insert(
        yaml_str("rules"),
        Value::Sequence(vec![
            yaml_str("DOMAIN-SUFFIX,cn,🚀直接连接"),
            yaml_str("GEOIP,CN,🚀直接连接"),
            yaml_str("MATCH,🔰国外流量"),
        ]),
    );

    root
}

/// Merges decoded proxies into the base document and serializes it.
///
/// The `proxies` list replaces the template's list wholesale. Groups named
/// in [`SELECTOR_GROUPS`] get every decoded name appended after their manual
/// entries; other groups only get a missing or null `proxies` list replaced
/// by an empty one.
pub fn render_clash(proxies: &[Proxy], mut base: Mapping) -> Result<String, serde_yaml::Error> {
    let proxy_values = serde_yaml::to_value(proxies)?;
    base.insert(yaml_str("proxies"), proxy_values);

    let names: Vec<Value> = proxies.iter().map(|p| yaml_str(p.name())).collect();

    if let Some(Value::Sequence(groups)) = base.get_mut("proxy-groups") {
        for group in groups.iter_mut() {
            let group = match group {
                Value::Mapping(map) => map,
                _ => continue,
            };

            if matches!(group.get("proxies"), None | Some(Value::Null)) {
                group.insert(yaml_str("proxies"), Value::Sequence(Vec::new()));
            }

            let is_selector = match group.get("name") {
                Some(Value::String(name)) => SELECTOR_GROUPS.contains(&name.as_str()),
                _ => false,
            };
            if !is_selector {
                continue;
            }

            if let Some(Value::Sequence(members)) = group.get_mut("proxies") {
                members.extend(names.iter().cloned());
            }
        }
    }

    serde_yaml::to_string(&base)
}
