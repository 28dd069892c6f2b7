//! Node descriptor document model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes discovered about an instance rather than configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomaticAttributes {
    /// Effective reachable address, when one was confirmed.
    pub ipaddress: Option<String>,
    /// Lower-cased base platform name (e.g. "ubuntu").
    pub platform: String,
    /// Fully-qualified domain name, when discovery succeeded.
    pub fqdn: Option<String>,
}

/// Node descriptor consumed by the convergence tool.
///
/// Field names and nesting are a compatibility contract with the tool
/// that reads the file; unresolved values serialize as `null` rather
/// than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Instance name.
    pub id: String,
    /// Environment the node converges in.
    pub chef_environment: String,
    /// Discovered attributes.
    pub automatic: AutomaticAttributes,
    /// Configured attributes, passed through unchanged.
    pub normal: Value,
    /// Convergence policies to apply, in order.
    pub run_list: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: "web01".to_string(),
            chef_environment: "_default".to_string(),
            automatic: AutomaticAttributes {
                ipaddress: Some("10.0.0.6".to_string()),
                platform: "ubuntu".to_string(),
                fqdn: None,
            },
            normal: json!({ "tier": "web" }),
            run_list: vec!["recipe[base]".to_string()],
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "web01",
                "chef_environment": "_default",
                "automatic": {
                    "ipaddress": "10.0.0.6",
                    "platform": "ubuntu",
                    "fqdn": null
                },
                "normal": { "tier": "web" },
                "run_list": ["recipe[base]"]
            })
        );
    }

    #[test]
    fn test_unresolved_fields_serialize_as_null() {
        let mut descriptor = descriptor();
        descriptor.automatic.ipaddress = None;
        let text = serde_json::to_string_pretty(&descriptor).unwrap();
        assert!(text.contains(r#""ipaddress": null"#));
        assert!(text.contains(r#""fqdn": null"#));
    }

    #[test]
    fn test_roundtrip() {
        let descriptor = descriptor();
        let text = serde_json::to_string_pretty(&descriptor).unwrap();
        let back: NodeDescriptor = serde_json::from_str(&text).unwrap();
        assert_eq!(back, descriptor);
    }
}
