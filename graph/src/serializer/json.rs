//! JSON snapshot of the resolved object graph.
//!
//! Only what has been resolved so far is rendered; nothing is resolved while
//! serializing. Each cached entry becomes an object keyed by its access name:
//! models carry `@type` and their own `children`, plain values carry `@type`
//! and a `@value` ([`Value`] objects render as JSON, anything else as
//! `"<opaque>"`).

use serde_json::{json, Map, Value as Json};

use crate::manager::{Manager, MANAGER_TYPE_NAME};
use crate::model::{Instance, Model};
use crate::node::Node;
use crate::value::Value;

/// Serializes the graph cached under `manager`.
#[must_use]
pub fn to_json(manager: &Manager) -> Json {
    json!({
        "@type": MANAGER_TYPE_NAME,
        "children": children(manager.node())
    })
}

fn children(node: &Node) -> Json {
    let mut map = Map::new();
    for (name, type_name, instance) in node.entries() {
        map.insert(name, entry(&type_name, &instance));
    }
    Json::Object(map)
}

fn entry(type_name: &str, instance: &Instance) -> Json {
    match instance {
        Instance::Model(model) => json!({
            "@type": type_name,
            "children": children(model.node())
        }),
        Instance::Value(_) => {
            let value = instance
                .downcast_ref::<Value>()
                .map_or_else(|| Json::String("<opaque>".to_owned()), Value::to_json);
            json!({
                "@type": type_name,
                "@value": value
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Factory;

    #[derive(Default)]
    struct ProjectModel {
        node: Node,
    }

    impl Model for ProjectModel {
        fn node(&self) -> &Node {
            &self.node
        }
    }

    #[test]
    fn renders_only_resolved_entries() {
        let manager = Manager::builder()
            .register("ProjectModel", Factory::model(|_| Ok(ProjectModel::default())))
            .register("PortModel", Factory::value(|_| Ok(Value::Int(5432))))
            .register("ClockModel", Factory::value(|_| Ok(std::time::Duration::ZERO)))
            .build();

        assert_eq!(to_json(&manager), json!({ "@type": "Manager", "children": {} }));

        manager.get("project").unwrap();
        manager.get("port").unwrap();
        manager.get("clock").unwrap();

        assert_eq!(
            to_json(&manager),
            json!({
                "@type": "Manager",
                "children": {
                    "clock": { "@type": "ClockModel", "@value": "<opaque>" },
                    "port": { "@type": "PortModel", "@value": 5432 },
                    "project": { "@type": "ProjectModel", "children": {} }
                }
            })
        );
    }
}
