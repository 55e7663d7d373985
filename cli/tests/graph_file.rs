//! Loading graph files from disk and resolving through them.

use std::fs;
use std::path::PathBuf;

use modelgraph::serializer::json;
use modelgraph::ResolveError;
use modelgraph_cli::GraphFile;
use serde_json::json as expected;

fn write_graph(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "modelgraph-{}-{name}.toml",
        std::process::id()
    ));
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn flattened_graph_resolves_and_snapshots() {
    let path = write_graph(
        "flattened",
        r#"
prefix_namespace = "Shop"
namespaces = ["::Vendor"]
convention = "flattened"

[defaults]
currency = "EUR"

[types."Shop::CartModel"]

[types."Vendor::CartTotalModel"]
kind = "value"
params = [{ name = "currency" }, { name = "precision", default = 2 }]
"#,
    );
    let file = GraphFile::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let manager = file.manager();
    manager.resolve_path("cart.total").unwrap();

    assert_eq!(
        json::to_json(&manager),
        expected!({
            "@type": "Manager",
            "children": {
                "cart": {
                    "@type": "Shop::CartModel",
                    "children": {
                        "total": {
                            "@type": "Vendor::CartTotalModel",
                            "@value": { "currency": "EUR", "precision": 2 }
                        }
                    }
                }
            }
        })
    );
}

#[test]
fn abstract_declarations_cannot_be_resolved() {
    let file = GraphFile::parse("[types.\"BaseModel\"]\nkind = \"abstract\"\n").unwrap();
    assert!(matches!(
        file.manager().get("base"),
        Err(ResolveError::AbstractInstantiation { .. })
    ));
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = GraphFile::load(&PathBuf::from("/nonexistent/graph.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/graph.toml"));
}
