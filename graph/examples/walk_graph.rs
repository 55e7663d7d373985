//! Demonstrates resolving a small model tree and dumping the cached graph.
//!
//! Run with: `cargo run --example walk_graph -p modelgraph`

use modelgraph::serializer::json;
use modelgraph::{ConventionKind, Factory, Manager, Model, Node, Result, Value};

#[derive(Default)]
struct ProjectModel {
    node: Node,
}

impl Model for ProjectModel {
    fn node(&self) -> &Node {
        &self.node
    }
}

struct DbModel {
    node: Node,
    dsn: String,
}

impl Model for DbModel {
    fn node(&self) -> &Node {
        &self.node
    }

    fn startup(&self, _manager: &Manager) -> Result<()> {
        println!("  db started for {}", self.dsn);
        Ok(())
    }
}

fn main() {
    let manager = Manager::builder()
        .prefix_namespace("App")
        .convention_kind(ConventionKind::Nested)
        .default_value("dsn", "postgres://localhost/app")
        .register("App::ProjectModel", Factory::model(|_| Ok(ProjectModel::default())))
        .register(
            "App::Project::DbModel",
            Factory::model(|args| {
                Ok(DbModel {
                    node: Node::new(),
                    dsn: args.str(0)?.to_owned(),
                })
            })
            .param("dsn"),
        )
        .register(
            "App::Db::ClusterModel",
            Factory::value(|args| Ok(Value::Int(args.int(0)?))).param_with_default("replicas", 3),
        )
        .build();

    println!("Candidates for project.db.cluster:");
    for candidate in manager.candidates("cluster", Some("Db"), &["Model"]) {
        println!("  {candidate}");
    }

    println!("Resolving:");
    match manager.resolve_path("project.db.cluster") {
        Ok(_) => {}
        Err(e) => {
            eprintln!("resolution failed: {e}");
            return;
        }
    }

    let snapshot = json::to_json(&manager);
    let rendered =
        serde_json::to_string_pretty(&snapshot).unwrap_or_else(|e| format!("JSON error: {e}"));
    println!("{rendered}");
}
