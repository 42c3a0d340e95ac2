use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::graph::{Node, NodeGraph};

pub(super) const DEFAULT_ENTRY_ID: &str = "entry";

#[derive(Debug, Deserialize)]
struct RawFlowchart {
    #[serde(default = "default_entry")]
    entry: String,
    nodes: Vec<Node>,
}

fn default_entry() -> String {
    DEFAULT_ENTRY_ID.to_owned()
}

/// Parses a flowchart document and validates it into a [`NodeGraph`].
///
/// Two layouts are accepted: `{ "entry": "...", "nodes": [ ... ] }`, or a bare
/// object keyed by node id whose entry node is `entry`.
pub(super) fn parse_flowchart(raw: &str) -> Result<NodeGraph> {
    let parsed: Value = serde_json::from_str(raw).context("invalid flowchart JSON")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("flowchart JSON must be an object"))?;

    if object.contains_key("nodes") {
        let flowchart =
            RawFlowchart::deserialize(&parsed).context("invalid node list in flowchart")?;
        return NodeGraph::new(flowchart.entry, flowchart.nodes)
            .context("flowchart failed validation");
    }

    let mut nodes = Vec::with_capacity(object.len());
    for (key, value) in object {
        let node = Node::deserialize(value)
            .with_context(|| format!("invalid flowchart node `{key}`"))?;
        if node.id() != key {
            return Err(anyhow!(
                "flowchart key `{key}` does not match node id `{}`",
                node.id()
            ));
        }
        nodes.push(node);
    }

    NodeGraph::new(DEFAULT_ENTRY_ID, nodes).context("flowchart failed validation")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::flow::graph::{Icon, Severity};

    const LISTED: &str = r#"{
        "entry": "start",
        "nodes": [
            {
                "id": "start",
                "type": "decision",
                "icon": "power",
                "question": "Are any LEDs visible?",
                "yes": "ok",
                "no": "power_issue",
                "noLabel": "Nothing lit"
            },
            {
                "id": "power_issue",
                "type": "resolution",
                "icon": "sparkles",
                "title": "Power Delivery Issue",
                "severity": "critical",
                "steps": ["Try a 12V supply"],
                "techNote": "802.3af provides 15.4W",
                "nextCheck": "start"
            },
            {
                "id": "ok",
                "type": "success",
                "icon": "success",
                "title": "Done",
                "message": "Working",
                "links": [{ "label": "Docs", "url": "https://support.cyanview.com" }]
            }
        ]
    }"#;

    #[test]
    fn parses_listed_layout() {
        let graph = parse_flowchart(LISTED).expect("valid flowchart");
        assert_eq!(graph.entry_id(), "start");
        assert_eq!(graph.node_count(), 3);

        let Some(Node::Decision(start)) = graph.get("start") else {
            panic!("decision expected");
        };
        assert_eq!(start.icon, Icon::Power);
        assert_eq!(start.yes_label(), "Yes");
        assert_eq!(start.no_label(), "Nothing lit");

        let Some(Node::Resolution(issue)) = graph.get("power_issue") else {
            panic!("resolution expected");
        };
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.icon, Icon::Info, "unknown icons fall back to info");
        assert_eq!(issue.tech_note.as_deref(), Some("802.3af provides 15.4W"));
        assert_eq!(issue.next_check.as_deref(), Some("start"));
    }

    #[test]
    fn parses_keyed_layout() {
        let raw = r#"{
            "entry": {
                "id": "entry",
                "type": "entry",
                "title": "What issue?",
                "options": [{ "label": "Power", "target": "fix" }]
            },
            "fix": {
                "id": "fix",
                "type": "resolution",
                "title": "Contact sales",
                "steps": [],
                "nextCheck": null
            }
        }"#;

        let graph = parse_flowchart(raw).expect("valid flowchart");
        assert_eq!(graph.entry_id(), "entry");
        let Some(Node::Resolution(fix)) = graph.get("fix") else {
            panic!("resolution expected");
        };
        assert_eq!(fix.severity, Severity::Info);
        assert_eq!(fix.next_check, None);
    }

    #[test]
    fn keyed_layout_rejects_mismatched_ids() {
        let raw = r#"{
            "entry": { "id": "other", "type": "success", "title": "t", "message": "m" }
        }"#;
        let error = parse_flowchart(raw).expect_err("mismatched key");
        assert!(error.to_string().contains("does not match"));
    }

    #[test]
    fn reports_validation_failures() {
        let raw = r#"{
            "nodes": [
                { "id": "entry", "type": "decision", "question": "q", "yes": "a", "no": "entry" }
            ]
        }"#;
        let error = parse_flowchart(raw).expect_err("dangling yes branch");
        assert!(format!("{error:#}").contains("points at unknown node `a`"));
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(parse_flowchart("[]").is_err());
        assert!(parse_flowchart("not json").is_err());
    }
}
