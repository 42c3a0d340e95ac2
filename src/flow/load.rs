use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::graph::NodeGraph;
use super::parse::parse_flowchart;
use super::reference::QuickReference;

const BUNDLED_FLOWCHART: &str = include_str!("../../assets/flowchart.json");
const BUNDLED_REFERENCE: &str = include_str!("../../assets/quick_reference.json");

/// Where the wizard content comes from.
#[derive(Clone, Debug, Default)]
pub struct ContentSource {
    pub flowchart: Option<PathBuf>,
    pub reference: Option<PathBuf>,
}

impl ContentSource {
    fn describe_flowchart(&self) -> String {
        self.flowchart
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "bundled".to_owned())
    }
}

/// Validated wizard content, ready to hand to a navigator.
#[derive(Clone, Debug)]
pub struct WizardContent {
    pub graph: Arc<NodeGraph>,
    pub reference: QuickReference,
}

pub fn load_content(source: &ContentSource) -> Result<WizardContent> {
    let raw_flowchart = match &source.flowchart {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read flowchart {}", path.display()))?,
        None => BUNDLED_FLOWCHART.to_owned(),
    };
    let graph = parse_flowchart(&raw_flowchart)
        .with_context(|| format!("failed to load flowchart ({})", source.describe_flowchart()))?;

    let raw_reference = match &source.reference {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read quick reference {}", path.display()))?,
        None => BUNDLED_REFERENCE.to_owned(),
    };
    let reference: QuickReference =
        serde_json::from_str(&raw_reference).context("invalid quick reference JSON")?;

    let unreachable = graph.unreachable_ids();
    if !unreachable.is_empty() {
        warn!(?unreachable, "flowchart declares nodes that cannot be reached from the entry");
    }

    info!(
        source = %source.describe_flowchart(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "flowchart loaded"
    );

    Ok(WizardContent {
        graph: Arc::new(graph),
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::graph::Node;

    #[test]
    fn bundled_content_loads_and_validates() {
        let content = load_content(&ContentSource::default()).expect("bundled content is valid");
        let graph = &content.graph;

        assert_eq!(graph.entry_id(), "entry");
        assert!(graph.node_count() > 50);
        assert!(matches!(graph.get("entry"), Some(Node::Entry(_))));
        assert!(matches!(graph.get("success"), Some(Node::Success(_))));
        assert!(!content.reference.ports.is_empty());
        assert!(content.reference.support_url.is_some());
    }

    #[test]
    fn bundled_entry_offers_three_topics() {
        let content = load_content(&ContentSource::default()).expect("bundled content is valid");
        let Some(Node::Entry(entry)) = content.graph.get("entry") else {
            panic!("entry node expected");
        };
        assert_eq!(entry.options.len(), 3);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let source = ContentSource {
            flowchart: Some(PathBuf::from("/nonexistent/flowchart.json")),
            reference: None,
        };
        let error = load_content(&source).expect_err("file does not exist");
        assert!(error.to_string().contains("/nonexistent/flowchart.json"));
    }
}
