use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::error::GraphError;
use crate::util::truncate_label;

const DECISION_LABEL_CHARS: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Power,
    Network,
    Terminal,
    Settings,
    Shield,
    Alert,
    Monitor,
    Search,
    Wifi,
    Camera,
    Cpu,
    Success,
    Cloud,
    #[default]
    #[serde(other)]
    Info,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    #[default]
    Info,
    Success,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EntryOption {
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExternalLink {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EntryNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: Icon,
    pub options: Vec<EntryOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionNode {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub icon: Icon,
    #[serde(rename = "yes")]
    pub yes_target: String,
    #[serde(rename = "no")]
    pub no_target: String,
    #[serde(default)]
    pub yes_label: Option<String>,
    #[serde(default)]
    pub no_label: Option<String>,
}

impl DecisionNode {
    pub fn yes_label(&self) -> &str {
        self.yes_label.as_deref().unwrap_or("Yes")
    }

    pub fn no_label(&self) -> &str {
        self.no_label.as_deref().unwrap_or("No")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub icon: Icon,
    pub steps: Vec<String>,
    #[serde(default)]
    pub tech_note: Option<String>,
    /// `None` marks a terminal resolution with no continue control.
    #[serde(default)]
    pub next_check: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SuccessNode {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub links: Vec<ExternalLink>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Entry(EntryNode),
    Decision(DecisionNode),
    Resolution(ResolutionNode),
    Success(SuccessNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Self::Entry(node) => &node.id,
            Self::Decision(node) => &node.id,
            Self::Resolution(node) => &node.id,
            Self::Success(node) => &node.id,
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Self::Entry(node) => node.icon,
            Self::Decision(node) => node.icon,
            Self::Resolution(node) => node.icon,
            Self::Success(_) => Icon::Success,
        }
    }

    /// Breadcrumb label: the title, or the shortened question for decisions.
    pub fn label(&self) -> String {
        match self {
            Self::Entry(node) => node.title.clone(),
            Self::Decision(node) => truncate_label(&node.question, DECISION_LABEL_CHARS),
            Self::Resolution(node) => node.title.clone(),
            Self::Success(node) => node.title.clone(),
        }
    }

    /// Outgoing edges as `(field, target)` pairs, in display order.
    pub fn targets(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Entry(node) => node
                .options
                .iter()
                .map(|option| ("target", option.target.as_str()))
                .collect(),
            Self::Decision(node) => vec![
                ("yes", node.yes_target.as_str()),
                ("no", node.no_target.as_str()),
            ],
            Self::Resolution(node) => node
                .next_check
                .as_deref()
                .map(|target| vec![("nextCheck", target)])
                .unwrap_or_default(),
            Self::Success(_) => Vec::new(),
        }
    }

    /// Every piece of text a user might search for on this node.
    pub fn search_text(&self) -> String {
        match self {
            Self::Entry(node) => {
                let mut text = node.title.clone();
                for option in &node.options {
                    text.push(' ');
                    text.push_str(&option.label);
                }
                text
            }
            Self::Decision(node) => match &node.hint {
                Some(hint) => format!("{} {hint}", node.question),
                None => node.question.clone(),
            },
            Self::Resolution(node) => {
                let mut text = node.title.clone();
                for step in &node.steps {
                    text.push(' ');
                    text.push_str(step);
                }
                text
            }
            Self::Success(node) => format!("{} {}", node.title, node.message),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeGraph {
    entry_id: String,
    nodes: HashMap<String, Node>,
    order: Vec<String>,
}

impl NodeGraph {
    pub fn new(entry_id: impl Into<String>, nodes: Vec<Node>) -> Result<Self, GraphError> {
        let entry_id = entry_id.into();
        if nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut order = Vec::with_capacity(nodes.len());
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id().to_owned();
            if by_id.contains_key(&id) {
                return Err(GraphError::DuplicateNode(id));
            }
            order.push(id.clone());
            by_id.insert(id, node);
        }

        if !by_id.contains_key(&entry_id) {
            return Err(GraphError::MissingEntry(entry_id));
        }

        for id in &order {
            let Some(node) = by_id.get(id) else {
                continue;
            };
            for (field, target) in node.targets() {
                if !by_id.contains_key(target) {
                    return Err(GraphError::DanglingReference {
                        from: id.clone(),
                        field,
                        target: target.to_owned(),
                    });
                }
            }
        }

        Ok(Self {
            entry_id,
            nodes: by_id,
            order,
        })
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.targets().len()).sum()
    }

    /// Nodes in the order they were declared.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Declared ids that cannot be reached from the entry node.
    pub fn unreachable_ids(&self) -> Vec<&str> {
        let mut reached = HashSet::new();
        let mut stack = vec![self.entry_id.as_str()];
        while let Some(id) = stack.pop() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.targets().into_iter().map(|(_, target)| target));
            }
        }

        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| !reached.contains(id))
            .collect()
    }
}
