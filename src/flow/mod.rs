mod error;
mod graph;
mod load;
mod navigator;
mod parse;
mod reference;

pub use graph::{
    DecisionNode, EntryNode, Icon, Node, NodeGraph, ResolutionNode, Severity, SuccessNode,
};
pub use load::{ContentSource, WizardContent, load_content};
pub use navigator::{DEFAULT_SETTLE_DELAY_SECS, Navigator};
pub use reference::{LedState, QuickReference, Tone};
