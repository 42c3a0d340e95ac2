use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("flowchart contains no nodes")]
    Empty,
    #[error("node id `{0}` is declared more than once")]
    DuplicateNode(String),
    #[error("entry node `{0}` does not exist")]
    MissingEntry(String),
    #[error("node `{from}` field `{field}` points at unknown node `{target}`")]
    DanglingReference {
        from: String,
        field: &'static str,
        target: String,
    },
}

/// Reasons a navigation request was ignored.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("a transition is already in flight")]
    Busy,
    #[error("there is no previous step to go back to")]
    EmptyHistory,
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    #[error("breadcrumb {index} is out of range for a path of {len} steps")]
    BreadcrumbOutOfRange { index: usize, len: usize },
}
