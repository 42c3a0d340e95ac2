mod fps;
mod node_card;
mod panels;
mod progress;
mod reference;
mod search;

pub(super) use search::SearchCache;
