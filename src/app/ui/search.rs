use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::flow::NodeGraph;

use super::super::render_utils::{TEXT_FAINT, icon_glyph};
use super::super::{ViewModel, WizardAction};

const MAX_SEARCH_HITS: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct SearchHit {
    pub node_id: String,
    pub label: String,
    pub score: i64,
}

pub(in crate::app) struct SearchCache {
    query: String,
    hits: Vec<SearchHit>,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best-scoring nodes for `query`, ties broken by declaration order.
fn search_nodes(graph: &NodeGraph, query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits = graph
        .iter()
        .filter_map(|node| {
            let label_score = fuzzy_match_score(&matcher, &node.label(), query);
            let text_score = fuzzy_match_score(&matcher, &node.search_text(), query);
            let score = label_score.max(text_score)?;
            Some(SearchHit {
                node_id: node.id().to_owned(),
                label: node.label(),
                score,
            })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|left, right| right.score.cmp(&left.score));
    hits.truncate(limit);
    hits
}

impl ViewModel {
    fn search_hits(&mut self) -> &[SearchHit] {
        let stale = self
            .search_cache
            .as_ref()
            .is_none_or(|cache| cache.query != self.search);
        if stale {
            self.search_cache = Some(SearchCache {
                query: self.search.clone(),
                hits: search_nodes(self.navigator.graph(), &self.search, MAX_SEARCH_HITS),
            });
        }

        self.search_cache
            .as_ref()
            .map(|cache| cache.hits.as_slice())
            .unwrap_or_default()
    }

    pub(in crate::app) fn draw_search_box(&mut self, ui: &mut Ui) {
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Search steps...")
                .desired_width(220.0),
        );
    }

    /// Result list under the search box; picking a hit is an ordinary navigation.
    pub(in crate::app) fn draw_search_results(&mut self, ui: &mut Ui) -> Option<WizardAction> {
        if self.search.trim().is_empty() {
            return None;
        }

        let graph = self.navigator.graph().clone();
        let mut action = None;
        let hits = self.search_hits().to_vec();

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            if hits.is_empty() {
                ui.label(RichText::new("No matching steps.").color(TEXT_FAINT));
                return;
            }

            for hit in &hits {
                let icon = graph.get(&hit.node_id).map(|node| icon_glyph(node.icon())).unwrap_or("");
                if ui.selectable_label(false, format!("{icon}  {}", hit.label)).clicked() {
                    action = Some(WizardAction::OpenSearchHit(hit.node_id.clone()));
                }
            }
        });

        ui.add_space(12.0);
        action
    }
}
