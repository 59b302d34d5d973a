//! Community (group) mention completion
//!
//! Pipeline for one request:
//! 1. Guard: `/join` and `/leave` commands never complete
//! 2. Trigger: find the `+` run under the caret
//! 3. Gather: joined groups with their profiles
//! 4. Match: fuzzy filter by the text typed after `+`
//! 5. Rank and shape: order, map to records, cap at four

use parking_lot::Mutex;
use tracing::{debug, instrument};

use super::config::CompletionConfig;
use super::error::CompletionError;
use super::fuzzy::FuzzyMatcher;
use super::gather::gather_candidates;
use super::guard::is_guarded_command;
use super::provider::{AutocompleteProvider, CompletionRenderer, ContainerStyle, render_completions};
use super::ranking::{CompletionRecord, rank_candidates, shape_completions};
use super::sources::SessionContext;
use super::trigger::{SelectionRange, TriggerMatch, TriggerPattern, detect_trigger};

pub struct CommunityProvider {
    session: SessionContext,
    config: CompletionConfig,
    /// Rebuilt on every request; the lock keeps index replacement and the
    /// query that follows it together when requests overlap
    matcher: Mutex<FuzzyMatcher>,
}

impl CommunityProvider {
    pub fn new(session: SessionContext, config: CompletionConfig) -> Self {
        let matcher = FuzzyMatcher::new(config.fuzzy.clone());
        Self {
            session,
            config,
            matcher: Mutex::new(matcher),
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn display_name(&self) -> String {
        format!("💬 {}", self.config.label)
    }

    pub fn render_completions<R: CompletionRenderer>(
        &self,
        renderer: &R,
        records: &[CompletionRecord],
    ) -> R::Node {
        render_completions(renderer, self, records)
    }
}

#[async_trait::async_trait]
impl AutocompleteProvider for CommunityProvider {
    fn match_trigger(&self, text: &str, selection: SelectionRange, force: bool) -> Option<TriggerMatch> {
        detect_trigger(text, TriggerPattern::COMMUNITY, selection, force)
    }

    #[instrument(skip_all, fields(text_len = text.len(), force = force))]
    async fn get_completions(
        &self,
        text: &str,
        selection: SelectionRange,
        force: bool,
    ) -> Result<Vec<CompletionRecord>, CompletionError> {
        if is_guarded_command(text) {
            debug!("Command input, skipping community completion");
            return Ok(Vec::new());
        }

        let Some(trigger) = self.match_trigger(text, selection, force) else {
            return Ok(Vec::new());
        };

        let candidates = gather_candidates(&self.session, self.config.profile_fetch_timeout()).await?;
        let gathered = candidates.len();

        let matched = {
            let mut matcher = self.matcher.lock();
            matcher.set_objects(candidates);
            matcher.match_query(&trigger.query_text)
        };
        debug!("{} of {} communities match {:?}", matched.len(), gathered, trigger.query_text);

        let ranked = rank_candidates(matched, &trigger.query_text);
        Ok(shape_completions(
            ranked,
            trigger.range,
            self.session.permalinks.as_ref(),
            self.session.thumbnails.as_ref(),
            self.config.avatar_size,
        ))
    }

    fn name(&self) -> String {
        self.display_name()
    }

    fn container_style(&self) -> ContainerStyle {
        ContainerStyle {
            pill: true,
            truncate: true,
        }
    }
}
