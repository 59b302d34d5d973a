//! Provider interface and registry
//!
//! Each completion source (communities, users, rooms, ...) implements
//! [`AutocompleteProvider`]. The host registers providers in a
//! [`ProviderRegistry`] and asks the registry for completions; the registry is
//! the fail-closed boundary, so the host only ever sees lists, never errors.
//!
//! Rendering stays outside the providers. The host injects a
//! [`CompletionRenderer`] that turns records into its own node type; providers
//! only describe how their results should be laid out.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use super::error::CompletionError;
use super::ranking::CompletionRecord;
use super::trigger::{SelectionRange, TriggerMatch};

/// Layout hints for a provider's result container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerStyle {
    /// Lay rows out as compact pills
    pub pill: bool,
    /// Truncate long rows instead of wrapping
    pub truncate: bool,
}

/// Host-side rendering of completion rows
pub trait CompletionRenderer {
    type Node;

    fn render_row(&self, record: &CompletionRecord) -> Self::Node;

    /// Wrap rendered rows in the provider's container
    fn render_container(&self, style: ContainerStyle, rows: Vec<Self::Node>) -> Self::Node;
}

#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
    /// The trigger run under the selection, if this provider reacts to it
    fn match_trigger(&self, text: &str, selection: SelectionRange, force: bool) -> Option<TriggerMatch>;

    /// Completions for the composer text at `selection`, best first
    async fn get_completions(
        &self,
        text: &str,
        selection: SelectionRange,
        force: bool,
    ) -> Result<Vec<CompletionRecord>, CompletionError>;

    /// Label shown above this provider's results
    fn name(&self) -> String;

    fn container_style(&self) -> ContainerStyle {
        ContainerStyle::default()
    }
}

/// Render a provider's completions with the host's renderer
pub fn render_completions<R: CompletionRenderer>(
    renderer: &R,
    provider: &dyn AutocompleteProvider,
    records: &[CompletionRecord],
) -> R::Node {
    let rows = records.iter().map(|record| renderer.render_row(record)).collect();
    renderer.render_container(provider.container_style(), rows)
}

/// Completions contributed by one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCompletions {
    pub provider: String,
    pub completions: Vec<CompletionRecord>,
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn AutocompleteProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn AutocompleteProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Query every provider concurrently
    ///
    /// Results keep registration order. Providers with no completions are
    /// skipped, and a provider that fails contributes nothing.
    pub async fn get_completions(
        &self,
        text: &str,
        selection: SelectionRange,
        force: bool,
    ) -> Vec<ProviderCompletions> {
        let results = join_all(self.providers.iter().map(|provider| async move {
            (provider, provider.get_completions(text, selection, force).await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(provider, result)| match result {
                Ok(completions) if completions.is_empty() => None,
                Ok(completions) => {
                    debug!("{} returned {} completions", provider.name(), completions.len());
                    Some(ProviderCompletions {
                        provider: provider.name(),
                        completions,
                    })
                }
                Err(e) => {
                    warn!(provider = %provider.name(), error = %e, "Completion request failed");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::error::SourceError;
    use crate::autocomplete::ranking::{AvatarPayload, DisplayPayload};

    fn record(text: &str) -> CompletionRecord {
        CompletionRecord {
            completion_text: text.to_string(),
            insertion_suffix: " ".to_string(),
            link_target: String::new(),
            display_payload: DisplayPayload {
                title: text.to_string(),
                avatar: AvatarPayload {
                    name: text.to_string(),
                    url: None,
                    width: 24,
                    height: 24,
                },
                description: String::new(),
            },
            range: SelectionRange::caret(0),
        }
    }

    struct FixedProvider {
        name: &'static str,
        result: Result<Vec<&'static str>, ()>,
    }

    #[async_trait]
    impl AutocompleteProvider for FixedProvider {
        fn match_trigger(&self, _text: &str, _selection: SelectionRange, _force: bool) -> Option<TriggerMatch> {
            None
        }

        async fn get_completions(
            &self,
            _text: &str,
            _selection: SelectionRange,
            _force: bool,
        ) -> Result<Vec<CompletionRecord>, CompletionError> {
            match &self.result {
                Ok(texts) => Ok(texts.iter().map(|t| record(t)).collect()),
                Err(()) => Err(CompletionError::MembershipUnavailable(SourceError::Unavailable(
                    "offline".to_string(),
                ))),
            }
        }

        fn name(&self) -> String {
            self.name.to_string()
        }

        fn container_style(&self) -> ContainerStyle {
            ContainerStyle { pill: true, truncate: false }
        }
    }

    #[tokio::test]
    async fn test_registry_fails_closed_and_keeps_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(FixedProvider { name: "first", result: Ok(vec!["a", "b"]) }));
        registry.register(Arc::new(FixedProvider { name: "broken", result: Err(()) }));
        registry.register(Arc::new(FixedProvider { name: "empty", result: Ok(vec![]) }));
        registry.register(Arc::new(FixedProvider { name: "last", result: Ok(vec!["c"]) }));

        let groups = registry.get_completions("text", SelectionRange::caret(4), false).await;

        let names: Vec<&str> = groups.iter().map(|g| g.provider.as_str()).collect();
        assert_eq!(names, vec!["first", "last"]);
        assert_eq!(groups[0].completions.len(), 2);
        assert_eq!(groups[1].completions[0].completion_text, "c");
    }

    struct TextRenderer;

    impl CompletionRenderer for TextRenderer {
        type Node = String;

        fn render_row(&self, record: &CompletionRecord) -> String {
            record.display_payload.title.clone()
        }

        fn render_container(&self, style: ContainerStyle, rows: Vec<String>) -> String {
            format!("[pill={}] {}", style.pill, rows.join(", "))
        }
    }

    #[test]
    fn test_render_uses_provider_style() {
        let provider = FixedProvider { name: "p", result: Ok(vec![]) };
        let rendered = render_completions(&TextRenderer, &provider, &[record("x"), record("y")]);
        assert_eq!(rendered, "[pill=true] x, y");
    }
}
