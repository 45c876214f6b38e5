//! Action Dispatcher：执行解析后的动作，返回观察文本与是否为最终回答
//!
//! 检索失败（未命中或传输错误）一律转为哨兵观察，不会中断 trial。

use std::sync::Arc;

use crate::agent::action::Action;
use crate::agent::policy::AgentKind;
use crate::agent::state::AgentState;
use crate::retrieval::{
    fuzzy_lookup, keyword_lookup, Docstore, LookupMode, LookupOptions, RetrievalError,
};

pub const CANNOT_FIND_PAGE: &str = "<CANNOT FIND THAT PAGE>";
pub const SHOULD_SEARCH_FIRST: &str = "<SHOULD SEARCH FIRST>";
pub const NEED_SEARCH_KEYWORD: &str = "<NEED PROVIDE SEARCH KEYWORD>";
pub const NO_RELEVANT_CONTENT: &str = "<NO RELEVANT CONTENT>";
pub const REACT_USAGE_HINT: &str =
    "<INVALID ACTION> Valid Actions are Lookup[<topic>] Search[<topic>] and Finish[<answer>].";
pub const COT_USAGE_HINT: &str = "<INVALID ACTION> Valid Actions are Finish[<answer>].";

/// 一次动作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub observation: String,
    pub is_final: bool,
}

impl Dispatch {
    fn observe(text: impl Into<String>) -> Self {
        Self {
            observation: text.into(),
            is_final: false,
        }
    }
}

pub struct ActionDispatcher {
    docstore: Arc<dyn Docstore>,
    lookup_mode: LookupMode,
    lookup: LookupOptions,
}

impl ActionDispatcher {
    pub fn new(docstore: Arc<dyn Docstore>) -> Self {
        Self {
            docstore,
            lookup_mode: LookupMode::default(),
            lookup: LookupOptions::default(),
        }
    }

    pub fn with_lookup(mut self, mode: LookupMode, options: LookupOptions) -> Self {
        self.lookup_mode = mode;
        self.lookup = options;
        self
    }

    /// 执行动作；Search 成功会缓存文档，Finish 写入 state.answer
    pub async fn dispatch(
        &self,
        action: &Action,
        kind: AgentKind,
        state: &mut AgentState,
    ) -> Dispatch {
        let result = match (kind, action) {
            (_, Action::Finish(answer)) => {
                state.answer = Some(answer.clone());
                Dispatch {
                    observation: answer.clone(),
                    is_final: true,
                }
            }
            (AgentKind::React, Action::Search(entity)) => self.search(entity, state).await,
            (AgentKind::React, Action::Lookup(keyword)) => self.lookup(keyword, state),
            (AgentKind::React, _) => Dispatch::observe(REACT_USAGE_HINT),
            (AgentKind::Cot, _) => Dispatch::observe(COT_USAGE_HINT),
        };
        tracing::debug!(action = %action, is_final = result.is_final, "action dispatched");
        result
    }

    async fn search(&self, entity: &str, state: &mut AgentState) -> Dispatch {
        match self.docstore.search(entity).await {
            Ok(document) => {
                state.last_document = Some(document.clone());
                state.lookup_cursor = None;
                Dispatch::observe(document)
            }
            Err(e @ RetrievalError::NotFound { .. }) => {
                tracing::debug!(entity, error = %e, "search missed");
                Dispatch::observe(CANNOT_FIND_PAGE)
            }
            Err(e) => {
                tracing::warn!(entity, error = %e, "search failed");
                Dispatch::observe(CANNOT_FIND_PAGE)
            }
        }
    }

    fn lookup(&self, keyword: &str, state: &mut AgentState) -> Dispatch {
        let Some(document) = state.last_document.as_deref() else {
            return Dispatch::observe(SHOULD_SEARCH_FIRST);
        };
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Dispatch::observe(NEED_SEARCH_KEYWORD);
        }
        let hit = match self.lookup_mode {
            LookupMode::Fuzzy => fuzzy_lookup(document, keyword, &self.lookup),
            LookupMode::Keyword => keyword_lookup(document, keyword, &mut state.lookup_cursor),
        };
        Dispatch::observe(hit.unwrap_or_else(|| NO_RELEVANT_CONTENT.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::InMemoryDocstore;
    use async_trait::async_trait;

    struct UnreachableDocstore;

    #[async_trait]
    impl Docstore for UnreachableDocstore {
        async fn search(&self, _entity: &str) -> Result<String, RetrievalError> {
            Err(RetrievalError::Transport("HTTP 503".into()))
        }
    }

    fn dispatcher() -> ActionDispatcher {
        let store = InMemoryDocstore::new()
            .with_page("Elements", "The sky is blue. Water is wet. Fire is hot.");
        ActionDispatcher::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_lookup_before_search() {
        let mut state = AgentState::new("Q?", "A");
        let before = state.clone();
        let out = dispatcher()
            .dispatch(&Action::Lookup("cat".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out, Dispatch::observe(SHOULD_SEARCH_FIRST));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_search_then_lookup() {
        let d = dispatcher();
        let mut state = AgentState::new("Q?", "A");
        let out = d
            .dispatch(&Action::Search("elements".into()), AgentKind::React, &mut state)
            .await;
        assert!(!out.is_final);
        assert_eq!(state.last_document.as_deref(), Some(out.observation.as_str()));

        let out = d
            .dispatch(&Action::Lookup("water".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, "The sky is blue. Water is wet. Fire is hot.");

        let out = d
            .dispatch(&Action::Lookup("   ".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, NEED_SEARCH_KEYWORD);

        let out = d
            .dispatch(&Action::Lookup("quantum chromodynamics".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, NO_RELEVANT_CONTENT);
    }

    #[tokio::test]
    async fn test_search_miss_is_sentinel() {
        let mut state = AgentState::new("Q?", "A");
        let out = dispatcher()
            .dispatch(&Action::Search("Atlantis".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, CANNOT_FIND_PAGE);
        assert_eq!(state.last_document, None);
    }

    #[tokio::test]
    async fn test_keyword_mode_cursor_resets_on_search() {
        let d = dispatcher().with_lookup(LookupMode::Keyword, LookupOptions::default());
        let mut state = AgentState::new("Q?", "A");
        d.dispatch(&Action::Search("Elements".into()), AgentKind::React, &mut state).await;
        let out = d
            .dispatch(&Action::Lookup("is".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, "(Result 1 / 3) The sky is blue.");
        let out = d
            .dispatch(&Action::Lookup("is".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, "(Result 2 / 3) Water is wet.");

        d.dispatch(&Action::Search("Elements".into()), AgentKind::React, &mut state).await;
        let out = d
            .dispatch(&Action::Lookup("is".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out.observation, "(Result 1 / 3) The sky is blue.");
    }

    #[tokio::test]
    async fn test_finish_and_invalid_actions() {
        let d = dispatcher();
        let mut state = AgentState::new("Q?", "A");
        let out = d
            .dispatch(&Action::Finish("Paris".into()), AgentKind::Cot, &mut state)
            .await;
        assert!(out.is_final);
        assert_eq!(state.answer.as_deref(), Some("Paris"));

        let out = d
            .dispatch(&Action::Search("Paris".into()), AgentKind::Cot, &mut state)
            .await;
        assert_eq!(out.observation, COT_USAGE_HINT);

        let unknown = Action::Unknown {
            name: "Think".into(),
            argument: "x".into(),
        };
        let out = d.dispatch(&unknown, AgentKind::React, &mut state).await;
        assert_eq!(out.observation, REACT_USAGE_HINT);
        assert!(!out.is_final);
    }

    #[tokio::test]
    async fn test_search_transport_failure_is_sentinel() {
        let d = ActionDispatcher::new(Arc::new(UnreachableDocstore));
        let mut state = AgentState::new("Q?", "A");
        let out = d
            .dispatch(&Action::Search("Paris".into()), AgentKind::React, &mut state)
            .await;
        assert_eq!(out, Dispatch::observe(CANNOT_FIND_PAGE));
        assert_eq!(state.last_document, None);
    }
}
