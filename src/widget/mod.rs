//! One chat widget instance.
//!
//! Submit flow: record the user turn, show it, open a placeholder, snapshot
//! the page context, send `{message, context, history}`, then resolve the
//! placeholder and record the assistant turn.
//!
//! [`Widget::submit`] runs the whole flow. [`Widget::begin_submit`] and
//! [`Widget::complete_submit`] split it around the network call so several
//! sends can be in flight at once; each resolves only its own placeholder.

use crate::config::Config;
use crate::context::{ContextExtractor, ContextRefresh};
use crate::conversation::{ConversationLog, Message, Role};
use crate::error::{HannahError, TransportError};
use crate::page::{Page, PageSource};
use crate::panel::{ChatPanel, EntryId, NullView, PanelView, ReplyHandle};
use crate::render::Renderer;
use crate::transport::{ChatRequest, ChatTransport};
use std::sync::Arc;

/// A send that has been recorded and shown but not yet answered.
#[derive(Debug)]
pub struct PendingReply {
    handle: ReplyHandle,
    pub request: ChatRequest,
}

impl PendingReply {
    pub fn entry(&self) -> EntryId {
        self.handle.entry()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input: nothing recorded, nothing sent.
    Ignored,
    /// The endpoint answered. `answer` may be empty.
    Answered { entry: EntryId, answer: String },
    Failed { entry: EntryId, error: TransportError },
}

pub struct Widget<V: PanelView = NullView> {
    extractor: ContextExtractor,
    history_limit: Option<usize>,
    log: ConversationLog,
    panel: ChatPanel<V>,
    transport: Arc<dyn ChatTransport>,
    page: Box<dyn PageSource>,
    load_context: Option<String>,
}

impl<V: PanelView> Widget<V> {
    /// Build a widget bound to `page` and `transport`. Takes the load-time
    /// context snapshot when the config asks for one.
    pub async fn mount(
        config: &Config,
        transport: Arc<dyn ChatTransport>,
        page: Box<dyn PageSource>,
        view: V,
    ) -> Result<Self, HannahError> {
        let renderer = Renderer::from_config(&config.linkify)?;
        let mut widget = Self {
            extractor: ContextExtractor::new(config.context.clone(), config.persona.clone()),
            history_limit: config.transport.history_window(),
            log: ConversationLog::new(),
            panel: ChatPanel::new(renderer, view),
            transport,
            page,
            load_context: None,
        };

        let wants_load_snapshot = config.context.refresh == ContextRefresh::OnLoad;
        if wants_load_snapshot || config.context.seed_history {
            let context = widget.snapshot_context().await;
            if config.context.seed_history {
                widget.log = ConversationLog::seeded(context.clone());
            }
            if wants_load_snapshot {
                widget.load_context = Some(context);
            }
        }

        tracing::info!(
            transport = widget.transport.name(),
            refresh = %config.context.refresh,
            seeded = config.context.seed_history,
            "chat widget mounted"
        );
        Ok(widget)
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn panel(&self) -> &ChatPanel<V> {
        &self.panel
    }

    pub fn open(&mut self) {
        self.panel.open();
    }

    pub fn close(&mut self) {
        self.panel.close();
    }

    pub fn toggle(&mut self) {
        self.panel.toggle();
    }

    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Context string for the current state of the page. Never fails: an
    /// unreadable page is treated as empty.
    pub async fn snapshot_context(&self) -> String {
        let html = match self.page.load().await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(error = %err, "page unavailable, using empty context");
                String::new()
            }
        };

        let mut page = Page::parse(&html);
        if let Some(location) = self.page.location() {
            page = page.with_location(location);
        }
        self.extractor.context_string(&page)
    }

    /// Full submit: record, send, render.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let Some(pending) = self.begin_submit(input).await else {
            return SubmitOutcome::Ignored;
        };
        let transport = self.transport();
        let result = transport.send(&pending.request).await;
        self.complete_submit(pending, result)
    }

    /// First half of a submit. `None` for blank input, in which case nothing
    /// was recorded or shown.
    pub async fn begin_submit(&mut self, input: &str) -> Option<PendingReply> {
        let message = input.trim();
        if message.is_empty() {
            tracing::debug!("ignoring blank submission");
            return None;
        }

        self.log.append(Message::user(message));
        self.panel.show_message(message, Role::User);
        let handle = self.panel.begin_reply();

        let context = match &self.load_context {
            Some(context) => context.clone(),
            None => self.snapshot_context().await,
        };
        let history = self.log.snapshot(self.history_limit);

        Some(PendingReply {
            handle,
            request: ChatRequest {
                message: message.to_string(),
                context,
                history,
            },
        })
    }

    /// Second half of a submit. Every answer is recorded, empty ones too, while
    /// the panel shows the fallback bubble for them. Errors are shown but never
    /// recorded.
    pub fn complete_submit(
        &mut self,
        pending: PendingReply,
        result: Result<String, TransportError>,
    ) -> SubmitOutcome {
        let PendingReply { handle, .. } = pending;
        let entry = handle.entry();

        match result {
            Ok(answer) => {
                self.panel.resolve_reply(handle, Ok(&answer));
                self.log.append(Message::assistant(answer.clone()));
                SubmitOutcome::Answered { entry, answer }
            }
            Err(error) => {
                tracing::warn!(error = %error, status = ?error.status(), "chat send failed");
                self.panel.resolve_reply(handle, Err(&error));
                SubmitOutcome::Failed { entry, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use crate::panel::{EMPTY_REPLY_FALLBACK, ERROR_PREFIX, RecordingView};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<String, TransportError>>>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Result<String, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<ChatRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, request: &ChatRequest) -> Result<String, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    const HTML: &str =
        r#"<html><head><title>Secure Tax</title></head><body><p>Open 9 to 5.</p></body></html>"#;

    async fn widget(
        config: &Config,
        transport: Arc<ScriptedTransport>,
    ) -> Widget<RecordingView> {
        Widget::mount(
            config,
            transport,
            Box::new(StaticPage::new(HTML)),
            RecordingView::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let transport = ScriptedTransport::with(vec![]);
        let mut w = widget(&Config::default(), transport.clone()).await;

        assert_eq!(w.submit("   \n\t").await, SubmitOutcome::Ignored);
        assert!(w.log().is_empty());
        assert!(w.panel().entries().is_empty());
        assert!(transport.seen().is_empty());
    }

    #[tokio::test]
    async fn answer_is_rendered_and_logged() {
        let transport = ScriptedTransport::with(vec![Ok("Call us at 407-951-6379".into())]);
        let mut w = widget(&Config::default(), transport.clone()).await;

        let outcome = w.submit("  What's your number? ").await;
        let SubmitOutcome::Answered { entry, answer } = outcome else {
            panic!("expected answer, got {outcome:?}");
        };
        assert_eq!(answer, "Call us at 407-951-6379");

        let bubble = w.panel().entry(entry).unwrap();
        assert!(bubble.markup.contains("href=\"tel:+14079516379\""));
        assert!(bubble.markup.contains(">407-951-6379</a>"));

        let roles: Vec<_> = w.log().iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);

        let sent = transport.seen();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "What's your number?");
        assert!(sent[0].context.contains("Open 9 to 5."));
        assert_eq!(sent[0].history, vec![Message::user("What's your number?")]);
    }

    #[tokio::test]
    async fn two_sends_log_four_turns_in_order() {
        let transport = ScriptedTransport::with(vec![Ok("a1".into()), Ok("a2".into())]);
        let mut w = widget(&Config::default(), transport.clone()).await;

        w.submit("q1").await;
        w.submit("q2").await;

        let log: Vec<_> = w.log().iter().cloned().collect();
        assert_eq!(
            log,
            vec![
                Message::user("q1"),
                Message::assistant("a1"),
                Message::user("q2"),
                Message::assistant("a2"),
            ]
        );
        let second = &transport.seen()[1];
        assert_eq!(second.history, log[..3].to_vec());
    }

    #[tokio::test]
    async fn history_window_bounds_payload() {
        let transport = ScriptedTransport::with(vec![
            Ok("a1".into()),
            Ok("a2".into()),
            Ok("a3".into()),
        ]);
        let mut config = Config::default();
        config.transport.history_limit = 2;
        let mut w = widget(&config, transport.clone()).await;

        for q in ["q1", "q2", "q3"] {
            w.submit(q).await;
        }
        let last = transport.seen().pop().unwrap();
        assert_eq!(
            last.history,
            vec![Message::assistant("a2"), Message::user("q3")]
        );
        assert_eq!(w.log().len(), 6);
    }

    #[tokio::test]
    async fn failure_renders_notice_and_skips_log() {
        let transport = ScriptedTransport::with(vec![Err(TransportError::RequestFailed {
            status: 500,
            message: "Model overloaded".into(),
        })]);
        let mut w = widget(&Config::default(), transport).await;

        let outcome = w.submit("hello").await;
        let SubmitOutcome::Failed { entry, .. } = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(
            w.panel().entry(entry).unwrap().text,
            format!("{ERROR_PREFIX}Model overloaded")
        );
        assert_eq!(w.log().len(), 1);
    }

    #[tokio::test]
    async fn empty_answer_shows_fallback() {
        let transport = ScriptedTransport::with(vec![Ok(String::new())]);
        let mut w = widget(&Config::default(), transport).await;

        let SubmitOutcome::Answered { entry, .. } = w.submit("hello").await else {
            panic!("expected answer");
        };
        assert_eq!(w.panel().entry(entry).unwrap().text, EMPTY_REPLY_FALLBACK);
        assert_eq!(
            w.log().iter().cloned().collect::<Vec<_>>(),
            vec![Message::user("hello"), Message::assistant("")]
        );
    }

    #[tokio::test]
    async fn concurrent_sends_resolve_their_own_placeholders() {
        let transport = ScriptedTransport::with(vec![]);
        let mut w = widget(&Config::default(), transport).await;

        let first = w.begin_submit("first").await.unwrap();
        let second = w.begin_submit("second").await.unwrap();
        let (first_entry, second_entry) = (first.entry(), second.entry());

        w.complete_submit(second, Ok("reply to second".into()));
        w.complete_submit(first, Ok("reply to first".into()));

        assert_eq!(w.panel().entry(first_entry).unwrap().text, "reply to first");
        assert_eq!(w.panel().entry(second_entry).unwrap().text, "reply to second");
        let newest = w.panel().entries().last().unwrap().id;
        assert_eq!(w.panel().scrolled_to(), Some(newest));
    }

    #[tokio::test]
    async fn seeded_on_load_widget_reuses_context() {
        let transport = ScriptedTransport::with(vec![Ok("hi".into())]);
        let mut config = Config::default();
        config.context.refresh = ContextRefresh::OnLoad;
        config.context.seed_history = true;
        let mut w = widget(&config, transport.clone()).await;

        assert_eq!(w.log().len(), 1);
        let seed = w.log().iter().next().unwrap().clone();
        assert_eq!(seed.role(), Role::System);

        w.submit("hello").await;
        let sent = transport.seen().pop().unwrap();
        assert_eq!(sent.context, seed.content());
        assert_eq!(sent.history[0], seed);
    }

    #[tokio::test]
    async fn panel_controls_pass_through() {
        let transport = ScriptedTransport::with(vec![]);
        let mut w = widget(&Config::default(), transport).await;
        w.open();
        assert!(w.panel().is_open());
        w.toggle();
        assert!(!w.panel().is_open());
        w.open();
        w.close();
        assert!(!w.panel().is_open());
    }
}
