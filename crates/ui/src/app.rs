mod event_loop;
mod keybinds;
mod rendering;

pub use event_loop::run;

use crate::components::{EntrySearch, ProjectSelector};
use crate::event_handler::{InputMode, KeyAction};
use crate::view::{ConversationView, UpdateEffects};
use crate::viewport::{EventRenderer, SummaryEventRenderer, ViewportConfig, VirtualList};

use std::time::Duration;
use tailview_core::{
    ConversationId, EditorConfig, EditorEmbed, EntryKind, Error, HistorySource, HistoryUpdate, Project, Route, Subscription,
    ViewerConfig,
};

/// Everything the application needs from configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub viewer: ViewerConfig,
    pub editor: EditorConfig,
    /// Workspace reference the editor panel opens
    pub workspace: Option<String>,
    pub projects: Vec<Project>,
}

/// Main TUI application
///
/// Owns the active subscription, the conversation view and the virtual
/// list, and wires the list's pinned-state reports back into the view.
pub struct App {
    source: Box<dyn HistorySource>,
    conversations: Vec<ConversationId>,
    active: Option<usize>,
    subscription: Option<Subscription>,
    view: ConversationView,
    list: VirtualList,
    events: Box<dyn EventRenderer>,
    editor: EditorEmbed,
    editor_visible: bool,
    projects: ProjectSelector,
    search: EntrySearch,
    mode: InputMode,
    route: Option<Route>,
    status: Option<String>,
    frame_interval: Duration,
    tick: usize,
    pub should_exit: bool,
}

impl App {
    /// Create the application and subscribe to the first conversation
    pub fn new(config: AppConfig, source: Box<dyn HistorySource>, conversations: Vec<ConversationId>) -> Self {
        let view = ConversationView::new(config.viewer.burst_threshold);
        let search = EntrySearch::new(view.entries_reader());

        let mut app = Self {
            source,
            conversations,
            active: None,
            subscription: None,
            view,
            list: VirtualList::new(ViewportConfig::from(&config.viewer)),
            events: Box::new(SummaryEventRenderer),
            editor: EditorEmbed::resolve(&config.editor, config.workspace.as_deref()),
            editor_visible: false,
            projects: ProjectSelector::new(config.projects),
            search,
            mode: InputMode::Normal,
            route: None,
            status: None,
            frame_interval: Duration::from_millis(config.viewer.frame_interval_ms.max(1)),
            tick: 0,
            should_exit: false,
        };

        if !app.conversations.is_empty() {
            app.switch_conversation(0);
        }
        app
    }

    /// Replace the renderer used for structured events
    pub fn with_event_renderer(mut self, events: Box<dyn EventRenderer>) -> Self {
        self.events = events;
        self
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList {
        &mut self.list
    }

    pub fn conversations(&self) -> &[ConversationId] {
        &self.conversations
    }

    pub fn active_conversation(&self) -> Option<&ConversationId> {
        self.active.and_then(|index| self.conversations.get(index))
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn editor(&self) -> &EditorEmbed {
        &self.editor
    }

    pub fn is_editor_visible(&self) -> bool {
        self.editor_visible
    }

    pub fn projects(&self) -> &ProjectSelector {
        &self.projects
    }

    pub fn search(&self) -> &EntrySearch {
        &self.search
    }

    /// Route chosen in the project selector, if any
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Make `index` the active conversation.
    ///
    /// The view resets synchronously; only then is the old subscription
    /// dropped and a new one opened.
    pub fn switch_conversation(&mut self, index: usize) {
        let Some(conversation) = self.conversations.get(index).cloned() else {
            return;
        };

        self.active = Some(index);
        self.view.switch_to(Some(conversation.clone()));
        self.list.reset();
        self.search.cancel();
        if self.mode == InputMode::Search {
            self.mode = InputMode::Normal;
        }

        if let Some(previous) = self.subscription.take() {
            previous.unsubscribe();
        }
        self.subscription = Some(self.source.subscribe(&conversation));
        self.status = None;
    }

    pub fn cycle_conversation(&mut self, forward: bool) {
        let count = self.conversations.len();
        if count < 2 {
            return;
        }

        let current = self.active.unwrap_or(0);
        let next = if forward { (current + 1) % count } else { (current + count - 1) % count };
        self.switch_conversation(next);
    }

    /// Apply one accumulator emission
    pub fn handle_update(&mut self, update: HistoryUpdate) -> UpdateEffects {
        self.view.on_update(update)
    }

    /// Apply every emission already delivered, without waiting
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Some(update) = self.subscription.as_mut().and_then(Subscription::try_next) {
            self.handle_update(update);
            applied += 1;
        }
        applied
    }

    /// Wait for the next emission of the active subscription
    pub async fn next_update(&mut self) -> Option<HistoryUpdate> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => std::future::pending().await,
        }
    }

    /// The active source stopped delivering
    pub fn source_finished(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            let error = Error::Source(format!("{} closed", subscription.conversation()));
            tracing::warn!(%error, "subscription ended");
            self.status = Some(error.to_string());
        }
    }

    /// Paint-boundary work after a frame was committed: forward the list's
    /// pinned-state report, then run the deferred jump.
    pub fn after_draw(&mut self) {
        if let Some(at_bottom) = self.list.take_bottom_change() {
            self.view.on_bottom_state_change(at_bottom, &mut self.list);
        }
        self.view.run_frame(&mut self.list);
    }

    /// Paint one frame; the virtual list lays out as part of it
    pub fn render(&mut self, frame: &mut ratatui::Frame<'_>) {
        rendering::render(self, frame);
    }

    pub fn handle_event(&mut self, event: &crossterm::event::Event) {
        keybinds::handle_event(self, event);
    }

    pub fn handle_action(&mut self, action: KeyAction) {
        keybinds::handle_action(self, action);
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Structured entry closest to the middle of the viewport
    fn focused_event(&self) -> Option<usize> {
        let entries = self.view.entries();
        let visible = self.list.visible_range();
        if visible.is_empty() {
            return None;
        }

        let middle = visible.start + visible.len() / 2;
        let is_event = |index: usize| entries.get(index).is_some_and(|e| e.kind() == EntryKind::NormalizedEvent);

        (0..visible.len())
            .flat_map(|distance| [middle.checked_sub(distance), Some(middle + distance)])
            .flatten()
            .filter(|index| visible.contains(index))
            .find(|&index| is_event(index))
    }

    fn toggle_focused_expansion(&mut self) {
        let Some(index) = self.focused_event() else {
            return;
        };

        let entries = self.view.entries();
        if let Some(entry) = entries.get(index) {
            let expanded = self.view.toggle_expansion(entry.key());
            tracing::debug!(key = %entry.key(), ?expanded, "toggled expansion");
        }
    }
}
