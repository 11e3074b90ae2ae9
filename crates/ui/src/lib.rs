pub mod app;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod registry;
pub mod scroll;
pub mod theme;
pub mod view;
pub mod viewport;

pub use app::{App, AppConfig};
pub use event_handler::{EventHandler, InputMode, KeyAction};
pub use registry::{EntriesReader, SharedEntries};
pub use scroll::{Align, FollowOutput, FrameOutcome, FrameScheduler, FrameStamp, ScrollHandle, ScrollPolicy, ScrollTarget};
pub use theme::Theme;
pub use view::{ConversationView, UpdateEffects, ViewState};
pub use viewport::{EventRenderer, RowCache, SummaryEventRenderer, ViewportConfig, VirtualList};
