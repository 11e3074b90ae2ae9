pub mod editor_embed;
pub mod footer;
pub mod header;
pub mod loading;
pub mod log_view;
pub mod project_selector;
pub mod scrollbar;
pub mod search;

pub use editor_embed::EditorPanel;
pub use footer::Footer;
pub use header::Header;
pub use loading::LoadingOverlay;
pub use log_view::LogView;
pub use project_selector::ProjectSelector;
pub use search::EntrySearch;
