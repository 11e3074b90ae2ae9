/// Actions that can be triggered by terminal events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Scroll by lines; negative is up
    ScrollLines(i64),
    PageUp,
    PageDown,
    ScrollTop,
    /// Jump past the last entry and re-pin
    ScrollBottom,
    NextConversation,
    PrevConversation,
    /// Expand or collapse the structured row nearest the viewport center
    ToggleExpansion,
    ToggleEditor,
    OpenEditor,
    ToggleProjects,
    ProjectUp,
    ProjectDown,
    ProjectSelect,
    ProjectClose,
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,
}
