//! URL construction for the embedded external editor.
//!
//! The editor is a local code-server instance opened on a workspace folder.
//! The frame it is shown in is sandboxed with a fixed permission set.

use crate::config::EditorConfig;

/// Sandbox tokens granted to the editor frame
pub const SANDBOX_TOKENS: [&str; 5] =
    ["allow-scripts", "allow-same-origin", "allow-forms", "allow-popups", "allow-modals"];

/// Feature-policy permissions delegated to the editor frame
pub const FRAME_PERMISSIONS: [&str; 3] = ["clipboard-read", "clipboard-write", "fullscreen"];

/// Resolved editor embed for one workspace reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorEmbed {
    url: Option<String>,
}

impl EditorEmbed {
    /// Build the embed for `workspace_ref`; absent or empty references yield
    /// an embed with no URL, which renders as the empty placeholder.
    pub fn resolve(endpoint: &EditorConfig, workspace_ref: Option<&str>) -> Self {
        let url = workspace_ref
            .filter(|folder| !folder.is_empty())
            .map(|folder| editor_url(endpoint, folder));
        Self { url }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.url.is_some()
    }

    /// Space-separated sandbox attribute value
    pub fn sandbox() -> String {
        SANDBOX_TOKENS.join(" ")
    }

    /// Semicolon-separated permission policy value
    pub fn allow() -> String {
        FRAME_PERMISSIONS.join("; ")
    }
}

/// `http://<host>:<port>/?folder=<encoded workspace ref>`
pub fn editor_url(endpoint: &EditorConfig, folder: &str) -> String {
    format!("http://{}:{}/?folder={}", endpoint.host, endpoint.port, urlencoding::encode(folder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_folder() {
        let embed = EditorEmbed::resolve(&EditorConfig::default(), Some("/var/tmp/worktrees/task 42"));
        insta::assert_snapshot!(
            embed.url().unwrap(),
            @"http://localhost:3001/?folder=%2Fvar%2Ftmp%2Fworktrees%2Ftask%2042"
        );
        assert!(embed.is_available());
    }

    #[test]
    fn test_custom_endpoint() {
        let endpoint = EditorConfig { host: "10.0.0.5".to_string(), port: 8080 };
        assert_eq!(editor_url(&endpoint, "ws"), "http://10.0.0.5:8080/?folder=ws");
    }

    #[test]
    fn test_missing_reference_has_no_url() {
        assert!(!EditorEmbed::resolve(&EditorConfig::default(), None).is_available());
        assert!(!EditorEmbed::resolve(&EditorConfig::default(), Some("")).is_available());
    }

    #[test]
    fn test_whitespace_reference_is_still_a_folder() {
        let embed = EditorEmbed::resolve(&EditorConfig::default(), Some("  "));
        assert_eq!(embed.url(), Some("http://localhost:3001/?folder=%20%20"));
    }

    #[test]
    fn test_frame_policy_strings() {
        assert_eq!(
            EditorEmbed::sandbox(),
            "allow-scripts allow-same-origin allow-forms allow-popups allow-modals"
        );
        assert_eq!(EditorEmbed::allow(), "clipboard-read; clipboard-write; fullscreen");
    }
}
