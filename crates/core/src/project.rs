//! Project records and the navigation routes derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Project identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: ProjectId::new(id), name: name.into() }
    }
}

/// Navigation targets reachable from the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Task list of a project
    ProjectTasks(ProjectId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::ProjectTasks(id) => format!("/projects/{}/tasks", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
