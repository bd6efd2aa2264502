// Dashboard page domain model
use serde::Serialize;

/// A page composed from registered widgets, referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub path: String,
    pub title: String,
    pub widgets: Vec<String>,
}

impl Page {
    pub fn new(path: impl Into<String>, title: impl Into<String>, widgets: Vec<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            widgets,
        }
    }
}
