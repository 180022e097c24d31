use serde::{Deserialize, Serialize};

/// Body of the GitLab project variable update call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct GitlabVariable {
    pub key: String,
    pub value: String,
}

impl GitlabVariable {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
