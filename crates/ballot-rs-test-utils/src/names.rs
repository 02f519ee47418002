use ballot_rs_comments::DisplayNames;
use std::collections::HashMap;

/// Identity lookup backed by a fixed map; unknown ids echo back.
#[derive(Clone, Default)]
pub struct StubNames {
    names: HashMap<String, String>,
}

impl StubNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, author: &str, name: &str) -> Self {
        self.names.insert(author.to_string(), name.to_string());
        self
    }
}

impl DisplayNames for StubNames {
    fn display_name(&self, author: &str) -> String {
        self.names
            .get(author)
            .cloned()
            .unwrap_or_else(|| author.to_string())
    }
}
