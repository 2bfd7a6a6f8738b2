use crate::rules::RuleSet;

/// Per-file pipeline driver: keeps the snapshot read at the start
/// untouched, runs every rule against a working copy, and answers whether
/// anything changed so the caller can skip the write entirely.
pub struct MigrationEditor {
    original: String,
    working: String,
}

impl MigrationEditor {
    pub fn new(content: &str) -> Self {
        Self {
            original: content.to_string(),
            working: content.to_string(),
        }
    }

    /// Run the unscoped signature rules in order, then the line-scoped
    /// return pass. Rules that match nothing are the expected no-op path.
    pub fn apply(&mut self, rules: &RuleSet) {
        for rule in &rules.signature_rules {
            self.working = rule.apply(&self.working);
        }
        self.working = rules.scoped_returns.rewrite(&self.working);
    }

    pub fn changed(&self) -> bool {
        self.original != self.working
    }

    pub fn content(&self) -> &str {
        &self.working
    }

    pub fn into_content(self) -> String {
        self.working
    }
}
