use regex::{Captures, Regex};

use crate::scope::ScopedReturnPass;

/// A single unscoped rewrite: a pattern applied anywhere in a file, any
/// number of times. Every rule is one-way - its replacement must not
/// re-match its own pattern, so running the migration twice is a no-op.
pub struct SignatureRule {
    pub name: &'static str,
    pattern: Regex,
    replace: Rewrite,
}

enum Rewrite {
    /// Plain capture-group template.
    Template(&'static str),
    /// Callback that may decline a match by returning it verbatim.
    Guarded(fn(&Captures) -> String),
}

impl SignatureRule {
    fn new(name: &'static str, pattern: &str, replace: Rewrite) -> Self {
        Self {
            name,
            // Patterns are compile-time constants, checked by the rule tests.
            pattern: Regex::new(pattern).expect("invalid rule pattern"),
            replace,
        }
    }

    pub fn apply(&self, content: &str) -> String {
        match &self.replace {
            Rewrite::Template(template) => self.pattern.replace_all(content, *template).into_owned(),
            Rewrite::Guarded(guard) => self
                .pattern
                .replace_all(content, |caps: &Captures| guard(caps))
                .into_owned(),
        }
    }

    /// Whether applying this rule to `text` would change it. `check` uses
    /// this instead of a raw pattern match so guarded rules never flag
    /// lines they would leave alone.
    pub fn would_rewrite(&self, text: &str) -> bool {
        self.apply(text) != text
    }
}

/// All rules of the migration, compiled once and shared read-only across
/// every file. Order matters: declarations before call sites, unscoped
/// rules before the scoped return pass.
pub struct RuleSet {
    pub signature_rules: Vec<SignatureRule>,
    pub scoped_returns: ScopedReturnPass,
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            signature_rules: signature_rules(),
            scoped_returns: ScopedReturnPass::new(),
        }
    }

    /// Lines that any unscoped rule would still rewrite, 1-indexed.
    /// Scoped return rewrites are deliberately not scanned here - they
    /// cannot be judged line-by-line, and a stale declaration implies them.
    pub fn stale_lines<'a>(&self, content: &'a str) -> Vec<(usize, &'a str)> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| self.signature_rules.iter().any(|r| r.would_rewrite(line)))
            .map(|(idx, line)| (idx + 1, line))
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

fn signature_rules() -> Vec<SignatureRule> {
    vec![
        // func (c *conn) LoginURL(...) (string, error) { -> (string, []byte, error) {
        // The three-element result no longer matches the two-element pattern.
        SignatureRule::new(
            "login-url-declaration",
            r"(func\s*\([^)]+\)\s*LoginURL\s*\([^)]*\)\s*)\(string,\s*error\)\s*\{",
            Rewrite::Template("${1}(string, []byte, error) {"),
        ),
        // func (c *conn) HandleCallback(s Scopes, r *http.Request) ... {
        //   -> insert `_ []byte` before the request parameter.
        // Any identifier is accepted for the request parameter name.
        SignatureRule::new(
            "handle-callback-declaration",
            r"(func\s*\([^)]+\)\s*HandleCallback\s*\([^,]+),\s*([A-Za-z_][A-Za-z0-9_]*\s+\*http\.Request\)\s*\([^)]+\)\s*\{)",
            Rewrite::Template("${1}, _ []byte, ${2}"),
        ),
        // loginURL, err := conn.LoginURL(...) -> loginURL, _, err := conn.LoginURL(...)
        // Guarded: the widened form re-matches with the bound variable `_`,
        // so the guard declines it.
        SignatureRule::new(
            "login-url-call",
            r"([A-Za-z0-9_]+),\s*err\s*(:=|=)\s*([A-Za-z0-9_]+\.)?LoginURL\(",
            Rewrite::Guarded(widen_login_url_call),
        ),
        // conn.HandleCallback(scopes, req) -> conn.HandleCallback(scopes, nil, req)
        // Requires exactly two comma-free argument segments ending in a bare
        // identifier; the three-argument output cannot satisfy that.
        SignatureRule::new(
            "handle-callback-call",
            r"(HandleCallback\s*\([^,]+),\s*([A-Za-z_][A-Za-z0-9_]*)\)",
            Rewrite::Template("${1}, nil, ${2})"),
        ),
    ]
}

fn widen_login_url_call(caps: &Captures) -> String {
    let var = &caps[1];
    if var == "_" {
        // Already widened: `loginURL, _, err := ...` matches with var `_`.
        return caps[0].to_string();
    }
    let assign = &caps[2];
    let receiver = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    format!("{var}, _, err {assign} {receiver}LoginURL(")
}
