use regex::Regex;

/// Return-statement shapes recognized inside the `LoginURL` body.
/// Classification is first-match-wins in declaration order; lines matching
/// no shape pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// `return <expr>, nil`
    SuccessPair,
    /// `return "", fmt.Errorf(...)`
    EmptyFormattedError,
    /// `return "", errors.New(...)`
    EmptyConstructedError,
    /// `return "", err`
    EmptyPropagatedError,
}

/// Line-scoped rewrite pass for the `LoginURL` function body. A whole-file
/// regex cannot tell a `return "", err` inside `LoginURL` from the same
/// statement anywhere else, so this pass re-scans the file line by line
/// and only rewrites while the tracker says we are inside the target body.
pub struct ScopedReturnPass {
    entry: Regex,
    success_pair: Regex,
    formatted_error: Regex,
    constructed_error: Regex,
    propagated_error: Regex,
}

impl ScopedReturnPass {
    pub fn new() -> Self {
        Self {
            entry: Regex::new(r"func\s*\([^)]*\)\s*LoginURL\s*\(").expect("invalid entry pattern"),
            success_pair: Regex::new(r"(return\s+[^,]+),\s+nil\s*$").expect("invalid return pattern"),
            formatted_error: Regex::new(r#"(return\s+""),\s+(fmt\.Errorf)"#)
                .expect("invalid return pattern"),
            constructed_error: Regex::new(r#"(return\s+""),\s+(errors\.New)"#)
                .expect("invalid return pattern"),
            propagated_error: Regex::new(r#"(return\s+""),\s+err\s*$"#)
                .expect("invalid return pattern"),
        }
    }

    /// Rewrite the return statements of every `LoginURL` body in `content`.
    pub fn rewrite(&self, content: &str) -> String {
        let mut tracker = BodyTracker::default();
        let mut out = Vec::new();
        for line in content.split('\n') {
            if tracker.observe(line, &self.entry) {
                if let Some(shape) = self.classify(line) {
                    out.push(self.rewrite_line(line, shape));
                    continue;
                }
            }
            out.push(line.to_string());
        }
        out.join("\n")
    }

    pub fn classify(&self, line: &str) -> Option<ReturnShape> {
        if self.success_pair.is_match(line) {
            Some(ReturnShape::SuccessPair)
        } else if self.formatted_error.is_match(line) {
            Some(ReturnShape::EmptyFormattedError)
        } else if self.constructed_error.is_match(line) {
            Some(ReturnShape::EmptyConstructedError)
        } else if self.propagated_error.is_match(line) {
            Some(ReturnShape::EmptyPropagatedError)
        } else {
            None
        }
    }

    /// Insert the new middle `nil` for the given shape. Every rewrite is
    /// one-way: the inserted value breaks the adjacency or end-of-line
    /// requirement its own pattern relies on.
    pub fn rewrite_line(&self, line: &str, shape: ReturnShape) -> String {
        match shape {
            ReturnShape::SuccessPair => self.success_pair.replace(line, "${1}, nil, nil"),
            ReturnShape::EmptyFormattedError => self.formatted_error.replace(line, "${1}, nil, ${2}"),
            ReturnShape::EmptyConstructedError => {
                self.constructed_error.replace(line, "${1}, nil, ${2}")
            }
            ReturnShape::EmptyPropagatedError => self.propagated_error.replace(line, "${1}, nil, err"),
        }
        .into_owned()
    }
}

impl Default for ScopedReturnPass {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks whether the scanner is inside the target function's body.
///
/// Scope exit is exact: the tracker counts brace depth (skipping braces in
/// string, raw string, and rune literals and after `//`) and leaves the
/// body when depth returns to zero. A nested block whose closing brace
/// sits at column zero therefore does not end the scope early. Raw-string
/// state carries across lines; multi-line `/* */` comments are not
/// tracked. At most one scope is active at a time and the tracker resets
/// at file boundaries.
#[derive(Default)]
struct BodyTracker {
    inside: bool,
    opened: bool,
    depth: i32,
    in_raw_string: bool,
}

impl BodyTracker {
    /// Feed one line; returns whether return rewrites apply to it.
    /// The declaration line itself is reported as inside (no return
    /// statement can match on it); the closing line is not.
    fn observe(&mut self, line: &str, entry: &Regex) -> bool {
        if !self.inside {
            if !entry.is_match(line) {
                return false;
            }
            self.inside = true;
            self.opened = false;
            self.depth = 0;
        }
        self.depth += brace_delta(line, &mut self.in_raw_string);
        if self.depth > 0 {
            self.opened = true;
        }
        if self.opened && self.depth <= 0 {
            self.inside = false;
            return false;
        }
        true
    }
}

/// Net brace count of one line, ignoring braces inside `"..."`, `` `...` ``,
/// `'...'`, and everything after `//`. `in_raw_string` persists across
/// lines because backtick strings are the one Go literal that can span them.
fn brace_delta(line: &str, in_raw_string: &mut bool) -> i32 {
    let mut delta = 0;
    let mut chars = line.chars().peekable();
    let mut in_string = false;
    let mut in_rune = false;
    while let Some(c) = chars.next() {
        if *in_raw_string {
            if c == '`' {
                *in_raw_string = false;
            }
            continue;
        }
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if in_rune {
            match c {
                '\\' => {
                    chars.next();
                }
                '\'' => in_rune = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '`' => *in_raw_string = true,
            '\'' => in_rune = true,
            '/' if chars.peek() == Some(&'/') => break,
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_return_shapes_in_order() {
        let pass = ScopedReturnPass::new();
        assert_eq!(
            pass.classify("\treturn u.String(), nil"),
            Some(ReturnShape::SuccessPair)
        );
        // An empty-string success pair is still a success pair.
        assert_eq!(pass.classify("\treturn \"\", nil"), Some(ReturnShape::SuccessPair));
        assert_eq!(
            pass.classify("\t\treturn \"\", fmt.Errorf(\"no state: %v\", state)"),
            Some(ReturnShape::EmptyFormattedError)
        );
        assert_eq!(
            pass.classify("\t\treturn \"\", errors.New(\"no callback\")"),
            Some(ReturnShape::EmptyConstructedError)
        );
        assert_eq!(
            pass.classify("\t\treturn \"\", err"),
            Some(ReturnShape::EmptyPropagatedError)
        );
        assert_eq!(pass.classify("\treturn connector.Identity{}, nil, nil"), None);
        assert_eq!(pass.classify("\tq.Set(\"state\", state)"), None);
    }

    #[test]
    fn rewrites_are_one_way() {
        let pass = ScopedReturnPass::new();
        let cases = [
            "\treturn u.String(), nil",
            "\t\treturn \"\", fmt.Errorf(\"bad request: %v\", err)",
            "\t\treturn \"\", errors.New(\"no callback\")",
            "\t\treturn \"\", err",
        ];
        for line in cases {
            let shape = pass.classify(line).unwrap();
            let rewritten = pass.rewrite_line(line, shape);
            assert_eq!(pass.classify(&rewritten), None, "rewrite of {line:?} re-matched");
        }
    }

    #[test]
    fn success_pair_inserts_middle_nil() {
        let pass = ScopedReturnPass::new();
        assert_eq!(
            pass.rewrite_line("\treturn u.String(), nil", ReturnShape::SuccessPair),
            "\treturn u.String(), nil, nil"
        );
    }

    #[test]
    fn tracker_scopes_to_target_body() {
        let pass = ScopedReturnPass::new();
        let src = "\
func (p *conn) Refresh(s connector.Scopes) (connector.Identity, error) {
	return identity, err
}

func (p *conn) LoginURL(scopes connector.Scopes, callbackURL, state string) (string, error) {
	if state == \"\" {
		return \"\", err
	}
	return u.String(), nil
}

func other() (string, error) {
	return \"\", err
}
";
        let out = pass.rewrite(src);
        assert!(out.contains("\t\treturn \"\", nil, err"));
        assert!(out.contains("\treturn u.String(), nil, nil"));
        // Identical statement outside the target body is untouched.
        assert!(out.contains("func other() (string, error) {\n\treturn \"\", err\n}"));
        assert!(out.contains("\treturn identity, err\n"));
    }

    #[test]
    fn nested_column_zero_brace_does_not_end_scope() {
        let pass = ScopedReturnPass::new();
        let src = "\
func (p *conn) LoginURL(scopes connector.Scopes, callbackURL, state string) (string, error) {
	notify := func() {
}
	notify()
	return u.String(), nil
}
";
        let out = pass.rewrite(src);
        assert!(out.contains("\treturn u.String(), nil, nil"));
    }

    #[test]
    fn raw_string_braces_are_ignored() {
        let pass = ScopedReturnPass::new();
        let src = "\
func (p *conn) LoginURL(scopes connector.Scopes, callbackURL, state string) (string, error) {
	doc := `
}
`
	_ = doc
	return u.String(), nil
}
";
        let out = pass.rewrite(src);
        assert!(out.contains("\treturn u.String(), nil, nil"));
    }

    #[test]
    fn brace_delta_skips_literals_and_comments() {
        let mut raw = false;
        assert_eq!(brace_delta("if x { // {", &mut raw), 1);
        assert_eq!(brace_delta("s := \"{{{\"", &mut raw), 0);
        assert_eq!(brace_delta("c := '{'", &mut raw), 0);
        assert_eq!(brace_delta("}", &mut raw), -1);

        let mut raw = false;
        assert_eq!(brace_delta("t := `{", &mut raw), 0);
        assert!(raw);
        assert_eq!(brace_delta("}`", &mut raw), 0);
        assert!(!raw);
    }
}
