use globset::{Candidate, GlobBuilder, GlobMatcher};

use crate::error::{AppError, Result};

/// A single compiled ignore rule.
///
/// Follows gitignore conventions: a leading `!` negates, a trailing
/// unescaped `/` restricts the rule to directories, and a leading `/`
/// or any internal `/` anchors the rule to the traversal root. The
/// wildcard body is compiled once into a [`GlobMatcher`]; matching a
/// candidate never re-parses the pattern text.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    negated: bool,
    dir_only: bool,
    anchored: bool,
    matcher: GlobMatcher,
}

impl Pattern {
    /// Parses one ignore line. Returns `Ok(None)` for blank lines and
    /// `#` comments.
    fn parse(line: &str) -> Result<Option<Self>> {
        let body = line.trim_start();
        if body.is_empty() || body.starts_with('#') {
            return Ok(None);
        }
        // Trailing spaces are insignificant unless backslash-escaped.
        let body = trim_trailing_spaces(body);
        if body.is_empty() {
            return Ok(None);
        }

        let (negated, body) = match body.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let (dir_only, body) = if body.ends_with('/') && !body.ends_with("\\/") {
            (true, &body[..body.len() - 1])
        } else {
            (false, body)
        };

        let (anchored, body) = match body.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (body.contains('/'), body),
        };
        if body.is_empty() {
            return Ok(None);
        }

        // Anchored patterns match the full relative path only; the
        // `**/` prefix lets unanchored ones match at any depth.
        let glob_text = if anchored {
            body.to_string()
        } else {
            format!("**/{}", body)
        };

        let glob = GlobBuilder::new(&glob_text)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| AppError::PatternSyntax {
                line: line.to_string(),
                reason: e.kind().to_string(),
            })?;

        Ok(Some(Pattern {
            raw: line.to_string(),
            negated,
            dir_only,
            anchored,
            matcher: glob.compile_matcher(),
        }))
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }
}

/// An ordered, immutable set of compiled ignore rules.
///
/// Pattern order is the evaluation order: the last pattern that
/// matches a candidate decides whether it is ignored.
#[derive(Debug, Clone)]
pub struct RuleSet {
    patterns: Vec<Pattern>,
}

impl RuleSet {
    /// Compiles raw ignore lines into a rule set.
    ///
    /// Blank lines and comments are discarded. Any syntactically
    /// invalid pattern (e.g. a malformed character class) aborts the
    /// whole compilation with [`AppError::PatternSyntax`] naming the
    /// offending line.
    pub fn compile<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for line in lines {
            if let Some(pattern) = Pattern::parse(line.as_ref())? {
                log::trace!(
                    "Compiled pattern \"{}\" (negated: {}, dir_only: {}, anchored: {})",
                    pattern.raw,
                    pattern.negated,
                    pattern.dir_only,
                    pattern.anchored
                );
                patterns.push(pattern);
            }
        }
        log::debug!("Compiled rule set with {} patterns.", patterns.len());
        Ok(RuleSet { patterns })
    }

    /// Decides whether `relative_path` is ignored.
    ///
    /// `relative_path` must be relative to the traversal root and use
    /// `/` separators; no filesystem access happens here. Every
    /// pattern is evaluated in order and the most recent match wins,
    /// so a later negation overrides an earlier ignore and vice versa.
    /// Directory-only patterns are skipped when `is_dir` is false.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        let candidate = Candidate::new(relative_path);
        let mut verdict = false;
        for pattern in &self.patterns {
            if pattern.dir_only && !is_dir {
                continue;
            }
            if pattern.matcher.is_match_candidate(&candidate) {
                verdict = !pattern.negated;
            }
        }
        verdict
    }

    /// The compiled patterns in evaluation order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn trim_trailing_spaces(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = s.len();
    while end > 0 && bytes[end - 1] == b' ' {
        if end >= 2 && bytes[end - 2] == b'\\' {
            break;
        }
        end -= 1;
    }
    &s[..end]
}
