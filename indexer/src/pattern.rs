use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Component, Path};

/// A glob pattern compiled to an anchored regex over `/`-separated relative paths.
///
/// Supports `*`, `?`, `[...]`/`[!...]` and `**`. Patterns without a `/` or
/// `**` only match files directly inside the corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusPattern {
    raw: String,
    regex: Regex,
    recursive: bool,
}

impl CorpusPattern {
    pub fn new(glob: &str) -> Result<Self> {
        let regex = Regex::new(&glob_to_regex(glob))
            .with_context(|| format!("invalid file pattern {glob:?}"))?;
        Ok(Self {
            raw: glob.to_owned(),
            regex,
            recursive: glob.contains('/') || glob.contains("**"),
        })
    }

    pub fn as_str(&self) -> &str { &self.raw }

    pub fn recursive(&self) -> bool { self.recursive }

    /// Match a path relative to the corpus directory.
    pub fn matches(&self, relative: &Path) -> bool {
        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        self.regex.is_match(&parts.join("/"))
    }
}

fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut re = String::from("^");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    re.push_str("(?:[^/]*/)*");
                    i += 3;
                } else {
                    re.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '[' => match chars[i + 1..].iter().skip(1).position(|&c| c == ']') {
                // a `]` directly after `[` belongs to the class
                Some(offset) => {
                    let end = i + 2 + offset;
                    let mut body: String = chars[i + 1..end].iter().collect();
                    if let Some(rest) = body.strip_prefix('!') {
                        body = format!("^{rest}");
                    }
                    re.push('[');
                    re.push_str(&body.replace('\\', "\\\\").replace('[', "\\["));
                    re.push(']');
                    i = end + 1;
                    continue;
                }
                None => re.push_str(r"\["),
            },
            c => re.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    re.push('$');
    re
}
