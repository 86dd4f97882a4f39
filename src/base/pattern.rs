//! Wildcard matching for import patterns.
//!
//! Import specifications may contain wildcards that are matched against
//! fully qualified, dot-separated type names:
//!
//! - `*`  matches any run of characters within one name segment (no `.`)
//! - `**` matches any run of characters, including `.`
//! - `?`  matches exactly one character other than `.`
//!
//! Matching is case sensitive and always covers the full string.

/// Returns true if `spec` contains any wildcard character.
pub fn contains_wildcards(spec: &str) -> bool {
    spec.contains('*') || spec.contains('?')
}

/// A compiled import pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPattern {
    elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Literal(char),
    AnyChar,
    AnyWithinSegment,
    AnySpan,
}

impl ImportPattern {
    pub fn new(spec: &str) -> Self {
        let mut elements = Vec::new();
        let mut chars = spec.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' => {
                    if chars.peek() == Some(&'*') {
                        chars.next();
                        elements.push(Element::AnySpan);
                    } else {
                        elements.push(Element::AnyWithinSegment);
                    }
                }
                '?' => elements.push(Element::AnyChar),
                other => elements.push(Element::Literal(other)),
            }
        }
        Self { elements }
    }

    /// Match `name` against the whole pattern.
    pub fn matches(&self, name: &str) -> bool {
        let chars: Vec<char> = name.chars().collect();
        self.match_from(0, &chars, 0)
    }

    fn match_from(&self, elem: usize, chars: &[char], pos: usize) -> bool {
        match self.elements.get(elem) {
            None => pos == chars.len(),
            Some(Element::Literal(c)) => {
                chars.get(pos) == Some(c) && self.match_from(elem + 1, chars, pos + 1)
            }
            Some(Element::AnyChar) => {
                matches!(chars.get(pos), Some(c) if *c != '.')
                    && self.match_from(elem + 1, chars, pos + 1)
            }
            Some(Element::AnyWithinSegment) => {
                // try successively longer runs that stay within the segment
                for end in pos..=chars.len() {
                    if self.match_from(elem + 1, chars, end) {
                        return true;
                    }
                    if chars.get(end) == Some(&'.') {
                        break;
                    }
                }
                false
            }
            Some(Element::AnySpan) => {
                for end in pos..=chars.len() {
                    if self.match_from(elem + 1, chars, end) {
                        return true;
                    }
                }
                false
            }
        }
    }
}
