//! Route pattern compiler and matcher.
//!
//! A pattern is compiled from a path template such as
//! `/employees/v1/get_employee/{short_name}`. Literal segments must
//! match exactly, `{name}` captures exactly one segment, and a trailing
//! `{name=**}` captures the remainder of the path as one value.

use std::borrow::Cow;
use std::fmt;

use error::RouteError;
use http::Method;
use percent_encoding::percent_decode_str;

/// One compiled path-template operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOp {
    /// Segment must equal this text
    Literal(String),
    /// Segment binds the variable at this index
    Capture(usize),
    /// Remaining segments bind the variable at this index as one value
    CatchAll(usize),
}

/// A compiled route template plus its HTTP verb.
///
/// Immutable once compiled; identity is (verb, op sequence). Variable
/// names are kept in declaration order, which is also binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    verb: Method,
    ops: Vec<PathOp>,
    vars: Vec<String>,
    template: String,
}

/// Path-variable values extracted from a concrete request path.
///
/// Entries are ordered first-declared-first-bound and values are
/// unescaped before storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    entries: Vec<(String, String)>,
}

impl Binding {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RoutePattern {
    /// Compile a path template for the given verb.
    pub fn parse(verb: Method, template: &str) -> Result<Self, RouteError> {
        if template.is_empty() {
            return Err(RouteError::invalid(template, "template is empty"));
        }
        if !template.starts_with('/') {
            return Err(RouteError::invalid(template, "template must start with '/'"));
        }

        let mut ops = Vec::new();
        let mut vars: Vec<String> = Vec::new();

        for segment in template[1..].split('/') {
            if matches!(ops.last(), Some(PathOp::CatchAll(_))) {
                return Err(RouteError::invalid(
                    template,
                    "segments may not follow a '{name=**}' capture",
                ));
            }
            if segment.is_empty() {
                return Err(RouteError::invalid(template, "empty path segment"));
            }

            if let Some(inner) = segment.strip_prefix('{') {
                let inner = inner.strip_suffix('}').ok_or_else(|| {
                    RouteError::invalid(template, format!("unmatched '{{' in segment '{segment}'"))
                })?;
                let (name, greedy) = match inner.split_once('=') {
                    Some((name, "**")) => (name, true),
                    Some((_, spec)) => {
                        return Err(RouteError::invalid(
                            template,
                            format!("unsupported capture spec '{spec}'"),
                        ));
                    }
                    None => (inner, false),
                };
                if name.is_empty() {
                    return Err(RouteError::invalid(template, "empty variable name"));
                }
                if name.contains(['{', '}']) {
                    return Err(RouteError::invalid(
                        template,
                        format!("unmatched delimiter in variable name '{name}'"),
                    ));
                }
                if vars.iter().any(|v| v == name) {
                    return Err(RouteError::invalid(
                        template,
                        format!("duplicate variable name '{name}'"),
                    ));
                }
                let index = vars.len();
                vars.push(name.to_string());
                ops.push(if greedy {
                    PathOp::CatchAll(index)
                } else {
                    PathOp::Capture(index)
                });
            } else if segment.contains(['{', '}']) {
                return Err(RouteError::invalid(
                    template,
                    format!("unmatched delimiter in segment '{segment}'"),
                ));
            } else {
                ops.push(PathOp::Literal(segment.to_string()));
            }
        }

        Ok(Self {
            verb,
            ops,
            vars,
            template: template.to_string(),
        })
    }

    pub fn verb(&self) -> &Method {
        &self.verb
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn variables(&self) -> &[String] {
        &self.vars
    }

    /// Match a concrete request path and extract variable bindings.
    ///
    /// Returns `None` when any literal differs or the segment count
    /// does not line up. A catch-all requires at least one remaining
    /// segment.
    pub fn match_path(&self, path: &str) -> Option<Binding> {
        let rest = path.strip_prefix('/')?;
        let segments: Vec<&str> = rest.split('/').collect();

        let mut values: Vec<Option<String>> = vec![None; self.vars.len()];
        let mut pos = 0usize;

        for op in &self.ops {
            match op {
                PathOp::Literal(lit) => {
                    let seg = segments.get(pos)?;
                    if unescape(seg) != *lit {
                        return None;
                    }
                    pos += 1;
                }
                PathOp::Capture(index) => {
                    let seg = segments.get(pos)?;
                    if seg.is_empty() {
                        return None;
                    }
                    values[*index] = Some(unescape(seg).into_owned());
                    pos += 1;
                }
                PathOp::CatchAll(index) => {
                    if pos >= segments.len() {
                        return None;
                    }
                    let remainder: Vec<String> = segments[pos..]
                        .iter()
                        .map(|s| unescape(s).into_owned())
                        .collect();
                    values[*index] = Some(remainder.join("/"));
                    pos = segments.len();
                }
            }
        }

        if pos != segments.len() {
            return None;
        }

        let entries = self
            .vars
            .iter()
            .zip(values)
            .map(|(name, value)| (name.clone(), value.unwrap_or_default()))
            .collect();
        Some(Binding { entries })
    }

    /// Whether some concrete path could match both patterns.
    ///
    /// Used at registration time to reject ambiguous tables; the verb
    /// comparison is the caller's responsibility.
    pub fn overlaps(&self, other: &RoutePattern) -> bool {
        let mut i = 0usize;
        loop {
            match (self.ops.get(i), other.ops.get(i)) {
                (Some(PathOp::CatchAll(_)), Some(_)) | (Some(_), Some(PathOp::CatchAll(_))) => {
                    return true;
                }
                (Some(PathOp::Literal(a)), Some(PathOp::Literal(b))) => {
                    if a != b {
                        return false;
                    }
                    i += 1;
                }
                // capture vs capture or capture vs literal always
                // intersect at this position
                (Some(_), Some(_)) => i += 1,
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.template)
    }
}

fn unescape(segment: &str) -> Cow<'_, str> {
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) => decoded,
        // Undecodable escapes are left as-is rather than dropped
        Err(_) => Cow::Borrowed(segment),
    }
}
