//! Path joining and pattern matching.
//!
//! # Responsibilities
//! - Combine a component base path with a binding's relative path
//! - Decide whether a middleware pattern covers a request path
//! - Translate route patterns into axum's path syntax
//!
//! # Design Decisions
//! - Joined paths always start with `/` and never end with one (root excepted)
//! - Empty and `.` segments vanish, `..` pops a segment
//! - Pattern syntax: `:name` or `{name}` match one segment,
//!   a trailing `*` or `{*name}` matches the remainder (possibly empty)

use std::collections::HashMap;

/// Join a base path and a relative path into a normalized route path.
pub fn join_paths(base: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in base.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Returns true if `pattern` covers the request `path`.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/').filter(|s| !s.is_empty()).peekable();
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());

    while let Some(expected) = pattern_segments.next() {
        if is_wildcard(expected) && pattern_segments.peek().is_none() {
            return true;
        }

        match path_segments.next() {
            Some(actual) if is_param(expected) || expected == actual => continue,
            _ => return false,
        }
    }

    path_segments.next().is_none()
}

/// Rewrite `:name` and trailing `*` segments into axum's `{name}` / `{*wildcard}`.
pub fn to_axum_path(path: &str) -> String {
    ParamNames::new().axum_path(path)
}

/// Path parameter names already claimed, keyed by the route prefix that
/// leads to them.
///
/// axum rejects two routes that name a parameter differently at the same
/// position (`/users/{id}` and `/users/{user_id}`). Paths passed through
/// one `ParamNames` reuse the first name seen at each position.
#[derive(Debug, Default)]
pub struct ParamNames {
    claimed: HashMap<String, String>,
}

impl ParamNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// axum path for `path`, with parameter names unified against every
    /// path seen before.
    pub fn axum_path(&mut self, path: &str) -> String {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let last = segments.len().saturating_sub(1);

        let mut prefix = String::new();
        let mut rewritten = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            match Param::parse(segment, i == last) {
                Some(Param::One(name)) => {
                    prefix.push_str("/:");
                    let name = self.claim(&prefix, name, path);
                    rewritten.push(format!("{{{name}}}"));
                }
                Some(Param::Rest(name)) => {
                    prefix.push_str("/*");
                    let name = self.claim(&prefix, name, path);
                    rewritten.push(format!("{{*{name}}}"));
                }
                None => {
                    prefix.push('/');
                    prefix.push_str(segment);
                    rewritten.push(segment.to_string());
                }
            }
        }

        format!("/{}", rewritten.join("/"))
    }

    fn claim(&mut self, prefix: &str, name: &str, path: &str) -> String {
        let claimed = self
            .claimed
            .entry(prefix.to_string())
            .or_insert_with(|| name.to_string());
        if claimed.as_str() != name {
            tracing::warn!(path, param = name, renamed_to = %claimed, "Path parameter renamed to match an earlier route");
        }
        claimed.clone()
    }
}

enum Param<'a> {
    One(&'a str),
    Rest(&'a str),
}

impl<'a> Param<'a> {
    fn parse(segment: &'a str, is_last: bool) -> Option<Self> {
        if let Some(name) = segment.strip_prefix(':') {
            return Some(Param::One(name));
        }
        if segment == "*" && is_last {
            return Some(Param::Rest("wildcard"));
        }
        let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
        match inner.strip_prefix('*') {
            Some(name) => Some(Param::Rest(name)),
            None => Some(Param::One(inner)),
        }
    }
}

fn is_wildcard(segment: &str) -> bool {
    segment == "*" || (segment.starts_with("{*") && segment.ends_with('}'))
}

fn is_param(segment: &str) -> bool {
    segment.starts_with(':') || (segment.starts_with('{') && segment.ends_with('}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("", "*"), "/*");
        assert_eq!(join_paths("/a", ""), "/a");
        assert_eq!(join_paths("/a/", "/"), "/a");
        assert_eq!(join_paths("/api/", "/users/{id}"), "/api/users/{id}");
        assert_eq!(join_paths("api", "v1//items/"), "/api/v1/items");
        assert_eq!(join_paths("/api/v1", "../v2/./items"), "/api/v2/items");
        assert_eq!(join_paths("/a", "../../.."), "/");
    }

    #[test]
    fn test_wildcard_patterns() {
        assert!(pattern_matches("/*", "/"));
        assert!(pattern_matches("/*", "/a/b/c"));
        assert!(pattern_matches("/api/*", "/api"));
        assert!(pattern_matches("/api/{*rest}", "/api/users/1"));
        assert!(!pattern_matches("/api/*", "/apiary"));
        assert!(!pattern_matches("/api/*", "/other/api"));
    }

    #[test]
    fn test_exact_and_param_patterns() {
        assert!(pattern_matches("/a", "/a"));
        assert!(pattern_matches("/a", "/a/"));
        assert!(!pattern_matches("/a", "/a/b"));
        assert!(pattern_matches("/users/:id", "/users/42"));
        assert!(pattern_matches("/users/{id}/posts", "/users/42/posts"));
        assert!(!pattern_matches("/users/:id", "/users"));
    }

    #[test]
    fn test_to_axum_path() {
        assert_eq!(to_axum_path("/users/:id"), "/users/{id}");
        assert_eq!(to_axum_path("/files/*"), "/files/{*wildcard}");
        assert_eq!(to_axum_path("/users/{id}"), "/users/{id}");
        assert_eq!(to_axum_path("/"), "/");
        assert_eq!(to_axum_path("/api/{*rest}"), "/api/{*rest}");
    }

    #[test]
    fn test_param_names_reuse_first_name_at_position() {
        let mut names = ParamNames::new();
        assert_eq!(names.axum_path("/users/:id"), "/users/{id}");
        assert_eq!(names.axum_path("/users/:user_id"), "/users/{id}");
        assert_eq!(names.axum_path("/users/{uid}/posts/:post"), "/users/{id}/posts/{post}");
        assert_eq!(names.axum_path("/teams/:user_id"), "/teams/{user_id}");
        assert_eq!(names.axum_path("/files/*"), "/files/{*wildcard}");
        assert_eq!(names.axum_path("/files/{*path}"), "/files/{*wildcard}");
    }
}
