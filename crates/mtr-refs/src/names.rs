//! Ref naming rules and path derivation.
//!
//! Names follow git conventions: no whitespace or `~^:?*[\`, no `..` or
//! `@{`, no leading/trailing `.` or `/`, no `.lock` suffix, and no empty or
//! dot-prefixed path components.
//!
//! Merge-to-ref results are stored under `refs/<namespace>/<iid>/merge`. The
//! namespace may not be one git already gives meaning to, so a merge ref can
//! never shadow a branch, tag, or remote-tracking ref.

use crate::error::{RefError, Result};

pub const BRANCH_PREFIX: &str = "refs/heads/";
pub const TAG_PREFIX: &str = "refs/tags/";

/// Namespace used for merge refs unless configured otherwise.
pub const DEFAULT_MERGE_REF_NAMESPACE: &str = "merge-requests";

/// Namespaces under `refs/` that belong to real branches, tags and remotes.
const RESERVED_NAMESPACES: &[&str] = &["heads", "tags", "remotes"];

const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// First naming rule `name` breaks, if any.
fn rule_violation(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("must not be empty".into());
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Some(format!("contains forbidden character: {ch:?}"));
    }
    for (needle, what) in [("..", "'..'"), ("@{", "'@{'"), ("//", "'//'")] {
        if name.contains(needle) {
            return Some(format!("must not contain {what}"));
        }
    }
    if name.starts_with(['.', '/']) || name.ends_with(['.', '/']) {
        return Some("must not start or end with '.' or '/'".into());
    }
    if name.ends_with(".lock") {
        return Some("must not end with '.lock'".into());
    }
    name.split('/')
        .find(|component| component.starts_with('.'))
        .map(|component| format!("component must not start with '.': {component:?}"))
}

fn check(name: &str, violation: Option<String>) -> Result<()> {
    match violation {
        Some(reason) => Err(RefError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Validate a short branch name such as `feature/auth`.
///
/// # Examples
///
/// ```
/// use mtr_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("feature/auth").is_ok());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    check(name, rule_violation(name))
}

/// Validate a short tag name. Same rules as branches.
pub fn validate_tag_name(name: &str) -> Result<()> {
    check(name, rule_violation(name))
}

/// Validate a full ref path such as `refs/merge-requests/1/merge`.
pub fn validate_ref_path(path: &str) -> Result<()> {
    let violation = match path.strip_prefix("refs/") {
        None => Some("must start with 'refs/'".to_string()),
        Some(rest) => rule_violation(rest),
    };
    check(path, violation)
}

/// Validate a merge-ref namespace: one path component, not reserved by git.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    let violation = if namespace.contains('/') {
        Some("namespace must be a single path component".to_string())
    } else if RESERVED_NAMESPACES.contains(&namespace) {
        Some(format!("namespace '{namespace}' is reserved"))
    } else {
        rule_violation(namespace)
    };
    check(namespace, violation)
}

/// The synthetic ref a change request's merge result is written to.
///
/// A pure function of the namespace and the request's per-project number.
pub fn merge_ref_path(namespace: &str, iid: u64) -> String {
    format!("refs/{namespace}/{iid}/merge")
}

/// Full path of a branch.
pub fn branch_ref(name: &str) -> String {
    format!("{BRANCH_PREFIX}{name}")
}

/// Short branch name of a full path, if the path is a branch.
pub fn branch_name(path: &str) -> Option<&str> {
    path.strip_prefix(BRANCH_PREFIX)
}
