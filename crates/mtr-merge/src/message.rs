//! Commit message rendering.
//!
//! Templates use `%{name}` placeholders:
//!
//! | placeholder        | value                              |
//! |--------------------|------------------------------------|
//! | `%{source_branch}` | source branch (or short source sha) |
//! | `%{target_branch}` | target branch                      |
//! | `%{title}`         | change request title               |
//! | `%{reference}`     | `<project>!<iid>`                  |
//! | `%{source_sha}`    | full hex id of the source commit   |
//!
//! Unknown placeholders are copied through untouched.

use mtr_types::{ChangeRequest, CommitId};

pub const DEFAULT_COMMIT_MESSAGE_TEMPLATE: &str =
    "Merge branch '%{source_branch}' into '%{target_branch}'\n\n%{title}\n\nSee merge request %{reference}";

/// Render the commit message for merging `source` of `request`.
///
/// The request's own template wins over `default_template`.
pub fn commit_message(request: &ChangeRequest, source: &CommitId, default_template: &str) -> String {
    let template = request
        .commit_message_template
        .as_deref()
        .unwrap_or(default_template);
    render(template, request, source)
}

/// Expand `%{name}` placeholders in `template`. Unknown placeholders are kept verbatim.
pub fn render(template: &str, request: &ChangeRequest, source: &CommitId) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        match value(&after[..end], request, source) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn value(name: &str, request: &ChangeRequest, source: &CommitId) -> Option<String> {
    let value = match name {
        "source_branch" => request.source_label(),
        "target_branch" => request.target_branch.clone(),
        "title" => request.title.clone(),
        "reference" => request.id.to_string(),
        "source_sha" => source.to_hex(),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtr_types::{ChangeRequestId, SourceRevision};

    fn request() -> ChangeRequest {
        ChangeRequest::new(
            ChangeRequestId::new("group/app", 12),
            "Add login page",
            SourceRevision::Branch("feature/login".into()),
            "main",
        )
    }

    fn sha() -> CommitId {
        CommitId::from_bytes(b"source")
    }

    #[test]
    fn default_template() {
        assert_eq!(
            commit_message(&request(), &sha(), DEFAULT_COMMIT_MESSAGE_TEMPLATE),
            "Merge branch 'feature/login' into 'main'\n\nAdd login page\n\nSee merge request group/app!12"
        );
    }

    #[test]
    fn request_template_wins() {
        let mut cr = request();
        cr.commit_message_template = Some("%{title} (%{source_sha})".into());
        assert_eq!(
            commit_message(&cr, &sha(), DEFAULT_COMMIT_MESSAGE_TEMPLATE),
            format!("Add login page ({})", sha().to_hex())
        );
    }

    #[test]
    fn unknown_and_unterminated_placeholders_are_verbatim() {
        let cr = request();
        assert_eq!(
            render("%{approvers} merged %{title", &cr, &sha()),
            "%{approvers} merged %{title"
        );
        assert_eq!(render("100%{}", &cr, &sha()), "100%{}");
        assert_eq!(render("no placeholders", &cr, &sha()), "no placeholders");
    }

    #[test]
    fn commit_sources_use_short_sha() {
        let mut cr = request();
        cr.source = SourceRevision::Commit(sha());
        assert_eq!(
            render("%{source_branch}", &cr, &sha()),
            sha().short_hex()
        );
    }
}
