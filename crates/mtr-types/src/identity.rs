use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity token of whoever performs an operation.
///
/// The merge-to-ref core never interprets the token. It is handed to the
/// authorization capability and copied into commit metadata, nothing more.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap an identity token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The actor performing a merge-to-ref call.
///
/// Carries the identity used for authorization plus the name and email that
/// end up as the author of any commit written on the actor's behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Identity token used for capability queries.
    pub id: ActorId,
    /// Display name for commit authorship.
    pub name: String,
    /// Email for commit authorship.
    pub email: String,
}

impl ActorContext {
    /// Create an actor context.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(id),
            name: name.into(),
            email: email.into(),
        }
    }

    /// `Name <email>` as it appears in commit metadata.
    pub fn author_line(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_line_format() {
        let actor = ActorContext::new("u-1", "Ada Lovelace", "ada@example.com");
        assert_eq!(actor.author_line(), "Ada Lovelace <ada@example.com>");
    }

    #[test]
    fn actor_id_display_is_raw_token() {
        let id = ActorId::new("user:42");
        assert_eq!(id.to_string(), "user:42");
        assert_eq!(format!("{id:?}"), "ActorId(user:42)");
    }

    #[test]
    fn serde_roundtrip() {
        let actor = ActorContext::new("u-7", "Grace", "grace@example.com");
        let json = serde_json::to_string(&actor).unwrap();
        let back: ActorContext = serde_json::from_str(&json).unwrap();
        assert_eq!(actor, back);
    }
}
