//! `@mention` detection, commit, and render-time parsing.
//!
//! Detection operates on the draft while the user types; the render-time
//! parse is a separate, deliberately lenient pass over finalized text. It
//! marks any `@word` token whether or not it resolves to a member, so it
//! never guarantees the mentioned user was a member at send time.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use causerie_shared::models::User;

/// An in-progress mention token at the end of the draft.
static TRAILING_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w*)$").expect("static pattern"));

/// Any finalized `@name` token inside stored text.
static MENTION_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").expect("static pattern"));

/// A room member matching the active query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionCandidate {
    pub user: User,
    /// Byte offset of the query inside the case-folded display name.
    pub match_pos: usize,
}

/// One rendered segment of a finalized message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSpan {
    /// Plain text between mention tokens.
    Text(String),
    /// An `@name` token; `user` is set when the name resolves to a
    /// member, unresolved tokens render as plain marked text.
    Mention { name: String, user: Option<User> },
}

/// Extract the active mention query from the draft.
///
/// A query exists only when the draft ends in `@` followed by word
/// characters; the captured characters are case-folded.
pub fn active_query(text: &str) -> Option<String> {
    TRAILING_MENTION
        .captures(text)
        .map(|caps| caps[1].to_lowercase())
}

/// Rank room members against a case-folded query fragment.
///
/// Members whose folded display name contains the query qualify; earlier
/// substring matches rank first, ties fall back to display-name order.
pub fn candidates(query: &str, members: &[User]) -> Vec<MentionCandidate> {
    let mut matches: Vec<MentionCandidate> = members
        .iter()
        .filter_map(|user| {
            user.display_name
                .to_lowercase()
                .find(query)
                .map(|match_pos| MentionCandidate {
                    user: user.clone(),
                    match_pos,
                })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.match_pos
            .cmp(&b.match_pos)
            .then_with(|| a.user.display_name.cmp(&b.user.display_name))
    });
    matches
}

/// Replace the trailing `@query` with the chosen member's full name and a
/// single trailing space.
///
/// Earlier mentions in the text are never retouched; without a trailing
/// token the draft comes back unchanged.
pub fn commit(text: &str, display_name: &str) -> String {
    let replacement = format!("@{display_name} ");
    TRAILING_MENTION
        .replace(text, NoExpand(&replacement))
        .into_owned()
}

/// Split finalized text into plain and mention spans.
///
/// Resolution matches the captured name against member display names
/// exactly and makes no claim about membership at send time.
pub fn message_spans(text: &str, members: &[User]) -> Vec<MessageSpan> {
    let mut spans = Vec::new();
    let mut last = 0;

    for token in MENTION_TOKEN.find_iter(text) {
        if token.start() > last {
            spans.push(MessageSpan::Text(text[last..token.start()].to_string()));
        }
        let name = &text[token.start() + 1..token.end()];
        spans.push(MessageSpan::Mention {
            name: name.to_string(),
            user: members.iter().find(|u| u.display_name == name).cloned(),
        });
        last = token.end();
    }

    if last < text.len() {
        spans.push(MessageSpan::Text(text[last..].to_string()));
    }
    spans
}

/// Resolve a clicked mention to a member of the current room.
///
/// Only a name that resolves to a member other than the clicking user
/// produces a result; everything else is suppressed.
pub fn resolve_click(name: &str, members: &[User], current: &User) -> Option<User> {
    members
        .iter()
        .find(|user| user.display_name == name)
        .filter(|user| user.id != current.id)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use causerie_shared::types::UserId;

    fn user(name: &str) -> User {
        User {
            id: UserId::new(),
            display_name: name.to_string(),
            avatar_url: None,
        }
    }

    fn names(candidates: &[MentionCandidate]) -> Vec<&str> {
        candidates
            .iter()
            .map(|c| c.user.display_name.as_str())
            .collect()
    }

    #[test]
    fn trailing_token_forms_the_query() {
        assert_eq!(active_query("hello @jo"), Some("jo".to_string()));
        assert_eq!(active_query("hello @"), Some(String::new()));
        assert_eq!(active_query("hello @Jo"), Some("jo".to_string()));
        assert_eq!(active_query("hello @jo there"), None);
        assert_eq!(active_query("no mention"), None);
    }

    #[test]
    fn candidates_rank_by_position_then_name() {
        let members = [user("John"), user("Joanna"), user("Mark")];

        // Both match at position 0; lexical order breaks the tie.
        assert_eq!(names(&candidates("jo", &members)), vec!["Joanna", "John"]);

        // "ann" matches Joanna at 2 and Anna at 0.
        let members = [user("Joanna"), user("Anna")];
        assert_eq!(names(&candidates("ann", &members)), vec!["Anna", "Joanna"]);
    }

    #[test]
    fn empty_query_offers_every_member() {
        let members = [user("Mark"), user("John")];
        assert_eq!(names(&candidates("", &members)), vec!["John", "Mark"]);
    }

    #[test]
    fn commit_replaces_only_the_trailing_token() {
        assert_eq!(commit("hello @jo", "John"), "hello @John ");
        assert_eq!(
            commit("@Mark already said hi @joa", "Joanna"),
            "@Mark already said hi @Joanna "
        );
        assert_eq!(commit("no token here", "John"), "no token here");
    }

    #[test]
    fn spans_mark_mentions_and_resolve_members() {
        let members = [user("John")];
        let spans = message_spans("hi @John and @Ghost!", &members);

        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0], MessageSpan::Text("hi ".to_string()));
        match &spans[1] {
            MessageSpan::Mention { name, user } => {
                assert_eq!(name, "John");
                assert!(user.is_some());
            }
            other => panic!("expected mention, got {other:?}"),
        }
        assert_eq!(spans[2], MessageSpan::Text(" and ".to_string()));
        match &spans[3] {
            MessageSpan::Mention { name, user } => {
                assert_eq!(name, "Ghost");
                assert!(user.is_none());
            }
            other => panic!("expected mention, got {other:?}"),
        }
        assert_eq!(spans[4], MessageSpan::Text("!".to_string()));
    }

    #[test]
    fn click_resolution_suppresses_self_and_strangers() {
        let joanna = user("Joanna");
        let mark = user("Mark");
        let members = [joanna.clone(), mark.clone()];

        assert_eq!(resolve_click("Mark", &members, &joanna), Some(mark));
        assert_eq!(resolve_click("Joanna", &members, &joanna), None);
        assert_eq!(resolve_click("Ghost", &members, &joanna), None);
    }
}
