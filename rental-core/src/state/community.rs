//! Community feed

use super::PortalState;
use crate::seed::OFFICIAL_AUTHOR_NAME;
use shared::models::{Post, Reply, User};
use shared::util::{now_iso, snowflake_id};
use std::collections::HashSet;

const ANON_AUTHOR_ID: &str = "anon";
const ANON_AUTHOR_NAME: &str = "Anonymous";

/// (author_id, author_name, is_verified) for the current session
fn author(session: Option<&User>) -> (String, String, bool) {
    match session {
        Some(user) if user.is_admin() => (user.id.clone(), OFFICIAL_AUTHOR_NAME.to_string(), true),
        Some(user) => (user.id.clone(), user.name.clone(), false),
        None => (ANON_AUTHOR_ID.to_string(), ANON_AUTHOR_NAME.to_string(), false),
    }
}

impl PortalState {
    /// Prepend a post authored by the session user
    pub fn create_post(&self, content: &str, image: Option<String>) -> Post {
        let (author_id, author_name, is_verified) = author(self.inner.session.read().as_ref());

        let mut posts = self.inner.posts.write();
        let post = Post {
            id: unique_id(posts.iter().map(|p| p.id.as_str())),
            author_id,
            author_name,
            title: None,
            content: content.to_string(),
            image,
            timestamp: now_iso(),
            likes: 0,
            replies: Vec::new(),
            reposts: 0,
            is_verified,
        };
        posts.insert(0, post.clone());

        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        post
    }

    /// Append a reply. `None` if the post does not exist.
    pub fn reply_to_post(&self, post_id: &str, content: &str) -> Option<Reply> {
        let (author_id, author_name, is_verified) = author(self.inner.session.read().as_ref());

        let mut posts = self.inner.posts.write();
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            tracing::debug!(post_id, "Reply to unknown post ignored");
            return None;
        };

        let reply = Reply {
            id: unique_id(post.replies.iter().map(|r| r.id.as_str())),
            author_id,
            author_name,
            content: content.to_string(),
            timestamp: now_iso(),
            is_verified,
        };
        post.replies.push(reply.clone());

        tracing::info!(post_id, reply_id = %reply.id, "Reply added");
        Some(reply)
    }

    /// Toggle this session's like on a post.
    ///
    /// Returns the displayed like count, or `None` for an unknown post.
    pub fn toggle_like(&self, post_id: &str) -> Option<u32> {
        let likes = self
            .inner
            .posts
            .read()
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.likes)?;

        let mut liked = self.inner.liked_posts.write();
        let now_liked = if liked.remove(post_id) {
            false
        } else {
            liked.insert(post_id.to_string());
            true
        };

        tracing::debug!(post_id, liked = now_liked, "Like toggled");
        Some(likes + u32::from(now_liked))
    }

    pub fn is_liked(&self, post_id: &str) -> bool {
        self.inner.liked_posts.read().contains(post_id)
    }

    /// Feed, newest first
    pub fn posts(&self) -> Vec<Post> {
        self.inner.posts.read().clone()
    }
}

fn unique_id<'a>(existing: impl Iterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.collect();
    loop {
        let candidate = snowflake_id().to_string();
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_post_author_resolution() {
        let state = state();
        let anon = state.create_post("hello", None);
        assert_eq!(anon.author_id, ANON_AUTHOR_ID);
        assert_eq!(anon.author_name, ANON_AUTHOR_NAME);
        assert!(!anon.is_verified);

        let state = student_state();
        let post = state.create_post("ESP32 tips?", None);
        assert_eq!(post.author_name, "Rahul Kumar");
        assert!(!post.is_verified);

        let state = admin_state();
        let post = state.create_post("Workshop on Friday", Some("https://img".into()));
        assert_eq!(post.author_name, OFFICIAL_AUTHOR_NAME);
        assert!(post.is_verified);
        assert_eq!(state.posts()[0].id, post.id);
    }

    #[test]
    fn test_reply_appends_in_order() {
        let state = student_state();
        let first = state.reply_to_post("101", "Count me in").unwrap();
        let second = state.reply_to_post("101", "Me too").unwrap();

        let post = state.posts().into_iter().find(|p| p.id == "101").unwrap();
        let n = post.replies.len();
        assert_eq!(post.replies[n - 2].id, first.id);
        assert_eq!(post.replies[n - 1].id, second.id);
    }

    #[test]
    fn test_reply_to_unknown_post_is_noop() {
        let state = student_state();
        let before = state.posts();
        assert!(state.reply_to_post("missing", "hi").is_none());
        assert_eq!(state.posts(), before);
    }

    #[test]
    fn test_toggle_like() {
        let state = student_state();
        assert_eq!(state.toggle_like("101"), Some(143));
        assert!(state.is_liked("101"));
        assert_eq!(state.toggle_like("101"), Some(142));
        assert!(!state.is_liked("101"));
        assert_eq!(state.toggle_like("missing"), None);

        state.toggle_like("102");
        state.logout();
        assert!(!state.is_liked("102"));
    }
}
