//! Feed, follow and like semantics, modeled in memory against the same
//! rules the schema and repositories enforce: unique usernames, unique
//! (follower, followed) and (user, post) edges, and a followed+own feed
//! ordered by descending creation time.

use chrono::{DateTime, Duration, Utc};
use murmur_service::db::likes::LikeOutcome;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct PostRecord {
    id: u64,
    author: String,
    title: String,
    created_at: DateTime<Utc>,
}

/// In-memory stand-in for the relational store
#[derive(Default)]
struct Network {
    users: BTreeSet<String>,
    posts: Vec<PostRecord>,
    follows: BTreeSet<(String, String)>,
    likes: BTreeSet<(String, u64)>,
    next_post_id: u64,
    clock: i64,
}

impl Network {
    fn register(&mut self, username: &str) -> Result<(), String> {
        // users.username carries a unique constraint
        if !self.users.insert(username.to_string()) {
            return Err(format!("duplicate username {username}"));
        }
        Ok(())
    }

    fn post(&mut self, author: &str, title: &str) -> u64 {
        assert!(self.users.contains(author), "author must exist");
        self.next_post_id += 1;
        self.clock += 1;
        self.posts.push(PostRecord {
            id: self.next_post_id,
            author: author.to_string(),
            title: title.to_string(),
            created_at: Utc::now() + Duration::seconds(self.clock),
        });
        self.next_post_id
    }

    fn follow(&mut self, follower: &str, followed: &str) -> bool {
        if self.is_following(follower, followed) {
            return false;
        }
        self.follows
            .insert((follower.to_string(), followed.to_string()))
    }

    fn unfollow(&mut self, follower: &str, followed: &str) -> bool {
        self.follows
            .remove(&(follower.to_string(), followed.to_string()))
    }

    fn is_following(&self, follower: &str, followed: &str) -> bool {
        self.follows
            .contains(&(follower.to_string(), followed.to_string()))
    }

    fn like(&mut self, username: &str, post_id: u64) -> LikeOutcome {
        // (user_id, post_id) carries a unique constraint
        if self.likes.insert((username.to_string(), post_id)) {
            LikeOutcome::Liked
        } else {
            LikeOutcome::AlreadyLiked
        }
    }

    fn like_count(&self, post_id: u64) -> usize {
        self.likes.iter().filter(|(_, p)| *p == post_id).count()
    }

    /// Own posts plus posts by followed users, newest first
    fn feed(&self, username: &str) -> Vec<&PostRecord> {
        let mut rows: Vec<&PostRecord> = self
            .posts
            .iter()
            .filter(|p| p.author == username || self.is_following(username, &p.author))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }
}

#[test]
fn duplicate_username_is_rejected_without_a_row() {
    let mut net = Network::default();
    net.register("alice").unwrap();
    assert!(net.register("alice").is_err());
    assert_eq!(net.users.len(), 1);
}

#[test]
fn follow_unfollow_truth_table_is_idempotent() {
    let mut net = Network::default();
    net.register("alice").unwrap();
    net.register("bob").unwrap();

    assert!(!net.is_following("alice", "bob"));

    assert!(net.follow("alice", "bob"));
    assert!(net.is_following("alice", "bob"));
    // second follow mutates nothing
    assert!(!net.follow("alice", "bob"));
    assert!(net.is_following("alice", "bob"));
    assert_eq!(net.follows.len(), 1);

    assert!(net.unfollow("alice", "bob"));
    assert!(!net.is_following("alice", "bob"));
    // second unfollow mutates nothing
    assert!(!net.unfollow("alice", "bob"));
    assert!(!net.is_following("alice", "bob"));
}

#[test]
fn follow_is_directed() {
    let mut net = Network::default();
    net.register("alice").unwrap();
    net.register("bob").unwrap();

    net.follow("alice", "bob");
    assert!(net.is_following("alice", "bob"));
    assert!(!net.is_following("bob", "alice"));
}

#[test]
fn second_like_leaves_exactly_one_edge() {
    let mut net = Network::default();
    net.register("alice").unwrap();
    net.register("bob").unwrap();
    let post = net.post("alice", "Hello");

    assert_eq!(net.like("bob", post), LikeOutcome::Liked);
    assert_eq!(net.like("bob", post), LikeOutcome::AlreadyLiked);
    assert_eq!(net.like_count(post), 1);
}

#[test]
fn feed_contains_own_and_followed_posts_newest_first() {
    let mut net = Network::default();
    for name in ["alice", "bob", "eve"] {
        net.register(name).unwrap();
    }
    net.follow("bob", "alice");

    net.post("alice", "first");
    net.post("bob", "second");
    net.post("eve", "hidden");
    net.post("alice", "third");

    let feed: Vec<&str> = net.feed("bob").iter().map(|p| p.title.as_str()).collect();
    assert_eq!(feed, vec!["third", "second", "first"]);
    assert!(!feed.contains(&"hidden"));
}

#[test]
fn alice_bob_carol_scenario() {
    let mut net = Network::default();
    net.register("alice").unwrap();
    net.register("bob").unwrap();
    net.register("carol").unwrap();

    net.post("alice", "Hello");
    net.follow("bob", "alice");

    let bob_feed: Vec<&str> = net.feed("bob").iter().map(|p| p.title.as_str()).collect();
    assert_eq!(bob_feed, vec!["Hello"]);

    let carol_feed = net.feed("carol");
    assert!(carol_feed.is_empty());
}

#[test]
fn unfollow_removes_posts_from_feed() {
    let mut net = Network::default();
    net.register("alice").unwrap();
    net.register("bob").unwrap();

    net.post("alice", "Hello");
    net.follow("bob", "alice");
    assert_eq!(net.feed("bob").len(), 1);

    net.unfollow("bob", "alice");
    assert!(net.feed("bob").is_empty());
}

#[test]
fn likes_are_counted_per_post() {
    let mut net = Network::default();
    for name in ["alice", "bob", "carol"] {
        net.register(name).unwrap();
    }
    let hello = net.post("alice", "Hello");
    let other = net.post("alice", "Other");

    net.like("bob", hello);
    net.like("carol", hello);
    net.like("bob", other);

    let counts: HashMap<u64, usize> = [hello, other]
        .into_iter()
        .map(|p| (p, net.like_count(p)))
        .collect();
    assert_eq!(counts[&hello], 2);
    assert_eq!(counts[&other], 1);
}
