//! Derived statistics over a posts snapshot.
//!
//! Everything here is a pure function of the slice it is given: no
//! accumulator survives between snapshots, and the input is never mutated.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::Post;

/// Headline numbers of the dashboard stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub unique_categories: usize,
    pub total_words: usize,
}

/// One bar of the posts-per-category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Whitespace-delimited, non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn dashboard_stats(posts: &[Post]) -> DashboardStats {
    let unique_categories = posts
        .iter()
        .map(|post| post.category.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashboardStats {
        total_posts: posts.len(),
        unique_categories,
        total_words: posts.iter().map(|post| word_count(&post.content)).sum(),
    }
}

/// Posts grouped by category, most populated first. Ties keep the order in
/// which categories first appear in the snapshot.
pub fn posts_per_category(posts: &[Post]) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for post in posts {
        match index.get(post.category.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(post.category.as_str(), counts.len());
                counts.push(CategoryCount {
                    name: post.category.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Snapshot order by `createdAt`, newest first. Unparseable timestamps sort
/// last; equal timestamps keep snapshot order.
pub fn newest_first(posts: &[Post]) -> Vec<&Post> {
    let mut sorted: Vec<(&Post, _)> = posts
        .iter()
        .map(|post| (post, post.created_at_utc()))
        .collect();
    sorted.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.into_iter().map(|(post, _)| post).collect()
}

/// The newest post.
pub fn latest_post(posts: &[Post]) -> Option<&Post> {
    newest_first(posts).into_iter().next()
}

/// Ranks two to four by creation time.
pub fn recent_posts(posts: &[Post]) -> Vec<&Post> {
    newest_first(posts).into_iter().skip(1).take(3).collect()
}

/// Everything the dashboard derives from one posts snapshot, computed in a
/// single pass so it can be cached per snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostDigest {
    pub stats: DashboardStats,
    pub categories: Vec<CategoryCount>,
    pub latest: Option<Post>,
    pub recent: Vec<Post>,
}

impl PostDigest {
    pub fn from_posts(posts: &[Post]) -> Self {
        let ordered = newest_first(posts);
        Self {
            stats: dashboard_stats(posts),
            categories: posts_per_category(posts),
            latest: ordered.first().map(|post| (*post).clone()),
            recent: ordered.iter().skip(1).take(3).map(|post| (*post).clone()).collect(),
        }
    }

    /// Bar length of a category relative to the largest one, in `0.0..=1.0`.
    pub fn bar_ratio(&self, count: usize) -> f64 {
        let max = self.categories.iter().map(|c| c.count).max().unwrap_or(0);
        if max == 0 {
            0.0
        } else {
            count as f64 / max as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, category: &str, content: &str, created_at: &str) -> Post {
        Post {
            id: id.into(),
            title: format!("title {id}"),
            content: content.to_string(),
            image_url: String::new(),
            created_at: created_at.to_string(),
            category: category.to_string(),
            views: 0,
        }
    }

    #[test]
    fn test_total_words_ignores_repeated_whitespace() {
        let posts = vec![
            post("1", "AI", "a b c", "2024-01-01T00:00:00Z"),
            post("2", "AI", "d  e", "2024-01-02T00:00:00Z"),
        ];
        assert_eq!(dashboard_stats(&posts).total_words, 5);
    }

    #[test]
    fn test_stats_count_posts_and_distinct_categories() {
        let posts = vec![
            post("1", "AI", "x", "2024-01-01T00:00:00Z"),
            post("2", "Web", "\n  leading and trailing  \n", "2024-01-02T00:00:00Z"),
            post("3", "AI", "", "2024-01-03T00:00:00Z"),
        ];
        let stats = dashboard_stats(&posts);
        assert_eq!(stats.total_posts, 3);
        assert_eq!(stats.unique_categories, 2);
        assert_eq!(stats.total_words, 4);
    }

    #[test]
    fn test_empty_snapshot_has_zero_stats() {
        assert_eq!(dashboard_stats(&[]), DashboardStats::default());
        assert!(posts_per_category(&[]).is_empty());
        assert!(latest_post(&[]).is_none());
        assert!(recent_posts(&[]).is_empty());
    }

    #[test]
    fn test_posts_per_category_sorted_by_count() {
        let posts = vec![
            post("1", "AI", "", "2024-01-01T00:00:00Z"),
            post("2", "Web", "", "2024-01-01T00:00:00Z"),
            post("3", "AI", "", "2024-01-01T00:00:00Z"),
        ];
        assert_eq!(
            posts_per_category(&posts),
            vec![
                CategoryCount { name: "AI".into(), count: 2 },
                CategoryCount { name: "Web".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_posts_per_category_ties_keep_first_seen_order() {
        let posts = vec![
            post("1", "Rust", "", "2024-01-01T00:00:00Z"),
            post("2", "Go", "", "2024-01-01T00:00:00Z"),
            post("3", "Zig", "", "2024-01-01T00:00:00Z"),
            post("4", "Go", "", "2024-01-01T00:00:00Z"),
            post("5", "Rust", "", "2024-01-01T00:00:00Z"),
        ];
        let names: Vec<_> = posts_per_category(&posts)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Rust", "Go", "Zig"]);
    }

    #[test]
    fn test_latest_and_recent_use_creation_time_not_snapshot_order() {
        let posts = vec![
            post("old", "A", "", "2024-01-01T00:00:00Z"),
            post("newest", "A", "", "2024-01-06T00:00:00Z"),
            post("mid", "A", "", "2024-01-03T00:00:00Z"),
            post("second", "A", "", "2024-01-05T00:00:00Z"),
            post("third", "A", "", "2024-01-04T00:00:00Z"),
        ];

        assert_eq!(latest_post(&posts).unwrap().id.as_str(), "newest");
        let recent: Vec<_> = recent_posts(&posts).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(recent, vec!["second", "third", "mid"]);
    }

    #[test]
    fn test_unparseable_timestamps_sort_last() {
        let posts = vec![
            post("broken", "A", "", "not a date"),
            post("dated", "A", "", "2024-01-01T00:00:00Z"),
        ];
        let ids: Vec<_> = newest_first(&posts).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["dated", "broken"]);
    }

    #[test]
    fn test_digest_does_not_mutate_snapshot() {
        let posts = vec![
            post("a", "A", "one", "2024-01-01T00:00:00Z"),
            post("b", "B", "two", "2024-02-01T00:00:00Z"),
        ];
        let before = posts.clone();
        let digest = PostDigest::from_posts(&posts);

        assert_eq!(posts, before);
        assert_eq!(digest.latest.as_ref().unwrap().id.as_str(), "b");
        assert_eq!(digest.recent.len(), 1);
        assert_eq!(digest.bar_ratio(1), 1.0);
    }
}
