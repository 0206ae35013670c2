use serde::Serialize;

use super::Post;

/// Category filter of the post list. Local to the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Category(name) => name,
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => post.category == *name,
        }
    }

    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }

    /// `All` followed by every distinct category in first-seen order.
    pub fn available(posts: &[Post]) -> Vec<CategoryFilter> {
        let mut filters = vec![CategoryFilter::All];
        for post in posts {
            let candidate = CategoryFilter::Category(post.category.clone());
            if !filters.contains(&candidate) {
                filters.push(candidate);
            }
        }
        filters
    }
}

impl From<&str> for CategoryFilter {
    /// `"All"` (any case) maps to [`CategoryFilter::All`].
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }
}
