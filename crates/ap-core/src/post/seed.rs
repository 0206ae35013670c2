//! Starter content inserted when the post collection is empty.

use chrono::{DateTime, Duration, Utc};

use crate::format::iso_timestamp;

/// A starter post, without a store id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPost {
    pub title: &'static str,
    pub content: &'static str,
    pub image_url: &'static str,
    pub category: &'static str,
    /// Age relative to the seeding time.
    pub age_days: i64,
}

impl SeedPost {
    pub fn created_at(&self, now: DateTime<Utc>) -> String {
        iso_timestamp(now - Duration::days(self.age_days))
    }
}

pub const STARTER_POSTS: [SeedPost; 4] = [
    SeedPost {
        title: "The Future of AI in Web Development",
        content: "
AI has moved from research labs into everyday web tooling. Code assistants sit inside the editor and suggest whole functions, spot likely bugs, and explain unfamiliar code.

## Personalised experiences

Models that learn from user behaviour can tailor layouts, recommendations, and copy per visitor. What used to need a dedicated data team is now a library call away.

## Smarter testing

Automated agents crawl an application, find edge cases, and file detailed bug reports, which makes releases **faster** and *safer*.

We are only at the beginning of this shift.
",
        image_url: "https://picsum.photos/seed/ai/1200/600",
        category: "Artificial Intelligence",
        age_days: 1,
    },
    SeedPost {
        title: "A Deep Dive into Modern CSS",
        content: "
CSS today can express layouts and animations that once required JavaScript.

**Grid and Flexbox:** Flexbox handles one-dimensional rows and columns, Grid handles two-dimensional page structure, and together they replace floats and positioning hacks.

**Custom properties:** Variables keep colours, fonts, and spacing in one place, which makes theming a matter of a few lines.

**Modern selectors:** `:is()`, `:where()`, and `:has()` shorten stylesheets, and `:has()` finally lets a parent react to its children.

Keeping up with these features pays off in cleaner, more maintainable styles.
",
        image_url: "https://picsum.photos/seed/css/1200/600",
        category: "Web Development",
        age_days: 3,
    },
    SeedPost {
        title: "Mastering React Hooks",
        content: "Hooks changed how components are written. This post walks through useState, useEffect, useContext, and custom hooks, with the patterns and pitfalls of managing state and side effects in function components.",
        image_url: "https://picsum.photos/seed/react/1200/600",
        category: "Web Development",
        age_days: 5,
    },
    SeedPost {
        title: "Generative AI: Beyond Text and Images",
        content: "Text and images are only the start. Generative models now compose music, write code, build 3D assets, and speed up scientific discovery.",
        image_url: "https://picsum.photos/seed/genai/1200/600",
        category: "Artificial Intelligence",
        age_days: 7,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_starter_posts_are_spaced_in_the_past() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let stamps: Vec<_> = STARTER_POSTS.iter().map(|p| p.created_at(now)).collect();
        assert_eq!(stamps[0], "2024-05-09T12:00:00.000Z");
        assert_eq!(stamps[3], "2024-05-03T12:00:00.000Z");
    }

    #[test]
    fn test_starter_posts_have_every_field() {
        for post in STARTER_POSTS.iter() {
            assert!(!post.title.is_empty());
            assert!(!post.content.trim().is_empty());
            assert!(post.image_url.starts_with("https://"));
            assert!(!post.category.is_empty());
        }
    }
}
