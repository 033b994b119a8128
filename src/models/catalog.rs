//! Catalog models
//!
//! Courses and blog posts shown on the marketing site. Both are hand-authored
//! and read-only; see [`Catalog::builtin`] for the published records.

use serde::{Deserialize, Serialize};

/// Difficulty label of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A course offered on the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// URL-friendly identifier
    pub id: String,
    pub title: String,
    pub level: CourseLevel,
    /// Display string, e.g. "6 weeks"
    pub duration: String,
    /// Accent color used by the frontend card
    pub color: String,
    /// Badge label, e.g. "Popular"
    pub tag: String,
    /// Number of modules in the course
    pub modules: u32,
}

impl Course {
    fn new(
        id: &str,
        title: &str,
        level: CourseLevel,
        duration: &str,
        color: &str,
        tag: &str,
        modules: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            level,
            duration: duration.to_string(),
            color: color.to_string(),
            tag: tag.to_string(),
            modules,
        }
    }
}

/// A blog post teaser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub tag: String,
}

impl BlogPost {
    fn new(id: &str, title: &str, excerpt: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            tag: tag.to_string(),
        }
    }
}

/// The complete static catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub posts: Vec<BlogPost>,
}

impl Catalog {
    /// The published courses and posts, in display order
    pub fn builtin() -> Self {
        let courses = vec![
            Course::new(
                "genai-pro",
                "Generative AI for Professionals",
                CourseLevel::Intermediate,
                "6 weeks",
                "purple",
                "Popular",
                8,
            ),
            Course::new(
                "mlops-essentials",
                "MLOps Essentials",
                CourseLevel::Advanced,
                "4 weeks",
                "orange",
                "New",
                6,
            ),
            Course::new(
                "prompt-engineering",
                "Prompt Engineering Mastery",
                CourseLevel::Beginner,
                "3 weeks",
                "pink",
                "Trending",
                5,
            ),
            Course::new(
                "ai-product-mgmt",
                "AI Product Management",
                CourseLevel::Intermediate,
                "5 weeks",
                "blue",
                "Team Favorite",
                7,
            ),
        ];

        let posts = vec![
            BlogPost::new(
                "industry-ai-trends-2025",
                "Industry AI Trends 2025",
                "From copilots to autonomous workflows, here’s what’s next.",
                "Insights",
            ),
            BlogPost::new(
                "roi-of-ai-upskilling",
                "The ROI of AI Upskilling",
                "How teams accelerate delivery and reduce costs with the right skills.",
                "Research",
            ),
            BlogPost::new(
                "governance-guardrails",
                "Governance & Guardrails for Enterprise GenAI",
                "Balancing innovation with risk and compliance.",
                "Enterprise",
            ),
        ];

        Self { courses, posts }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn builtin_catalog_is_stable(rebuilds in 1usize..10) {
            let first = Catalog::builtin();
            for _ in 0..rebuilds {
                let again = Catalog::builtin();
                prop_assert_eq!(&again.courses, &first.courses);
                prop_assert_eq!(&again.posts, &first.posts);
            }
        }
    }
}
