//! Static catalog taxonomy: top-level categories and the language hub.
//!
//! Categories are fixed at build time and never fetched. Subcategories are
//! owned by the catalog service and arrive through [`CatalogClient`].
//!
//! [`CatalogClient`]: super::CatalogClient

/// How a category is browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Subcategories are fetched from the catalog service.
    Server,
    /// Synthetic category whose children are the static [`LANGUAGES`] list.
    LanguageHub,
}

/// A top-level browsing category.
#[derive(Debug, PartialEq, Eq)]
pub struct Category {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Short glyph shown in the category panel.
    pub icon: &'static str,
    pub kind: CategoryKind,
}

impl Category {
    pub fn is_language_hub(&self) -> bool {
        self.kind == CategoryKind::LanguageHub
    }
}

/// Slug of the category selected at startup when none is configured.
pub const DEFAULT_CATEGORY: &str = "dsa";

/// Slug of the synthetic language hub.
pub const LANGUAGE_HUB: &str = "languages";

pub static CATEGORIES: [Category; 6] = [
    Category {
        slug: "dsa",
        name: "Data Structures & Algorithms",
        description: "Master fundamental algorithms and data structures",
        icon: "{}",
        kind: CategoryKind::Server,
    },
    Category {
        slug: "system_design",
        name: "System Design",
        description: "Learn to design scalable systems",
        icon: "[]",
        kind: CategoryKind::Server,
    },
    Category {
        slug: "behavioral",
        name: "Behavioral Questions",
        description: "Prepare for behavioral interviews",
        icon: "<>",
        kind: CategoryKind::Server,
    },
    Category {
        slug: "dev_productivity",
        name: "Developer Productivity",
        description: "Sharpen your tooling and everyday workflow",
        icon: "$_",
        kind: CategoryKind::Server,
    },
    Category {
        slug: "ai_ml",
        name: "AI & Machine Learning",
        description: "From fundamentals to large language models",
        icon: "**",
        kind: CategoryKind::Server,
    },
    Category {
        slug: LANGUAGE_HUB,
        name: "Language-Specific Prep",
        description: "Deep dive into programming languages",
        icon: "</",
        kind: CategoryKind::LanguageHub,
    },
];

/// Look up a category by slug.
pub fn category_by_slug(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

/// The category used when nothing else is configured.
pub fn default_category() -> &'static Category {
    // CATEGORIES is non-empty and starts with the default.
    category_by_slug(DEFAULT_CATEGORY).unwrap_or(&CATEGORIES[0])
}

// ============================================================================
// Languages
// ============================================================================

/// A programming language reachable through the language hub.
///
/// Each language is stored server-side as its own category with a fixed set
/// of shelves. Browsing a language always opens its "Most Watched" shelf.
#[derive(Debug, PartialEq, Eq)]
pub struct Language {
    pub slug: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Category slug the catalog service files this language under.
    pub category: &'static str,
}

/// Shelf suffix for the single subcategory a language exposes.
const LANGUAGE_SHELF: &str = "Most Watched";

impl Language {
    /// Subcategory label queried when this language is selected.
    pub fn subcategory(&self) -> String {
        format!("{} - {}", self.name, LANGUAGE_SHELF)
    }
}

pub static LANGUAGES: [Language; 10] = [
    Language {
        slug: "python",
        name: "Python",
        icon: "py",
        category: "language_python",
    },
    Language {
        slug: "javascript",
        name: "JavaScript",
        icon: "js",
        category: "language_javascript",
    },
    Language {
        slug: "java",
        name: "Java",
        icon: "jv",
        category: "language_java",
    },
    Language {
        slug: "cpp",
        name: "C++",
        icon: "c+",
        category: "language_cpp",
    },
    Language {
        slug: "csharp",
        name: "C#",
        icon: "c#",
        category: "language_csharp",
    },
    Language {
        slug: "go",
        name: "Go",
        icon: "go",
        category: "language_go",
    },
    Language {
        slug: "rust",
        name: "Rust",
        icon: "rs",
        category: "language_rust",
    },
    Language {
        slug: "sql",
        name: "SQL",
        icon: "sq",
        category: "language_sql",
    },
    Language {
        slug: "kotlin",
        name: "Kotlin",
        icon: "kt",
        category: "language_kotlin",
    },
    Language {
        slug: "swift",
        name: "Swift",
        icon: "sw",
        category: "language_swift",
    },
];

pub fn language_by_slug(slug: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.slug == slug)
}
