//! Category labels and the administrator-maintained catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A classification label.
///
/// The four built-ins carry keyboard shortcuts and display colors; anything
/// else comes from the catalog and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Voice,
    Silent,
    AnsweringMachine,
    Undefined,
    Custom(String),
}

impl Category {
    pub const BUILT_INS: [Category; 4] = [
        Category::Voice,
        Category::Silent,
        Category::AnsweringMachine,
        Category::Undefined,
    ];

    /// Wire label, as the classification service expects it.
    pub fn label(&self) -> &str {
        match self {
            Category::Voice => "Voice",
            Category::Silent => "Silent",
            Category::AnsweringMachine => "Answering Machine",
            Category::Undefined => "Undefined",
            Category::Custom(name) => name,
        }
    }

    /// Parse a label; built-ins match case-insensitively.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        Self::BUILT_INS
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Category::Custom(trimmed.to_string()))
    }

    pub fn shortcut(&self) -> Option<char> {
        match self {
            Category::Voice => Some('v'),
            Category::Silent => Some('s'),
            Category::AnsweringMachine => Some('a'),
            Category::Undefined => Some('u'),
            Category::Custom(_) => None,
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'v' => Some(Category::Voice),
            's' => Some(Category::Silent),
            'a' => Some(Category::AnsweringMachine),
            'u' => Some(Category::Undefined),
            _ => None,
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(name) => name,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog entry as served by `GET /admin/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub shortcut: Option<String>,
}

/// Ordered set of categories a reviewer may choose from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            categories: Category::BUILT_INS.to_vec(),
        }
    }
}

impl CategoryCatalog {
    /// Built-ins first, then catalog entries in server order. Duplicates and
    /// blank names are dropped.
    pub fn from_entries(entries: &[CategoryEntry]) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            if entry.name.trim().is_empty() {
                continue;
            }
            let category = Category::from_label(&entry.name);
            if !catalog.contains(&category) {
                catalog.categories.push(category);
            }
        }
        catalog
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn contains(&self, category: &Category) -> bool {
        self.categories
            .iter()
            .any(|c| c.label().eq_ignore_ascii_case(category.label()))
    }
}
