use serde::{Deserialize, Serialize};

use crate::models::config::ModLoader;

/// An author as returned by the directory service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Author {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u32,
    pub name: String,
}

impl Project {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Best guess at the project's URL slug: lower-cased, with spaces, slashes
    /// and dashes turned into single dashes and other punctuation dropped.
    pub fn url_slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.to_lowercase().chars() {
            match c {
                ' ' | '/' | '-' => {
                    if !slug.is_empty() && !slug.ends_with('-') {
                        slug.push('-');
                    }
                }
                c if c.is_alphanumeric() => slug.push(c),
                _ => {}
            }
        }
        slug.trim_end_matches('-').to_string()
    }

    /// Contents of a trailing parenthetical, e.g. `Forge` for `Foo (Forge)`.
    pub fn kind(&self) -> Option<&str> {
        let name = self.name.trim_end();
        let inner = name.strip_suffix(')')?;
        let open = inner.rfind('(')?;
        Some(inner[open + 1..].trim())
    }

    /// Whether this project can be used with `loader`.
    ///
    /// Projects without a kind suffix, or whose suffix names no known loader
    /// (`Foo (JEI)`, `Foo (Unofficial)`), match every loader. A suffix such as
    /// `(Forge/Fabric)` matches each loader it lists.
    pub fn matches_kind(&self, loader: ModLoader) -> bool {
        let Some(kind) = self.kind() else {
            return true;
        };
        let named: Vec<ModLoader> = kind
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter_map(|token| token.parse::<ModLoader>().ok())
            .collect();

        named.is_empty() || named.contains(&loader)
    }
}
