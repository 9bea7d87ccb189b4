/// A mod as it appears in a modlist: the anchor's visible text and its link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModReference {
    pub display_name: String,
    pub url: String,
    /// Author taken from a trailing `(by <name>)`, empty when absent.
    pub author: String,
    /// Project id carried by legacy `/projects/<id>` links.
    pub explicit_id: Option<u32>,
    resolved_id: Option<u32>,
}

impl ModReference {
    pub fn new(text: &str, url: &str) -> Self {
        let (display_name, author) = split_author(text);
        let url = url.trim().to_string();
        let explicit_id = legacy_project_id(&url);

        Self {
            display_name,
            url,
            author,
            explicit_id,
            resolved_id: None,
        }
    }

    /// Cache and search key for this reference.
    pub fn slug(&self) -> &str {
        url_slug(&self.url)
    }

    pub fn project_id(&self) -> Option<u32> {
        self.resolved_id.or(self.explicit_id)
    }

    /// Records the resolved project id. Only the first call has an effect.
    pub fn mark_resolved(&mut self, id: u32) -> bool {
        if self.resolved_id.is_some() {
            return false;
        }
        self.resolved_id = Some(id);
        true
    }

    /// Text in the same `Name (by Author)` shape the modlist export uses.
    pub fn label(&self) -> String {
        if self.author.is_empty() {
            self.display_name.clone()
        } else {
            format!("{} (by {})", self.display_name, self.author)
        }
    }
}

impl std::fmt::Display for ModReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] \"{}\" {}", self.display_name, self.author, self.url)
    }
}

fn split_author(text: &str) -> (String, String) {
    let text = text.trim();
    match text.rfind("(by ") {
        Some(by) => {
            let rest = &text[by + 4..];
            let author = rest.split(')').next().unwrap_or_default().trim();
            (text[..by].trim().to_string(), author.to_string())
        }
        None => (text.to_string(), String::new()),
    }
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Derives the project slug from a project or file URL: the last path segment
/// that contains a letter, skipping `files` and `all`.
///
/// `https://www.curseforge.com/minecraft/mc-mods/jei/files/all?page=2` yields `jei`.
pub fn url_slug(url: &str) -> &str {
    strip_query(url)
        .rsplit('/')
        .find(|part| {
            !part.is_empty()
                && *part != "files"
                && *part != "all"
                && part.chars().any(|c| c.is_ascii_alphabetic())
        })
        .unwrap_or_default()
}

/// `.../projects/238222` style links carry the project id directly.
fn legacy_project_id(url: &str) -> Option<u32> {
    let mut segments = strip_query(url).trim_end_matches('/').rsplit('/');
    let last = segments.next()?;
    let parent = segments.next()?;
    if parent != "projects" || last.is_empty() || !last.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    last.parse().ok().filter(|id| *id != 0)
}
