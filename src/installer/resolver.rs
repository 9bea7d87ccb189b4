//! Turns a [`ModReference`] into a CurseForge project id.
//!
//! Resolution walks an ordered list of [`ResolutionTier`]s and stops at the
//! first one that produces an id:
//!
//! 1. the id carried by a legacy link,
//! 2. the slug cache,
//! 3. the author's project list on the directory service,
//! 4. a search engine scrape keyed by the slug.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::cfwidget::CfWidgetClient;
use crate::api::search::SearchClient;
use crate::html::DocumentParser;
use crate::installer::cache::ModCache;
use crate::models::config::ModLoader;
use crate::models::mod_ref::ModReference;
use crate::models::project::Project;

#[async_trait]
pub trait ResolutionTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, reference: &ModReference, cache: &ModCache) -> Option<u32>;
}

pub struct IdentityResolver {
    tiers: Vec<Box<dyn ResolutionTier>>,
}

impl IdentityResolver {
    pub fn new(tiers: Vec<Box<dyn ResolutionTier>>) -> Self {
        Self { tiers }
    }

    /// The full chain: explicit id, cache, author lookup, search scrape.
    pub fn standard(
        directory: CfWidgetClient,
        search: SearchClient,
        parser: Box<dyn DocumentParser>,
        loader: ModLoader,
    ) -> Self {
        Self::new(vec![
            Box::new(ExplicitIdTier),
            Box::new(CacheTier),
            Box::new(AuthorTier { directory, loader }),
            Box::new(SearchTier { search, parser }),
        ])
    }

    /// `None` when every tier came up empty. Ids of 0 count as misses.
    pub async fn resolve(&self, reference: &ModReference, cache: &ModCache) -> Option<u32> {
        for tier in &self.tiers {
            match tier.resolve(reference, cache).await {
                Some(id) if id != 0 => {
                    debug!("{} resolved by {} tier to {}", reference.display_name, tier.name(), id);
                    return Some(id);
                }
                _ => debug!("{} not resolved by {} tier", reference.display_name, tier.name()),
            }
        }
        None
    }
}

pub struct ExplicitIdTier;

#[async_trait]
impl ResolutionTier for ExplicitIdTier {
    fn name(&self) -> &'static str {
        "explicit id"
    }

    async fn resolve(&self, reference: &ModReference, _cache: &ModCache) -> Option<u32> {
        reference.explicit_id
    }
}

pub struct CacheTier;

#[async_trait]
impl ResolutionTier for CacheTier {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn resolve(&self, reference: &ModReference, cache: &ModCache) -> Option<u32> {
        cache.get(reference.slug())
    }
}

/// Searches the author's projects for one named like the reference.
pub struct AuthorTier {
    directory: CfWidgetClient,
    loader: ModLoader,
}

#[async_trait]
impl ResolutionTier for AuthorTier {
    fn name(&self) -> &'static str {
        "author"
    }

    async fn resolve(&self, reference: &ModReference, _cache: &ModCache) -> Option<u32> {
        // An empty name would prefix-match every project of the author.
        if reference.author.is_empty() || reference.display_name.is_empty() {
            return None;
        }
        let Some(author) = self.directory.fetch_author(&reference.author).await else {
            info!("Author {} not found", reference.author);
            return None;
        };
        pick_project(&author.projects, &reference.display_name, self.loader)
    }
}

/// Among projects whose name starts with `name` and that fit `loader`, an
/// exact name match wins, otherwise the first in list order.
pub fn pick_project(projects: &[Project], name: &str, loader: ModLoader) -> Option<u32> {
    let candidates: Vec<&Project> = projects
        .iter()
        .filter(|p| p.name.starts_with(name) && p.matches_kind(loader))
        .collect();

    candidates
        .iter()
        .find(|p| p.name == name)
        .or_else(|| candidates.first())
        .map(|p| p.id)
}

pub struct SearchTier {
    search: SearchClient,
    parser: Box<dyn DocumentParser>,
}

#[async_trait]
impl ResolutionTier for SearchTier {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn resolve(&self, reference: &ModReference, _cache: &ModCache) -> Option<u32> {
        let slug = reference.slug();
        if slug.is_empty() {
            return None;
        }
        info!("{} not found through the directory, falling back to scraping", reference.display_name);
        self.search.scrape(slug, slug, self.parser.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::HttpContext;
    use crate::html::TagScanner;
    use crate::models::config::HttpSettings;
    use serde_json::json;
    use std::path::Path;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver_for(server: &MockServer, loader: ModLoader) -> IdentityResolver {
        let http = HttpContext::new(&HttpSettings::default()).unwrap();
        IdentityResolver::standard(
            CfWidgetClient::new(http.clone(), &server.uri()),
            SearchClient::new(http, &format!("{}/html", server.uri()), "curseforge.com"),
            Box::new(TagScanner),
            loader,
        )
    }

    fn search_page(url: &str, snippet: &str) -> String {
        format!(
            r#"<div id="links" class="results"><div class="result results_links web-result">
<a class="result__url" href="https://{url}">{url}</a>
<a class="result__snippet" href="https://{url}">{snippet}</a>
</div></div>"#
        )
    }

    #[test]
    fn test_pick_project_prefers_loader() {
        let projects = vec![Project::new(1, "Foo (Fabric)"), Project::new(2, "Foo (Forge)")];
        assert_eq!(pick_project(&projects, "Foo", ModLoader::Forge), Some(2));
        assert_eq!(pick_project(&projects, "Foo", ModLoader::Fabric), Some(1));
        assert_eq!(pick_project(&projects, "Foo", ModLoader::Quilt), None);
    }

    #[test]
    fn test_pick_project_prefers_exact_name() {
        let utils_first = vec![Project::new(1, "Foo Utils"), Project::new(2, "Foo")];
        let exact_first = vec![Project::new(2, "Foo"), Project::new(1, "Foo Utils")];
        assert_eq!(pick_project(&utils_first, "Foo", ModLoader::Forge), Some(2));
        assert_eq!(pick_project(&exact_first, "Foo", ModLoader::Forge), Some(2));
    }

    #[test]
    fn test_pick_project_falls_back_to_first_candidate() {
        let projects = vec![
            Project::new(7, "Bar"),
            Project::new(3, "Foo Core"),
            Project::new(4, "Foo Addons"),
        ];
        assert_eq!(pick_project(&projects, "Foo", ModLoader::Forge), Some(3));
        assert_eq!(pick_project(&projects, "Baz", ModLoader::Forge), None);
    }

    #[tokio::test]
    async fn test_explicit_id_makes_no_requests() {
        let mock_server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server, ModLoader::Forge);
        let reference = ModReference::new("Mantle (by mDiyo)", "https://minecraft.curseforge.com/projects/74924");
        let cache = ModCache::new("mod.cache");

        assert_eq!(resolver.resolve(&reference, &cache).await, Some(74924));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_directory_and_search() {
        let mock_server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server, ModLoader::Forge);
        let reference = ModReference::new("Just Enough Items (by mezz)", "https://www.curseforge.com/minecraft/mc-mods/jei");
        let cache = ModCache::parse(Path::new("mod.cache"), "jei=238222\n");

        assert_eq!(resolver.resolve(&reference, &cache).await, Some(238222));
    }

    #[tokio::test]
    async fn test_author_tier_resolves_before_search() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/author/search/someone"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "username": "someone",
                "projects": [
                    { "id": 11, "name": "Foo (Fabric)" },
                    { "id": 12, "name": "Foo (Forge)" }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server, ModLoader::Forge);
        let reference = ModReference::new("Foo (by someone)", "https://www.curseforge.com/minecraft/mc-mods/foo");
        let cache = ModCache::new("mod.cache");

        assert_eq!(resolver.resolve(&reference, &cache).await, Some(12));
    }

    #[tokio::test]
    async fn test_falls_back_to_search_when_author_unknown() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/author/search/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(search_page(
                "www.curseforge.com/minecraft/mc-mods/spooky-mod",
                "Project ID 424242 Created",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server, ModLoader::Forge);
        let reference = ModReference::new("Spooky (by ghost)", "https://www.curseforge.com/minecraft/mc-mods/spooky-mod");
        let cache = ModCache::new("mod.cache");

        assert_eq!(resolver.resolve(&reference, &cache).await, Some(424242));
    }

    #[tokio::test]
    async fn test_nameless_reference_skips_author_lookup() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/author/search/mezz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 17072262,
                "username": "mezz",
                "projects": [
                    { "id": 59751, "name": "Forestry" },
                    { "id": 238222, "name": "Just Enough Items (JEI)" }
                ]
            })))
            .expect(0)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(search_page(
                "www.curseforge.com/minecraft/mc-mods/jei",
                "Project ID 238222 Created",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server, ModLoader::Forge);
        let reference = ModReference::new("(by mezz)", "https://www.curseforge.com/minecraft/mc-mods/jei");
        assert!(reference.display_name.is_empty());
        assert_eq!(reference.author, "mezz");

        let cache = ModCache::new("mod.cache");
        assert_eq!(resolver.resolve(&reference, &cache).await, Some(238222));
    }

    #[tokio::test]
    async fn test_exhausted_tiers_resolve_to_none() {
        let mock_server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server, ModLoader::Forge);
        let reference = ModReference::new("Lost", "https://www.curseforge.com/minecraft/mc-mods/lost");
        let cache = ModCache::new("mod.cache");

        assert_eq!(resolver.resolve(&reference, &cache).await, None);
    }

    struct FixedTier(Option<u32>);

    #[async_trait]
    impl ResolutionTier for FixedTier {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn resolve(&self, _reference: &ModReference, _cache: &ModCache) -> Option<u32> {
            self.0
        }
    }

    #[tokio::test]
    async fn test_zero_ids_do_not_short_circuit() {
        let resolver = IdentityResolver::new(vec![
            Box::new(FixedTier(Some(0))),
            Box::new(FixedTier(None)),
            Box::new(FixedTier(Some(5))),
            Box::new(FixedTier(Some(6))),
        ]);
        let reference = ModReference::new("Any", "https://example.com/any");
        assert_eq!(resolver.resolve(&reference, &ModCache::new("c")).await, Some(5));
    }
}
