//! # Listing and Statistics
//!
//! Search, provider filter, sorting and pagination over ability summaries,
//! plus per-provider counts.
//!
//! Query parameters arrive as loose strings from a query string or CLI
//! flags. Unknown sort keys leave the registration order untouched and
//! out-of-range pages yield an empty item list rather than an error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use abex_core::Provider;

use crate::registry::{AbilityRegistry, AbilitySummary};

/// Default page size.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Listing parameters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring over name, slug and description.
    pub search: Option<String>,
    /// Provider label to keep; empty or `all` keeps everything.
    pub provider: Option<String>,
    /// `name` (default), `slug` or `provider`.
    pub orderby: Option<String>,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size, default [`DEFAULT_PER_PAGE`].
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Name,
    Slug,
    Provider,
}

impl SortKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "slug" => Some(Self::Slug),
            "provider" => Some(Self::Provider),
            _ => None,
        }
    }

    fn field<'a>(&self, summary: &'a AbilitySummary) -> &'a str {
        match self {
            Self::Name => &summary.name,
            Self::Slug => &summary.slug,
            Self::Provider => summary.provider.as_str(),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage {
    pub items: Vec<AbilitySummary>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub per_page: usize,
}

impl ListQuery {
    /// Apply the query to `summaries` (expected in registration order).
    pub fn apply(&self, summaries: Vec<AbilitySummary>) -> ListPage {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let provider = self
            .provider
            .as_deref()
            .filter(|p| !p.is_empty() && *p != "all");

        let mut items: Vec<AbilitySummary> = summaries
            .into_iter()
            .filter(|s| needle.as_deref().map_or(true, |n| matches_search(s, n)))
            .filter(|s| provider.map_or(true, |p| s.provider.as_str() == p))
            .collect();

        let descending = self.order.as_deref() == Some("desc");
        if let Some(key) = SortKey::parse(self.orderby.as_deref().unwrap_or("name")) {
            items.sort_by(|a, b| {
                let ord = compare_ignore_ascii_case(key.field(a), key.field(b));
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
        let page = self.page.unwrap_or(1).max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page);
        let items = items
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        ListPage {
            items,
            total_items,
            total_pages,
            page,
            per_page,
        }
    }
}

fn matches_search(summary: &AbilitySummary, needle: &str) -> bool {
    [&summary.name, &summary.slug, &summary.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Ability counts per provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub by_provider: ProviderCounts,
}

/// Counts for the three standard providers. Custom providers only count
/// toward [`Statistics::total`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderCounts {
    #[serde(rename = "Core")]
    pub core: usize,
    #[serde(rename = "Plugin")]
    pub plugin: usize,
    #[serde(rename = "Theme")]
    pub theme: usize,
}

impl Statistics {
    /// Tally `summaries`.
    pub fn from_summaries(summaries: &[AbilitySummary]) -> Self {
        let mut stats = Self {
            total: summaries.len(),
            ..Self::default()
        };
        for summary in summaries {
            match summary.provider {
                Provider::Core => stats.by_provider.core += 1,
                Provider::Plugin => stats.by_provider.plugin += 1,
                Provider::Theme => stats.by_provider.theme += 1,
                Provider::Custom(_) => {}
            }
        }
        stats
    }
}

impl AbilityRegistry {
    /// Run a listing query over the registry.
    pub fn query(&self, query: &ListQuery) -> ListPage {
        query.apply(self.describe_all())
    }

    /// Per-provider statistics over the registry.
    pub fn statistics(&self) -> Statistics {
        Statistics::from_summaries(&self.describe_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::Stub;
    use abex_core::ProviderContext;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> AbilityRegistry {
        let registry = AbilityRegistry::new(ProviderContext::with_themes(["twentytwentyfive"]));
        let mut entries = vec![
            Stub::new("core/get-posts", "get posts"),
            Stub::new("acme/send-mail", "Send Mail"),
            Stub::new("twentytwentyfive/palette", "Palette"),
            Stub::new("shop/create-order", "Create Order"),
        ];
        entries[1].description = "Delivers an e-mail through SMTP".into();
        entries[3].meta = json!({"provider": "Vendor"});
        for entry in entries {
            registry.register(Arc::new(entry)).unwrap();
        }
        registry
    }

    fn slugs(page: &ListPage) -> Vec<&str> {
        page.items.iter().map(|s| s.slug.as_str()).collect()
    }

    #[test]
    fn default_sort_is_name_ascending_case_insensitive() {
        let page = registry().query(&ListQuery::default());
        assert_eq!(
            slugs(&page),
            ["shop/create-order", "core/get-posts", "twentytwentyfive/palette", "acme/send-mail"]
        );
        assert_eq!(page.total_items, 4);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn sort_by_slug_descending() {
        let query = ListQuery {
            orderby: Some("slug".into()),
            order: Some("desc".into()),
            ..ListQuery::default()
        };
        let page = registry().query(&query);
        assert_eq!(
            slugs(&page),
            ["twentytwentyfive/palette", "shop/create-order", "core/get-posts", "acme/send-mail"]
        );
    }

    #[test]
    fn unknown_sort_key_keeps_registration_order() {
        let query = ListQuery {
            orderby: Some("color".into()),
            ..ListQuery::default()
        };
        let page = registry().query(&query);
        assert_eq!(
            slugs(&page),
            ["core/get-posts", "acme/send-mail", "twentytwentyfive/palette", "shop/create-order"]
        );
    }

    #[test]
    fn search_covers_name_slug_and_description() {
        let by = |s: &str| {
            let query = ListQuery {
                search: Some(s.into()),
                ..ListQuery::default()
            };
            registry().query(&query)
        };
        assert_eq!(slugs(&by("PALETTE")), ["twentytwentyfive/palette"]);
        assert_eq!(slugs(&by("create-order")), ["shop/create-order"]);
        assert_eq!(slugs(&by("smtp")), ["acme/send-mail"]);
        assert_eq!(by("nothing-matches").total_items, 0);
        assert_eq!(by("   ").total_items, 4);
    }

    #[test]
    fn provider_filter() {
        let by = |p: &str| {
            let query = ListQuery {
                provider: Some(p.into()),
                ..ListQuery::default()
            };
            registry().query(&query)
        };
        assert_eq!(slugs(&by("Core")), ["core/get-posts"]);
        assert_eq!(slugs(&by("Theme")), ["twentytwentyfive/palette"]);
        assert_eq!(slugs(&by("Vendor")), ["shop/create-order"]);
        assert_eq!(by("all").total_items, 4);
        assert_eq!(by("").total_items, 4);
        assert_eq!(by("core").total_items, 0);
    }

    #[test]
    fn pagination() {
        let query = ListQuery {
            orderby: Some("slug".into()),
            per_page: Some(3),
            page: Some(2),
            ..ListQuery::default()
        };
        let page = registry().query(&query);
        assert_eq!(slugs(&page), ["twentytwentyfive/palette"]);
        assert_eq!(page.total_pages, 2);

        let beyond = ListQuery {
            page: Some(9),
            ..query.clone()
        };
        assert!(registry().query(&beyond).items.is_empty());

        let clamped = ListQuery {
            page: Some(0),
            per_page: Some(0),
            ..ListQuery::default()
        };
        let page = registry().query(&clamped);
        assert_eq!((page.page, page.per_page, page.items.len()), (1, 1, 1));
        assert_eq!(page.total_pages, 4);
    }

    #[test]
    fn statistics_by_provider() {
        let stats = registry().statistics();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_provider.core, 1);
        assert_eq!(stats.by_provider.plugin, 1);
        assert_eq!(stats.by_provider.theme, 1);
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"total": 4, "by_provider": {"Core": 1, "Plugin": 1, "Theme": 1}})
        );
    }

    #[test]
    fn empty_registry_has_zero_pages() {
        let page = AbilityRegistry::default().query(&ListQuery::default());
        assert_eq!((page.total_items, page.total_pages), (0, 0));
    }
}
