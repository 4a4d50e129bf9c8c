//! Degradation tiers and the request ladders built from them.
//!
//! Every ladder is `[original, reduced, minimal]`. A tier never asks for
//! more than the tier before it.

use tavily_async::types::{
    CrawlRequest, ExtractDepth, ExtractRequest, IncludeAnswer, MapRequest, SearchDepth,
    SearchRequest,
};

use crate::kind::SearchKind;

/// Position on the fallback ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// The validated request as given
    Original = 1,
    /// Capped results, basic depth, rich extras dropped
    Reduced = 2,
    /// Only what the tool cannot work without
    Minimal = 3,
}

impl Tier {
    /// Tiers in the order they are tried.
    pub const ALL: [Self; 3] = [Self::Original, Self::Reduced, Self::Minimal];

    /// 1-based tier number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// 0-based index into a ladder.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// The tier after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Original => Some(Self::Reduced),
            Self::Reduced => Some(Self::Minimal),
            Self::Minimal => None,
        }
    }
}

/// URL cap on the minimal extract tier.
const MINIMAL_URLS: usize = 5;
/// Crawl/map caps: (depth, breadth, limit) on the reduced tier.
const REDUCED_SITE: (u32, u32, u32) = (2, 20, 25);
/// Crawl/map caps on the minimal tier.
const MINIMAL_SITE: (u32, u32, u32) = (1, 10, 10);

fn cap(value: Option<u32>, max: u32) -> Option<u32> {
    Some(value.map_or(max, |v| v.min(max)))
}

/// Build the three search requests for `kind` from the validated tier-1 request.
///
/// The reduced tier keeps filters and a basic answer; the minimal tier keeps
/// the query and whatever the kind cannot work without.
#[must_use]
pub fn search_ladder(kind: SearchKind, original: &SearchRequest) -> [SearchRequest; 3] {
    let rules = kind.rules();

    let mut reduced = SearchRequest {
        query: original.query.clone(),
        topic: original.topic,
        search_depth: Some(SearchDepth::Basic),
        max_results: cap(original.max_results, rules.reduced_results),
        time_range: original.time_range,
        days: original.days,
        start_date: original.start_date.clone(),
        end_date: original.end_date.clone(),
        country: original.country.clone(),
        include_answer: original
            .include_answer
            .filter(|a| a.is_on())
            .map(IncludeAnswer::at_most_basic),
        include_domains: original.include_domains.clone(),
        exclude_domains: original.exclude_domains.clone(),
        ..SearchRequest::default()
    };
    rules.apply_kept(&mut reduced, original.days);

    let mut minimal = SearchRequest::new(original.query.clone())
        .with_search_depth(SearchDepth::Basic)
        .with_max_results(rules.minimal_results);
    rules.apply_kept(&mut minimal, original.days);

    [original.clone(), reduced, minimal]
}

/// Build the three extract requests from the validated tier-1 request.
#[must_use]
pub fn extract_ladder(original: &ExtractRequest) -> [ExtractRequest; 3] {
    let reduced = ExtractRequest {
        urls: original.urls.clone(),
        extract_depth: Some(ExtractDepth::Basic),
        format: original.format,
        ..ExtractRequest::default()
    };
    let minimal = ExtractRequest {
        urls: original.urls.iter().take(MINIMAL_URLS).cloned().collect(),
        ..reduced.clone()
    };
    [original.clone(), reduced, minimal]
}

/// Build the three crawl requests from the validated tier-1 request.
#[must_use]
pub fn crawl_ladder(original: &CrawlRequest) -> [CrawlRequest; 3] {
    let (depth, breadth, limit) = REDUCED_SITE;
    let reduced = CrawlRequest {
        url: original.url.clone(),
        max_depth: cap(original.max_depth, depth),
        max_breadth: cap(original.max_breadth, breadth),
        limit: cap(original.limit, limit),
        instructions: original.instructions.clone(),
        select_paths: original.select_paths.clone(),
        exclude_paths: original.exclude_paths.clone(),
        allow_external: original.allow_external,
        extract_depth: Some(ExtractDepth::Basic),
        format: original.format,
        ..CrawlRequest::default()
    };
    let (depth, breadth, limit) = MINIMAL_SITE;
    let minimal = CrawlRequest {
        url: original.url.clone(),
        max_depth: Some(depth),
        max_breadth: Some(breadth),
        limit: Some(limit),
        extract_depth: Some(ExtractDepth::Basic),
        format: original.format,
        ..CrawlRequest::default()
    };
    [original.clone(), reduced, minimal]
}

/// Build the three map requests from the validated tier-1 request.
#[must_use]
pub fn map_ladder(original: &MapRequest) -> [MapRequest; 3] {
    let (depth, breadth, limit) = REDUCED_SITE;
    let reduced = MapRequest {
        max_depth: cap(original.max_depth, depth),
        max_breadth: cap(original.max_breadth, breadth),
        limit: cap(original.limit, limit),
        ..original.clone()
    };
    let (depth, breadth, limit) = MINIMAL_SITE;
    let minimal = MapRequest {
        url: original.url.clone(),
        max_depth: Some(depth),
        max_breadth: Some(breadth),
        limit: Some(limit),
        ..MapRequest::default()
    };
    [original.clone(), reduced, minimal]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavily_async::types::{AnswerLevel, ContentFormat, IncludeRawContent, Topic};

    fn rich() -> SearchRequest {
        SearchRequest {
            include_raw_content: Some(IncludeRawContent::Flag(true)),
            include_favicon: Some(true),
            auto_parameters: Some(true),
            include_domains: Some(vec!["rust-lang.org".into()]),
            ..SearchRequest::new("async rust")
                .with_search_depth(SearchDepth::Advanced)
                .with_max_results(15)
                .with_answer(true)
                .with_images(true, true)
        }
    }

    #[test]
    fn tier_numbers_and_order() {
        assert_eq!(Tier::ALL.map(Tier::number), [1, 2, 3]);
        assert_eq!(Tier::Minimal.index(), 2);
        assert_eq!(Tier::Original.next(), Some(Tier::Reduced));
        assert_eq!(Tier::Minimal.next(), None);
    }

    #[test]
    fn reduced_search_drops_extras_but_keeps_filters() {
        let [t1, t2, _] = search_ladder(SearchKind::Search, &rich());
        assert_eq!(t1, rich());
        assert_eq!(t2.max_results, Some(5));
        assert_eq!(t2.search_depth, Some(SearchDepth::Basic));
        assert_eq!(t2.include_answer, Some(IncludeAnswer::Flag(true)));
        assert_eq!(t2.include_images, None);
        assert_eq!(t2.include_raw_content, None);
        assert_eq!(t2.auto_parameters, None);
        assert_eq!(t2.include_domains, Some(vec!["rust-lang.org".into()]));
    }

    #[test]
    fn minimal_search_is_query_only() {
        let [_, _, t3] = search_ladder(SearchKind::Search, &rich());
        assert_eq!(
            t3,
            SearchRequest::new("async rust")
                .with_search_depth(SearchDepth::Basic)
                .with_max_results(3)
        );
    }

    #[test]
    fn news_keeps_topic_and_days_on_every_tier() {
        let mut req = SearchRequest::new("elections").with_topic(Topic::News);
        req.days = Some(3);
        for r in search_ladder(SearchKind::News, &req) {
            assert_eq!(r.topic, Some(Topic::News));
            assert_eq!(r.days, Some(3));
        }
    }

    #[test]
    fn qna_keeps_answer_and_image_kinds_keep_images() {
        for r in search_ladder(SearchKind::Qna, &rich()) {
            assert_eq!(r.include_answer, Some(IncludeAnswer::Flag(true)));
        }
        let [_, t2, t3] = search_ladder(SearchKind::Image, &rich());
        assert_eq!(t2.include_images, Some(true));
        assert_eq!(t2.include_image_descriptions, None);
        assert_eq!(t3.include_images, Some(true));
    }

    #[test]
    fn reduced_search_lowers_answer_and_drops_chunks() {
        let mut req = SearchRequest::new("rust 2024 edition")
            .with_search_depth(SearchDepth::Advanced)
            .with_answer_level(AnswerLevel::Advanced);
        req.chunks_per_source = Some(3);
        req.country = Some("germany".into());
        req.start_date = Some("2025-01-01".into());
        req.include_raw_content = Some(IncludeRawContent::Format(ContentFormat::Markdown));

        let [_, t2, t3] = search_ladder(SearchKind::Search, &req);
        assert_eq!(t2.include_answer, Some(IncludeAnswer::Level(AnswerLevel::Basic)));
        assert_eq!(t2.chunks_per_source, None);
        assert_eq!(t2.include_raw_content, None);
        assert_eq!(t2.country.as_deref(), Some("germany"));
        assert_eq!(t2.start_date.as_deref(), Some("2025-01-01"));
        assert_eq!(t3.include_answer, None);
        assert_eq!(t3.country, None);
        assert_eq!(t3.start_date, None);

        let off = SearchRequest::new("q").with_answer(false);
        let [_, t2, _] = search_ladder(SearchKind::Search, &off);
        assert_eq!(t2.include_answer, None);
    }

    #[test]
    fn every_kind_follows_its_result_caps() {
        let req = SearchRequest::new("q").with_max_results(20);
        for kind in SearchKind::ALL {
            let rules = kind.rules();
            let [_, t2, t3] = search_ladder(kind, &req);
            assert_eq!(t2.max_results, Some(rules.reduced_results), "{kind:?}");
            assert_eq!(t3.max_results, Some(rules.minimal_results), "{kind:?}");
            assert_eq!(t2.search_depth, Some(SearchDepth::Basic));
        }
    }

    #[test]
    fn small_requests_are_not_inflated() {
        let req = SearchRequest::new("q").with_max_results(2);
        let [_, t2, _] = search_ladder(SearchKind::Search, &req);
        assert_eq!(t2.max_results, Some(2));
    }

    #[test]
    fn extract_minimal_caps_urls() {
        let urls: Vec<String> = (0..8).map(|i| format!("https://e.example/{i}")).collect();
        let mut req = ExtractRequest::new(urls);
        req.extract_depth = Some(ExtractDepth::Advanced);
        req.include_images = Some(true);
        req.format = Some(ContentFormat::Text);

        let [_, t2, t3] = extract_ladder(&req);
        assert_eq!(t2.urls.len(), 8);
        assert_eq!(t2.extract_depth, Some(ExtractDepth::Basic));
        assert_eq!(t2.include_images, None);
        assert_eq!(t3.urls.len(), 5);
        assert_eq!(t3.format, Some(ContentFormat::Text));
    }

    #[test]
    fn site_ladders_shrink() {
        let mut crawl = CrawlRequest::new("https://docs.rs");
        crawl.max_depth = Some(4);
        crawl.limit = Some(200);
        crawl.instructions = Some("only guides".into());
        let [_, t2, t3] = crawl_ladder(&crawl);
        assert_eq!((t2.max_depth, t2.limit), (Some(2), Some(25)));
        assert_eq!(t2.instructions.as_deref(), Some("only guides"));
        assert_eq!((t3.max_depth, t3.limit), (Some(1), Some(10)));
        assert_eq!(t3.instructions, None);

        let mut map = MapRequest::new("https://docs.rs");
        map.select_paths = Some(vec!["/std/.*".into()]);
        let [_, t2, t3] = map_ladder(&map);
        assert_eq!(t2.select_paths, map.select_paths);
        assert_eq!(t3.select_paths, None);
        assert_eq!(t3.max_breadth, Some(10));
    }
}
