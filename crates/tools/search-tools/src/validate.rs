//! Parameter validation and normalization.
//!
//! Every function here is pure and runs before timeout planning or any
//! network call. Failures name the offending field and what is allowed.

use chrono::NaiveDate;
use tavily_async::types::{
    AnswerLevel, ContentFormat, CrawlRequest, ExtractDepth, ExtractRequest, IncludeAnswer,
    IncludeRawContent, MapRequest, SearchDepth, SearchRequest, TimeRange, Topic,
};
use tracing::debug;

use crate::error::ToolError;
use crate::kind::SearchKind;
use crate::types::{ContextInput, CrawlInput, ExtractInput, FlagOrName, MapInput, SearchInput};

/// Longest accepted query, including any suffix a tool appends.
pub const MAX_QUERY_CHARS: usize = 400;
/// Longest accepted `days` window.
pub const MAX_DAYS: u32 = 365;
/// Most snippets per source with advanced depth.
pub const MAX_CHUNKS: u32 = 3;
/// Largest `max_tokens` for the context tool.
pub const MAX_CONTEXT_TOKENS: u32 = 32_000;
/// Default `max_tokens` for the context tool.
pub const DEFAULT_CONTEXT_TOKENS: u32 = 4_000;
/// Most entries in `include_domains` or `exclude_domains`.
pub const MAX_DOMAINS: usize = 300;
/// Most URLs in one extract call.
pub const MAX_EXTRACT_URLS: usize = 20;
/// Deepest crawl or map.
pub const MAX_SITE_DEPTH: u32 = 5;
/// Widest crawl or map.
pub const MAX_SITE_BREADTH: u32 = 500;
/// Largest crawl or map page limit.
pub const MAX_SITE_LIMIT: u32 = 500;

/// Validated input for the context tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRequest {
    /// Search issued to gather sources
    pub search: SearchRequest,
    /// Token budget for the packed context
    pub max_tokens: u32,
}

/// Validate input for a search-backed tool and build its tier-1 request.
///
/// Forced fields for `kind` are applied last, so they win over the caller.
pub fn validate_search(kind: SearchKind, input: SearchInput) -> Result<SearchRequest, ToolError> {
    let rules = kind.rules();
    let query = query(&input.query, rules.query_suffix)?;

    let topic = parse_choice("topic", input.topic.as_deref(), &Topic::ALL, Topic::as_str)?;
    let mut search_depth = parse_choice(
        "search_depth",
        input.search_depth.as_deref(),
        &SearchDepth::ALL,
        SearchDepth::as_str,
    )?;
    let time_range = parse_choice(
        "time_range",
        input.time_range.as_deref().map(expand_time_range),
        &TimeRange::ALL,
        TimeRange::as_str,
    )?;

    let is_news = rules.topic == Some(Topic::News) || topic == Some(Topic::News);
    let mut days = bounded("days", input.days, MAX_DAYS)?;
    let (mut start_date, mut end_date) = date_range(input.start_date, input.end_date)?;
    if is_news && start_date.is_some() && start_date == end_date {
        debug!(tool = rules.label, "single-day date range; using days=1");
        start_date = None;
        end_date = None;
        days = Some(1);
    }
    if days.is_some() && !is_news {
        return Err(ToolError::validation(
            "days",
            "only valid with topic=news; use time_range for other topics",
        ));
    }

    let chunks_per_source = bounded("chunks_per_source", input.chunks_per_source, MAX_CHUNKS)?;
    if chunks_per_source.is_some() && search_depth != Some(SearchDepth::Advanced) {
        return Err(ToolError::validation(
            "chunks_per_source",
            "only valid with search_depth=advanced",
        ));
    }

    let country = non_blank(input.country).map(|c| c.to_lowercase());
    let general = rules.topic.or(topic).unwrap_or_default() == Topic::General;
    if country.is_some() && !general {
        return Err(ToolError::validation("country", "only valid with topic=general"));
    }

    let auto_parameters = input.auto_parameters;
    if auto_parameters == Some(true) && search_depth.take().is_some() {
        debug!(tool = rules.label, "auto_parameters set; ignoring explicit search_depth");
    }

    let mut include_images = input.include_images;
    if input.include_image_descriptions == Some(true) && include_images != Some(true) {
        include_images = Some(true);
    }

    let mut req = SearchRequest {
        query,
        topic,
        search_depth,
        max_results: Some(max_results(kind, input.max_results)?),
        time_range,
        days,
        start_date,
        end_date,
        chunks_per_source,
        country,
        include_answer: include_answer(input.include_answer)?,
        include_raw_content: include_raw_content(input.include_raw_content)?,
        include_images,
        include_image_descriptions: input.include_image_descriptions,
        include_favicon: input.include_favicon,
        include_domains: domains("include_domains", input.include_domains)?,
        exclude_domains: domains("exclude_domains", input.exclude_domains)?,
        auto_parameters,
    };
    rules.apply_forced(&mut req);
    Ok(req)
}

/// Validate input for the context tool.
pub fn validate_context(input: ContextInput) -> Result<ContextRequest, ToolError> {
    let max_tokens = bounded("max_tokens", input.max_tokens, MAX_CONTEXT_TOKENS)?
        .unwrap_or(DEFAULT_CONTEXT_TOKENS);
    let search = validate_search(
        SearchKind::Context,
        SearchInput {
            query: input.query,
            max_results: input.max_results,
            search_depth: input.search_depth,
            topic: input.topic,
            ..SearchInput::default()
        },
    )?;
    Ok(ContextRequest { search, max_tokens })
}

/// Validate input for `tavily_extract`.
pub fn validate_extract(input: ExtractInput) -> Result<ExtractRequest, ToolError> {
    if input.urls.is_empty() || input.urls.len() > MAX_EXTRACT_URLS {
        return Err(ToolError::validation(
            "urls",
            format!(
                "expected 1-{MAX_EXTRACT_URLS} URLs, got {}",
                input.urls.len()
            ),
        ));
    }
    let urls = input
        .urls
        .into_iter()
        .map(|u| http_url("urls", &u))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExtractRequest {
        urls,
        extract_depth: parse_choice(
            "extract_depth",
            input.extract_depth.as_deref(),
            &ExtractDepth::ALL,
            ExtractDepth::as_str,
        )?,
        include_images: input.include_images,
        include_favicon: input.include_favicon,
        format: parse_choice(
            "format",
            input.format.as_deref(),
            &ContentFormat::ALL,
            ContentFormat::as_str,
        )?,
    })
}

/// Validate input for `tavily_crawl`.
pub fn validate_crawl(input: CrawlInput) -> Result<CrawlRequest, ToolError> {
    Ok(CrawlRequest {
        url: http_url("url", &input.url)?,
        max_depth: bounded("max_depth", input.max_depth, MAX_SITE_DEPTH)?,
        max_breadth: bounded("max_breadth", input.max_breadth, MAX_SITE_BREADTH)?,
        limit: bounded("limit", input.limit, MAX_SITE_LIMIT)?,
        instructions: non_blank(input.instructions),
        select_paths: non_empty(input.select_paths),
        exclude_paths: non_empty(input.exclude_paths),
        allow_external: input.allow_external,
        include_images: input.include_images,
        extract_depth: parse_choice(
            "extract_depth",
            input.extract_depth.as_deref(),
            &ExtractDepth::ALL,
            ExtractDepth::as_str,
        )?,
        format: parse_choice(
            "format",
            input.format.as_deref(),
            &ContentFormat::ALL,
            ContentFormat::as_str,
        )?,
    })
}

/// Validate input for `tavily_map`.
pub fn validate_map(input: MapInput) -> Result<MapRequest, ToolError> {
    Ok(MapRequest {
        url: http_url("url", &input.url)?,
        max_depth: bounded("max_depth", input.max_depth, MAX_SITE_DEPTH)?,
        max_breadth: bounded("max_breadth", input.max_breadth, MAX_SITE_BREADTH)?,
        limit: bounded("limit", input.limit, MAX_SITE_LIMIT)?,
        instructions: non_blank(input.instructions),
        select_paths: non_empty(input.select_paths),
        exclude_paths: non_empty(input.exclude_paths),
        allow_external: input.allow_external,
    })
}

fn query(raw: &str, suffix: &str) -> Result<String, ToolError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation("query", "must not be empty"));
    }
    let limit = MAX_QUERY_CHARS - suffix.chars().count();
    let len = trimmed.chars().count();
    if len > limit {
        return Err(ToolError::validation(
            "query",
            format!("must be at most {limit} characters, got {len}"),
        ));
    }
    Ok(format!("{trimmed}{suffix}"))
}

fn parse_choice<T: Copy>(
    field: &str,
    value: Option<&str>,
    all: &[T],
    name: fn(T) -> &'static str,
) -> Result<Option<T>, ToolError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let wanted = raw.trim().to_ascii_lowercase();
    all.iter()
        .copied()
        .find(|v| name(*v) == wanted)
        .map(Some)
        .ok_or_else(|| {
            let allowed: Vec<&str> = all.iter().map(|v| name(*v)).collect();
            ToolError::validation(
                field,
                format!("unknown value '{raw}'; allowed: {}", allowed.join(", ")),
            )
        })
}

fn expand_time_range(raw: &str) -> &str {
    match raw.trim() {
        "d" => "day",
        "w" => "week",
        "m" => "month",
        "y" => "year",
        other => other,
    }
}

fn max_results(kind: SearchKind, requested: Option<u32>) -> Result<u32, ToolError> {
    let rules = kind.rules();
    if let Some(fixed) = rules.fixed_results {
        if requested.is_some_and(|n| n != fixed) {
            debug!(tool = rules.label, ?requested, fixed, "max_results is fixed for this tool");
        }
        return Ok(fixed);
    }
    let (min, max) = rules.max_results;
    match requested {
        None => Ok(rules.default_results),
        Some(n) if (min..=max).contains(&n) => Ok(n),
        Some(n) => Err(ToolError::validation(
            "max_results",
            format!("must be between {min} and {max}, got {n}"),
        )),
    }
}

fn include_answer(value: Option<FlagOrName>) -> Result<Option<IncludeAnswer>, ToolError> {
    Ok(match value {
        None => None,
        Some(FlagOrName::Flag(on)) => Some(IncludeAnswer::Flag(on)),
        Some(FlagOrName::Name(name)) => parse_choice(
            "include_answer",
            Some(name.as_str()),
            &AnswerLevel::ALL,
            AnswerLevel::as_str,
        )?
        .map(IncludeAnswer::Level),
    })
}

fn include_raw_content(value: Option<FlagOrName>) -> Result<Option<IncludeRawContent>, ToolError> {
    Ok(match value {
        None => None,
        Some(FlagOrName::Flag(on)) => Some(IncludeRawContent::Flag(on)),
        Some(FlagOrName::Name(name)) => parse_choice(
            "include_raw_content",
            Some(name.as_str()),
            &ContentFormat::ALL,
            ContentFormat::as_str,
        )?
        .map(IncludeRawContent::Format),
    })
}

/// Parse an optional `YYYY-MM-DD` pair; the start may not follow the end.
fn date_range(
    start: Option<String>,
    end: Option<String>,
) -> Result<(Option<String>, Option<String>), ToolError> {
    let start = date("start_date", start)?;
    let end = date("end_date", end)?;
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(ToolError::validation(
            "start_date",
            format!("{s} is after end_date {e}"),
        )),
        _ => Ok((start.map(|d| d.to_string()), end.map(|d| d.to_string()))),
    }
}

fn date(field: &str, raw: Option<String>) -> Result<Option<NaiveDate>, ToolError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ToolError::validation(field, format!("'{raw}' is not a YYYY-MM-DD date")))
}

fn bounded(field: &str, value: Option<u32>, max: u32) -> Result<Option<u32>, ToolError> {
    match value {
        Some(v) if v == 0 || v > max => Err(ToolError::validation(
            field,
            format!("must be between 1 and {max}, got {v}"),
        )),
        other => Ok(other),
    }
}

fn domains(field: &str, value: Option<Vec<String>>) -> Result<Option<Vec<String>>, ToolError> {
    let Some(list) = non_empty(value) else {
        return Ok(None);
    };
    if list.len() > MAX_DOMAINS {
        return Err(ToolError::validation(
            field,
            format!("at most {MAX_DOMAINS} domains, got {}", list.len()),
        ));
    }
    Ok(Some(list))
}

fn non_empty(value: Option<Vec<String>>) -> Option<Vec<String>> {
    let list: Vec<String> = value?
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!list.is_empty()).then_some(list)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn http_url(field: &str, raw: &str) -> Result<String, ToolError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ToolError::validation(field, format!("'{trimmed}' is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(ToolError::validation(
            field,
            format!("'{trimmed}' uses scheme '{scheme}'; only http and https are allowed"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(query: &str) -> SearchInput {
        SearchInput {
            query: query.into(),
            ..SearchInput::default()
        }
    }

    fn field_of(err: ToolError) -> String {
        match err {
            ToolError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn query_is_trimmed_and_required() {
        let req = validate_search(SearchKind::Search, search("  rust  ")).unwrap();
        assert_eq!(req.query, "rust");
        assert_eq!(req.max_results, Some(5));

        let err = validate_search(SearchKind::Search, search("   ")).unwrap_err();
        assert_eq!(field_of(err), "query");
    }

    #[test]
    fn query_length_accounts_for_suffix() {
        let long = "a".repeat(390);
        assert!(validate_search(SearchKind::Search, search(&long)).is_ok());
        let err = validate_search(SearchKind::Diagram, search(&long)).unwrap_err();
        assert!(err.to_string().contains("at most"));

        let req = validate_search(SearchKind::Image, search("rust logo")).unwrap();
        assert_eq!(req.query, "rust logo images");
    }

    #[test]
    fn max_results_outside_range_is_rejected() {
        let mut input = search("q");
        for n in [0, 21, 99] {
            input.max_results = Some(n);
            let err = validate_search(SearchKind::Search, input.clone()).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("invalid max_results: must be between 1 and 20, got {n}")
            );
        }

        input.max_results = Some(20);
        assert_eq!(
            validate_search(SearchKind::News, input.clone()).unwrap().max_results,
            Some(20)
        );

        // Q&A always uses three sources, whatever the caller asked for.
        input.max_results = Some(99);
        assert_eq!(
            validate_search(SearchKind::Qna, input).unwrap().max_results,
            Some(3)
        );
    }

    #[test]
    fn context_rejects_out_of_range_sources() {
        let input = ContextInput {
            query: "q".into(),
            max_results: Some(0),
            max_tokens: None,
            search_depth: None,
            topic: None,
        };
        assert_eq!(field_of(validate_context(input).unwrap_err()), "max_results");
    }

    #[test]
    fn unknown_enum_values_list_allowed() {
        let mut input = search("q");
        input.topic = Some("sports".into());
        let err = validate_search(SearchKind::Search, input).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid topic"));
        assert!(msg.contains("general, news, finance, health, science, travel"));

        let mut input = search("q");
        input.search_depth = Some("deep".into());
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input).unwrap_err()),
            "search_depth"
        );
    }

    #[test]
    fn enums_are_case_insensitive_and_time_range_has_aliases() {
        let mut input = search("q");
        input.search_depth = Some("Advanced".into());
        input.time_range = Some("w".into());
        let req = validate_search(SearchKind::Search, input).unwrap();
        assert_eq!(req.search_depth, Some(SearchDepth::Advanced));
        assert_eq!(req.time_range, Some(TimeRange::Week));
    }

    #[test]
    fn auto_parameters_clears_depth() {
        let mut input = search("q");
        input.search_depth = Some("advanced".into());
        input.auto_parameters = Some(true);
        let req = validate_search(SearchKind::Search, input).unwrap();
        assert_eq!(req.search_depth, None);
        assert_eq!(req.auto_parameters, Some(true));
    }

    #[test]
    fn days_requires_news_and_range() {
        let mut input = search("q");
        input.days = Some(3);
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input.clone()).unwrap_err()),
            "days"
        );

        input.topic = Some("news".into());
        assert_eq!(
            validate_search(SearchKind::Search, input.clone()).unwrap().days,
            Some(3)
        );

        input.days = Some(366);
        assert_eq!(
            field_of(validate_search(SearchKind::News, input.clone()).unwrap_err()),
            "days"
        );
        input.days = Some(0);
        assert!(validate_search(SearchKind::News, input).is_err());
    }

    #[test]
    fn chunks_need_advanced_depth_and_range() {
        let mut input = search("q");
        input.chunks_per_source = Some(2);
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input.clone()).unwrap_err()),
            "chunks_per_source"
        );

        input.search_depth = Some("advanced".into());
        assert_eq!(
            validate_search(SearchKind::Search, input.clone())
                .unwrap()
                .chunks_per_source,
            Some(2)
        );

        input.chunks_per_source = Some(4);
        assert!(validate_search(SearchKind::Search, input).is_err());
    }

    #[test]
    fn country_needs_general_topic() {
        let mut input = search("q");
        input.country = Some(" United States ".into());
        assert_eq!(
            validate_search(SearchKind::Search, input.clone())
                .unwrap()
                .country
                .as_deref(),
            Some("united states")
        );

        input.topic = Some("finance".into());
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input.clone()).unwrap_err()),
            "country"
        );

        input.topic = None;
        assert_eq!(
            field_of(validate_search(SearchKind::News, input).unwrap_err()),
            "country"
        );
    }

    #[test]
    fn date_range_is_checked_and_single_news_day_becomes_days() {
        let mut input = search("q");
        input.start_date = Some("2025-03-01".into());
        input.end_date = Some("2025-03-31".into());
        let req = validate_search(SearchKind::Search, input.clone()).unwrap();
        assert_eq!(req.start_date.as_deref(), Some("2025-03-01"));
        assert_eq!(req.end_date.as_deref(), Some("2025-03-31"));

        input.start_date = Some("2025-04-01".into());
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input.clone()).unwrap_err()),
            "start_date"
        );

        input.start_date = Some("03/01/2025".into());
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input.clone()).unwrap_err()),
            "start_date"
        );

        input.start_date = Some("2025-03-31".into());
        input.topic = Some("news".into());
        let req = validate_search(SearchKind::Search, input.clone()).unwrap();
        assert_eq!(req.days, Some(1));
        assert_eq!(req.start_date, None);
        assert_eq!(req.end_date, None);

        // Outside news there is no day window, so the pair stays as given.
        input.topic = None;
        let req = validate_search(SearchKind::Search, input).unwrap();
        assert_eq!(req.days, None);
        assert_eq!(req.start_date.as_deref(), Some("2025-03-31"));
    }

    #[test]
    fn answer_levels_and_raw_formats() {
        let mut input = search("q");
        input.include_answer = Some(FlagOrName::Name("Advanced".into()));
        input.include_raw_content = Some(FlagOrName::Name("text".into()));
        let req = validate_search(SearchKind::Search, input.clone()).unwrap();
        assert_eq!(
            req.include_answer,
            Some(IncludeAnswer::Level(AnswerLevel::Advanced))
        );
        assert_eq!(
            req.include_raw_content,
            Some(IncludeRawContent::Format(ContentFormat::Text))
        );

        input.include_answer = Some(FlagOrName::Flag(true));
        input.include_raw_content = Some(FlagOrName::Name("html".into()));
        let err = validate_search(SearchKind::Search, input.clone()).unwrap_err();
        assert!(err.to_string().contains("allowed: markdown, text"));

        input.include_raw_content = None;
        input.include_answer = Some(FlagOrName::Name("full".into()));
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input).unwrap_err()),
            "include_answer"
        );
    }

    #[test]
    fn news_kind_defaults_days() {
        let req = validate_search(SearchKind::News, search("election")).unwrap();
        assert_eq!(req.topic, Some(Topic::News));
        assert_eq!(req.days, Some(7));
    }

    #[test]
    fn descriptions_turn_images_on() {
        let mut input = search("q");
        input.include_image_descriptions = Some(true);
        let req = validate_search(SearchKind::Search, input).unwrap();
        assert_eq!(req.include_images, Some(true));
    }

    #[test]
    fn domain_lists_are_bounded_and_cleaned() {
        let mut input = search("q");
        input.include_domains = Some(vec![" docs.rs ".into(), String::new()]);
        input.exclude_domains = Some(vec![]);
        let req = validate_search(SearchKind::Search, input).unwrap();
        assert_eq!(req.include_domains, Some(vec!["docs.rs".to_string()]));
        assert_eq!(req.exclude_domains, None);

        let mut input = search("q");
        input.exclude_domains = Some((0..301).map(|i| format!("d{i}.example")).collect());
        assert_eq!(
            field_of(validate_search(SearchKind::Search, input).unwrap_err()),
            "exclude_domains"
        );
    }

    #[test]
    fn context_tokens_default_and_bounds() {
        let input = ContextInput {
            query: "q".into(),
            max_results: None,
            max_tokens: None,
            search_depth: None,
            topic: None,
        };
        assert_eq!(validate_context(input.clone()).unwrap().max_tokens, 4000);

        let over = ContextInput {
            max_tokens: Some(32_001),
            ..input
        };
        assert_eq!(field_of(validate_context(over).unwrap_err()), "max_tokens");
    }

    #[test]
    fn extract_checks_count_and_scheme() {
        let ok = validate_extract(ExtractInput {
            urls: vec!["https://docs.rs/tokio".into()],
            format: Some("text".into()),
            ..ExtractInput::default()
        })
        .unwrap();
        assert_eq!(ok.format, Some(ContentFormat::Text));

        assert_eq!(
            field_of(validate_extract(ExtractInput::default()).unwrap_err()),
            "urls"
        );
        let err = validate_extract(ExtractInput {
            urls: vec!["ftp://example.com/file".into()],
            ..ExtractInput::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("scheme 'ftp'"));

        let too_many = ExtractInput {
            urls: (0..21).map(|i| format!("https://e.example/{i}")).collect(),
            ..ExtractInput::default()
        };
        assert!(validate_extract(too_many).is_err());
    }

    #[test]
    fn crawl_and_map_bounds() {
        let base = CrawlInput {
            url: "https://docs.rs".into(),
            instructions: Some("  ".into()),
            ..CrawlInput::default()
        };
        let req = validate_crawl(base.clone()).unwrap();
        assert_eq!(req.instructions, None);

        let deep = CrawlInput {
            max_depth: Some(6),
            ..base
        };
        assert_eq!(field_of(validate_crawl(deep).unwrap_err()), "max_depth");

        let map = MapInput {
            url: "not a url".into(),
            ..MapInput::default()
        };
        assert_eq!(field_of(validate_map(map).unwrap_err()), "url");

        let map = MapInput {
            url: "https://docs.rs".into(),
            limit: Some(0),
            ..MapInput::default()
        };
        assert_eq!(field_of(validate_map(map).unwrap_err()), "limit");
    }
}
