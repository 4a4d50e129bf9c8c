//! The search-backed tool kinds and the rules each one imposes on a request.
//!
//! Each kind owns one [`KindRules`] row. Validation and the fallback ladder
//! read the row instead of branching on the kind.

use tavily_async::types::{IncludeAnswer, SearchRequest, Topic};

/// A tool that issues `POST /search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// Generic search with every parameter exposed
    Search,
    /// Answer-first search with three sources
    Qna,
    /// Recent news within a day window
    News,
    /// Image search with descriptions
    Image,
    /// Diagram and illustration search
    Diagram,
    /// Sources packed into a bounded context string
    Context,
}

/// Default `days` window for news.
pub const DEFAULT_NEWS_DAYS: u32 = 7;

/// Fixed result count for Q&A.
pub const QNA_RESULTS: u32 = 3;

/// What a kind forces on tier 1 and keeps while degrading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRules {
    /// Name used in logs
    pub label: &'static str,
    /// Text appended to the caller's query
    pub query_suffix: &'static str,
    /// Topic forced on every tier
    pub topic: Option<Topic>,
    /// `days` used when the caller gives none; kept on every tier
    pub default_days: Option<u32>,
    /// Answer forced on every tier
    pub answer: bool,
    /// Images forced on every tier
    pub images: bool,
    /// Image descriptions forced on tier 1
    pub image_descriptions: bool,
    /// Accepted `max_results` range
    pub max_results: (u32, u32),
    /// `max_results` when the caller gives none
    pub default_results: u32,
    /// Result count that replaces whatever the caller asked for
    pub fixed_results: Option<u32>,
    /// Result cap on the reduced tier
    pub reduced_results: u32,
    /// Result count on the minimal tier
    pub minimal_results: u32,
}

const GENERIC: KindRules = KindRules {
    label: "search",
    query_suffix: "",
    topic: None,
    default_days: None,
    answer: false,
    images: false,
    image_descriptions: false,
    max_results: (1, 20),
    default_results: 5,
    fixed_results: None,
    reduced_results: 5,
    minimal_results: 3,
};

/// Rows in [`SearchKind::ALL`] order.
const RULES: [KindRules; 6] = [
    GENERIC,
    KindRules {
        label: "qna",
        answer: true,
        default_results: QNA_RESULTS,
        fixed_results: Some(QNA_RESULTS),
        reduced_results: QNA_RESULTS,
        ..GENERIC
    },
    KindRules {
        label: "news",
        topic: Some(Topic::News),
        default_days: Some(DEFAULT_NEWS_DAYS),
        ..GENERIC
    },
    KindRules {
        label: "image",
        query_suffix: " images",
        images: true,
        image_descriptions: true,
        ..GENERIC
    },
    KindRules {
        label: "diagram",
        query_suffix: " diagram illustration",
        images: true,
        image_descriptions: true,
        ..GENERIC
    },
    KindRules {
        label: "context",
        ..GENERIC
    },
];

impl SearchKind {
    /// Every kind, in tool listing order.
    pub const ALL: [Self; 6] = [
        Self::Search,
        Self::Qna,
        Self::News,
        Self::Image,
        Self::Diagram,
        Self::Context,
    ];

    /// This kind's rule row.
    #[must_use]
    pub const fn rules(self) -> KindRules {
        RULES[self as usize]
    }

    /// Name used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.rules().label
    }

    /// Text appended to the caller's query.
    #[must_use]
    pub const fn query_suffix(self) -> &'static str {
        self.rules().query_suffix
    }
}

impl KindRules {
    /// Apply the tier-1 fields this kind always sets, overriding the caller.
    pub fn apply_forced(&self, req: &mut SearchRequest) {
        let days = req.days;
        self.apply_kept(req, days);
        if self.image_descriptions {
            req.include_image_descriptions = Some(true);
        }
        if let Some(n) = self.fixed_results {
            req.max_results = Some(n);
        }
    }

    /// Apply the fields every tier keeps for this kind.
    ///
    /// `days` is the window the tier-1 request settled on.
    pub fn apply_kept(&self, req: &mut SearchRequest, days: Option<u32>) {
        if let Some(topic) = self.topic {
            req.topic = Some(topic);
        }
        if let Some(default) = self.default_days {
            req.days = Some(days.unwrap_or(default));
        }
        if self.answer {
            req.include_answer = Some(IncludeAnswer::Flag(true));
        }
        if self.images {
            req.include_images = Some(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_kind_order() {
        for kind in SearchKind::ALL {
            let label = kind.label();
            assert_eq!(format!("{kind:?}").to_lowercase(), label);
        }
    }

    #[test]
    fn qna_forces_answer_and_three_results() {
        let mut req = SearchRequest::new("q").with_max_results(10);
        SearchKind::Qna.rules().apply_forced(&mut req);
        assert_eq!(req.include_answer, Some(IncludeAnswer::Flag(true)));
        assert_eq!(req.max_results, Some(3));
    }

    #[test]
    fn news_defaults_days_but_keeps_explicit_window() {
        let mut req = SearchRequest::new("q");
        SearchKind::News.rules().apply_forced(&mut req);
        assert_eq!(req.topic, Some(Topic::News));
        assert_eq!(req.days, Some(7));

        let mut req = SearchRequest::new("q");
        req.days = Some(2);
        SearchKind::News.rules().apply_forced(&mut req);
        assert_eq!(req.days, Some(2));
    }

    #[test]
    fn visual_kinds_force_images() {
        for kind in [SearchKind::Image, SearchKind::Diagram] {
            let mut req = SearchRequest::new("q");
            kind.rules().apply_forced(&mut req);
            assert_eq!(req.include_images, Some(true));
            assert_eq!(req.include_image_descriptions, Some(true));
            assert!(!kind.query_suffix().is_empty());
        }
    }

    #[test]
    fn plain_kinds_force_nothing() {
        for kind in [SearchKind::Search, SearchKind::Context] {
            let mut req = SearchRequest::new("q").with_max_results(12);
            kind.rules().apply_forced(&mut req);
            assert_eq!(req, SearchRequest::new("q").with_max_results(12));
        }
    }
}
