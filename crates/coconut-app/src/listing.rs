// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::OfferingId;
use crate::model::{OfferingPage, OfferingViewModel, RawOffering, normalize_offerings};

pub const FETCH_FAILED_MESSAGE: &str = "청약 정보를 불러오는데 실패했습니다.";
pub const FETCH_TIMED_OUT_MESSAGE: &str = "청약 정보 요청 시간이 초과되었습니다.";
pub const LOADING_MESSAGE: &str = "데이터를 불러오는 중입니다...";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("offerings request timed out")]
    TimedOut,
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::TimedOut => FETCH_TIMED_OUT_MESSAGE,
            Self::Transport(_) => FETCH_FAILED_MESSAGE,
        }
    }
}

/// Where active offerings come from. The HTTP client implements this in
/// production; tests script it.
pub trait OfferingSource {
    fn fetch_active(&self, page: u32) -> Result<OfferingPage, FetchError>;
}

impl<S: OfferingSource + ?Sized> OfferingSource for &S {
    fn fetch_active(&self, page: u32) -> Result<OfferingPage, FetchError> {
        (**self).fetch_active(page)
    }
}

/// What the listing shows after a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    #[default]
    Empty,
    SampleRecord,
}

impl FallbackPolicy {
    pub fn items(self) -> Vec<OfferingViewModel> {
        match self {
            Self::Empty => Vec::new(),
            Self::SampleRecord => normalize_offerings(&[sample_raw_offering()]),
        }
    }
}

/// The deterministic record local builds show when the backend is down.
pub fn sample_raw_offering() -> RawOffering {
    RawOffering {
        company_name: Some("(주)테스트기업".to_owned()),
        lead_underwriter: Some("한국투자증권".to_owned()),
        subscription_start_date: Some("2024-01-07".into()),
        subscription_end_date: Some("2024-01-08".into()),
        refund_date: Some("2024-01-12".into()),
        max_subscription_limit: Some(42_000),
        final_offer_price: Some(5_000.0),
        competition_rate: Some(7.89),
        public_offering_volume: Some(540_000),
        equal_distribution_volume: Some(270_000),
        subscription_count: Some(38_271),
        ..RawOffering::new(OfferingId::new(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    Loading,
    Failed {
        error: FetchError,
        message: &'static str,
        fallback: Vec<OfferingViewModel>,
    },
    Loaded {
        items: Vec<OfferingViewModel>,
        total_pages: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    page: u32,
}

impl FetchTicket {
    pub const fn epoch(self) -> u64 {
        self.epoch
    }

    pub const fn page(self) -> u32 {
        self.page
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingFetcher {
    state: ListingState,
    policy: FallbackPolicy,
    epoch: u64,
}

impl ListingFetcher {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self {
            state: ListingState::Loading,
            policy,
            epoch: 0,
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListingState::Loading)
    }

    /// Starts a request for `page`; any ticket handed out earlier goes stale.
    pub fn begin(&mut self, page: u32) -> FetchTicket {
        self.epoch = self.epoch.saturating_add(1);
        self.state = ListingState::Loading;
        tracing::debug!(epoch = self.epoch, page, "offerings fetch started");
        FetchTicket {
            epoch: self.epoch,
            page,
        }
    }

    /// Applies a finished request. Returns false when the ticket is stale and
    /// the result was dropped.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<OfferingPage, FetchError>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                epoch = ticket.epoch,
                latest = self.epoch,
                page = ticket.page,
                "discarding stale offerings response"
            );
            return false;
        }

        self.state = match result {
            Ok(page) => {
                let items = normalize_offerings(&page.items);
                tracing::info!(page = ticket.page, count = items.len(), "offerings loaded");
                ListingState::Loaded {
                    items,
                    total_pages: page.total_pages,
                }
            }
            Err(error) => {
                tracing::warn!(page = ticket.page, %error, "offerings fetch failed");
                ListingState::Failed {
                    message: error.user_message(),
                    error,
                    fallback: self.policy.items(),
                }
            }
        };
        true
    }

    pub fn refresh<S: OfferingSource + ?Sized>(&mut self, source: &S, page: u32) -> bool {
        let ticket = self.begin(page);
        let result = source.fetch_active(page);
        self.complete(ticket, result)
    }

    /// Rows to render: loaded items, or the fallback after a failure.
    pub fn visible_items(&self) -> &[OfferingViewModel] {
        match &self.state {
            ListingState::Loading => &[],
            ListingState::Failed { fallback, .. } => fallback,
            ListingState::Loaded { items, .. } => items,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match &self.state {
            ListingState::Failed { message, .. } => Some(*message),
            _ => None,
        }
    }

    pub fn total_pages(&self) -> Option<u32> {
        match &self.state {
            ListingState::Loaded { total_pages, .. } => *total_pages,
            _ => None,
        }
    }
}

impl Default for ListingFetcher {
    fn default() -> Self {
        Self::new(FallbackPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FETCH_FAILED_MESSAGE, FETCH_TIMED_OUT_MESSAGE, FallbackPolicy, FetchError, ListingFetcher,
        ListingState, OfferingSource,
    };
    use crate::{OfferingId, OfferingPage, RawOffering};
    use std::cell::RefCell;

    struct FixedSource {
        result: Result<OfferingPage, FetchError>,
        pages: RefCell<Vec<u32>>,
    }

    impl OfferingSource for FixedSource {
        fn fetch_active(&self, page: u32) -> Result<OfferingPage, FetchError> {
            self.pages.borrow_mut().push(page);
            self.result.clone()
        }
    }

    fn offering(id: i64, name: &str) -> RawOffering {
        RawOffering {
            company_name: Some(name.to_owned()),
            lead_underwriter: Some("미래에셋증권".to_owned()),
            ..RawOffering::new(OfferingId::new(id))
        }
    }

    #[test]
    fn starts_loading() {
        let fetcher = ListingFetcher::default();
        assert!(fetcher.is_loading());
        assert!(fetcher.visible_items().is_empty());
    }

    #[test]
    fn success_replaces_items_wholesale() {
        let mut fetcher = ListingFetcher::default();
        let first = FixedSource {
            result: Ok(OfferingPage::unpaged(vec![
                offering(1, "하나"),
                offering(2, "둘"),
            ])),
            pages: RefCell::new(Vec::new()),
        };
        assert!(fetcher.refresh(&first, 1));
        assert_eq!(fetcher.visible_items().len(), 2);

        let second = FixedSource {
            result: Ok(OfferingPage {
                items: vec![offering(3, "셋")],
                total_pages: Some(2),
            }),
            pages: RefCell::new(Vec::new()),
        };
        fetcher.refresh(&second, 2);
        assert_eq!(fetcher.visible_items().len(), 1);
        assert_eq!(fetcher.visible_items()[0].company_name, "셋");
        assert_eq!(fetcher.total_pages(), Some(2));
        assert_eq!(fetcher.error_message(), None);
        assert_eq!(*second.pages.borrow(), vec![2]);
    }

    #[test]
    fn failure_with_sample_policy_seeds_one_record() {
        let mut fetcher = ListingFetcher::new(FallbackPolicy::SampleRecord);
        let source = FixedSource {
            result: Err(FetchError::Transport("connection refused".to_owned())),
            pages: RefCell::new(Vec::new()),
        };
        fetcher.refresh(&source, 1);

        assert_eq!(fetcher.error_message(), Some(FETCH_FAILED_MESSAGE));
        let items = fetcher.visible_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].company_name, "(주)테스트기업");
        assert_eq!(items[0].underwriter, "한국투자증권");
        assert_eq!(items[0].application_period, "2024.01.07 - 2024.01.08");
        assert_eq!(items[0].refund_date, "2024.01.12");
        assert_eq!(items[0].max_limit, "42,000주");
        assert_eq!(items[0].subscription_price, "5,000원");
    }

    #[test]
    fn failure_with_empty_policy_leaves_list_empty() {
        let mut fetcher = ListingFetcher::new(FallbackPolicy::Empty);
        let source = FixedSource {
            result: Err(FetchError::Transport("500".to_owned())),
            pages: RefCell::new(Vec::new()),
        };
        fetcher.refresh(&source, 1);

        assert!(fetcher.visible_items().is_empty());
        assert_eq!(fetcher.error_message(), Some(FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn timeout_gets_its_own_message() {
        let mut fetcher = ListingFetcher::default();
        let source = FixedSource {
            result: Err(FetchError::TimedOut),
            pages: RefCell::new(Vec::new()),
        };
        fetcher.refresh(&source, 1);
        assert!(matches!(
            fetcher.state(),
            ListingState::Failed {
                error: FetchError::TimedOut,
                ..
            }
        ));
        assert_eq!(fetcher.error_message(), Some(FETCH_TIMED_OUT_MESSAGE));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut fetcher = ListingFetcher::default();
        let page_two = fetcher.begin(2);
        let page_three = fetcher.begin(3);

        assert!(fetcher.complete(
            page_three,
            Ok(OfferingPage::unpaged(vec![offering(3, "셋")]))
        ));
        assert!(!fetcher.complete(
            page_two,
            Ok(OfferingPage::unpaged(vec![offering(2, "둘")]))
        ));

        assert_eq!(fetcher.visible_items().len(), 1);
        assert_eq!(fetcher.visible_items()[0].company_name, "셋");
    }

    #[test]
    fn success_after_failure_clears_error() {
        let mut fetcher = ListingFetcher::new(FallbackPolicy::SampleRecord);
        let ticket = fetcher.begin(1);
        fetcher.complete(ticket, Err(FetchError::TimedOut));
        assert!(fetcher.error_message().is_some());

        let ticket = fetcher.begin(1);
        fetcher.complete(ticket, Ok(OfferingPage::default()));
        assert_eq!(fetcher.error_message(), None);
        assert!(fetcher.visible_items().is_empty());
    }
}
