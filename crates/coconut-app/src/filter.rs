// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::model::OfferingViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchField {
    #[default]
    CompanyName,
    Underwriter,
}

impl SearchField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyName => "기업명",
            Self::Underwriter => "대표주관회사",
        }
    }

    pub const fn toggle(self) -> Self {
        match self {
            Self::CompanyName => Self::Underwriter,
            Self::Underwriter => Self::CompanyName,
        }
    }

    fn value(self, offering: &OfferingViewModel) -> &str {
        match self {
            Self::CompanyName => &offering.company_name,
            Self::Underwriter => &offering.underwriter,
        }
    }
}

/// Items whose `field` contains `term`, ignoring case. An empty term keeps
/// everything.
pub fn filter_offerings<'a>(
    items: &'a [OfferingViewModel],
    term: &str,
    field: SearchField,
) -> Vec<&'a OfferingViewModel> {
    if term.is_empty() {
        return items.iter().collect();
    }

    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| field.value(item).to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub term: String,
    pub field: SearchField,
}

impl SearchQuery {
    pub fn apply<'a>(&self, items: &'a [OfferingViewModel]) -> Vec<&'a OfferingViewModel> {
        filter_offerings(items, &self.term, self.field)
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }
}
