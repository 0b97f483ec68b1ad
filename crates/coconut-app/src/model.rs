// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, offset};
use time::{Date, OffsetDateTime};

use crate::ids::OfferingId;

/// Market segment shown when the backend leaves `category` blank.
pub const DEFAULT_CATEGORY: &str = "코스닥시장";
/// Rendered for any value the backend has not set yet.
pub const PLACEHOLDER: &str = "-";
pub const SHARE_UNIT: &str = "주";
pub const WON_UNIT: &str = "원";
pub const COUNT_UNIT: &str = "건";

/// A timestamp as the backend sends it: an ISO date (or date-time) string,
/// or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    EpochMillis(i64),
}

impl RawTimestamp {
    pub fn date(&self) -> Option<Date> {
        match self {
            Self::Text(text) => {
                let text = text.trim();
                if let Ok(moment) = OffsetDateTime::parse(text, &Rfc3339) {
                    return Some(moment.to_offset(offset!(+9)).date());
                }
                // No offset: the backend's own calendar date.
                let prefix = text.get(..10)?;
                Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()
            }
            Self::EpochMillis(millis) => {
                let nanos = i128::from(*millis) * 1_000_000;
                OffsetDateTime::from_unix_timestamp_nanos(nanos)
                    .ok()
                    .map(|moment| moment.to_offset(offset!(+9)).date())
            }
        }
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffering {
    pub id: OfferingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub lead_underwriter: Option<String>,
    #[serde(default)]
    pub subscription_start_date: Option<RawTimestamp>,
    #[serde(default)]
    pub subscription_end_date: Option<RawTimestamp>,
    #[serde(default)]
    pub refund_date: Option<RawTimestamp>,
    #[serde(default)]
    pub max_subscription_limit: Option<i64>,
    #[serde(default)]
    pub final_offer_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_offering_volume: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_distribution_volume: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_count: Option<i64>,
}

impl RawOffering {
    pub fn new(id: OfferingId) -> Self {
        Self {
            id,
            category: None,
            company_name: None,
            lead_underwriter: None,
            subscription_start_date: None,
            subscription_end_date: None,
            refund_date: None,
            max_subscription_limit: None,
            final_offer_price: None,
            competition_rate: None,
            public_offering_volume: None,
            equal_distribution_volume: None,
            subscription_count: None,
        }
    }
}

/// One page of active offerings. Older backends answer with a bare array,
/// which carries no page count.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "OfferingPageWire")]
pub struct OfferingPage {
    pub items: Vec<RawOffering>,
    pub total_pages: Option<u32>,
}

impl OfferingPage {
    pub fn unpaged(items: Vec<RawOffering>) -> Self {
        Self {
            items,
            total_pages: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OfferingPageWire {
    Bare(Vec<RawOffering>),
    Paged {
        items: Vec<RawOffering>,
        #[serde(rename = "totalPages", default)]
        total_pages: Option<u32>,
    },
}

impl From<OfferingPageWire> for OfferingPage {
    fn from(wire: OfferingPageWire) -> Self {
        match wire {
            OfferingPageWire::Bare(items) => Self::unpaged(items),
            OfferingPageWire::Paged { items, total_pages } => Self { items, total_pages },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStats {
    pub competition_rate: String,
    pub public_offering_volume: String,
    pub equal_distribution_volume: String,
    pub subscription_count: String,
}

impl Default for SubscriptionStats {
    fn default() -> Self {
        Self {
            competition_rate: PLACEHOLDER.to_owned(),
            public_offering_volume: PLACEHOLDER.to_owned(),
            equal_distribution_volume: PLACEHOLDER.to_owned(),
            subscription_count: PLACEHOLDER.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingViewModel {
    pub id: OfferingId,
    pub category: String,
    pub company_name: String,
    pub underwriter: String,
    pub application_period: String,
    pub refund_date: String,
    pub max_limit: String,
    pub subscription_price: String,
    pub stats: SubscriptionStats,
}

impl OfferingViewModel {
    /// Cells in table column order.
    pub fn columns(&self) -> [&str; 7] {
        [
            &self.category,
            &self.company_name,
            &self.underwriter,
            &self.application_period,
            &self.refund_date,
            &self.max_limit,
            &self.subscription_price,
        ]
    }
}

pub const OFFERING_COLUMNS: [&str; 7] = [
    "분류",
    "기업명",
    "대표주관회사",
    "청약기간",
    "환불일",
    "최고청약한도",
    "확정발행가",
];

/// Everything the application-entry screen needs about the chosen offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContext {
    pub offering: OfferingViewModel,
    pub competition_rate: String,
    pub public_offering_volume: String,
    pub equal_distribution_volume: String,
    pub subscription_count: String,
}

impl ApplicationContext {
    pub fn from_offering(offering: &OfferingViewModel) -> Self {
        Self {
            competition_rate: offering.stats.competition_rate.clone(),
            public_offering_volume: offering.stats.public_offering_volume.clone(),
            equal_distribution_volume: offering.stats.equal_distribution_volume.clone(),
            subscription_count: offering.stats.subscription_count.clone(),
            offering: offering.clone(),
        }
    }
}

pub fn normalize_offering(raw: &RawOffering) -> OfferingViewModel {
    let category = match raw.category.as_deref() {
        Some(category) if !category.is_empty() => category.to_owned(),
        _ => DEFAULT_CATEGORY.to_owned(),
    };

    OfferingViewModel {
        id: raw.id,
        category,
        company_name: raw.company_name.clone().unwrap_or_default(),
        underwriter: raw.lead_underwriter.clone().unwrap_or_default(),
        application_period: format!(
            "{} - {}",
            format_timestamp(raw.subscription_start_date.as_ref()),
            format_timestamp(raw.subscription_end_date.as_ref()),
        ),
        refund_date: format_timestamp(raw.refund_date.as_ref()),
        max_limit: with_unit(raw.max_subscription_limit.map(group_thousands), SHARE_UNIT),
        subscription_price: with_unit(raw.final_offer_price.map(format_decimal), WON_UNIT),
        stats: SubscriptionStats {
            competition_rate: raw
                .competition_rate
                .map(|rate| format!("{rate:.2}:1"))
                .unwrap_or_else(|| PLACEHOLDER.to_owned()),
            public_offering_volume: with_unit(
                raw.public_offering_volume.map(group_thousands),
                SHARE_UNIT,
            ),
            equal_distribution_volume: with_unit(
                raw.equal_distribution_volume.map(group_thousands),
                SHARE_UNIT,
            ),
            subscription_count: with_unit(raw.subscription_count.map(group_thousands), COUNT_UNIT),
        },
    }
}

/// Normalizes a batch, keeping the first record for any repeated id.
pub fn normalize_offerings(raws: &[RawOffering]) -> Vec<OfferingViewModel> {
    let mut seen = HashSet::with_capacity(raws.len());
    raws.iter()
        .filter(|raw| {
            let fresh = seen.insert(raw.id);
            if !fresh {
                tracing::warn!(id = %raw.id, "dropping offering with duplicate id");
            }
            fresh
        })
        .map(normalize_offering)
        .collect()
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year].[month].[day]"))
        .unwrap_or_else(|_| date.to_string())
}

fn format_timestamp(timestamp: Option<&RawTimestamp>) -> String {
    timestamp
        .and_then(RawTimestamp::date)
        .map(format_date)
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

fn with_unit(value: Option<String>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value}{unit}"),
        None => PLACEHOLDER.to_owned(),
    }
}

pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped integer part plus at most three fraction digits.
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let magnitude = rounded.abs();
    let whole = magnitude.trunc();
    let fraction = format!("{:.3}", magnitude - whole);
    let fraction = fraction
        .trim_start_matches('0')
        .trim_end_matches('0')
        .trim_end_matches('.');

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole as i64));
    out.push_str(fraction);
    out
}
