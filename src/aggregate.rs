/// Revenue aggregations over a filtered view
///
/// Each aggregation groups the rows of a view by one key and sums revenue per
/// group. All of them are total functions: an empty view yields empty
/// results, never an error. Revenue is conserved, so the group totals of any
/// aggregation add up to the view's total revenue.

use crate::format::format_thousands;
use crate::record::{SalesRecord, YearMonth};
use crate::view::FilterView;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Summed revenue for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal<K> {
    pub key: K,
    pub revenue: f64,
}

/// One line of the product ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
    /// 1-based position in the ranking
    pub rank: usize,
    pub name: String,
    pub revenue: f64,
    /// Revenue with thousands separators and two decimals
    pub display_revenue: String,
}

/// All grouped summaries shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub by_category: Vec<GroupTotal<String>>,
    pub by_payment_method: Vec<GroupTotal<String>>,
    pub by_month: Vec<GroupTotal<YearMonth>>,
    pub product_ranking: Vec<RankedProduct>,
}

/// Run every aggregation over `view`.
pub fn aggregate(view: &FilterView<'_>) -> AggregationResult {
    AggregationResult {
        by_category: revenue_by_category(view),
        by_payment_method: revenue_by_payment_method(view),
        by_month: revenue_by_month(view),
        product_ranking: rank_products(view),
    }
}

/// Revenue per product category, largest first.
pub fn revenue_by_category(view: &FilterView<'_>) -> Vec<GroupTotal<String>> {
    revenue_by(view, |r| r.product_category.as_str())
}

/// Revenue per payment method, largest first.
pub fn revenue_by_payment_method(view: &FilterView<'_>) -> Vec<GroupTotal<String>> {
    revenue_by(view, |r| r.payment_method.as_str())
}

/// Revenue per calendar month, in chronological order.
pub fn revenue_by_month(view: &FilterView<'_>) -> Vec<GroupTotal<YearMonth>> {
    let mut months: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for record in view.iter() {
        *months.entry(record.year_month).or_insert(0.0) += record.total_sales;
    }

    months
        .into_iter()
        .map(|(key, revenue)| GroupTotal { key, revenue })
        .collect()
}

/// Every product ranked by revenue, largest first. No product is dropped.
pub fn rank_products(view: &FilterView<'_>) -> Vec<RankedProduct> {
    revenue_by(view, |r| r.product_name.as_str())
        .into_iter()
        .enumerate()
        .map(|(i, group)| RankedProduct {
            rank: i + 1,
            display_revenue: format_thousands(group.revenue, 2),
            name: group.key,
            revenue: group.revenue,
        })
        .collect()
}

/// Group `view` by a string key and sum revenue, largest total first.
///
/// Ties on revenue are broken by key ascending so output is deterministic;
/// callers should still not rely on tie order.
pub fn revenue_by<'a, F>(view: &FilterView<'a>, key_fn: F) -> Vec<GroupTotal<String>>
where
    F: Fn(&'a SalesRecord) -> &'a str,
{
    let mut groups: HashMap<&'a str, f64> = HashMap::new();
    for record in view.iter() {
        *groups.entry(key_fn(record)).or_insert(0.0) += record.total_sales;
    }

    let mut totals: Vec<GroupTotal<String>> = groups
        .into_iter()
        .map(|(key, revenue)| GroupTotal {
            key: key.to_string(),
            revenue,
        })
        .collect();

    totals.sort_by(|a, b| {
        let by_revenue = b.revenue.total_cmp(&a.revenue);
        if by_revenue != Ordering::Equal {
            return by_revenue;
        }
        a.key.cmp(&b.key)
    });
    totals
}
