/// Summary metrics over a filtered view.

use crate::view::FilterView;
use serde::Serialize;
use std::collections::HashSet;

/// Headline figures shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricSummary {
    /// Total revenue divided by the number of distinct months in the view
    pub average_monthly_revenue: f64,
    /// Mean of the ratings present in the view
    pub average_rating: f64,
    pub total_revenue: f64,
    pub row_count: usize,
    pub distinct_months: usize,
}

/// Compute the headline metrics for `view`.
///
/// Average monthly revenue normalizes by calendar months, not rows: a month
/// with one sale weighs the same as a month with a thousand. An empty view
/// yields zeros.
pub fn compute_metrics(view: &FilterView<'_>) -> MetricSummary {
    if view.is_empty() {
        return MetricSummary::default();
    }

    let mut months = HashSet::new();
    let mut total_revenue = 0.0;
    let mut rating_sum = 0.0;
    let mut rating_count = 0usize;

    for record in view.iter() {
        months.insert(record.year_month);
        total_revenue += record.total_sales;
        if let Some(rating) = record.review_rating {
            rating_sum += rating;
            rating_count += 1;
        }
    }

    let distinct_months = months.len();
    let average_monthly_revenue = if distinct_months > 0 {
        total_revenue / distinct_months as f64
    } else {
        0.0
    };
    let average_rating = if rating_count > 0 {
        rating_sum / rating_count as f64
    } else {
        0.0
    };

    MetricSummary {
        average_monthly_revenue,
        average_rating,
        total_revenue,
        row_count: view.len(),
        distinct_months,
    }
}
