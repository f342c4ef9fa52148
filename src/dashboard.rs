/// Dashboard snapshot assembled from the core pipeline
///
/// `Dashboard::build` is a pure function of (table, status): it filters,
/// computes metrics and aggregations, and lays the results out as chart and
/// table descriptions ready to serialize. Nothing is kept between builds, so
/// the presenter can call it on every selector change.

use crate::aggregate::{aggregate, AggregationResult, RankedProduct};
use crate::cache::TableCache;
use crate::error::LoadError;
use crate::format::{format_rating, format_thousands};
use crate::metrics::{compute_metrics, MetricSummary};
use crate::table::SalesTable;
use crate::view::{FilterView, StatusFilter};
use serde::Serialize;
use std::path::Path;

pub const DASHBOARD_TITLE: &str = "Sales Dashboard 2025";

/// One labeled scalar shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: f64,
    pub display: String,
}

/// A labeled series of (label, value) points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    fn from_pairs<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: ToString,
    {
        let (labels, values) = pairs
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .unzip();
        Series { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    /// Fraction of the radius left empty (donut hole)
    pub hole: f64,
    pub series: Series,
}

/// Horizontal marker drawn across a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub annotation: String,
    pub dash: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub markers: bool,
    pub series: Series,
    pub reference_line: Option<ReferenceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTable {
    pub headers: [String; 2],
    pub rows: Vec<RankedProduct>,
}

/// Everything the presenter needs to draw one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub status: StatusFilter,
    pub metrics: MetricSummary,
    pub metric_cards: Vec<MetricCard>,
    pub category_chart: BarChart,
    pub payment_chart: PieChart,
    pub monthly_chart: LineChart,
    pub product_table: ProductTable,
}

impl Dashboard {
    /// Filter `table` by `status` and lay out metrics, charts and ranking.
    pub fn build(table: &SalesTable, status: StatusFilter) -> Self {
        let view = FilterView::new(table, status);
        let metrics = compute_metrics(&view);
        Self::present(status, metrics, aggregate(&view))
    }

    /// Lay out already computed metrics and aggregations.
    pub fn present(status: StatusFilter, metrics: MetricSummary, agg: AggregationResult) -> Self {
        let avg_monthly = metrics.average_monthly_revenue;

        let metric_cards = vec![
            MetricCard {
                label: "Average Monthly Sales (INR)".to_string(),
                value: avg_monthly,
                display: format_thousands(avg_monthly, 2),
            },
            MetricCard {
                label: "Average Rating".to_string(),
                value: metrics.average_rating,
                display: format_rating(metrics.average_rating),
            },
        ];

        let category_chart = BarChart {
            title: "Total Sales by Category".to_string(),
            x_label: "Category".to_string(),
            y_label: "Total Sales (INR)".to_string(),
            series: Series::from_pairs(agg.by_category.into_iter().map(|g| (g.key, g.revenue))),
        };

        let payment_chart = PieChart {
            title: "Sales Distribution by Payment Method".to_string(),
            hole: 0.3,
            series: Series::from_pairs(agg.by_payment_method.into_iter().map(|g| (g.key, g.revenue))),
        };

        // Only draw the average line when there is something to average
        let reference_line = (avg_monthly > 0.0).then(|| ReferenceLine {
            value: avg_monthly,
            annotation: format!("Monthly Average ({})", format_thousands(avg_monthly, 2)),
            dash: "dash".to_string(),
            color: "red".to_string(),
        });

        let monthly_chart = LineChart {
            title: "Total Sales over Time".to_string(),
            x_label: "Month".to_string(),
            y_label: "Total Sales (INR)".to_string(),
            markers: true,
            series: Series::from_pairs(agg.by_month.into_iter().map(|g| (g.key, g.revenue))),
            reference_line,
        };

        let product_table = ProductTable {
            headers: ["Product Name".to_string(), "Total Sales (INR)".to_string()],
            rows: agg.product_ranking,
        };

        Dashboard {
            title: DASHBOARD_TITLE.to_string(),
            status,
            metrics,
            metric_cards,
            category_chart,
            payment_chart,
            monthly_chart,
            product_table,
        }
    }

    pub fn heading(&self) -> String {
        format!("Key Metrics ({})", self.status)
    }
}

/// Outcome of one render pass: a full dashboard or an explicit failure.
///
/// A failed load never produces a partial dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state")]
pub enum DashboardPage {
    Ready { dashboard: Box<Dashboard> },
    Failed { message: String },
}

impl DashboardPage {
    /// Load (or reuse) the table at `path` and render it for `status`.
    pub fn load(cache: &TableCache, path: impl AsRef<Path>, status: StatusFilter) -> Self {
        match cache.load(path) {
            Ok(table) => DashboardPage::Ready {
                dashboard: Box::new(Dashboard::build(&table, status)),
            },
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn from_error(error: &LoadError) -> Self {
        DashboardPage::Failed {
            message: error.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DashboardPage::Ready { .. })
    }
}
