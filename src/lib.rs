//! Salesboard - Interactive Sales Dashboard Core
//!
//! Loads e-commerce sales records from CSV, narrows them by delivery status,
//! and computes the metrics, grouped revenue series and product ranking shown
//! on the dashboard. The core is a chain of pure functions:
//! `Dashboard::build(table, status)` filters, measures and aggregates, and
//! can be re-run on every selector change without stale state.

pub mod error;
pub mod record;
pub mod table;
pub mod cache;
pub mod view;
pub mod metrics;
pub mod aggregate;
pub mod format;
pub mod dashboard;
pub mod html;
pub mod config;

pub use error::{ConfigError, LoadError, LoadErrorKind, ParseError};
pub use record::{SalesRecord, YearMonth};
pub use table::{Schema, SalesTable};
pub use cache::TableCache;
pub use view::{FilterView, StatusFilter};
pub use metrics::{compute_metrics, MetricSummary};
pub use aggregate::{
    aggregate, rank_products, revenue_by_category, revenue_by_month, revenue_by_payment_method,
    AggregationResult, GroupTotal, RankedProduct,
};
pub use format::{format_rating, format_thousands};
pub use dashboard::{Dashboard, DashboardPage};
pub use config::ServerConfig;

// WebSocket server modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod messages;
#[cfg(feature = "server")]
pub mod websocket;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn sale(year: i32, month: u32, status: &str, amount: f64, category: &str) -> SalesRecord {
        SalesRecord::new(
            NaiveDate::from_ymd_opt(year, month, 12).unwrap(),
            status,
            amount,
            Some(4.0),
            category,
            format!("{} item", category),
            "UPI",
        )
    }

    #[test]
    fn test_delivered_end_to_end() {
        let table = SalesTable::new(
            "sales",
            vec![
                sale(2025, 1, "Delivered", 100.0, "A"),
                sale(2025, 2, "Pending", 200.0, "B"),
                sale(2025, 2, "Delivered", 50.0, "A"),
            ],
        );

        let view = FilterView::new(&table, StatusFilter::Delivered);
        assert_eq!(view.len(), 2);

        let by_category = revenue_by_category(&view);
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].key, "A");
        assert_eq!(by_category[0].revenue, 150.0);

        let by_month = revenue_by_month(&view);
        let months: Vec<(String, f64)> = by_month
            .iter()
            .map(|g| (g.key.to_string(), g.revenue))
            .collect();
        assert_eq!(
            months,
            vec![("2025-01".to_string(), 100.0), ("2025-02".to_string(), 50.0)]
        );

        assert_eq!(compute_metrics(&view).average_monthly_revenue, 75.0);
    }

    #[test]
    fn test_months_span_year_boundary() {
        let table = SalesTable::new(
            "sales",
            vec![
                sale(2025, 1, "Delivered", 10.0, "A"),
                sale(2024, 12, "Delivered", 20.0, "A"),
                sale(2024, 11, "Delivered", 30.0, "A"),
            ],
        );
        let view = FilterView::new(&table, StatusFilter::General);
        let keys: Vec<String> = revenue_by_month(&view)
            .iter()
            .map(|g| g.key.to_string())
            .collect();
        assert_eq!(keys, vec!["2024-11", "2024-12", "2025-01"]);
    }

    #[test]
    fn test_csv_to_dashboard_through_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("amazon_sales.csv");
        std::fs::write(
            &path,
            "Order_ID,Date,Product_Name,Product_Category,Total_Sales_INR,Payment_Method,Delivery_Status,Review_Rating\n\
             1,2025-01-03,Kettle,Home,2499.00,UPI,Delivered,4.2\n\
             2,2025-01-18,Blender,Home,3999.50,Credit Card,Returned,2.1\n\
             3,2025-02-09,Kettle,Home,2499.00,Debit Card,Delivered,4.8\n\
             4,2025-03-22,Novel,Books,399.00,UPI,Pending,\n",
        )
        .unwrap();

        let cache = TableCache::new();
        let table = cache.load(&path).unwrap();
        let again = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&table, &again));
        assert_eq!(table.len(), 4);

        let dashboard = Dashboard::build(&table, StatusFilter::Delivered);
        assert_eq!(dashboard.metric_cards[0].display, "2,499.00");
        assert_eq!(dashboard.metric_cards[1].display, "4.50 ★");
        assert_eq!(dashboard.product_table.rows.len(), 1);
        assert_eq!(dashboard.product_table.rows[0].display_revenue, "4,998.00");

        let general = Dashboard::build(&table, StatusFilter::General);
        let total: f64 = general.product_table.rows.iter().map(|p| p.revenue).sum();
        assert!((total - table.total_sales()).abs() < 1e-6);
        assert_eq!(general.monthly_chart.series.len(), 3);
        // Ratings present: 4.2, 2.1, 4.8
        assert!((general.metrics.average_rating - 3.7).abs() < 1e-9);
    }
}
