/// Sales record types
///
/// A SalesRecord is one parsed row of the source CSV. The year-month
/// grouping key is derived once, when the record is built.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Calendar month used as the grouping key for monthly revenue.
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(YearMonth { year, month })
        } else {
            None
        }
    }

    /// Truncate a date to month granularity.
    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the sales table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub delivery_status: String,
    /// Total sale amount in INR
    pub total_sales: f64,
    /// Missing ratings are skipped by the rating average
    pub review_rating: Option<f64>,
    pub product_category: String,
    pub product_name: String,
    pub payment_method: String,
    pub year_month: YearMonth,
}

impl SalesRecord {
    /// Build a record, deriving `year_month` from `date`.
    pub fn new(
        date: NaiveDate,
        delivery_status: impl Into<String>,
        total_sales: f64,
        review_rating: Option<f64>,
        product_category: impl Into<String>,
        product_name: impl Into<String>,
        payment_method: impl Into<String>,
    ) -> Self {
        SalesRecord {
            date,
            delivery_status: delivery_status.into(),
            total_sales,
            review_rating,
            product_category: product_category.into(),
            product_name: product_name.into(),
            payment_method: payment_method.into(),
            year_month: YearMonth::from_date(date),
        }
    }
}
