/// Sales Table Implementation
///
/// A SalesTable is the immutable, in-memory result of loading a sales CSV.
/// Every downstream step (filtering, metrics, aggregation) reads from it and
/// produces new derived values; nothing mutates a table after load.
///
/// # Examples
///
/// ```
/// use salesboard::SalesTable;
///
/// let csv = "\
/// Date,Delivery_Status,Total_Sales_INR,Review_Rating,Product_Category,Payment_Method,Product_Name
/// 2025-01-05,Delivered,1200.50,4.5,Electronics,UPI,Earbuds
/// 2025-02-11,Pending,800,3.0,Books,Cash on Delivery,Novel
/// ";
/// let table = SalesTable::from_reader("sales", csv.as_bytes()).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get_row(0).unwrap().product_name, "Earbuds");
/// assert_eq!(table.get_row(1).unwrap().year_month.to_string(), "2025-02");
/// ```

use crate::error::{LoadError, ParseError};
use crate::record::SalesRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

pub const COL_DATE: &str = "Date";
pub const COL_DELIVERY_STATUS: &str = "Delivery_Status";
pub const COL_TOTAL_SALES: &str = "Total_Sales_INR";
pub const COL_REVIEW_RATING: &str = "Review_Rating";
pub const COL_PRODUCT_CATEGORY: &str = "Product_Category";
pub const COL_PAYMENT_METHOD: &str = "Payment_Method";
pub const COL_PRODUCT_NAME: &str = "Product_Name";

// Month-first comes before day-first; day-first is only reached when the
// leading field cannot be a month.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Required columns of a sales file.
///
/// The source file may carry more columns; those are ignored. Resolving a
/// header yields the position of each required column.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<&'static str>,
}

/// Header positions of the required columns, in `Schema::sales()` order.
#[derive(Debug, Clone, Copy)]
pub struct ColumnIndices {
    date: usize,
    delivery_status: usize,
    total_sales: usize,
    review_rating: usize,
    product_category: usize,
    payment_method: usize,
    product_name: usize,
}

impl Schema {
    /// The schema every sales CSV must satisfy.
    pub fn sales() -> Self {
        Schema {
            columns: vec![
                COL_DATE,
                COL_DELIVERY_STATUS,
                COL_TOTAL_SALES,
                COL_REVIEW_RATING,
                COL_PRODUCT_CATEGORY,
                COL_PAYMENT_METHOD,
                COL_PRODUCT_NAME,
            ],
        }
    }

    /// Locate every required column in `headers`.
    pub fn resolve(&self, headers: &csv::StringRecord) -> Result<ColumnIndices, ParseError> {
        let positions = self
            .columns
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h.trim() == *name)
                    .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<usize>, ParseError>>()?;

        Ok(ColumnIndices {
            date: positions[0],
            delivery_status: positions[1],
            total_sales: positions[2],
            review_rating: positions[3],
            product_category: positions[4],
            payment_method: positions[5],
            product_name: positions[6],
        })
    }
}

/// Immutable, ordered collection of sales records.
pub struct SalesTable {
    name: String,
    records: Vec<SalesRecord>,
}

impl SalesTable {
    /// Build a table from already-parsed records.
    pub fn new(name: impl Into<String>, records: Vec<SalesRecord>) -> Self {
        SalesTable {
            name: name.into(),
            records,
        }
    }

    /// Load a table from a CSV file.
    ///
    /// A path that does not resolve is reported as `LoadError::FileNotFound`;
    /// every other failure is a `LoadError::Parse`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<SalesTable, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Parse(ParseError::Io(e))
            }
        })?;

        let table = Self::from_reader(path.to_string_lossy(), file)?;
        log::info!(
            "Loaded {} sales records from '{}'",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV data with a header row into a table.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<SalesTable, ParseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let indices = Schema::sales().resolve(csv_reader.headers()?)?;

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            // Skip blank lines
            if row.iter().all(|f| f.is_empty()) {
                continue;
            }
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            records.push(parse_record(&row, &indices, line)?);
        }

        Ok(SalesTable::new(name, records))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_row(&self, row: usize) -> Result<&SalesRecord, String> {
        self.records
            .get(row)
            .ok_or_else(|| format!("Row {} out of range [0, {})", row, self.len()))
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter_rows(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    /// Total revenue over every row.
    pub fn total_sales(&self) -> f64 {
        self.records.iter().map(|r| r.total_sales).sum()
    }
}

impl std::fmt::Debug for SalesTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SalesTable {{ name: '{}', rows: {} }}", self.name, self.records.len())
    }
}

fn parse_record(
    row: &csv::StringRecord,
    indices: &ColumnIndices,
    line: u64,
) -> Result<SalesRecord, ParseError> {
    let field = |idx: usize| row.get(idx).unwrap_or_default();

    let date_text = field(indices.date);
    let date = parse_date(date_text).ok_or_else(|| ParseError::InvalidDate {
        line,
        value: date_text.to_string(),
    })?;

    let total_sales = parse_number(field(indices.total_sales), COL_TOTAL_SALES, line)?;
    if total_sales < 0.0 {
        return Err(ParseError::NegativeSales {
            line,
            value: total_sales,
        });
    }

    let rating_text = field(indices.review_rating);
    let review_rating = if rating_text.is_empty() {
        None
    } else {
        Some(parse_number(rating_text, COL_REVIEW_RATING, line)?)
    };

    Ok(SalesRecord::new(
        date,
        field(indices.delivery_status),
        total_sales,
        review_rating,
        field(indices.product_category),
        field(indices.product_name),
        field(indices.payment_method),
    ))
}

fn parse_number(text: &str, column: &str, line: u64) -> Result<f64, ParseError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            column: column.to_string(),
            value: text.to_string(),
        })
}

/// Parse a calendar date, accepting plain dates and timestamps.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadErrorKind;
    use std::io::Write;

    const HEADER: &str =
        "Date,Delivery_Status,Total_Sales_INR,Review_Rating,Product_Category,Payment_Method,Product_Name";

    fn csv_with(rows: &[&str]) -> String {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    #[test]
    fn test_table_from_reader() {
        let csv = csv_with(&[
            "2025-01-05,Delivered,1200.50,4.5,Electronics,UPI,Earbuds",
            "2025-01-20,Returned,300,2.0,Books,Credit Card,Atlas",
            "2025-02-11,Pending,800,,Books,Cash on Delivery,Novel",
        ]);

        let table = SalesTable::from_reader("sales", csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.name(), "sales");
        let first = table.get_row(0).unwrap();
        assert_eq!(first.delivery_status, "Delivered");
        assert_eq!(first.total_sales, 1200.50);
        assert_eq!(first.review_rating, Some(4.5));
        assert_eq!(first.payment_method, "UPI");
        assert_eq!(table.get_row(2).unwrap().review_rating, None);
        assert_eq!(table.get_row(2).unwrap().year_month.to_string(), "2025-02");
        assert!((table.total_sales() - 2300.5).abs() < 1e-9);
        assert!(table.get_row(3).is_err());
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let csv = "Order_ID,Product_Name,Date,Payment_Method,Product_Category,Review_Rating,Total_Sales_INR,Delivery_Status,City\n\
                   A-1,Lamp,2025-04-02,UPI,Home,4.0,999.99,Delivered,Pune\n";

        let table = SalesTable::from_reader("sales", csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        let row = table.get_row(0).unwrap();
        assert_eq!(row.product_name, "Lamp");
        assert_eq!(row.product_category, "Home");
        assert_eq!(row.total_sales, 999.99);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Date,Delivery_Status,Total_Sales_INR\n2025-01-01,Delivered,10\n";
        let err = SalesTable::from_reader("sales", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(ref c) if c == "Review_Rating"));
    }

    #[test]
    fn test_resolve_maps_every_required_column() {
        let headers = csv::StringRecord::from(vec![
            "Product_Name", "Extra", "Payment_Method", "Product_Category", "Review_Rating",
            "Total_Sales_INR", "Delivery_Status", "Date",
        ]);
        let indices = Schema::sales().resolve(&headers).unwrap();
        assert_eq!(indices.date, 7);
        assert_eq!(indices.delivery_status, 6);
        assert_eq!(indices.total_sales, 5);
        assert_eq!(indices.review_rating, 4);
        assert_eq!(indices.product_category, 3);
        assert_eq!(indices.payment_method, 2);
        assert_eq!(indices.product_name, 0);

        let headers = csv::StringRecord::from(vec![
            "Date", "Delivery_Status", "Total_Sales_INR", "Review_Rating", "Product_Category", "Payment_Method",
        ]);
        let err = Schema::sales().resolve(&headers).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(ref c) if c == "Product_Name"));
    }

    #[test]
    fn test_invalid_values_report_line() {
        let csv = csv_with(&[
            "2025-01-05,Delivered,100,4.5,Electronics,UPI,Earbuds",
            "2025-01-06,Delivered,lots,4.5,Electronics,UPI,Earbuds",
        ]);
        let err = SalesTable::from_reader("sales", csv.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, COL_TOTAL_SALES);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }

        let csv = csv_with(&["not-a-date,Delivered,100,4.5,Electronics,UPI,Earbuds"]);
        let err = SalesTable::from_reader("sales", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { line: 2, .. }));

        let csv = csv_with(&["2025-01-05,Delivered,-5,4.5,Electronics,UPI,Earbuds"]);
        let err = SalesTable::from_reader("sales", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::NegativeSales { .. }));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = format!(
            "{}\n2025-01-05,Delivered,100,4.5,Electronics,UPI,Earbuds\n,,,,,,\n",
            HEADER
        );
        let table = SalesTable::from_reader("sales", csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = SalesTable::from_reader("sales", csv_with(&[]).as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_date("2025-03-09"), Some(expected));
        assert_eq!(parse_date("2025/03/09"), Some(expected));
        assert_eq!(parse_date("03/09/2025"), Some(expected));
        assert_eq!(parse_date("03-09-2025"), Some(expected));
        assert_eq!(parse_date("2025-03-09 14:30:00"), Some(expected));
        assert_eq!(parse_date("2025-03-09T14:30:00"), Some(expected));
        assert_eq!(parse_date("2025-03-09T14:30:00+05:30"), Some(expected));
        assert_eq!(parse_date("March 9th"), None);
    }

    #[test]
    fn test_dashed_dates_are_month_first() {
        assert_eq!(
            parse_date("09-03-2025"),
            NaiveDate::from_ymd_opt(2025, 9, 3)
        );
        // 25 cannot be a month, so the day-first reading applies
        assert_eq!(
            parse_date("25-03-2025"),
            NaiveDate::from_ymd_opt(2025, 3, 25)
        );

        let csv = csv_with(&["09-03-2025,Delivered,100,4.5,Electronics,UPI,Earbuds"]);
        let table = SalesTable::from_reader("sales", csv.as_bytes()).unwrap();
        assert_eq!(table.get_row(0).unwrap().year_month.to_string(), "2025-09");
    }

    #[test]
    fn test_from_path_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.csv");
        let err = SalesTable::from_path(&missing).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::FileNotFound);

        let bad = dir.path().join("bad.csv");
        let mut file = std::fs::File::create(&bad).unwrap();
        writeln!(file, "Date,Total_Sales_INR").unwrap();
        writeln!(file, "2025-01-01,10").unwrap();
        let err = SalesTable::from_path(&bad).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::LoadFailure);
    }

    #[test]
    fn test_from_path_loads() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, csv_with(&["2025-01-05,Delivered,100,4.5,Electronics,UPI,Earbuds"])).unwrap();

        let table = SalesTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.name().ends_with("sales.csv"));
    }
}
