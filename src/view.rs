/// Sales View Implementation
///
/// Views are read-only derived subsets of a loaded SalesTable. They borrow
/// the table, so the source can never be mutated through a view, and they
/// are rebuilt from scratch whenever the selected status changes.

use crate::record::SalesRecord;
use crate::table::SalesTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery-status selector offered to the user.
///
/// `General` selects every row; the other variants select rows whose
/// delivery status equals the variant name exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    General,
    Delivered,
    Pending,
    Returned,
}

impl StatusFilter {
    /// Every selector option, in display order.
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::General,
        StatusFilter::Delivered,
        StatusFilter::Pending,
        StatusFilter::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::General => "General",
            StatusFilter::Delivered => "Delivered",
            StatusFilter::Pending => "Pending",
            StatusFilter::Returned => "Returned",
        }
    }

    /// Returns true if a row with `delivery_status` belongs in this view.
    pub fn matches(&self, delivery_status: &str) -> bool {
        match self {
            StatusFilter::General => true,
            other => other.as_str() == delivery_status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusFilter::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown status filter: '{}'. Use 'General', 'Delivered', 'Pending' or 'Returned'",
                    s
                )
            })
    }
}

/// A FilterView selects rows from the parent table by delivery status.
/// Maintains a mapping from view indices to parent indices, in table order.
///
/// # Examples
///
/// ```
/// use salesboard::{FilterView, SalesRecord, SalesTable, StatusFilter};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let table = SalesTable::new("sales", vec![
///     SalesRecord::new(date, "Delivered", 100.0, Some(4.0), "A", "Lamp", "UPI"),
///     SalesRecord::new(date, "Pending", 200.0, Some(3.0), "B", "Desk", "UPI"),
/// ]);
///
/// let view = FilterView::new(&table, StatusFilter::Delivered);
/// assert_eq!(view.len(), 1);
/// assert_eq!(view.get_row(0).unwrap().product_name, "Lamp");
/// ```
pub struct FilterView<'a> {
    parent: &'a SalesTable,
    status: StatusFilter,
    view_to_parent: Vec<usize>,
}

impl<'a> FilterView<'a> {
    pub fn new(parent: &'a SalesTable, status: StatusFilter) -> Self {
        let view_to_parent = parent
            .iter_rows()
            .enumerate()
            .filter(|(_, record)| status.matches(&record.delivery_status))
            .map(|(i, _)| i)
            .collect();

        FilterView {
            parent,
            status,
            view_to_parent,
        }
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn parent(&self) -> &'a SalesTable {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.view_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_parent.is_empty()
    }

    pub fn get_row(&self, index: usize) -> Result<&'a SalesRecord, String> {
        let parent_index = *self
            .view_to_parent
            .get(index)
            .ok_or_else(|| format!("Index {} out of range [0, {})", index, self.len()))?;
        self.parent.get_row(parent_index)
    }

    /// Returns the parent table row index for a given view position
    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.view_to_parent.get(view_index).copied()
    }

    /// Iterate the selected rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        let records = self.parent.records();
        self.view_to_parent.iter().map(move |&i| &records[i])
    }

    /// Total revenue over the selected rows.
    pub fn total_sales(&self) -> f64 {
        self.iter().map(|r| r.total_sales).sum()
    }

    /// Materialize the view as an owned table.
    pub fn to_table(&self) -> SalesTable {
        let name = format!("{} [{}]", self.parent.name(), self.status);
        SalesTable::new(name, self.iter().cloned().collect())
    }
}
