//! Record codec, period index, selection and aggregation over stored rows.

pub mod aggregate;
pub mod codec;
pub mod periods;
pub mod selection;

pub use aggregate::{
    category_breakdown, category_union, summary_totals, Breakdown, CategoryBreakdown,
    SummaryTotals,
};
pub use codec::{decode, encode, MalformedRecord, FIELD_COUNT};
pub use periods::list_periods;
pub use selection::{select, LedgerView, SelectedRow};
