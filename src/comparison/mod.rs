//! Year-over-year comparison module
//!
//! - Percentage change with zero/missing baseline handling
//! - Merging of current and prior-year windows
//! - Date and bucket alignment across years

pub mod change;
pub mod yoy;

pub use change::{change, ChangeResult};
pub use yoy::{
    align_previous_series, bucket_changes, merge_windows, previous_window, shift_back_one_year,
    BucketChange, LeapDayPolicy,
};
