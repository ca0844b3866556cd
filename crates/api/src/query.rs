//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;
use shoply_core::types::{DbId, Timestamp};

/// Date-range filter (`?date_start=&date_end=`), inclusive on both ends.
///
/// Used by the order and post listing endpoints. Both parameters must be
/// present for the range to apply.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
}

impl DateRangeParams {
    /// The complete range, if both bounds were supplied.
    pub fn range(&self) -> Option<(Timestamp, Timestamp)> {
        self.date_start.zip(self.date_end)
    }
}

/// Optional user scope (`?user_id=`) for admin listings and admins acting
/// on another user's cart.
#[derive(Debug, Deserialize)]
pub struct UserScopeParams {
    pub user_id: Option<DbId>,
}
