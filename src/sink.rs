use chrono::NaiveDate;
use tracing::warn;

use crate::error::Result;
use crate::model::{EventRow, ReturningUser};

/// Destination for generated event rows, partitioned by simulated day.
#[allow(async_fn_in_trait)]
pub trait EventSink {
    /// Replace the partition for `date` with `rows`.
    ///
    /// Any rows already stored under `date` are removed and `rows` appended as
    /// one unit: a failure leaves the previous partition contents in place.
    async fn replace_partition(&mut self, date: NaiveDate, rows: &[EventRow]) -> Result<()>;
}

/// Supplies the previously active players a catch-up day starts from.
#[allow(async_fn_in_trait)]
pub trait ReturningUserSource {
    async fn fetch_returning_users(&self, date: NaiveDate) -> Result<Vec<ReturningUser>>;
}

/// A fixed list is a source that ignores the date.
impl ReturningUserSource for Vec<ReturningUser> {
    async fn fetch_returning_users(&self, _date: NaiveDate) -> Result<Vec<ReturningUser>> {
        Ok(self.clone())
    }
}

/// Fetch returning users, degrading to an empty list if the source fails.
pub async fn fetch_or_empty<S: ReturningUserSource>(
    source: &S,
    date: NaiveDate,
) -> Vec<ReturningUser> {
    match source.fetch_returning_users(date).await {
        Ok(users) => users,
        Err(err) => {
            warn!(%date, error = %err, "returning-user fetch failed, continuing with new installs only");
            Vec::new()
        }
    }
}
