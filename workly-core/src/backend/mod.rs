//! Persistence seam for accounts, calendars and events.
//!
//! Workly does not own a storage engine. Everything it persists goes through
//! the [`Backend`] trait; the shipped implementations are a JSON document
//! directory and an in-memory map.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::auth::Account;
use crate::calendar::Calendar;
use crate::error::WorklyResult;
use crate::event::Event;
use crate::user::User;

/// Document store used by [`crate::Workly`].
///
/// Email lookups are case-insensitive. Saves are upserts keyed by id.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fails with `AlreadyExists` if the email is taken.
    async fn insert_account(&self, account: Account) -> WorklyResult<()>;

    async fn account_by_email(&self, email: &str) -> WorklyResult<Option<Account>>;

    async fn user(&self, user_id: &str) -> WorklyResult<Option<User>>;

    async fn save_calendar(&self, calendar: &Calendar) -> WorklyResult<()>;

    async fn calendar(&self, calendar_id: &str) -> WorklyResult<Option<Calendar>>;

    async fn calendars_for_member(&self, user_id: &str) -> WorklyResult<Vec<Calendar>>;

    /// Deletes the calendar and every event in it.
    async fn delete_calendar(&self, calendar_id: &str) -> WorklyResult<()>;

    async fn save_event(&self, event: &Event) -> WorklyResult<()>;

    async fn event(&self, event_id: &str) -> WorklyResult<Option<Event>>;

    async fn events_for_calendar(&self, calendar_id: &str) -> WorklyResult<Vec<Event>>;

    async fn delete_event(&self, event_id: &str) -> WorklyResult<()>;
}
