//! In-memory backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Backend;
use crate::auth::Account;
use crate::calendar::Calendar;
use crate::error::{WorklyError, WorklyResult};
use crate::event::Event;
use crate::user::{User, normalize_email};

#[derive(Default)]
struct Collections {
    /// Keyed by normalized email
    accounts: BTreeMap<String, Account>,
    calendars: BTreeMap<String, Calendar>,
    events: BTreeMap<String, Event>,
}

/// Backend that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn insert_account(&self, account: Account) -> WorklyResult<()> {
        let mut data = self.data.write().await;
        let key = normalize_email(&account.user.email);
        if data.accounts.contains_key(&key) {
            return Err(WorklyError::AlreadyExists(format!("Account '{}'", key)));
        }
        data.accounts.insert(key, account);
        Ok(())
    }

    async fn account_by_email(&self, email: &str) -> WorklyResult<Option<Account>> {
        let data = self.data.read().await;
        Ok(data.accounts.get(&normalize_email(email)).cloned())
    }

    async fn user(&self, user_id: &str) -> WorklyResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data
            .accounts
            .values()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone()))
    }

    async fn save_calendar(&self, calendar: &Calendar) -> WorklyResult<()> {
        let mut data = self.data.write().await;
        data.calendars.insert(calendar.id.clone(), calendar.clone());
        Ok(())
    }

    async fn calendar(&self, calendar_id: &str) -> WorklyResult<Option<Calendar>> {
        let data = self.data.read().await;
        Ok(data.calendars.get(calendar_id).cloned())
    }

    async fn calendars_for_member(&self, user_id: &str) -> WorklyResult<Vec<Calendar>> {
        let data = self.data.read().await;
        Ok(data
            .calendars
            .values()
            .filter(|c| c.is_member(user_id))
            .cloned()
            .collect())
    }

    async fn delete_calendar(&self, calendar_id: &str) -> WorklyResult<()> {
        let mut data = self.data.write().await;
        data.calendars.remove(calendar_id);
        data.events.retain(|_, e| e.calendar_id != calendar_id);
        Ok(())
    }

    async fn save_event(&self, event: &Event) -> WorklyResult<()> {
        let mut data = self.data.write().await;
        data.events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn event(&self, event_id: &str) -> WorklyResult<Option<Event>> {
        let data = self.data.read().await;
        Ok(data.events.get(event_id).cloned())
    }

    async fn events_for_calendar(&self, calendar_id: &str) -> WorklyResult<Vec<Event>> {
        let data = self.data.read().await;
        Ok(data
            .events
            .values()
            .filter(|e| e.calendar_id == calendar_id)
            .cloned()
            .collect())
    }

    async fn delete_event(&self, event_id: &str) -> WorklyResult<()> {
        let mut data = self.data.write().await;
        data.events.remove(event_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;
    use crate::event::EventDraft;
    use chrono::{TimeZone, Utc};

    fn account(email: &str) -> Account {
        Account {
            user: User::new(email, "Test"),
            credential: Credential::new("Abcdef1!").unwrap(),
        }
    }

    fn event_in(calendar_id: &str, title: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap();
        Event::from_draft(calendar_id, "user", EventDraft::new(title, start, end))
    }

    #[tokio::test]
    async fn accounts_are_keyed_by_normalized_email() {
        let backend = MemoryBackend::new();
        let ada = account("Ada@Example.com");
        backend.insert_account(ada.clone()).await.unwrap();

        let found = backend.account_by_email(" ADA@example.COM ").await.unwrap();
        assert_eq!(found.map(|a| a.user), Some(ada.user.clone()));
        assert_eq!(backend.user(&ada.user.id).await.unwrap(), Some(ada.user));
        assert_eq!(backend.user("nobody").await.unwrap(), None);

        let err = backend
            .insert_account(account("ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn calendars_are_listed_per_member_and_saves_upsert() {
        let backend = MemoryBackend::new();
        let mut work = Calendar::new("Work", None, "u1");
        let home = Calendar::new("Home", None, "u2");
        backend.save_calendar(&work).await.unwrap();
        backend.save_calendar(&home).await.unwrap();

        work.name = "Office".into();
        backend.save_calendar(&work).await.unwrap();

        let mine = backend.calendars_for_member("u1").await.unwrap();
        assert_eq!(mine, vec![work.clone()]);
        assert_eq!(backend.calendar(&work.id).await.unwrap().unwrap().name, "Office");
        assert!(backend.calendars_for_member("u3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_calendar_removes_only_its_events() {
        let backend = MemoryBackend::new();
        let keep = Calendar::new("Keep", None, "u1");
        let drop = Calendar::new("Drop", None, "u1");
        backend.save_calendar(&keep).await.unwrap();
        backend.save_calendar(&drop).await.unwrap();

        let kept = event_in(&keep.id, "Standup");
        let dropped = event_in(&drop.id, "Retro");
        backend.save_event(&kept).await.unwrap();
        backend.save_event(&dropped).await.unwrap();

        backend.delete_calendar(&drop.id).await.unwrap();

        assert_eq!(backend.calendar(&drop.id).await.unwrap(), None);
        assert_eq!(backend.event(&dropped.id).await.unwrap(), None);
        assert_eq!(backend.events_for_calendar(&keep.id).await.unwrap(), vec![kept.clone()]);

        backend.delete_event(&kept.id).await.unwrap();
        assert!(backend.events_for_calendar(&keep.id).await.unwrap().is_empty());
    }
}
