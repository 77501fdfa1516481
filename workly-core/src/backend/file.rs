//! JSON document directory backend.
//!
//! Layout:
//! ```text
//! <data_dir>/
//!   accounts/<user-id>.json
//!   calendars/<calendar-id>.json
//!   events/<event-id>.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use super::Backend;
use crate::auth::Account;
use crate::calendar::Calendar;
use crate::error::{WorklyError, WorklyResult};
use crate::event::Event;
use crate::user::{User, normalize_email};

const ACCOUNTS: &str = "accounts";
const CALENDARS: &str = "calendars";
const EVENTS: &str = "events";

/// Backend storing one JSON document per record.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileBackend { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, collection: &str, id: &str) -> WorklyResult<PathBuf> {
        // Ids are uuids; anything that could escape the collection dir is rejected
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(WorklyError::Backend(format!("Invalid document id '{}'", id)));
        }
        Ok(self.root.join(collection).join(format!("{}.json", id)))
    }

    async fn write_document<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> WorklyResult<()> {
        let path = self.document_path(collection, id)?;
        let dir = self.root.join(collection);
        fs::create_dir_all(&dir).await?;

        let content = serde_json::to_vec_pretty(value)?;
        let temp = dir.join(format!(".{}.json.tmp", id));

        fs::write(&temp, content).await?;
        fs::rename(&temp, &path).await?;
        Ok(())
    }

    async fn read_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> WorklyResult<Option<T>> {
        let path = self.document_path(collection, id)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_document(&self, collection: &str, id: &str) -> WorklyResult<()> {
        let path = self.document_path(collection, id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load every document in a collection. Unreadable documents are skipped.
    async fn list_documents<T: DeserializeOwned>(&self, collection: &str) -> WorklyResult<Vec<T>> {
        let dir = self.root.join(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let parsed = fs::read(&path)
                .await
                .map_err(WorklyError::from)
                .and_then(|bytes| serde_json::from_slice(&bytes).map_err(WorklyError::from));
            match parsed {
                Ok(doc) => documents.push(doc),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document"),
            }
        }

        Ok(documents)
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn insert_account(&self, account: Account) -> WorklyResult<()> {
        if self.account_by_email(&account.user.email).await?.is_some() {
            return Err(WorklyError::AlreadyExists(format!(
                "Account '{}'",
                normalize_email(&account.user.email)
            )));
        }
        self.write_document(ACCOUNTS, &account.user.id, &account)
            .await
    }

    async fn account_by_email(&self, email: &str) -> WorklyResult<Option<Account>> {
        let email = normalize_email(email);
        let accounts: Vec<Account> = self.list_documents(ACCOUNTS).await?;
        Ok(accounts
            .into_iter()
            .find(|a| normalize_email(&a.user.email) == email))
    }

    async fn user(&self, user_id: &str) -> WorklyResult<Option<User>> {
        let account: Option<Account> = self.read_document(ACCOUNTS, user_id).await?;
        Ok(account.map(|a| a.user))
    }

    async fn save_calendar(&self, calendar: &Calendar) -> WorklyResult<()> {
        self.write_document(CALENDARS, &calendar.id, calendar).await
    }

    async fn calendar(&self, calendar_id: &str) -> WorklyResult<Option<Calendar>> {
        self.read_document(CALENDARS, calendar_id).await
    }

    async fn calendars_for_member(&self, user_id: &str) -> WorklyResult<Vec<Calendar>> {
        let calendars: Vec<Calendar> = self.list_documents(CALENDARS).await?;
        Ok(calendars
            .into_iter()
            .filter(|c| c.is_member(user_id))
            .collect())
    }

    async fn delete_calendar(&self, calendar_id: &str) -> WorklyResult<()> {
        for event in self.events_for_calendar(calendar_id).await? {
            self.remove_document(EVENTS, &event.id).await?;
        }
        self.remove_document(CALENDARS, calendar_id).await
    }

    async fn save_event(&self, event: &Event) -> WorklyResult<()> {
        self.write_document(EVENTS, &event.id, event).await
    }

    async fn event(&self, event_id: &str) -> WorklyResult<Option<Event>> {
        self.read_document(EVENTS, event_id).await
    }

    async fn events_for_calendar(&self, calendar_id: &str) -> WorklyResult<Vec<Event>> {
        let events: Vec<Event> = self.list_documents(EVENTS).await?;
        Ok(events
            .into_iter()
            .filter(|e| e.calendar_id == calendar_id)
            .collect())
    }

    async fn delete_event(&self, event_id: &str) -> WorklyResult<()> {
        self.remove_document(EVENTS, event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;
    use crate::event::EventDraft;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn account(email: &str) -> Account {
        Account {
            user: User::new(email, "Test"),
            credential: Credential::new("Abcdef1!").unwrap(),
        }
    }

    fn event_in(calendar_id: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap();
        Event::from_draft(calendar_id, "user", EventDraft::new("Standup", start, end))
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let acct = account("ada@example.com");
        let calendar = Calendar::new("Work", None, &acct.user.id);
        let event = event_in(&calendar.id);

        {
            let backend = FileBackend::new(dir.path());
            backend.insert_account(acct.clone()).await.unwrap();
            backend.save_calendar(&calendar).await.unwrap();
            backend.save_event(&event).await.unwrap();
        }

        let backend = FileBackend::new(dir.path());
        let found = backend.account_by_email("ADA@example.com").await.unwrap();
        assert_eq!(found.map(|a| a.user), Some(acct.user.clone()));
        assert_eq!(backend.calendar(&calendar.id).await.unwrap(), Some(calendar.clone()));
        assert_eq!(backend.event(&event.id).await.unwrap(), Some(event));
        assert_eq!(
            backend.calendars_for_member(&acct.user.id).await.unwrap(),
            vec![calendar]
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());

        backend.insert_account(account("ada@example.com")).await.unwrap();
        let err = backend
            .insert_account(account(" Ada@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn deleting_calendar_removes_its_events() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());

        let keep = Calendar::new("Keep", None, "u1");
        let drop = Calendar::new("Drop", None, "u1");
        backend.save_calendar(&keep).await.unwrap();
        backend.save_calendar(&drop).await.unwrap();
        let kept_event = event_in(&keep.id);
        backend.save_event(&kept_event).await.unwrap();
        backend.save_event(&event_in(&drop.id)).await.unwrap();

        backend.delete_calendar(&drop.id).await.unwrap();

        assert!(backend.calendar(&drop.id).await.unwrap().is_none());
        assert!(backend.events_for_calendar(&drop.id).await.unwrap().is_empty());
        assert_eq!(
            backend.events_for_calendar(&keep.id).await.unwrap(),
            vec![kept_event]
        );
    }

    #[tokio::test]
    async fn corrupt_documents_are_skipped() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        let calendar = Calendar::new("Work", None, "u1");
        backend.save_calendar(&calendar).await.unwrap();

        std::fs::write(dir.path().join(CALENDARS).join("broken.json"), "{not json").unwrap();

        let calendars = backend.calendars_for_member("u1").await.unwrap();
        assert_eq!(calendars, vec![calendar]);
    }

    #[tokio::test]
    async fn missing_documents_read_as_none() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());

        assert!(backend.event("nope").await.unwrap().is_none());
        assert!(backend.user("nope").await.unwrap().is_none());
        assert!(backend.events_for_calendar("nope").await.unwrap().is_empty());
        backend.delete_event("nope").await.unwrap();
    }

    #[tokio::test]
    async fn path_traversal_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        assert!(backend.event("../secrets").await.is_err());
    }
}
