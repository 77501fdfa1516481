//! Scheduling operations over a [`Backend`].
//!
//! Every operation takes the acting [`User`] and enforces calendar access:
//! members may read a calendar and manage its events; only the owner may
//! manage members, teams and the calendar itself.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Weekday};

use crate::auth::{self, SignUp};
use crate::backend::Backend;
use crate::calendar::{Calendar, Team};
use crate::date_range::DateRange;
use crate::error::{WorklyError, WorklyResult};
use crate::event::{Assignee, Event, EventDraft};
use crate::month_grid::{MonthGrid, YearMonth};
use crate::preferences::Session;
use crate::user::User;
use crate::validation::{validate_email, validate_not_empty};

/// One cell of a month view.
#[derive(Debug, Clone)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub events: Vec<Event>,
}

#[derive(Clone)]
pub struct Workly {
    backend: Arc<dyn Backend>,
}

impl Workly {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Workly { backend }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    // AUTH:

    pub async fn sign_up(&self, form: SignUp) -> WorklyResult<User> {
        auth::sign_up(self.backend(), form).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> WorklyResult<User> {
        auth::sign_in(self.backend(), email, password).await
    }

    /// Resolve a stored session back to its user.
    pub async fn current_user(&self, session: &Session) -> WorklyResult<User> {
        self.backend
            .user(&session.user_id)
            .await?
            .ok_or(WorklyError::NotSignedIn)
    }

    pub async fn user_by_email(&self, email: &str) -> WorklyResult<User> {
        self.backend
            .account_by_email(email)
            .await?
            .map(|a| a.user)
            .ok_or_else(|| WorklyError::not_found("User", email.trim()))
    }

    // CALENDARS:

    async fn load_calendar(&self, calendar_id: &str) -> WorklyResult<Calendar> {
        self.backend
            .calendar(calendar_id)
            .await?
            .ok_or_else(|| WorklyError::not_found("Calendar", calendar_id))
    }

    async fn member_calendar(&self, actor: &User, calendar_id: &str) -> WorklyResult<Calendar> {
        let calendar = self.load_calendar(calendar_id).await?;
        if !calendar.is_member(&actor.id) {
            return Err(WorklyError::PermissionDenied(format!(
                "not a member of calendar '{}'",
                calendar.name
            )));
        }
        Ok(calendar)
    }

    async fn owned_calendar(&self, actor: &User, calendar_id: &str) -> WorklyResult<Calendar> {
        let calendar = self.member_calendar(actor, calendar_id).await?;
        if !calendar.is_owner(&actor.id) {
            return Err(WorklyError::PermissionDenied(format!(
                "only the owner can change calendar '{}'",
                calendar.name
            )));
        }
        Ok(calendar)
    }

    pub async fn create_calendar(
        &self,
        actor: &User,
        name: &str,
        description: Option<String>,
    ) -> WorklyResult<Calendar> {
        validate_not_empty("Calendar name", name).into_result()?;

        let calendar = Calendar::new(name, description, &actor.id);
        self.backend.save_calendar(&calendar).await?;

        tracing::info!(calendar_id = %calendar.id, owner = %actor.id, "calendar created");
        Ok(calendar)
    }

    /// Calendars the actor belongs to, sorted by name.
    pub async fn calendars(&self, actor: &User) -> WorklyResult<Vec<Calendar>> {
        let mut calendars = self.backend.calendars_for_member(&actor.id).await?;
        calendars.sort_by_key(|c| c.name.to_lowercase());
        Ok(calendars)
    }

    pub async fn calendar(&self, actor: &User, calendar_id: &str) -> WorklyResult<Calendar> {
        self.member_calendar(actor, calendar_id).await
    }

    /// Find one of the actor's calendars by id or by name (case-insensitive).
    pub async fn find_calendar(&self, actor: &User, id_or_name: &str) -> WorklyResult<Calendar> {
        let needle = id_or_name.trim();
        let calendars = self.calendars(actor).await?;

        if let Some(cal) = calendars.iter().find(|c| c.id == needle) {
            return Ok(cal.clone());
        }

        let mut by_name = calendars
            .into_iter()
            .filter(|c| c.name.eq_ignore_ascii_case(needle));
        match (by_name.next(), by_name.next()) {
            (Some(cal), None) => Ok(cal),
            (Some(_), Some(_)) => Err(WorklyError::Validation(format!(
                "Several calendars are named '{}'. Use the calendar id instead",
                needle
            ))),
            (None, _) => Err(WorklyError::not_found("Calendar", needle)),
        }
    }

    pub async fn rename_calendar(
        &self,
        actor: &User,
        calendar_id: &str,
        name: &str,
    ) -> WorklyResult<Calendar> {
        validate_not_empty("Calendar name", name).into_result()?;

        let mut calendar = self.owned_calendar(actor, calendar_id).await?;
        calendar.name = name.trim().to_string();
        self.backend.save_calendar(&calendar).await?;
        Ok(calendar)
    }

    pub async fn delete_calendar(&self, actor: &User, calendar_id: &str) -> WorklyResult<()> {
        let calendar = self.owned_calendar(actor, calendar_id).await?;
        self.backend.delete_calendar(&calendar.id).await?;

        tracing::info!(calendar_id = %calendar.id, "calendar deleted");
        Ok(())
    }

    // MEMBERS:

    pub async fn invite_member(
        &self,
        actor: &User,
        calendar_id: &str,
        email: &str,
    ) -> WorklyResult<User> {
        validate_email(email).into_result()?;

        let mut calendar = self.owned_calendar(actor, calendar_id).await?;
        let invitee = self.user_by_email(email).await?;

        if calendar.is_member(&invitee.id) {
            return Err(WorklyError::AlreadyExists(format!(
                "Member '{}' of '{}'",
                invitee.email, calendar.name
            )));
        }

        calendar.member_ids.push(invitee.id.clone());
        self.backend.save_calendar(&calendar).await?;

        tracing::info!(calendar_id = %calendar.id, user_id = %invitee.id, "member invited");
        Ok(invitee)
    }

    /// Remove a member, dropping them from every team and unassigning
    /// their events. The owner cannot be removed.
    pub async fn remove_member(
        &self,
        actor: &User,
        calendar_id: &str,
        user_id: &str,
    ) -> WorklyResult<()> {
        let mut calendar = self.owned_calendar(actor, calendar_id).await?;

        if calendar.is_owner(user_id) {
            return Err(WorklyError::PermissionDenied(
                "the owner cannot be removed from their calendar".into(),
            ));
        }
        if !calendar.remove_member(user_id) {
            return Err(WorklyError::not_found("Member", user_id));
        }
        self.backend.save_calendar(&calendar).await?;

        self.clear_assignments(&calendar.id, |e| e.is_assigned_to_member(user_id))
            .await?;

        tracing::info!(calendar_id = %calendar.id, user_id = %user_id, "member removed");
        Ok(())
    }

    /// Members in the order they joined; the owner comes first.
    pub async fn members(&self, actor: &User, calendar_id: &str) -> WorklyResult<Vec<User>> {
        let calendar = self.member_calendar(actor, calendar_id).await?;

        let mut members = Vec::with_capacity(calendar.member_ids.len());
        for id in &calendar.member_ids {
            match self.backend.user(id).await? {
                Some(user) => members.push(user),
                None => tracing::warn!(user_id = %id, "calendar member has no account"),
            }
        }
        Ok(members)
    }

    // TEAMS:

    fn check_team_members(calendar: &Calendar, member_ids: &[String]) -> WorklyResult<()> {
        match member_ids.iter().find(|id| !calendar.is_member(id)) {
            Some(id) => Err(WorklyError::Validation(format!(
                "User '{}' is not a member of '{}'",
                id, calendar.name
            ))),
            None => Ok(()),
        }
    }

    fn team_in<'a>(calendar: &'a mut Calendar, team_id: &str) -> WorklyResult<&'a mut Team> {
        calendar
            .team_mut(team_id)
            .ok_or_else(|| WorklyError::not_found("Team", team_id))
    }

    pub async fn teams(&self, actor: &User, calendar_id: &str) -> WorklyResult<Vec<Team>> {
        Ok(self.member_calendar(actor, calendar_id).await?.teams)
    }

    pub async fn create_team(
        &self,
        actor: &User,
        calendar_id: &str,
        name: &str,
        member_ids: Vec<String>,
    ) -> WorklyResult<Team> {
        validate_not_empty("Team name", name).into_result()?;

        let mut calendar = self.owned_calendar(actor, calendar_id).await?;
        if calendar
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name.trim()))
        {
            return Err(WorklyError::AlreadyExists(format!("Team '{}'", name.trim())));
        }
        Self::check_team_members(&calendar, &member_ids)?;

        let team = Team::new(name, member_ids);
        calendar.teams.push(team.clone());
        self.backend.save_calendar(&calendar).await?;

        tracing::info!(calendar_id = %calendar.id, team_id = %team.id, "team created");
        Ok(team)
    }

    pub async fn add_team_member(
        &self,
        actor: &User,
        calendar_id: &str,
        team_id: &str,
        user_id: &str,
    ) -> WorklyResult<Team> {
        let mut calendar = self.owned_calendar(actor, calendar_id).await?;
        Self::check_team_members(&calendar, &[user_id.to_string()])?;

        let team = Self::team_in(&mut calendar, team_id)?;
        if !team.add_member(user_id) {
            return Err(WorklyError::AlreadyExists(format!(
                "Member '{}' of team '{}'",
                user_id, team.name
            )));
        }
        let team = team.clone();
        self.backend.save_calendar(&calendar).await?;
        Ok(team)
    }

    pub async fn remove_team_member(
        &self,
        actor: &User,
        calendar_id: &str,
        team_id: &str,
        user_id: &str,
    ) -> WorklyResult<Team> {
        let mut calendar = self.owned_calendar(actor, calendar_id).await?;

        let team = Self::team_in(&mut calendar, team_id)?;
        if !team.remove_member(user_id) {
            return Err(WorklyError::not_found("Team member", user_id));
        }
        let team = team.clone();
        self.backend.save_calendar(&calendar).await?;
        Ok(team)
    }

    /// Delete a team and unassign events that were assigned to it.
    pub async fn delete_team(
        &self,
        actor: &User,
        calendar_id: &str,
        team_id: &str,
    ) -> WorklyResult<()> {
        let mut calendar = self.owned_calendar(actor, calendar_id).await?;

        let before = calendar.teams.len();
        calendar.teams.retain(|t| t.id != team_id);
        if calendar.teams.len() == before {
            return Err(WorklyError::not_found("Team", team_id));
        }
        self.backend.save_calendar(&calendar).await?;

        self.clear_assignments(&calendar.id, |e| e.is_assigned_to_team(team_id))
            .await?;

        tracing::info!(calendar_id = %calendar.id, team_id = %team_id, "team deleted");
        Ok(())
    }

    // EVENTS:

    fn check_assignee(calendar: &Calendar, assignee: Option<&Assignee>) -> WorklyResult<()> {
        match assignee {
            None => Ok(()),
            Some(Assignee::Member { user_id }) if calendar.is_member(user_id) => Ok(()),
            Some(Assignee::Team { team_id }) if calendar.team(team_id).is_some() => Ok(()),
            Some(Assignee::Member { user_id }) => Err(WorklyError::Validation(format!(
                "Assignee '{}' is not a member of '{}'",
                user_id, calendar.name
            ))),
            Some(Assignee::Team { team_id }) => Err(WorklyError::Validation(format!(
                "Team '{}' does not exist in '{}'",
                team_id, calendar.name
            ))),
        }
    }

    async fn clear_assignments<F>(&self, calendar_id: &str, matches: F) -> WorklyResult<()>
    where
        F: Fn(&Event) -> bool,
    {
        for mut event in self.backend.events_for_calendar(calendar_id).await? {
            if matches(&event) {
                event.assignee = None;
                event.updated_at = chrono::Utc::now();
                self.backend.save_event(&event).await?;
                tracing::debug!(event_id = %event.id, "assignment cleared");
            }
        }
        Ok(())
    }

    pub async fn create_event(
        &self,
        actor: &User,
        calendar_id: &str,
        draft: EventDraft,
    ) -> WorklyResult<Event> {
        draft.validate()?;

        let calendar = self.member_calendar(actor, calendar_id).await?;
        Self::check_assignee(&calendar, draft.assignee.as_ref())?;

        let event = Event::from_draft(&calendar.id, &actor.id, draft);
        self.backend.save_event(&event).await?;

        tracing::info!(event_id = %event.id, calendar_id = %calendar.id, "event created");
        Ok(event)
    }

    pub async fn event(&self, actor: &User, event_id: &str) -> WorklyResult<Event> {
        let event = self
            .backend
            .event(event_id)
            .await?
            .ok_or_else(|| WorklyError::not_found("Event", event_id))?;
        self.member_calendar(actor, &event.calendar_id).await?;
        Ok(event)
    }

    pub async fn update_event(
        &self,
        actor: &User,
        event_id: &str,
        draft: EventDraft,
    ) -> WorklyResult<Event> {
        draft.validate()?;

        let mut event = self.event(actor, event_id).await?;
        let calendar = self.load_calendar(&event.calendar_id).await?;
        Self::check_assignee(&calendar, draft.assignee.as_ref())?;

        event.apply(draft);
        self.backend.save_event(&event).await?;

        tracing::info!(event_id = %event.id, "event updated");
        Ok(event)
    }

    pub async fn delete_event(&self, actor: &User, event_id: &str) -> WorklyResult<()> {
        let event = self.event(actor, event_id).await?;
        self.backend.delete_event(&event.id).await?;

        tracing::info!(event_id = %event.id, "event deleted");
        Ok(())
    }

    /// Events in `range`, ordered by start time then title.
    pub async fn events(
        &self,
        actor: &User,
        calendar_id: &str,
        range: &DateRange,
    ) -> WorklyResult<Vec<Event>> {
        let calendar = self.member_calendar(actor, calendar_id).await?;

        let mut events: Vec<Event> = self
            .backend
            .events_for_calendar(&calendar.id)
            .await?
            .into_iter()
            .filter(|e| range.contains(e))
            .collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
        Ok(events)
    }

    /// The month grid for `month` with each day's events (in `tz`).
    pub async fn month_agenda<Tz: TimeZone>(
        &self,
        actor: &User,
        calendar_id: &str,
        month: YearMonth,
        first_weekday: Weekday,
        tz: &Tz,
    ) -> WorklyResult<Vec<AgendaDay>> {
        let grid = MonthGrid::new(month, first_weekday);
        let events = self.events(actor, calendar_id, &DateRange::all()).await?;

        let days = grid
            .dates
            .iter()
            .map(|&date| AgendaDay {
                date,
                in_month: grid.is_in_month(date),
                events: events
                    .iter()
                    .filter(|e| e.occurs_on(date, tz))
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::{DateTime, Utc};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    async fn register(workly: &Workly, name: &str) -> User {
        workly
            .sign_up(SignUp {
                display_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password: "Abcdef1!".into(),
                confirmation: "Abcdef1!".into(),
            })
            .await
            .unwrap()
    }

    /// Owner "Ada" with member "Bob" in calendar "Work"; "Eve" is a stranger.
    async fn setup() -> (Workly, User, User, User, Calendar) {
        let workly = Workly::new(Arc::new(MemoryBackend::new()));
        let ada = register(&workly, "Ada").await;
        let bob = register(&workly, "Bob").await;
        let eve = register(&workly, "Eve").await;

        let cal = workly.create_calendar(&ada, "Work", None).await.unwrap();
        workly
            .invite_member(&ada, &cal.id, "bob@example.com")
            .await
            .unwrap();
        let cal = workly.calendar(&ada, &cal.id).await.unwrap();
        (workly, ada, bob, eve, cal)
    }

    #[tokio::test]
    async fn calendars_are_listed_for_members_only() {
        let (workly, ada, bob, eve, cal) = setup().await;
        workly.create_calendar(&ada, "Archive", None).await.unwrap();

        let names: Vec<_> = workly
            .calendars(&ada)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Archive", "Work"]);

        assert_eq!(workly.calendars(&bob).await.unwrap().len(), 1);
        assert!(workly.calendars(&eve).await.unwrap().is_empty());

        let err = workly.calendar(&eve, &cal.id).await.unwrap_err();
        assert!(matches!(err, WorklyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn calendar_name_is_required() {
        let (workly, ada, ..) = setup().await;
        let err = workly.create_calendar(&ada, "  ", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Calendar name cannot be empty");
    }

    #[tokio::test]
    async fn find_calendar_by_id_or_name() {
        let (workly, ada, _, _, cal) = setup().await;
        assert_eq!(workly.find_calendar(&ada, "work").await.unwrap().id, cal.id);
        assert_eq!(workly.find_calendar(&ada, &cal.id).await.unwrap().id, cal.id);
        assert!(matches!(
            workly.find_calendar(&ada, "nope").await,
            Err(WorklyError::NotFound { .. })
        ));

        workly.create_calendar(&ada, "WORK", None).await.unwrap();
        assert!(matches!(
            workly.find_calendar(&ada, "work").await,
            Err(WorklyError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn only_owner_manages_calendar() {
        let (workly, ada, bob, _, cal) = setup().await;

        let err = workly
            .invite_member(&bob, &cal.id, "eve@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::PermissionDenied(_)));

        let err = workly.rename_calendar(&bob, &cal.id, "Mine").await.unwrap_err();
        assert!(matches!(err, WorklyError::PermissionDenied(_)));

        let renamed = workly.rename_calendar(&ada, &cal.id, " Team Work ").await.unwrap();
        assert_eq!(renamed.name, "Team Work");
    }

    #[tokio::test]
    async fn invite_checks_email_and_membership() {
        let (workly, ada, _, _, cal) = setup().await;

        let err = workly
            .invite_member(&ada, &cal.id, "not-an-email")
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::Validation(_)));

        let err = workly
            .invite_member(&ada, &cal.id, "nobody@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::NotFound { kind: "User", .. }));

        let err = workly
            .invite_member(&ada, &cal.id, "BOB@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::AlreadyExists(_)));

        let members: Vec<_> = workly
            .members(&ada, &cal.id)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.display_name)
            .collect();
        assert_eq!(members, vec!["Ada", "Bob"]);
    }

    #[tokio::test]
    async fn owner_cannot_be_removed() {
        let (workly, ada, _, _, cal) = setup().await;
        let err = workly.remove_member(&ada, &cal.id, &ada.id).await.unwrap_err();
        assert!(matches!(err, WorklyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn removing_member_scrubs_teams_and_assignments() {
        let (workly, ada, bob, _, cal) = setup().await;

        let team = workly
            .create_team(&ada, &cal.id, "Ops", vec![bob.id.clone()])
            .await
            .unwrap();
        let mut draft = EventDraft::new("Deploy", at(20, 15), at(20, 16));
        draft.assignee = Some(Assignee::Member {
            user_id: bob.id.clone(),
        });
        let event = workly.create_event(&ada, &cal.id, draft).await.unwrap();

        workly.remove_member(&ada, &cal.id, &bob.id).await.unwrap();

        let teams = workly.teams(&ada, &cal.id).await.unwrap();
        assert!(teams.iter().find(|t| t.id == team.id).unwrap().member_ids.is_empty());
        assert_eq!(workly.event(&ada, &event.id).await.unwrap().assignee, None);

        let err = workly.calendar(&bob, &cal.id).await.unwrap_err();
        assert!(matches!(err, WorklyError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn teams_hold_only_calendar_members() {
        let (workly, ada, bob, eve, cal) = setup().await;

        let err = workly
            .create_team(&ada, &cal.id, "Ops", vec![eve.id.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::Validation(_)));

        let team = workly
            .create_team(&ada, &cal.id, "Ops", vec![])
            .await
            .unwrap();
        let err = workly
            .create_team(&ada, &cal.id, "ops", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::AlreadyExists(_)));

        let team_after = workly
            .add_team_member(&ada, &cal.id, &team.id, &bob.id)
            .await
            .unwrap();
        assert_eq!(team_after.member_ids, vec![bob.id.clone()]);

        let err = workly
            .add_team_member(&ada, &cal.id, &team.id, &bob.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::AlreadyExists(_)));

        let err = workly
            .add_team_member(&ada, &cal.id, &team.id, &eve.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::Validation(_)));

        let team_after = workly
            .remove_team_member(&ada, &cal.id, &team.id, &bob.id)
            .await
            .unwrap();
        assert!(team_after.member_ids.is_empty());
    }

    #[tokio::test]
    async fn deleting_team_clears_its_assignments() {
        let (workly, ada, _, _, cal) = setup().await;
        let team = workly
            .create_team(&ada, &cal.id, "Ops", vec![])
            .await
            .unwrap();

        let mut draft = EventDraft::new("On call", at(20, 9), at(20, 17));
        draft.assignee = Some(Assignee::Team {
            team_id: team.id.clone(),
        });
        let event = workly.create_event(&ada, &cal.id, draft).await.unwrap();

        workly.delete_team(&ada, &cal.id, &team.id).await.unwrap();
        assert!(workly.teams(&ada, &cal.id).await.unwrap().is_empty());
        assert_eq!(workly.event(&ada, &event.id).await.unwrap().assignee, None);

        let err = workly.delete_team(&ada, &cal.id, &team.id).await.unwrap_err();
        assert!(matches!(err, WorklyError::NotFound { .. }));
    }

    #[tokio::test]
    async fn members_manage_events() {
        let (workly, _, bob, eve, cal) = setup().await;

        let event = workly
            .create_event(&bob, &cal.id, EventDraft::new("Standup", at(20, 9), at(20, 10)))
            .await
            .unwrap();
        assert_eq!(event.created_by, bob.id);

        let err = workly
            .create_event(&eve, &cal.id, EventDraft::new("Intrude", at(20, 9), at(20, 10)))
            .await
            .unwrap_err();
        assert!(matches!(err, WorklyError::PermissionDenied(_)));

        let mut draft = event.to_draft();
        draft.title = "Daily standup".into();
        draft.location = Some("Room 4".into());
        let updated = workly.update_event(&bob, &event.id, draft).await.unwrap();
        assert_eq!(updated.title, "Daily standup");
        assert_eq!(updated.location.as_deref(), Some("Room 4"));
        assert!(updated.updated_at >= event.updated_at);

        assert!(workly.delete_event(&eve, &event.id).await.is_err());
        workly.delete_event(&bob, &event.id).await.unwrap();
        assert!(matches!(
            workly.event(&bob, &event.id).await,
            Err(WorklyError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn events_are_validated() {
        let (workly, ada, _, eve, cal) = setup().await;

        let err = workly
            .create_event(&ada, &cal.id, EventDraft::new("Backwards", at(20, 10), at(20, 9)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "End time cannot be before start time");

        let mut draft = EventDraft::new("Stranger", at(20, 9), at(20, 10));
        draft.assignee = Some(Assignee::Member {
            user_id: eve.id.clone(),
        });
        let err = workly.create_event(&ada, &cal.id, draft).await.unwrap_err();
        assert!(matches!(err, WorklyError::Validation(_)));

        let mut draft = EventDraft::new("Ghost team", at(20, 9), at(20, 10));
        draft.assignee = Some(Assignee::Team {
            team_id: "missing".into(),
        });
        let err = workly.create_event(&ada, &cal.id, draft).await.unwrap_err();
        assert!(matches!(err, WorklyError::Validation(_)));
    }

    #[tokio::test]
    async fn events_are_sorted_and_filtered() {
        let (workly, ada, _, _, cal) = setup().await;
        for (title, start) in [("Late", at(21, 15)), ("Early", at(20, 9)), ("Also early", at(20, 9))] {
            workly
                .create_event(&ada, &cal.id, EventDraft::new(title, start, start))
                .await
                .unwrap();
        }

        let titles: Vec<_> = workly
            .events(&ada, &cal.id, &DateRange::all())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Also early", "Early", "Late"]);

        let range = DateRange::between(at(21, 0), at(22, 0));
        let titles: Vec<_> = workly
            .events(&ada, &cal.id, &range)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Late"]);
    }

    #[tokio::test]
    async fn month_agenda_places_events_on_grid_days() {
        let (workly, ada, _, _, cal) = setup().await;
        workly
            .create_event(&ada, &cal.id, EventDraft::new("Offsite", at(20, 9), at(21, 17)))
            .await
            .unwrap();

        let month = YearMonth::new(2025, 3).unwrap();
        let days = workly
            .month_agenda(&ada, &cal.id, month, Weekday::Mon, &Utc)
            .await
            .unwrap();

        assert_eq!(days.len(), 42);
        assert!(!days[0].in_month);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());

        let busy: Vec<_> = days
            .iter()
            .filter(|d| !d.events.is_empty())
            .map(|d| d.date)
            .collect();
        assert_eq!(busy, vec![date(20), date(21)]);
    }

    #[tokio::test]
    async fn deleting_calendar_requires_owner_and_removes_events() {
        let (workly, ada, bob, _, cal) = setup().await;
        let event = workly
            .create_event(&bob, &cal.id, EventDraft::new("Standup", at(20, 9), at(20, 10)))
            .await
            .unwrap();

        assert!(workly.delete_calendar(&bob, &cal.id).await.is_err());
        workly.delete_calendar(&ada, &cal.id).await.unwrap();

        assert!(workly.calendars(&ada).await.unwrap().is_empty());
        assert!(workly.backend().event(&event.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_resolves_to_user() {
        let (workly, ada, ..) = setup().await;
        let session = Session::for_user(&ada);
        assert_eq!(workly.current_user(&session).await.unwrap(), ada);

        let stale = Session {
            user_id: "gone".into(),
            ..session
        };
        assert!(matches!(
            workly.current_user(&stale).await,
            Err(WorklyError::NotSignedIn)
        ));
    }
}
