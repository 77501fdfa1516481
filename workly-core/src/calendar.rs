//! Calendars and the teams inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named collection of events shared by its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    /// Always contains `owner_id`.
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub teams: Vec<Team>,
    pub created_at: DateTime<Utc>,
}

/// A named sub-group of a calendar's members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub member_ids: Vec<String>,
}

impl Calendar {
    pub fn new(name: &str, description: Option<String>, owner_id: &str) -> Self {
        Calendar {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            owner_id: owner_id.to_string(),
            member_ids: vec![owner_id.to_string()],
            teams: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn team_mut(&mut self, team_id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team_id)
    }

    /// Find a team by id or by name (case-insensitive).
    pub fn find_team(&self, id_or_name: &str) -> Option<&Team> {
        self.team(id_or_name).or_else(|| {
            self.teams
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(id_or_name.trim()))
        })
    }

    /// Remove a member from the calendar and from every team.
    /// Returns false if the user was not a member.
    pub(crate) fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|id| id != user_id);
        for team in &mut self.teams {
            team.remove_member(user_id);
        }
        self.member_ids.len() != before
    }
}

impl Team {
    pub fn new(name: &str, member_ids: Vec<String>) -> Self {
        let mut team = Team {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            member_ids: Vec::new(),
        };
        for id in member_ids {
            team.add_member(&id);
        }
        team
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }

    /// Returns false if the user was already in the team.
    pub(crate) fn add_member(&mut self, user_id: &str) -> bool {
        if self.has_member(user_id) {
            return false;
        }
        self.member_ids.push(user_id.to_string());
        true
    }

    pub(crate) fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|id| id != user_id);
        self.member_ids.len() != before
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_first_member() {
        let cal = Calendar::new("  Family ", Some("   ".into()), "u1");
        assert_eq!(cal.name, "Family");
        assert_eq!(cal.description, None);
        assert!(cal.is_owner("u1"));
        assert!(cal.is_member("u1"));
        assert!(!cal.is_member("u2"));
    }

    #[test]
    fn team_members_are_unique() {
        let team = Team::new("Ops", vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(team.member_ids, vec!["a", "b"]);
    }

    #[test]
    fn removing_member_scrubs_teams() {
        let mut cal = Calendar::new("Work", None, "owner");
        cal.member_ids.push("dev".into());
        cal.teams.push(Team::new("Backend", vec!["dev".into(), "owner".into()]));

        assert!(cal.remove_member("dev"));
        assert!(!cal.is_member("dev"));
        assert_eq!(cal.teams[0].member_ids, vec!["owner"]);
        assert!(!cal.remove_member("dev"));
    }

    #[test]
    fn find_team_by_name_ignores_case() {
        let mut cal = Calendar::new("Work", None, "owner");
        let team = Team::new("Backend", vec![]);
        let id = team.id.clone();
        cal.teams.push(team);

        assert_eq!(cal.find_team("backend").map(|t| &t.id), Some(&id));
        assert_eq!(cal.find_team(&id).map(|t| &t.name), Some(&"Backend".to_string()));
        assert!(cal.find_team("frontend").is_none());
    }
}
