//! Page state of the ladder-league client as a plain value.
//!
//! A [`Session`] is the current [`View`] plus the logged-in [`User`], if any. Every page
//! change goes through [`Session::apply`], so the combinations of flags a UI would
//! otherwise juggle (logged in but on the signup page, a league selected with nobody
//! logged in) cannot be represented.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::league::User;

/// The page being shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum View {
    Welcome,
    Signup,
    Login,
    AllUsers,
    TournamentList,
    Leaderboard { league: String },
    AddScore { league: String },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Welcome => "welcome",
            View::Signup => "signup",
            View::Login => "login",
            View::AllUsers => "all-users",
            View::TournamentList => "tournament-list",
            View::Leaderboard { .. } => "leaderboard",
            View::AddScore { .. } => "add-score",
        }
    }

    /// Pages that only make sense with somebody logged in
    pub fn requires_user(&self) -> bool {
        matches!(
            self,
            View::TournamentList | View::Leaderboard { .. } | View::AddScore { .. }
        )
    }
}

/// User actions and fetch results that move the client between pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ShowSignup,
    ShowLogin,
    ShowAllUsers,
    /// Backend accepted a signup
    SignupSucceeded(User),
    /// Backend already knows the phone number
    SignupRejected,
    /// Backend found the phone number
    LoginSucceeded(User),
    /// Backend doesn't know the phone number
    LoginFailed,
    EnterLeague(String),
    OpenAddScore,
    /// Backend stored a submitted score
    ScoreSaved,
    Back,
    Home,
    Logout,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ShowSignup => "show-signup",
            Event::ShowLogin => "show-login",
            Event::ShowAllUsers => "show-all-users",
            Event::SignupSucceeded(_) => "signup-succeeded",
            Event::SignupRejected => "signup-rejected",
            Event::LoginSucceeded(_) => "login-succeeded",
            Event::LoginFailed => "login-failed",
            Event::EnterLeague(_) => "enter-league",
            Event::OpenAddScore => "open-add-score",
            Event::ScoreSaved => "score-saved",
            Event::Back => "back",
            Event::Home => "home",
            Event::Logout => "logout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("'{event}' is not possible on the {view} page")]
    NotAllowed {
        view: &'static str,
        event: &'static str,
    },
    #[error("cannot enter a league with an empty name")]
    EmptyLeague,
}

/// Current page plus the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub view: View,
    #[serde(default)]
    pub user: Option<User>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    /// Fresh session on the welcome page with nobody logged in
    pub fn new() -> Self {
        Session {
            view: View::Welcome,
            user: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// League whose leaderboard or score form is open
    pub fn current_league(&self) -> Option<&str> {
        match &self.view {
            View::Leaderboard { league } | View::AddScore { league } => Some(league),
            _ => None,
        }
    }

    /// Landing page for the current login state
    fn home(&self) -> View {
        if self.is_logged_in() {
            View::TournamentList
        } else {
            View::Welcome
        }
    }

    fn to(&self, view: View) -> Session {
        Session {
            view,
            user: self.user.clone(),
        }
    }

    fn logged_in_as(user: User) -> Session {
        Session {
            view: View::TournamentList,
            user: Some(user),
        }
    }

    /// Apply `event`, returning the next session. The current session is left as is.
    pub fn apply(&self, event: Event) -> Result<Session, TransitionError> {
        let not_allowed = |event: &Event| TransitionError::NotAllowed {
            view: self.view.name(),
            event: event.name(),
        };

        let next = match (&self.view, event) {
            (_, Event::Logout) if self.is_logged_in() || self.view == View::AllUsers => {
                Session::new()
            }
            (
                View::AllUsers
                | View::TournamentList
                | View::Leaderboard { .. }
                | View::AddScore { .. },
                Event::Home,
            ) => self.to(self.home()),

            (View::Welcome | View::Login, Event::ShowSignup) => self.to(View::Signup),
            (View::Welcome | View::Signup, Event::ShowLogin) => self.to(View::Login),
            (View::Welcome | View::Login | View::TournamentList, Event::ShowAllUsers) => {
                self.to(View::AllUsers)
            }
            (View::Welcome | View::Login, Event::LoginSucceeded(user)) => {
                Session::logged_in_as(user)
            }
            (View::Welcome | View::Login, Event::LoginFailed) => self.to(View::Signup),
            (View::Signup, Event::SignupSucceeded(user)) => Session::logged_in_as(user),
            (View::Signup, Event::SignupRejected) => self.to(View::Login),

            (View::AllUsers, Event::Back) => {
                if self.is_logged_in() {
                    self.to(View::TournamentList)
                } else {
                    self.to(View::Login)
                }
            }

            (View::TournamentList, Event::EnterLeague(league)) => {
                if league.trim().is_empty() {
                    return Err(TransitionError::EmptyLeague);
                }
                self.to(View::Leaderboard { league })
            }
            (View::Leaderboard { .. }, Event::Back) => self.to(View::TournamentList),
            (View::Leaderboard { league }, Event::OpenAddScore) => self.to(View::AddScore {
                league: league.clone(),
            }),
            (View::AddScore { league }, Event::Back | Event::ScoreSaved) => {
                self.to(View::Leaderboard {
                    league: league.clone(),
                })
            }

            (_, event) => return Err(not_allowed(&event)),
        };

        debug_assert!(!next.view.requires_user() || next.is_logged_in());
        Ok(next)
    }
}
