//! Client-side routes

pub mod guard;

use std::fmt;
use std::str::FromStr;

use crate::errors::DashboardError;

/// A page of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,

    /// Deployment schedules, also the landing page
    Schedule,

    /// Release notes
    Updates,

    Reviews,
}

impl Route {
    /// Landing page after login
    pub const HOME: Route = Route::Schedule;

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Schedule => "/schedule",
            Route::Updates => "/updates",
            Route::Reviews => "/reviews",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Schedule => "Deployment Schedule",
            Route::Updates => "Release Updates",
            Route::Reviews => "Reviews",
        }
    }

    /// Pages that need an authenticated session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// Pages listed in the navigation bar, in display order
    pub fn navigation() -> [Route; 3] {
        [Route::Schedule, Route::Updates, Route::Reviews]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match path {
            "/" | "" | "/schedule" => Ok(Route::Schedule),
            "/updates" => Ok(Route::Updates),
            "/reviews" => Ok(Route::Reviews),
            "/login" => Ok(Route::Login),
            "/register" => Ok(Route::Register),
            other => Err(DashboardError::NotFound(format!("No page at {}", other))),
        }
    }
}
