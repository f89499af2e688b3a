//! Route guard
//!
//! Nothing protected is shown until the session has resolved. Anonymous
//! visitors are sent to the login page; there is exactly one session check
//! per load and a failed check counts as "no session".

use tracing::debug;

use crate::authn::session::{Session, SessionState};
use crate::routes::Route;

/// What to show for a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving, render a neutral placeholder
    Placeholder,

    Redirect(Route),

    Render(Route),
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn decide(route: Route, state: &SessionState) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Render(route);
        }

        match state {
            SessionState::Unknown => GuardDecision::Placeholder,
            SessionState::Anonymous => GuardDecision::Redirect(Route::Login),
            SessionState::Authenticated(_) => GuardDecision::Render(route),
        }
    }

    /// Wait for the session to leave `Unknown`, then decide
    pub async fn resolve(route: Route, session: &Session) -> GuardDecision {
        let state = session.wait_resolved().await;
        let decision = Self::decide(route, &state);
        debug!("Guard decision for {}: {:?}", route, decision);
        decision
    }
}
