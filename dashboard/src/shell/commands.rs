//! Command dispatch
//!
//! Every command returns the text to print on stdout. Failures have already
//! been posted as notices by the time an `Err` comes back, so the caller
//! only has to drain the toast queue and pick an exit code.

use std::time::Duration;

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::app::state::AppState;
use crate::authn::registration::RegistrationForm;
use crate::controller::list::ResourceList;
use crate::controller::notices::Notifier;
use crate::controller::resource::Resource;
use crate::errors::DashboardError;
use crate::models::dates;
use crate::models::release_note::ReleaseNoteForm;
use crate::models::review::ReviewForm;
use crate::models::schedule::{ScheduleForm, ScheduleStatus};
use crate::models::time_slot::TimeSlot;
use crate::routes::guard::{GuardDecision, RouteGuard};
use crate::routes::Route;
use crate::shell::args::CliArgs;
use crate::shell::render;

/// Environment variable read when `--password=` is not given
pub const PASSWORD_ENV: &str = "RELBOARD_PASSWORD";

/// How long `logout` waits for the backend before exiting anyway
const LOGOUT_GRACE: Duration = Duration::from_secs(3);

pub const USAGE: &str = "\
Usage: relboard <command> [--key=value ...]

Session:
  login     --username=<name> [--password=<secret>]
  register  --name=<full name> --username=<name> [--password=<secret>] [--confirm=<secret>]
  logout
  whoami

Pages:
  schedules list | slots
  schedules add    --app= --date=YYYY-MM-DD --slot=HH:00-HH:00 [--status=] [--reason=] [--notes=] [--developers=a,b]
  schedules edit   --id= [same fields as add]
  schedules status --id= --status= [--reason=]
  schedules notify --id=
  schedules delete --id=
  updates list
  updates add      --app= --features= --start=YYYY-MM-DD [--end=YYYY-MM-DD]
  updates edit     --id= [same fields as add]
  updates delete   --id=
  reviews list
  reviews add      --app= --feedback= [--rating=N] [--recommendations=]
  reviews edit     --id= [same fields as add]
  reviews delete   --id=
  overview

Global flags:
  --base-url=<url>  --log-level=<level>  --json-logs
";

/// Run the command described by `args`
pub async fn run(state: &AppState, args: &CliArgs) -> Result<String, DashboardError> {
    let shell = Shell { state, args };
    let command = args.word(0).unwrap_or("help");
    debug!("Running command {:?}", args.words());

    match command {
        "help" => Ok(USAGE.to_string()),
        "login" => shell.login().await,
        "register" => shell.register().await,
        "logout" => shell.logout().await,
        "whoami" => shell.whoami().await,
        "overview" => shell.overview().await,
        "schedules" | "schedule" => shell.schedules().await,
        "updates" => shell.updates().await,
        "reviews" => shell.reviews().await,
        other => Err(shell.reject(DashboardError::ValidationError(format!(
            "Unknown command '{}', see relboard help",
            other
        )))),
    }
}

struct Shell<'a> {
    state: &'a AppState,
    args: &'a CliArgs,
}

impl Shell<'_> {
    fn notifier(&self) -> &(dyn Notifier + 'static) {
        self.state.toasts.as_ref()
    }

    /// Report a problem with the command line itself
    fn reject(&self, err: DashboardError) -> DashboardError {
        self.notifier().error(err.user_message("Invalid command"));
        err
    }

    fn require(&self, key: &str) -> Result<&str, DashboardError> {
        self.args.require(key).map_err(|e| self.reject(e))
    }

    fn password(&self, key: &str) -> Option<SecretString> {
        self.args
            .flag(key)
            .map(str::to_string)
            .or_else(|| std::env::var(PASSWORD_ENV).ok())
            .map(SecretString::from)
    }

    /// Restore the session and run the route guard
    async fn enter(&self, route: Route) -> Result<String, DashboardError> {
        let session = self.state.session.as_ref();
        let (_, decision) = tokio::join!(session.restore(), RouteGuard::resolve(route, session));

        match decision {
            GuardDecision::Render(route) => Ok(render::navigation(Some(route), session.user().as_ref())),
            GuardDecision::Redirect(Route::Login) => {
                self.notifier()
                    .error("Please log in first: relboard login --username=<name>");
                Err(DashboardError::Unauthorized)
            }
            GuardDecision::Redirect(other) => Err(self.reject(DashboardError::ValidationError(format!(
                "Redirected to {}",
                other
            )))),
            GuardDecision::Placeholder => Err(self.reject(DashboardError::ValidationError(
                "Session is still loading".to_string(),
            ))),
        }
    }

    async fn login(&self) -> Result<String, DashboardError> {
        let username = self.require("username")?;
        let password = self
            .password("password")
            .unwrap_or_else(|| SecretString::from(String::new()));

        let outcome = self.state.session.login(username, &password).await;
        if outcome.success {
            let name = self
                .state
                .session
                .user()
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| username.to_string());
            self.notifier().success(format!("Welcome, {}", name));
            Ok(String::new())
        } else {
            let message = outcome.message.unwrap_or_else(|| "Login failed".to_string());
            Err(self.reject(DashboardError::ValidationError(message)))
        }
    }

    async fn register(&self) -> Result<String, DashboardError> {
        let password = self
            .password("password")
            .unwrap_or_else(|| SecretString::from(String::new()));
        let confirm = self
            .args
            .flag("confirm")
            .map(|c| SecretString::from(c.to_string()))
            .unwrap_or_else(|| SecretString::from(password.expose_secret().to_string()));

        let form = RegistrationForm {
            full_name: self.args.flag("name").unwrap_or_default().to_string(),
            username: self.args.flag("username").unwrap_or_default().to_string(),
            password,
            confirm_password: confirm,
        };
        form.validate().map_err(|e| self.reject(e))?;

        let outcome = self
            .state
            .session
            .register(&form.full_name, &form.username, &form.password)
            .await;
        if outcome.success {
            self.notifier().success("Account created");
            Ok(String::new())
        } else {
            let message = outcome
                .message
                .unwrap_or_else(|| "Registration failed".to_string());
            Err(self.reject(DashboardError::ValidationError(message)))
        }
    }

    async fn logout(&self) -> Result<String, DashboardError> {
        if let Some(handle) = self.state.session.logout().await {
            // the process is about to exit, give the backend call a chance
            if tokio::time::timeout(LOGOUT_GRACE, handle).await.is_err() {
                warn!("Backend logout still pending after {:?}", LOGOUT_GRACE);
            }
        }
        self.notifier().info("Logged out");
        Ok(String::new())
    }

    async fn whoami(&self) -> Result<String, DashboardError> {
        let state = self.state.session.restore().await;
        Ok(match state.user() {
            Some(user) => format!("{} ({})\n", user.display_name(), user.username),
            None => "Not logged in\n".to_string(),
        })
    }

    async fn overview(&self) -> Result<String, DashboardError> {
        let mut out = self.enter(Route::HOME).await?;

        let (schedules, updates, reviews) = futures::join!(
            self.state.schedules.refresh(),
            self.state.updates.refresh(),
            self.state.reviews.refresh()
        );

        out.push_str(&render::schedules(&self.state.schedules.items()));
        out.push('\n');
        out.push_str(&render::release_notes(&self.state.updates.items()));
        out.push('\n');
        out.push_str(&render::reviews(
            &self.state.reviews.items(),
            self.state.reviews.rules().rating_scale.max,
        ));

        schedules?;
        updates?;
        reviews?;
        Ok(out)
    }

    async fn schedules(&self) -> Result<String, DashboardError> {
        let action = self.args.word(1).unwrap_or("list");
        if action == "slots" {
            return Ok(render::time_slots());
        }

        let mut out = self.enter(Route::Schedule).await?;
        let list = &self.state.schedules;

        match action {
            "list" => {}
            "add" => {
                let changes = self.schedule_changes()?;
                list.open_create();
                list.edit_form(changes)?;
                list.submit().await?;
            }
            "edit" => {
                let changes = self.schedule_changes()?;
                self.open_edit(list).await?;
                list.edit_form(changes)?;
                list.submit().await?;
            }
            "delete" => self.delete(list).await?,
            "status" => {
                let id = self.require("id")?;
                let status = self.status_flag()?.ok_or_else(|| {
                    self.reject(DashboardError::ValidationError(
                        "--status=<status> is required".to_string(),
                    ))
                })?;
                list.change_status(id, status, self.args.flag("reason")).await?;
                return Ok(out + &self.schedule_detail(id));
            }
            "notify" => {
                let id = self.require("id")?;
                list.resend_notification(id).await?;
                let _ = list.refresh().await;
                return Ok(out + &self.schedule_detail(id));
            }
            other => return Err(self.unknown_action("schedules", other)),
        }

        self.show(list, &mut out, render::schedules).await?;
        Ok(out)
    }

    async fn updates(&self) -> Result<String, DashboardError> {
        let action = self.args.word(1).unwrap_or("list");
        let mut out = self.enter(Route::Updates).await?;
        let list = &self.state.updates;

        match action {
            "list" => {}
            "add" => {
                let changes = self.release_note_changes()?;
                list.open_create();
                list.edit_form(changes)?;
                list.submit().await?;
            }
            "edit" => {
                let changes = self.release_note_changes()?;
                self.open_edit(list).await?;
                list.edit_form(changes)?;
                list.submit().await?;
            }
            "delete" => self.delete(list).await?,
            other => return Err(self.unknown_action("updates", other)),
        }

        self.show(list, &mut out, render::release_notes).await?;
        Ok(out)
    }

    async fn reviews(&self) -> Result<String, DashboardError> {
        let action = self.args.word(1).unwrap_or("list");
        let mut out = self.enter(Route::Reviews).await?;
        let list = &self.state.reviews;

        match action {
            "list" => {}
            "add" => {
                let changes = self.review_changes()?;
                list.open_create();
                list.edit_form(changes)?;
                list.submit().await?;
            }
            "edit" => {
                let changes = self.review_changes()?;
                self.open_edit(list).await?;
                list.edit_form(changes)?;
                list.submit().await?;
            }
            "delete" => self.delete(list).await?,
            other => return Err(self.unknown_action("reviews", other)),
        }

        let max = list.rules().rating_scale.max;
        self.show(list, &mut out, |records| render::reviews(records, max))
            .await?;
        Ok(out)
    }

    fn unknown_action(&self, page: &str, action: &str) -> DashboardError {
        self.reject(DashboardError::ValidationError(format!(
            "Unknown action '{}' for {}",
            action, page
        )))
    }

    /// Render the list, loading it first unless a mutation already did
    async fn show<R, F>(&self, list: &ResourceList<R>, out: &mut String, render: F) -> Result<(), DashboardError>
    where
        R: Resource,
        F: Fn(&[R::Record]) -> String,
    {
        if list.items().is_empty() {
            list.refresh().await?;
        }
        out.push_str(&render(&list.items()));
        Ok(())
    }

    async fn open_edit<R: Resource>(&self, list: &ResourceList<R>) -> Result<(), DashboardError> {
        let id = self.require("id")?;
        list.refresh().await?;
        let record = list.find(id).ok_or_else(|| {
            self.reject(DashboardError::NotFound(format!("No {} with id {}", R::SINGULAR, id)))
        })?;
        list.open_edit(&record);
        Ok(())
    }

    async fn delete<R: Resource>(&self, list: &ResourceList<R>) -> Result<(), DashboardError> {
        let id = self.require("id")?;
        list.refresh().await?;
        list.remove(id).await
    }

    fn schedule_detail(&self, id: &str) -> String {
        self.state
            .schedules
            .find(id)
            .map(|schedule| render::schedule_detail(&schedule))
            .unwrap_or_default()
    }

    fn date_flag(&self, key: &str) -> Result<Option<NaiveDate>, DashboardError> {
        self.args
            .flag(key)
            .map(|raw| {
                dates::parse(raw).map_err(|e| {
                    self.reject(DashboardError::ValidationError(format!("--{}: {}", key, e)))
                })
            })
            .transpose()
    }

    fn status_flag(&self) -> Result<Option<ScheduleStatus>, DashboardError> {
        self.args
            .flag("status")
            .map(|raw| {
                raw.parse::<ScheduleStatus>()
                    .map_err(|e| self.reject(DashboardError::ValidationError(e)))
            })
            .transpose()
    }

    fn schedule_changes(&self) -> Result<impl FnOnce(&mut ScheduleForm), DashboardError> {
        let app = self.args.flag("app").map(str::to_string);
        let date = self.date_flag("date")?;
        let slot = self
            .args
            .flag("slot")
            .map(|raw| {
                raw.parse::<TimeSlot>()
                    .map_err(|e| self.reject(DashboardError::ValidationError(e)))
            })
            .transpose()?;
        let status = self.status_flag()?;
        let reason = self.args.flag("reason").map(str::to_string);
        let notes = self.args.flag("notes").map(str::to_string);
        let developers = self.args.list("developers");

        Ok(move |form: &mut ScheduleForm| {
            if let Some(app) = app {
                form.app_name = app;
            }
            if let Some(date) = date {
                form.deployment_date = date;
            }
            if slot.is_some() {
                form.time_slot = slot;
            }
            if let Some(status) = status {
                form.status = status;
            }
            if let Some(reason) = reason {
                form.failure_reason = reason;
            }
            if let Some(notes) = notes {
                form.notes = notes;
            }
            if let Some(developers) = developers {
                form.developers = developers;
            }
        })
    }

    fn release_note_changes(&self) -> Result<impl FnOnce(&mut ReleaseNoteForm), DashboardError> {
        let app = self.args.flag("app").map(str::to_string);
        let features = self.args.flag("features").map(str::to_string);
        let start = self.date_flag("start")?;
        let end = self.date_flag("end")?;

        Ok(move |form: &mut ReleaseNoteForm| {
            if let Some(app) = app {
                form.app_name = app;
            }
            if let Some(features) = features {
                form.features_added = features;
            }
            if let Some(start) = start {
                form.start_date = start;
                // single-day note unless an end date is given
                if end.is_none() && form.end_date < start {
                    form.end_date = start;
                }
            }
            if let Some(end) = end {
                form.end_date = end;
            }
        })
    }

    fn review_changes(&self) -> Result<impl FnOnce(&mut ReviewForm), DashboardError> {
        let app = self.args.flag("app").map(str::to_string);
        let feedback = self.args.flag("feedback").map(str::to_string);
        let recommendations = self.args.flag("recommendations").map(str::to_string);
        let rating = self
            .args
            .flag("rating")
            .map(|raw| {
                raw.trim().parse::<u8>().map_err(|_| {
                    self.reject(DashboardError::ValidationError(format!(
                        "Rating must be a whole number, got '{}'",
                        raw
                    )))
                })
            })
            .transpose()?;

        Ok(move |form: &mut ReviewForm| {
            if let Some(app) = app {
                form.app_name = app;
            }
            if let Some(feedback) = feedback {
                form.feedback = feedback;
            }
            if let Some(rating) = rating {
                form.rating = rating;
            }
            if let Some(recommendations) = recommendations {
                form.recommendations = recommendations;
            }
        })
    }
}
