//! Navigation guard — gates every route transition on session readiness and
//! authorization.

use courtmap_core::authz::AdminPolicy;

use crate::session::SessionHandle;

/// The application's routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Home,
  CreateLocation,
  MyLocations,
  LocationDetails,
  AdminReports,
}

impl Route {
  /// Everything except the home page requires a signed-in session.
  pub fn requires_auth(&self) -> bool {
    !matches!(self, Self::Home)
  }

  /// The report-review page is restricted to the administrator.
  pub fn requires_admin(&self) -> bool {
    matches!(self, Self::AdminReports)
  }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Home => "home",
      Self::CreateLocation => "create-location",
      Self::MyLocations => "my-locations",
      Self::LocationDetails => "location-details",
      Self::AdminReports => "admin-reports",
    }
  }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  Proceed,
  Redirect(Route),
}

pub struct NavigationGuard {
  session: SessionHandle,
  policy:  AdminPolicy,
}

impl NavigationGuard {
  pub fn new(session: SessionHandle, policy: AdminPolicy) -> Self {
    Self { session, policy }
  }

  /// Run before a route transition.
  ///
  /// Suspends until the session is ready — the wait subscribes per call and
  /// unsubscribes as soon as it resolves. After readiness: unauthenticated
  /// sessions are redirected home from auth-required routes, and non-admins
  /// are redirected home from the report-review route regardless of
  /// authentication state.
  pub async fn check(&self, to: Route) -> Verdict {
    self.session.wait_ready().await;

    let identity = self.session.identity();
    if to.requires_auth() && identity.is_none() {
      tracing::debug!(route = to.name(), "redirecting unauthenticated session");
      return Verdict::Redirect(Route::Home);
    }
    if to.requires_admin() && !self.policy.is_admin(identity.as_ref()) {
      tracing::debug!(route = to.name(), "redirecting non-admin session");
      return Verdict::Redirect(Route::Home);
    }
    Verdict::Proceed
  }
}
