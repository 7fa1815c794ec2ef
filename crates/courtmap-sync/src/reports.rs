//! Report store — the `reports` collection and its review state machine.

use std::sync::Arc;

use courtmap_core::{
  Error, Result,
  authz::AdminPolicy,
  backend::DocumentStore,
  document::{Document, Fields, OrderBy, collections},
  identity::Identity,
  report::{NewReport, Report, ReportStatus},
};

use crate::{
  session::SessionHandle,
  state::{SharedState, StoreState},
};

pub struct ReportStore<D> {
  docs:    Arc<D>,
  session: SessionHandle,
  policy:  AdminPolicy,
  state:   SharedState<Report>,
}

impl<D: DocumentStore> ReportStore<D> {
  pub fn new(docs: Arc<D>, session: SessionHandle, policy: AdminPolicy) -> Self {
    Self {
      docs,
      session,
      policy,
      state: SharedState::new(),
    }
  }

  pub fn state(&self) -> StoreState<Report> {
    self.state.snapshot()
  }

  /// Whether the current identity is the administrator. Evaluated fresh on
  /// every call — the identity can change between calls.
  pub fn is_admin(&self) -> bool {
    self.policy.is_admin(self.session.identity().as_ref())
  }

  /// Replace the result set with all reports, newest first. Admin only: for
  /// anyone else the error slot is set and no query is issued.
  pub async fn refresh(&self) {
    if !self.is_admin() {
      self.state.set_error(
        Error::Unauthorized("reports are admin-only".into()).to_string(),
      );
      return;
    }

    self.state.begin();
    match self.fetch().await {
      Ok(items) => self.state.set_items(items),
      Err(e) => {
        tracing::error!(error = %e, "fetching reports failed");
        self.state.set_error(e.to_string());
      }
    }
    self.state.finish();
  }

  async fn fetch(&self) -> Result<Vec<Report>> {
    let docs = self
      .docs
      .query(collections::REPORTS, &[], Some(OrderBy::desc("createdAt")))
      .await
      .map_err(Error::remote)?;
    docs.iter().map(Document::deserialize).collect()
  }

  /// File a report against a location. Any signed-in user; the report
  /// starts out pending. The admin-only result set is not refreshed here —
  /// the reporter cannot read it.
  pub async fn add(&self, input: NewReport) -> Result<()> {
    self.state.begin();
    let result = self.try_add(input).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    result
  }

  async fn try_add(&self, input: NewReport) -> Result<()> {
    let identity = self.session.require_identity()?;

    let fields = Fields::from_serialize(&input)?
      .set("reportedBy", identity.uid)
      .set("reporterEmail", identity.email)
      .set("status", ReportStatus::Pending.as_str())
      .server_time("createdAt");

    self
      .docs
      .insert(collections::REPORTS, fields)
      .await
      .map_err(Error::remote)?;
    Ok(())
  }

  /// Resolve or dismiss a pending report, then re-read the list.
  ///
  /// Both target statuses are terminal; a transition out of a terminal
  /// status is rejected with [`Error::ReportClosed`].
  pub async fn set_status(&self, id: &str, status: ReportStatus) -> Result<()> {
    self.state.begin();
    let result = self.try_set_status(id, status).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.refresh().await;
    }
    result
  }

  async fn try_set_status(&self, id: &str, status: ReportStatus) -> Result<()> {
    self.require_admin()?;
    if !status.is_terminal() {
      return Err(Error::Validation(
        "a report cannot be set back to pending".into(),
      ));
    }

    let current = self.get(id).await?;
    if current.status.is_terminal() {
      return Err(Error::ReportClosed(id.to_owned(), current.status));
    }

    let fields = Fields::new().set("status", status.as_str());
    self
      .docs
      .merge(collections::REPORTS, id, fields)
      .await
      .map_err(Error::remote)?;
    tracing::debug!(id, %status, "report status updated");
    Ok(())
  }

  /// Delete a report, then re-read the list. Admin only.
  pub async fn remove(&self, id: &str) -> Result<()> {
    self.state.begin();
    let result = self.try_remove(id).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.refresh().await;
    }
    result
  }

  async fn try_remove(&self, id: &str) -> Result<()> {
    self.require_admin()?;
    self
      .docs
      .remove(collections::REPORTS, id)
      .await
      .map_err(Error::remote)
  }

  async fn get(&self, id: &str) -> Result<Report> {
    let doc = self
      .docs
      .get(collections::REPORTS, id)
      .await
      .map_err(Error::remote)?
      .ok_or_else(|| Error::NotFound(format!("report {id}")))?;
    doc.deserialize()
  }

  fn require_admin(&self) -> Result<Identity> {
    let identity = self.session.require_identity()?;
    if !self.policy.is_admin(Some(&identity)) {
      return Err(Error::Unauthorized("reports are admin-only".into()));
    }
    Ok(identity)
  }
}
