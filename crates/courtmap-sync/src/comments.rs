//! Comment store — the `comments` collection, scoped per location.

use std::sync::Arc;

use courtmap_core::{
  Error, Result,
  backend::DocumentStore,
  comment::{Comment, NewComment},
  document::{Document, Fields, Filter, OrderBy, collections},
};

use crate::{
  session::SessionHandle,
  state::{SharedState, StoreState},
};

pub struct CommentStore<D> {
  docs:    Arc<D>,
  session: SessionHandle,
  state:   SharedState<Comment>,
}

impl<D: DocumentStore> CommentStore<D> {
  pub fn new(docs: Arc<D>, session: SessionHandle) -> Self {
    Self {
      docs,
      session,
      state: SharedState::new(),
    }
  }

  pub fn state(&self) -> StoreState<Comment> {
    self.state.snapshot()
  }

  /// Replace the result set with one location's comments, newest first.
  /// Read failures land in the error slot; prior items are kept.
  pub async fn refresh_for_location(&self, location_id: &str) {
    self.state.begin();
    match self.fetch(location_id).await {
      Ok(items) => self.state.set_items(items),
      Err(e) => {
        tracing::error!(error = %e, location_id, "fetching comments failed");
        self.state.set_error(e.to_string());
      }
    }
    self.state.finish();
  }

  async fn fetch(&self, location_id: &str) -> Result<Vec<Comment>> {
    let filters = vec![Filter::equals("locationId", location_id)];
    let docs = self
      .docs
      .query(
        collections::COMMENTS,
        &filters,
        Some(OrderBy::desc("createdAt")),
      )
      .await
      .map_err(Error::remote)?;
    docs.iter().map(Document::deserialize).collect()
  }

  /// Add a comment, then re-read the location's comments.
  pub async fn add(&self, location_id: &str, input: NewComment) -> Result<()> {
    self.state.begin();
    let result = self.try_add(location_id, input).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.refresh_for_location(location_id).await;
    }
    result
  }

  async fn try_add(&self, location_id: &str, input: NewComment) -> Result<()> {
    let identity = self.session.require_identity()?;
    if input.text.trim().is_empty() {
      return Err(Error::Validation("comment text is empty".into()));
    }

    let display_name = if identity.display_name.is_empty() {
      "Anonymous".to_owned()
    } else {
      identity.display_name
    };
    let fields = Fields::new()
      .set("locationId", location_id)
      .set("userId", identity.uid)
      .set("userDisplayName", display_name)
      .set("text", input.text)
      .server_time("createdAt");

    self
      .docs
      .insert(collections::COMMENTS, fields)
      .await
      .map_err(Error::remote)?;
    Ok(())
  }

  /// Delete a comment, then re-read the location's comments.
  ///
  /// No ownership check: any signed-in user may delete any comment.
  pub async fn remove(&self, comment_id: &str, location_id: &str) -> Result<()> {
    self.state.begin();
    let result = self.try_remove(comment_id).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.refresh_for_location(location_id).await;
    }
    result
  }

  async fn try_remove(&self, comment_id: &str) -> Result<()> {
    self.session.require_identity()?;
    self
      .docs
      .remove(collections::COMMENTS, comment_id)
      .await
      .map_err(Error::remote)
  }
}
