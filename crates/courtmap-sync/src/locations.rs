//! Location store — the `locations` collection and its embedded photo
//! sub-resource manager.

use std::sync::Arc;

use chrono::Utc;
use courtmap_core::{
  Error, Result,
  authz::is_owner,
  backend::{ContentStore, DocumentStore},
  document::{Document, Fields, Filter, OrderBy, collections},
  location::{Location, LocationPatch, NewLocation, Photo},
};
use futures::future;

use crate::{
  session::SessionHandle,
  state::{SharedState, StoreState},
};

/// One file handed to [`LocationStore::upload_photos`].
#[derive(Debug, Clone)]
pub struct PhotoFile {
  pub file_name: String,
  pub bytes:     Vec<u8>,
}

pub struct LocationStore<D, C> {
  docs:    Arc<D>,
  content: Arc<C>,
  session: SessionHandle,
  state:   SharedState<Location>,
}

impl<D: DocumentStore, C: ContentStore> LocationStore<D, C> {
  pub fn new(docs: Arc<D>, content: Arc<C>, session: SessionHandle) -> Self {
    Self {
      docs,
      content,
      session,
      state: SharedState::new(),
    }
  }

  pub fn state(&self) -> StoreState<Location> {
    self.state.snapshot()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Replace the result set with the full collection, newest first.
  /// Read failures land in the error slot; prior items are kept.
  pub async fn refresh(&self) {
    self.state.begin();
    match self.fetch(Vec::new()).await {
      Ok(items) => self.state.set_items(items),
      Err(e) => {
        tracing::error!(error = %e, "fetching locations failed");
        self.state.set_error(e.to_string());
      }
    }
    self.state.finish();
  }

  /// Replace the result set with the acting user's own locations.
  pub async fn refresh_mine(&self) {
    self.state.begin();
    let result = match self.session.require_identity() {
      Ok(identity) => {
        self
          .fetch(vec![Filter::equals("createdBy", identity.uid)])
          .await
      }
      Err(e) => Err(e),
    };
    match result {
      Ok(items) => self.state.set_items(items),
      Err(e) => {
        tracing::error!(error = %e, "fetching own locations failed");
        self.state.set_error(e.to_string());
      }
    }
    self.state.finish();
  }

  async fn fetch(&self, filters: Vec<Filter>) -> Result<Vec<Location>> {
    let docs = self
      .docs
      .query(
        collections::LOCATIONS,
        &filters,
        Some(OrderBy::desc("createdAt")),
      )
      .await
      .map_err(Error::remote)?;
    docs.iter().map(Document::deserialize).collect()
  }

  /// Fetch one location directly. Does not touch the store state.
  pub async fn get(&self, id: &str) -> Result<Location> {
    let doc = self
      .docs
      .get(collections::LOCATIONS, id)
      .await
      .map_err(Error::remote)?
      .ok_or_else(|| Error::NotFound(format!("location {id}")))?;
    doc.deserialize()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Create a location and return its new id.
  ///
  /// The result set is deliberately not refreshed — creation flows navigate
  /// away, and the next view re-reads its own list.
  pub async fn add(&self, input: NewLocation) -> Result<String> {
    self.state.begin();
    let result = self.try_add(input).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    result
  }

  async fn try_add(&self, input: NewLocation) -> Result<String> {
    let identity = self.session.require_identity()?;
    if input.number_of_courts == 0 {
      return Err(Error::Validation(
        "numberOfCourts must be at least 1".into(),
      ));
    }

    let fields = Fields::from_serialize(&input)?
      .set("photos", serde_json::json!([]))
      .set("createdBy", identity.uid)
      .server_time("createdAt")
      .server_time("updatedAt");

    let id = self
      .docs
      .insert(collections::LOCATIONS, fields)
      .await
      .map_err(Error::remote)?;
    tracing::debug!(%id, "location created");
    Ok(id)
  }

  /// Merge a partial update into an owned location, then refresh the
  /// owner-scoped result set.
  pub async fn update(&self, id: &str, patch: LocationPatch) -> Result<()> {
    self.state.begin();
    let result = self.try_update(id, patch).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.refresh_mine().await;
    }
    result
  }

  async fn try_update(&self, id: &str, patch: LocationPatch) -> Result<()> {
    let identity = self.session.require_identity()?;
    if patch.is_empty() {
      return Err(Error::Validation("nothing to update".into()));
    }
    if patch.number_of_courts == Some(0) {
      return Err(Error::Validation(
        "numberOfCourts must be at least 1".into(),
      ));
    }

    let current = self.get(id).await?;
    if !is_owner(Some(&identity), &current.created_by) {
      return Err(Error::Unauthorized(
        "only the creator can edit a location".into(),
      ));
    }

    let fields = Fields::from_serialize(&patch)?.server_time("updatedAt");
    self
      .docs
      .merge(collections::LOCATIONS, id, fields)
      .await
      .map_err(Error::remote)
  }

  /// Delete an owned location. On success the id is filtered out of the
  /// local result set directly; nothing in a location row depends on
  /// server-computed values, so the cheap removal is safe.
  pub async fn remove(&self, id: &str) -> Result<()> {
    self.state.begin();
    let result = self.try_remove(id).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.state.retain(|location| location.id != id);
    }
    result
  }

  async fn try_remove(&self, id: &str) -> Result<()> {
    let identity = self.session.require_identity()?;
    let current = self.get(id).await?;
    if !is_owner(Some(&identity), &current.created_by) {
      return Err(Error::Unauthorized(
        "only the creator can delete a location".into(),
      ));
    }
    self
      .docs
      .remove(collections::LOCATIONS, id)
      .await
      .map_err(Error::remote)?;
    tracing::debug!(id, "location removed");
    Ok(())
  }

  // ── Photos ────────────────────────────────────────────────────────────────

  /// Upload photos and append them to the location's sequence, then refresh
  /// the owner-scoped result set.
  ///
  /// Uploads run concurrently and are joined before anything is written
  /// back: if any single upload fails, no Photo record is appended. The
  /// sequence write is a read-modify-write without versioning — two clients
  /// editing the same location's photos race, last writer wins.
  pub async fn upload_photos(
    &self,
    location_id: &str,
    files: Vec<PhotoFile>,
  ) -> Result<()> {
    self.state.begin();
    let result = self.try_upload_photos(location_id, files).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    if result.is_ok() {
      self.refresh_mine().await;
    }
    result
  }

  async fn try_upload_photos(
    &self,
    location_id: &str,
    files: Vec<PhotoFile>,
  ) -> Result<()> {
    let identity = self.session.require_identity()?;
    if files.is_empty() {
      return Ok(());
    }

    let current = self.get(location_id).await?;

    // Collision-resistant blob names: upload instant plus original name.
    let stamp = Utc::now().timestamp_millis();
    let uploads = files.into_iter().map(|file| {
      let path = format!("locations/{location_id}/{stamp}-{}", file.file_name);
      let uploaded_by = identity.uid.clone();
      let content = Arc::clone(&self.content);
      async move {
        let handle = content.put(&path, file.bytes).await.map_err(Error::remote)?;
        let url = content.public_url(&handle).await.map_err(Error::remote)?;
        // Client clock: the server-time sentinel cannot reach inside an
        // array value.
        Ok::<_, Error>(Photo {
          url,
          uploaded_by,
          uploaded_at: Utc::now(),
        })
      }
    });
    let new_photos = future::try_join_all(uploads).await?;

    let mut photos = current.photos;
    photos.extend(new_photos);
    tracing::debug!(location_id, count = photos.len(), "photo sequence grown");
    self.write_photos(location_id, &photos).await
  }

  /// Remove the photo at `index`. Only its uploader may do so.
  pub async fn remove_photo_at(
    &self,
    location_id: &str,
    index: usize,
  ) -> Result<()> {
    self.state.begin();
    let result = self.try_remove_photo_at(location_id, index).await;
    if let Err(e) = &result {
      self.state.set_error(e.to_string());
    }
    self.state.finish();
    result
  }

  async fn try_remove_photo_at(
    &self,
    location_id: &str,
    index: usize,
  ) -> Result<()> {
    let identity = self.session.require_identity()?;
    let current = self.get(location_id).await?;

    match current.photos.get(index) {
      None => {
        return Err(Error::NotFound(format!(
          "photo {index} on location {location_id}"
        )));
      }
      Some(photo) if !is_owner(Some(&identity), &photo.uploaded_by) => {
        return Err(Error::Unauthorized(
          "only the uploader can remove a photo".into(),
        ));
      }
      Some(_) => {}
    }

    let mut photos = current.photos;
    photos.remove(index);
    self.write_photos(location_id, &photos).await
  }

  async fn write_photos(&self, location_id: &str, photos: &[Photo]) -> Result<()> {
    let fields = Fields::new()
      .set("photos", serde_json::to_value(photos)?)
      .server_time("updatedAt");
    self
      .docs
      .merge(collections::LOCATIONS, location_id, fields)
      .await
      .map_err(Error::remote)
  }
}
