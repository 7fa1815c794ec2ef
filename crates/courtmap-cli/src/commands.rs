//! Subcommand definitions and handlers.
//!
//! Every command maps onto one of the application's routes and is gated
//! through the navigation guard before it dispatches against the stores.

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::Subcommand;
use courtmap_core::{
  comment::NewComment,
  location::{Coordinates, Location, LocationPatch, NewLocation},
  report::{NewReport, ReportStatus},
};
use courtmap_sync::{PhotoFile, Route, Verdict};

use crate::backend::Backend;

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Sign in as the configured local identity.
  SignIn,
  /// Sign out and clear the persisted session.
  SignOut,
  /// Show the current session state.
  Whoami,
  /// Browse and manage locations.
  #[command(subcommand)]
  Locations(LocationsCmd),
  /// Manage a location's photos.
  #[command(subcommand)]
  Photos(PhotosCmd),
  /// Read and write comments on a location.
  #[command(subcommand)]
  Comments(CommentsCmd),
  /// File and review reports.
  #[command(subcommand)]
  Reports(ReportsCmd),
}

#[derive(Debug, Subcommand)]
pub enum LocationsCmd {
  /// List every location.
  List,
  /// List the locations you created.
  Mine,
  /// Show one location in full.
  Show { id: String },
  /// Create a location.
  Add {
    #[arg(long)]
    name:        String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    address:     String,
    #[arg(long, default_value_t = 1)]
    courts:      u32,
    #[arg(long, default_value = "asphalt")]
    surface:     String,
    #[arg(long)]
    indoor:      bool,
    #[arg(long, allow_hyphen_values = true)]
    lat:         f64,
    #[arg(long, allow_hyphen_values = true)]
    lng:         f64,
  },
  /// Update fields on a location you created.
  Update {
    id:          String,
    #[arg(long)]
    name:        Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    address:     Option<String>,
    #[arg(long)]
    courts:      Option<u32>,
    #[arg(long)]
    surface:     Option<String>,
    #[arg(long)]
    indoor:      Option<bool>,
  },
  /// Delete a location you created.
  Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum PhotosCmd {
  /// Upload photo files to a location.
  Add {
    location_id: String,
    #[arg(required = true)]
    files:       Vec<PathBuf>,
  },
  /// Remove the photo at a position (0-based).
  Rm { location_id: String, index: usize },
}

#[derive(Debug, Subcommand)]
pub enum CommentsCmd {
  /// List a location's comments, newest first.
  List { location_id: String },
  /// Comment on a location.
  Add { location_id: String, text: String },
  /// Delete a comment.
  Rm {
    comment_id: String,
    #[arg(long)]
    location:   String,
  },
}

#[derive(Debug, Subcommand)]
pub enum ReportsCmd {
  /// List all reports, newest first (admin only).
  List,
  /// Report a location.
  Add {
    location_id: String,
    #[arg(long)]
    reason:      String,
  },
  /// Mark a pending report resolved (admin only).
  Resolve { id: String },
  /// Mark a pending report dismissed (admin only).
  Dismiss { id: String },
  /// Delete a report (admin only).
  Rm { id: String },
}

impl Command {
  /// The route this command lands on, for the navigation guard.
  fn route(&self) -> Route {
    match self {
      Command::SignIn | Command::SignOut | Command::Whoami => Route::Home,
      Command::Locations(LocationsCmd::List) => Route::Home,
      Command::Locations(LocationsCmd::Add { .. }) => Route::CreateLocation,
      Command::Locations(
        LocationsCmd::Mine
        | LocationsCmd::Update { .. }
        | LocationsCmd::Delete { .. },
      ) => Route::MyLocations,
      Command::Locations(LocationsCmd::Show { .. }) => Route::LocationDetails,
      Command::Photos(_) | Command::Comments(_) => Route::LocationDetails,
      Command::Reports(ReportsCmd::Add { .. }) => Route::LocationDetails,
      Command::Reports(_) => Route::AdminReports,
    }
  }
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub async fn dispatch(backend: &Backend, command: Command) -> anyhow::Result<()> {
  match backend.guard().check(command.route()).await {
    Verdict::Proceed => {}
    Verdict::Redirect(to) => {
      let needs = if command.route().requires_admin() {
        "the administrator account"
      } else {
        "a signed-in session"
      };
      println!("redirected to {} — this page needs {needs}", to.name());
      return Ok(());
    }
  }

  match command {
    Command::SignIn => sign_in(backend).await,
    Command::SignOut => {
      backend.session.end_sign_in().await;
      if let Some(error) = backend.session.handle().last_error() {
        bail!("sign-out failed: {error}");
      }
      println!("signed out");
      Ok(())
    }
    Command::Whoami => {
      let session = backend.session.handle().snapshot();
      match session.identity {
        Some(identity) => {
          println!("{} <{}> (uid {})", identity.display_name, identity.email, identity.uid);
        }
        None => println!("not signed in"),
      }
      Ok(())
    }
    Command::Locations(cmd) => locations(backend, cmd).await,
    Command::Photos(cmd) => photos(backend, cmd).await,
    Command::Comments(cmd) => comments(backend, cmd).await,
    Command::Reports(cmd) => reports(backend, cmd).await,
  }
}

async fn sign_in(backend: &Backend) -> anyhow::Result<()> {
  backend.session.begin_sign_in().await;
  let handle = backend.session.handle();
  match handle.identity() {
    Some(identity) => {
      println!("signed in as {} <{}>", identity.display_name, identity.email);
      Ok(())
    }
    None => bail!(
      "sign-in failed: {}",
      handle.last_error().unwrap_or_else(|| "unknown error".into())
    ),
  }
}

// ─── Locations ────────────────────────────────────────────────────────────────

fn print_location_row(location: &Location) {
  let setting = if location.is_indoor { "indoor" } else { "outdoor" };
  println!(
    "{}  {}  ({} courts, {}, {})",
    location.id, location.name, location.number_of_courts, location.surface_type, setting
  );
}

async fn locations(backend: &Backend, cmd: LocationsCmd) -> anyhow::Result<()> {
  let store = &backend.locations;
  match cmd {
    LocationsCmd::List => {
      store.refresh().await;
      let state = store.state();
      if let Some(error) = state.error {
        bail!("failed to load locations: {error}");
      }
      for location in &state.items {
        print_location_row(location);
      }
      Ok(())
    }
    LocationsCmd::Mine => {
      store.refresh_mine().await;
      let state = store.state();
      if let Some(error) = state.error {
        bail!("failed to load your locations: {error}");
      }
      for location in &state.items {
        print_location_row(location);
      }
      Ok(())
    }
    LocationsCmd::Show { id } => {
      let location = store.get(&id).await?;
      print_location_row(&location);
      println!("  {}", location.address);
      if !location.description.is_empty() {
        println!("  {}", location.description);
      }
      println!(
        "  at ({}, {})",
        location.coordinates.lat, location.coordinates.lng
      );
      for (index, photo) in location.photos.iter().enumerate() {
        println!("  photo {index}: {}", photo.url);
      }
      Ok(())
    }
    LocationsCmd::Add {
      name,
      description,
      address,
      courts,
      surface,
      indoor,
      lat,
      lng,
    } => {
      let id = store
        .add(NewLocation {
          name,
          description,
          address,
          number_of_courts: courts,
          surface_type: surface,
          is_indoor: indoor,
          coordinates: Coordinates { lat, lng },
        })
        .await?;
      println!("created location {id}");
      Ok(())
    }
    LocationsCmd::Update {
      id,
      name,
      description,
      address,
      courts,
      surface,
      indoor,
    } => {
      store
        .update(&id, LocationPatch {
          name,
          description,
          address,
          number_of_courts: courts,
          surface_type: surface,
          is_indoor: indoor,
          coordinates: None,
        })
        .await?;
      println!("updated location {id}");
      Ok(())
    }
    LocationsCmd::Delete { id } => {
      store.remove(&id).await?;
      println!("deleted location {id}");
      Ok(())
    }
  }
}

// ─── Photos ───────────────────────────────────────────────────────────────────

async fn photos(backend: &Backend, cmd: PhotosCmd) -> anyhow::Result<()> {
  let store = &backend.locations;
  match cmd {
    PhotosCmd::Add { location_id, files } => {
      let mut uploads = Vec::with_capacity(files.len());
      for path in files {
        let file_name = path
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .with_context(|| format!("no file name in {path:?}"))?;
        let bytes = tokio::fs::read(&path)
          .await
          .with_context(|| format!("failed to read {path:?}"))?;
        uploads.push(PhotoFile { file_name, bytes });
      }

      let count = uploads.len();
      store.upload_photos(&location_id, uploads).await?;
      println!("uploaded {count} photo(s) to {location_id}");
      Ok(())
    }
    PhotosCmd::Rm { location_id, index } => {
      store.remove_photo_at(&location_id, index).await?;
      println!("removed photo {index} from {location_id}");
      Ok(())
    }
  }
}

// ─── Comments ─────────────────────────────────────────────────────────────────

async fn comments(backend: &Backend, cmd: CommentsCmd) -> anyhow::Result<()> {
  let store = &backend.comments;
  match cmd {
    CommentsCmd::List { location_id } => {
      store.refresh_for_location(&location_id).await;
      let state = store.state();
      if let Some(error) = state.error {
        bail!("failed to load comments: {error}");
      }
      for comment in &state.items {
        println!(
          "{}  [{}] {}: {}",
          comment.id,
          comment.created_at.format("%Y-%m-%d %H:%M"),
          comment.user_display_name,
          comment.text
        );
      }
      Ok(())
    }
    CommentsCmd::Add { location_id, text } => {
      store.add(&location_id, NewComment { text }).await?;
      println!("comment added");
      Ok(())
    }
    CommentsCmd::Rm {
      comment_id,
      location,
    } => {
      store.remove(&comment_id, &location).await?;
      println!("comment deleted");
      Ok(())
    }
  }
}

// ─── Reports ──────────────────────────────────────────────────────────────────

async fn reports(backend: &Backend, cmd: ReportsCmd) -> anyhow::Result<()> {
  let store = &backend.reports;
  match cmd {
    ReportsCmd::List => {
      store.refresh().await;
      let state = store.state();
      if let Some(error) = state.error {
        bail!("failed to load reports: {error}");
      }
      for report in &state.items {
        println!(
          "{}  [{}] {} — {} (by {})",
          report.id,
          report.status,
          report.location_name,
          report.reason,
          report.reporter_email
        );
      }
      Ok(())
    }
    ReportsCmd::Add {
      location_id,
      reason,
    } => {
      // The report carries the location name for the review list.
      let location = backend.locations.get(&location_id).await?;
      store
        .add(NewReport {
          location_id,
          location_name: location.name,
          reason,
        })
        .await?;
      println!("report filed");
      Ok(())
    }
    ReportsCmd::Resolve { id } => {
      store.set_status(&id, ReportStatus::Resolved).await?;
      println!("report {id} resolved");
      Ok(())
    }
    ReportsCmd::Dismiss { id } => {
      store.set_status(&id, ReportStatus::Dismissed).await?;
      println!("report {id} dismissed");
      Ok(())
    }
    ReportsCmd::Rm { id } => {
      store.remove(&id).await?;
      println!("report {id} deleted");
      Ok(())
    }
  }
}
