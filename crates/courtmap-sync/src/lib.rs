//! The courtmap data-synchronization layer.
//!
//! Cooperating state containers that mediate every read and write against
//! the remote document store: the session store owns the signed-in identity
//! and the readiness signal, the three resource stores bind one collection
//! each to loading/error/result-set state, and the navigation guard gates
//! route transitions on both.
//!
//! Everything here is generic over the backend traits in `courtmap-core`;
//! no concrete backend is named.

pub mod comments;
pub mod guard;
pub mod locations;
pub mod reports;
pub mod session;
pub mod state;

pub use comments::CommentStore;
pub use guard::{NavigationGuard, Route, Verdict};
pub use locations::{LocationStore, PhotoFile};
pub use reports::ReportStore;
pub use session::{Session, SessionHandle, SessionStore};
pub use state::StoreState;
