pub mod domain;
pub mod duration;
pub mod normalize;
pub mod ports;
pub mod reconcile;
pub mod resolve;
pub mod validate;

pub use domain::{DocumentRecord, FixProposal, ProblemFlags, ProposedDetails, SelectionState};
pub use ports::{CatalogStore, PortError, PortResult};
pub use reconcile::{commit_fix, compute_merged_document};
pub use validate::{validate, ValidationFailed};
