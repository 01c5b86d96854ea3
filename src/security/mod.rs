pub mod confinement;
pub mod guard;
pub mod verdict;

pub use confinement::{UnresolvedPathPolicy, WorkspaceConfinement};
pub use guard::{CommandGuard, DenyRule, ThreatCategory};
pub use verdict::{BlockReason, Verdict};
