//! Core verification pipeline for authenticating physical medicine packages.
//!
//! A submission (claimed identity fields plus photographs) is checked against
//! a trusted golden-standard record through a sequence of independent stages,
//! each of which can veto the result:
//!
//! 1. **Identity** — exact registration number comparison (pure, free).
//! 2. **Package** — outer-packaging visual comparison via the comparator.
//! 3. **Secondary** — blister-pack comparison, tablet products only.
//!
//! The first non-passing stage terminates the run; later stages and their
//! comparator calls never happen. Collaborators (golden-standard registry,
//! reference-image store, visual comparator) are injected as trait objects
//! so the pipeline can be driven by test doubles.

pub mod comparator;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod registry;
pub mod report;

pub use comparator::{Comparator, ComparatorStatus, Comparison};
pub use errors::{ValidationError, VerifyError};
pub use model::{Evidence, FormFactor, GoldenRecord, ImageBlob};
pub use normalize::RawEvidence;
pub use pipeline::{Pipeline, Stage, VerificationResult};
pub use profile::InstructionProfile;
pub use registry::{GoldenRegistry, ImageStore, Lookup};
