//! Golden-standard registry for the verification pipeline.
//!
//! Two stores, both owned by the operator rather than the caller:
//!
//! - [`Store`]: SQLite-backed records keyed by `(drug_name, form_factor)`,
//!   unique per pair, enforced at write time.
//! - [`ImageDir`]: reference-image blobs on the filesystem, addressed by
//!   refs that are stored inside the records.
//!
//! Both implement the collaborator traits from `checkmed-core`
//! ([`checkmed_core::GoldenRegistry`] / [`checkmed_core::ImageStore`]) so a
//! pipeline can be wired directly against them.

pub mod error;
pub mod images;
pub mod schema;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use images::{ImageDir, ImageKind};
pub use store::{NewMedicine, Store};
