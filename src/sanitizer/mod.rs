//! Construcción de metadata segura y reescritura del contenedor.

mod exif_writer;
mod removal;
mod rewriter;
mod safe_metadata;

pub use exif_writer::serialize_safe_exif;
pub use removal::{remove_image_metadata, verify_image_metadata_clean};
pub use rewriter::{StripOutcome, rewrite, strip_metadata};
pub use safe_metadata::{DEFAULT_ORIENTATION, build_safe};
