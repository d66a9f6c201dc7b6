//! Upload collection: turning user-supplied paths into audio file blobs,
//! plus the `Track` record the playlist stores.

mod model;
mod scan;

pub use model::{FileBlob, Track};
pub use scan::collect_uploads;

#[cfg(test)]
mod tests;
