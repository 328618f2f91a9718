pub mod archive;
pub mod handlers;

pub use archive::VersionArchive;
