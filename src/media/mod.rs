pub mod hash;
pub mod upload;

pub use upload::{AudioUploader, PollConfig, TranscodedTrack, UploadError, UploadOutcome};
