pub mod preview;
pub mod uploader;
