// Purpose - decoding files, the media registry, and audio output devices

pub mod decoder;
pub mod media;
pub mod output;

pub use decoder::{decode_file, DecodedAudio};
pub use media::{MediaStore, MediaUrl};
pub use output::{AudioBackend, CpalBackend, OfflineBackend, OfflineDriver, OutputStream};
