pub mod revert;

pub use revert::{decode_revert, DecodedRevert};
