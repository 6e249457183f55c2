//! Typed resource records, identifiers, and the decoders that classify raw payloads.

pub mod decode;
pub mod id;
pub mod record;

pub use decode::*;
pub use id::*;
pub use record::*;
