pub use decoder::RomDecoder;
pub use error::{ExtractError, Result};
pub use export::{extract, ExtractionSummary};
pub use layout::RomLayout;
pub use rom::Rom;
pub use source::WorldSource;

pub mod blockset;
pub mod decoder;
pub mod error;
pub mod export;
pub mod layer;
pub mod layout;
pub mod lz77;
pub mod map;
pub mod metadata;
pub mod palette;
pub mod rom;
pub mod source;
pub mod span;
pub mod table;
pub mod tile;
pub mod world;
