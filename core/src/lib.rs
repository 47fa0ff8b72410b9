pub mod criteria;
pub mod engine;
pub mod error;
pub mod facets;
pub mod index;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod text;

pub use criteria::Criteria;
pub use engine::{Engine, LoadOptions};
pub use error::{Error, Result};
pub use facets::{ChannelFacet, SpeakerFacet, TagFacet, VideoStats};
pub use index::{Index, SortKey};
pub use model::{IndexedVideo, OneOrMany, Speaker, Video};
