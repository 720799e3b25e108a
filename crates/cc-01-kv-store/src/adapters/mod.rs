pub mod cache_wrap;
pub mod mem_store;
pub mod recording;

pub use cache_wrap::CacheWrap;
pub use mem_store::MemStore;
pub use recording::RecordingStore;
