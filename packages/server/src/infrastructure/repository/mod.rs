//! Repository 実装
//!
//! - `inmemory`: HashMap を使ったインメモリ実装
//! - 将来的に: `redis` など

pub mod inmemory {
    pub mod room;
}

pub use inmemory::room::InMemoryRoomRepository;
