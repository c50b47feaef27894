pub mod sharewood_torrent_repository;
pub mod torrent_repository;

pub use sharewood_torrent_repository::{SharewoodTorrentRepository, UpstreamError};
pub use torrent_repository::TorrentRepository;
