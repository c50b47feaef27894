pub mod health;
pub mod rss;
pub mod usage;
