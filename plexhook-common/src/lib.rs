pub mod notification;
pub mod plex;
pub mod slack;
