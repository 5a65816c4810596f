//! Types for the JSON document Plex Media Server posts in the `payload` part of its webhooks.
//!
//! Plex omits keys freely depending on the event and the library type, so every field falls back
//! to its zero value when absent or `null`. Unknown keys are ignored.
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{de::Visitor, Deserialize, Serialize};

/// Event names sent by Plex Media Server.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PlexEventKind {
    LibraryNew,
    LibraryOnDeck,
    MediaPlay,
    MediaPause,
    MediaResume,
    MediaStop,
    MediaScrobble,
    MediaRate,
    DatabaseBackup,
    DatabaseCorrupted,
    DeviceNew,
    PlaybackStarted,
    Other(String),
}

impl Default for PlexEventKind {
    fn default() -> Self {
        PlexEventKind::Other(String::new())
    }
}

impl From<&str> for PlexEventKind {
    fn from(s: &str) -> Self {
        match s {
            "library.new" => PlexEventKind::LibraryNew,
            "library.on.deck" => PlexEventKind::LibraryOnDeck,
            "media.play" => PlexEventKind::MediaPlay,
            "media.pause" => PlexEventKind::MediaPause,
            "media.resume" => PlexEventKind::MediaResume,
            "media.stop" => PlexEventKind::MediaStop,
            "media.scrobble" => PlexEventKind::MediaScrobble,
            "media.rate" => PlexEventKind::MediaRate,
            "admin.database.backup" => PlexEventKind::DatabaseBackup,
            "admin.database.corrupted" => PlexEventKind::DatabaseCorrupted,
            "device.new" => PlexEventKind::DeviceNew,
            "playback.started" => PlexEventKind::PlaybackStarted,
            other => PlexEventKind::Other(other.to_owned()),
        }
    }
}

impl FromStr for PlexEventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PlexEventKind::from(s))
    }
}

impl fmt::Display for PlexEventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlexEventKind::LibraryNew => write!(f, "library.new"),
            PlexEventKind::LibraryOnDeck => write!(f, "library.on.deck"),
            PlexEventKind::MediaPlay => write!(f, "media.play"),
            PlexEventKind::MediaPause => write!(f, "media.pause"),
            PlexEventKind::MediaResume => write!(f, "media.resume"),
            PlexEventKind::MediaStop => write!(f, "media.stop"),
            PlexEventKind::MediaScrobble => write!(f, "media.scrobble"),
            PlexEventKind::MediaRate => write!(f, "media.rate"),
            PlexEventKind::DatabaseBackup => write!(f, "admin.database.backup"),
            PlexEventKind::DatabaseCorrupted => write!(f, "admin.database.corrupted"),
            PlexEventKind::DeviceNew => write!(f, "device.new"),
            PlexEventKind::PlaybackStarted => write!(f, "playback.started"),
            PlexEventKind::Other(other) => write!(f, "{}", other),
        }
    }
}

struct PlexEventKindVisitor;

impl<'de> Visitor<'de> for PlexEventKindVisitor {
    type Value = PlexEventKind;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "the string representation of a Plex event")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PlexEventKind::from(s))
    }
}

impl<'de> Deserialize<'de> for PlexEventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(PlexEventKindVisitor)
    }
}

impl Serialize for PlexEventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// The kind of library item an event refers to (`Metadata.type`).
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MetadataType {
    Movie,
    Episode,
    Show,
    Season,
    Track,
    Album,
    Artist,
    #[default]
    Unknown,
    Other(String),
}

impl From<String> for MetadataType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "movie" => MetadataType::Movie,
            "episode" => MetadataType::Episode,
            "show" => MetadataType::Show,
            "season" => MetadataType::Season,
            "track" => MetadataType::Track,
            "album" => MetadataType::Album,
            "artist" => MetadataType::Artist,
            "" => MetadataType::Unknown,
            _ => MetadataType::Other(s),
        }
    }
}

impl From<MetadataType> for String {
    fn from(kind: MetadataType) -> Self {
        match kind {
            MetadataType::Movie => "movie".to_owned(),
            MetadataType::Episode => "episode".to_owned(),
            MetadataType::Show => "show".to_owned(),
            MetadataType::Season => "season".to_owned(),
            MetadataType::Track => "track".to_owned(),
            MetadataType::Album => "album".to_owned(),
            MetadataType::Artist => "artist".to_owned(),
            MetadataType::Unknown => String::new(),
            MetadataType::Other(other) => other,
        }
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

/// A webhook event as posted by Plex Media Server.
#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlexEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub event: PlexEventKind,
    #[serde(deserialize_with = "null_as_default")]
    pub user: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: bool,
    #[serde(rename = "Account", deserialize_with = "null_as_default")]
    pub account: Account,
    #[serde(rename = "Server", deserialize_with = "null_as_default")]
    pub server: Server,
    #[serde(rename = "Player", deserialize_with = "null_as_default")]
    pub player: Player,
    #[serde(rename = "Metadata", deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

impl PlexEvent {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// The Plex account that triggered the event.
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub thumb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Server {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
}

/// The client device, only meaningful for playback events.
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    #[serde(deserialize_with = "null_as_default")]
    pub local: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub public_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
}

/// The library item the event is about.
///
/// For episodes, `grandparent_*` fields describe the show and `parent_*` fields the season.
/// Timestamps (`added_at`, `updated_at`, `last_viewed_at`) are seconds since the Unix epoch.
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    #[serde(deserialize_with = "null_as_default")]
    pub library_section_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_rating_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grandparent_rating_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub guid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_guid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grandparent_guid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub library_section_title: String,
    #[serde(rename = "librarySectionID", deserialize_with = "null_as_default")]
    pub library_section_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub library_section_key: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: MetadataType,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grandparent_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grandparent_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub view_offset: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_viewed_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub thumb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub art: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_thumb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grandparent_thumb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grandparent_art: String,
    #[serde(deserialize_with = "null_as_default")]
    pub originally_available_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub added_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: i64,
}

/// Plex sends `null` for some keys it has no value for. Treat those like absent keys.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
