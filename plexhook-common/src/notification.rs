use crate::plex::{MetadataType, PlexEvent, PlexEventKind};
use crate::slack::{SlackMessage, TextObject};

/// A newly added library item that is announced in Slack.
///
/// Only `library.new` events for movies and episodes map to a `LibraryItem`; everything else Plex
/// sends is ignored.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LibraryItem {
    Movie {
        title: String,
    },
    Episode {
        show: String,
        season: String,
        title: String,
    },
}

impl LibraryItem {
    pub fn from_event(event: &PlexEvent) -> Option<Self> {
        if event.event != PlexEventKind::LibraryNew {
            return None;
        }

        let metadata = &event.metadata;
        match metadata.kind {
            MetadataType::Movie => Some(LibraryItem::Movie {
                title: metadata.title.clone(),
            }),
            MetadataType::Episode => Some(LibraryItem::Episode {
                show: metadata.grandparent_title.clone(),
                season: metadata.parent_title.clone(),
                title: metadata.title.clone(),
            }),
            _ => None,
        }
    }

    /// Name of the library section the item was added to, as shown to users.
    pub fn section(&self) -> &'static str {
        match self {
            LibraryItem::Movie { .. } => "Movies",
            LibraryItem::Episode { .. } => "TV shows",
        }
    }

    pub fn to_message(&self) -> SlackMessage {
        match self {
            LibraryItem::Movie { title } => movie_message(title),
            LibraryItem::Episode {
                show,
                season,
                title,
            } => episode_message(show, season, title),
        }
    }
}

fn movie_message(title: &str) -> SlackMessage {
    SlackMessage::new(format!("{} added to Movies", title))
        .section(TextObject::mrkdwn(format!("*{}*", title)))
        .context(vec![TextObject::mrkdwn("added to Movies")])
        .divider()
}

fn episode_message(show: &str, season: &str, title: &str) -> SlackMessage {
    SlackMessage::new(format!("{} {}: {} added to TV shows", show, season, title))
        .section(TextObject::mrkdwn(format!(
            "New episode of *{} {}*: _{}_",
            show, season, title
        )))
        .context(vec![TextObject::mrkdwn("added to TV shows")])
        .divider()
}
