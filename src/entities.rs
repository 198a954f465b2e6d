use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Date = DateTime<Utc>;

pub const DEFAULT_AVATAR: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn%3AANd9GcQJS3-GoTF9xqAIyRROWdTD8SUihnSdP5Ac2uPb6AzgGHHyeuuD";

macro_rules! id {
    ($( $n:ident ),* $(,)?) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $n(pub Uuid);

        impl $n {
            pub fn new() -> Self { Self(Uuid::new_v4()) }
        }
        impl Default for $n {
            fn default() -> Self { Self::new() }
        }
        impl fmt::Display for $n {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
        }
        impl FromStr for $n {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s.trim()).map(Self) }
        }
        impl From<Uuid> for $n {
            fn from(id: Uuid) -> Self { Self(id) }
        }
    )*};
}

id!(UserId, CampgroundId, CommentId, NotificationId, RatingId, AmenityId);

/// Seeded into an empty amenity store at startup.
pub const AMENITY_CATALOGUE: [&str; 29] = [
    "Tents",
    "Yoga Classes",
    "Upgraded Yurts",
    "Communal Campground Kitchens",
    "Coffee Cafes",
    "Stargazing Tours",
    "Live Music",
    "Food Trucks",
    "Swimming Pool",
    "Breakfast",
    "Lunch",
    "Dinner",
    "Games",
    "Zip Lines",
    "Hayrides",
    "Game Rooms",
    "Craft Brewing & Bars",
    "Summer Movie Nights",
    "Rental Cabins & RVs",
    "Toilet Only",
    "Toilet & Shower",
    "Electrical Outlets",
    "Internet & WiFi",
    "Wildlife Safari",
    "Campfire",
    "Barbeque, Fire Rings, Grills",
    "Drinking Water",
    "Pets Allowed",
    "Signage",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub created: Date,
    pub settings: NotificationSettings,
    pub notifications: Vec<NotificationId>,
    pub followers: Vec<UserId>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            username: self.username.clone(),
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Per-event opt-in switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventToggles {
    pub new_campground: bool,
    pub new_comment: bool,
    pub new_comment_like: bool,
    pub new_follower: bool,
}

impl EventToggles {
    pub const fn all(on: bool) -> Self {
        Self {
            new_campground: on,
            new_comment: on,
            new_comment_like: on,
            new_follower: on,
        }
    }

    pub fn allows(&self, event: Event) -> bool {
        match event {
            Event::NewCampground => self.new_campground,
            Event::NewComment => self.new_comment,
            Event::NewCommentLike => self.new_comment_like,
            Event::NewFollower => self.new_follower,
        }
    }
}

/// Opt-in flags of a user, read once per event and used for both gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub in_app: EventToggles,
    pub email: EventToggles,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            in_app: EventToggles::all(true),
            email: EventToggles::all(false),
        }
    }
}

/// Social events that can notify someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NewCampground,
    NewComment,
    NewCommentLike,
    NewFollower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campground {
    pub id: CampgroundId,
    pub name: String,
    pub price: String,
    pub image: String,
    pub location: String,
    pub description: String,
    pub author: Actor,
    pub created: Date,
    pub comments: Vec<CommentId>,
    pub amenities: Vec<AmenityId>,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: AmenityId,
    pub name: String,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AmenityId::new(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub campground_id: CampgroundId,
    pub text: String,
    pub author: Profile,
    pub created: Date,
    pub edited: Date,
    pub is_edited: bool,
    pub likes: Vec<Profile>,
}

impl Comment {
    pub fn is_liked_by(&self, user: UserId) -> bool { self.likes.iter().any(|l| l.id == user) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum NotificationKind {
    NewCampground = 0,
    NewComment = 1,
    /// Nothing creates this kind; stored ones still load and list.
    UserAdminRequest = 2,
    NewFollower = 3,
}

impl From<NotificationKind> for u8 {
    fn from(kind: NotificationKind) -> Self { kind as u8 }
}

impl TryFrom<u8> for NotificationKind {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::NewCampground),
            1 => Ok(Self::NewComment),
            2 => Ok(Self::UserAdminRequest),
            3 => Ok(Self::NewFollower),
            n => Err(format!("unknown notification type: {}", n)),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NewCampground => "NEW_CAMPGROUND",
            Self::NewComment => "NEW_COMMENT",
            Self::UserAdminRequest => "USER_ADMIN_REQUEST",
            Self::NewFollower => "NEW_FOLLOWER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampgroundRef {
    pub id: CampgroundId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerRef {
    pub id: UserId,
    pub follower_avatar: String,
    pub following_user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub actor: Actor,
    #[serde(rename = "notificationType")]
    pub kind: NotificationKind,
    pub campground: Option<CampgroundRef>,
    pub comment_id: Option<CommentId>,
    pub is_comment_like: bool,
    pub follower: Option<FollowerRef>,
    pub is_read: bool,
    pub created: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub author: Actor,
    pub campground_id: CampgroundId,
    pub value: f64,
    pub created: Date,
    pub updated: Date,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_from_trimmed_strings() {
        let id = UserId::new();
        let parsed: UserId = format!(" {} ", id).parse().unwrap();
        assert_eq!(parsed, id);

        assert!("5f2b9c0e".parse::<CommentId>().is_err());
    }

    #[test]
    fn notification_kind_serializes_as_number() {
        let json = serde_json::to_string(&NotificationKind::NewFollower).unwrap();
        assert_eq!(json, "3");

        let kind: NotificationKind = serde_json::from_str("1").unwrap();
        assert_eq!(kind, NotificationKind::NewComment);
        assert!(serde_json::from_str::<NotificationKind>("7").is_err());
    }

    #[test]
    fn default_settings_are_in_app_only() {
        let s = NotificationSettings::default();
        assert!(s.in_app.allows(Event::NewComment));
        assert!(!s.email.allows(Event::NewFollower));
    }
}
