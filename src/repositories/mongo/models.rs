use crate::entities::NotificationSettings;

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoUserModel {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub created: String,
    pub settings: NotificationSettings,
    pub notifications: Vec<String>,
    pub followers: Vec<String>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoActorModel {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoProfileModel {
    pub id: String,
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoCampgroundModel {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub location: String,
    pub description: String,
    pub author: MongoActorModel,
    pub created: String,
    pub comments: Vec<String>,
    pub amenities: Vec<String>,
    pub rating: f64,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoCommentModel {
    pub id: String,
    pub campground_id: String,
    pub text: String,
    pub author: MongoProfileModel,
    pub created: String,
    pub edited: String,
    pub is_edited: bool,
    pub likes: Vec<MongoProfileModel>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoNotificationModel {
    pub id: String,
    pub recipient: String,
    pub actor: MongoActorModel,
    pub kind: i32,
    pub campground: Option<MongoCampgroundRefModel>,
    pub comment_id: Option<String>,
    pub is_comment_like: bool,
    pub follower: Option<MongoFollowerModel>,
    pub is_read: bool,
    pub created: String,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoCampgroundRefModel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoFollowerModel {
    pub id: String,
    pub follower_avatar: String,
    pub following_user_id: String,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoRatingModel {
    pub id: String,
    pub author: MongoActorModel,
    pub campground_id: String,
    pub value: f64,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoAmenityModel {
    pub id: String,
    pub name: String,
}
