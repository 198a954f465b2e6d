usecase! {
    create : {
        pub author: entities::Actor,
        pub name: String,
        pub price: String,
        pub image: String,
        pub location: String,
        pub description: String,
        pub amenities: Vec<entities::AmenityId>,
    } => {
        pub campground: entities::Campground,
    }
}

usecase! {
    get : {
        pub campground_id: entities::CampgroundId,
    } => {
        pub campground: entities::Campground,
    }
}

usecase! {
    gets : {
        pub search: Option<String>,
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    } => {
        pub campgrounds: Vec<entities::Campground>,
        pub total: u64,
    }
}

usecase! {
    edit : {
        pub campground_id: entities::CampgroundId,
        pub requester: entities::UserId,
        pub mutation: super::CampgroundEdit,
    } => {
        pub campground: entities::Campground,
    }
}

usecase! {
    delete : {
        pub campground_id: entities::CampgroundId,
        pub requester: entities::UserId,
    } => {
        pub campground: entities::Campground,
    }
}

usecase! {
    amenities : {} => {
        pub amenities: Vec<entities::Amenity>,
    }
}

#[derive(Debug, Clone, Default)]
pub struct CampgroundEdit {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<Vec<crate::entities::AmenityId>>,
}
