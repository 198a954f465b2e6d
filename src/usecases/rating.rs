usecase! {
    rate : {
        pub campground_id: entities::CampgroundId,
        pub author: entities::Actor,
        /// As received; a number or a numeric string.
        pub rating: ::serde_json::Value,
    } => {
        pub rating: entities::Rating,
        pub created: bool,
        pub displayed: String,
    }
}
