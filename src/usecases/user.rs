usecase! {
    register : {
        pub username: String,
        pub email: String,
        pub avatar: Option<String>,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    get : {
        pub user_id: entities::UserId,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    edit : {
        pub user_id: entities::UserId,
        pub avatar: Option<String>,
        pub in_app: Option<entities::EventToggles>,
        pub email: Option<entities::EventToggles>,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    follow : {
        pub follower: entities::UserId,
        pub target: entities::UserId,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    unfollow : {
        pub follower: entities::UserId,
        pub target: entities::UserId,
    } => {
        pub user: entities::User,
    }
}
