usecase! {
    list : {
        pub campground_id: entities::CampgroundId,
    } => {
        pub comments: Vec<entities::Comment>,
    }
}

usecase! {
    create : {
        pub campground_id: entities::CampgroundId,
        pub author: entities::UserId,
        pub text: String,
    } => {
        pub comment: entities::Comment,
    }
}

usecase! {
    edit : {
        pub campground_id: entities::CampgroundId,
        pub comment_id: entities::CommentId,
        pub requester: entities::UserId,
        pub text: String,
    } => {
        pub comment: entities::Comment,
    }
}

usecase! {
    delete : {
        pub campground_id: entities::CampgroundId,
        pub comment_id: entities::CommentId,
        pub requester: entities::UserId,
    } => {
        pub comment: entities::Comment,
    }
}

usecase! {
    like : {
        pub campground_id: entities::CampgroundId,
        pub comment_id: entities::CommentId,
        pub user_id: entities::UserId,
    } => {
        pub comment: entities::Comment,
        pub liked: bool,
    }
}
