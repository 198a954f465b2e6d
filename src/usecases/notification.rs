usecase! {
    list : {
        pub user_id: entities::UserId,
    } => {
        pub notifications: Vec<entities::Notification>,
    }
}

usecase! {
    mark : {
        pub user_id: entities::UserId,
        pub ids: Vec<entities::NotificationId>,
        pub is_read: bool,
    } => {
        pub updated: u64,
    }
}

usecase! {
    remove : {
        pub user_id: entities::UserId,
        pub ids: Vec<entities::NotificationId>,
    } => {
        pub removed: Vec<entities::Notification>,
    }
}

usecase! {
    reconcile : {
        pub user_id: entities::UserId,
    } => {
        pub pruned: Vec<entities::NotificationId>,
    }
}
