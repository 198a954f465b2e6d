use super::{RepositoryError, Result as RepoResult};

pub fn find_mut<T, P>(v: &mut [T], preficate: P) -> RepoResult<&mut T>
where
    T: ::core::fmt::Debug,
    P: FnMut(&&mut T) -> bool,
{
    let mut res = v.iter_mut().filter(preficate).collect::<Vec<_>>();

    tracing::trace!("found - {:?}", res);

    match res.len() {
        0 => Err(RepositoryError::NotFound),
        1 => Ok(res.remove(0)),
        i => Err(RepositoryError::NoUnique { matched: i as u32 }),
    }
}

pub fn find_ref<T, P>(v: &[T], preficate: P) -> RepoResult<&T>
where
    T: ::core::fmt::Debug,
    P: FnMut(&&T) -> bool,
{
    let mut res = v.iter().filter(preficate).collect::<Vec<_>>();

    tracing::trace!("found - {:?}", res);

    match res.len() {
        0 => Err(RepositoryError::NotFound),
        1 => Ok(res.remove(0)),
        i => Err(RepositoryError::NoUnique { matched: i as u32 }),
    }
}

/// Removes the single element matching `is_target`.
pub fn take_unique<T>(v: &mut Vec<T>, is_target: impl Fn(&T) -> bool) -> RepoResult<T> {
    let mut indexes = v
        .iter()
        .enumerate()
        .filter(|(_, t)| is_target(t))
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    match indexes.len() {
        0 => Err(RepositoryError::NotFound),
        1 => Ok(v.remove(indexes.remove(0))),
        i => Err(RepositoryError::NoUnique { matched: i as u32 }),
    }
}

/// Removes every element matching `is_target`, keeping the order of the rest.
pub fn take_all<T>(v: &mut Vec<T>, is_target: impl Fn(&T) -> bool) -> Vec<T> {
    let (taken, kept) = v.drain(..).partition(|t| is_target(t));
    *v = kept;
    taken
}

/// `$addToSet`
pub fn add_to_set<T: PartialEq>(v: &mut Vec<T>, item: T) -> bool {
    match v.contains(&item) {
        true => false,
        false => {
            v.push(item);
            true
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_unique_refuses_ambiguous_matches() {
        let mut v = vec![1, 2, 2, 3];
        assert!(matches!(
            take_unique(&mut v, |n| *n == 2),
            Err(RepositoryError::NoUnique { matched: 2 })
        ));
        assert_eq!(take_unique(&mut v, |n| *n == 3).unwrap(), 3);
        assert_eq!(v, vec![1, 2, 2]);
    }

    #[test]
    fn take_all_keeps_remaining_order() {
        let mut v = vec![5, 1, 4, 2, 3];
        let taken = take_all(&mut v, |n| n % 2 == 0);
        assert_eq!(taken, vec![4, 2]);
        assert_eq!(v, vec![5, 1, 3]);
    }

    #[test]
    fn add_to_set_ignores_duplicates() {
        let mut v = vec!["a"];
        assert!(!add_to_set(&mut v, "a"));
        assert!(add_to_set(&mut v, "b"));
        assert_eq!(v, vec!["a", "b"]);
    }
}
