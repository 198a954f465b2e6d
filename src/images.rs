use async_trait::async_trait;

#[async_trait]
pub trait ImageHost {
    async fn destroy(&self, public_id: &str) -> anyhow::Result<()>;
}

/// The hosting service's identifier for an uploaded asset: the last path
/// segment of its URL without the extension.
pub fn public_id(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let id = match segment.rfind('.') {
        Some(0) | None => segment,
        Some(i) => &segment[..i],
    };

    match id.is_empty() {
        true => None,
        false => Some(id),
    }
}

pub struct LogImageHost;

#[async_trait]
impl ImageHost for LogImageHost {
    async fn destroy(&self, public_id: &str) -> anyhow::Result<()> {
        tracing::info!(public_id, "image asset released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_is_last_segment_without_extension() {
        assert_eq!(
            public_id("https://res.cloudinary.com/demo/image/upload/v1598/abcd1234.jpg"),
            Some("abcd1234")
        );
        assert_eq!(public_id("https://host/img/plain"), Some("plain"));
        assert_eq!(public_id("https://host/img/a.b.png?w=10"), Some("a.b"));
        assert_eq!(public_id(""), None);
    }
}
