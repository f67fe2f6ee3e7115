use logscope_aws::LogService;
use logscope_types::{Group, GroupCursor, GroupListing};

use crate::error::TraversalError;
use crate::filter::GroupNameFilter;

/// Finds a log group by exact name.
///
/// The service only matches name prefixes, so every page of the prefix
/// search is scanned for an exact match.
pub struct GroupResolver<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: LogService + ?Sized> GroupResolver<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Returns the group, if found, and the number of pages requested
    pub async fn resolve(&self, name: &str) -> Result<(Option<Group>, usize), TraversalError> {
        let mut query_count = 0;
        let mut cursor: Option<GroupCursor> = None;

        loop {
            let page = self
                .service
                .list_groups(Some(name), cursor.as_ref())
                .await?;
            query_count += 1;

            if let Some(group) = page.groups.into_iter().find(|g| g.name == name) {
                return Ok((Some(group), query_count));
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(group = name, query_count, "Log group not found");
        Ok((None, query_count))
    }
}

/// Lists every log group, optionally filtered by name
pub struct GroupLister<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: LogService + ?Sized> GroupLister<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn list(&self, filter: &GroupNameFilter) -> Result<GroupListing, TraversalError> {
        let mut listing = GroupListing::default();
        let mut cursor: Option<GroupCursor> = None;

        loop {
            let page = self.service.list_groups(None, cursor.as_ref()).await?;
            listing.query_count += 1;

            listing
                .groups
                .extend(page.groups.into_iter().filter(|g| filter.matches(&g.name)));

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(
            groups = listing.groups.len(),
            query_count = listing.query_count,
            "Listed log groups"
        );

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeLogService};

    fn names(listing: &GroupListing) -> Vec<&str> {
        listing.groups.iter().map(|g| g.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_resolve_exact_match_among_prefixes() {
        let service = FakeLogService::new()
            .with_group("app/logs-old")
            .with_group("app/logs");

        let (group, query_count) = GroupResolver::new(&service).resolve("app/logs").await.unwrap();

        assert_eq!(group.unwrap().name, "app/logs");
        assert_eq!(query_count, 1);
        assert_eq!(service.calls(), vec![Call::Groups(Some("app/logs".to_string()))]);
    }

    #[tokio::test]
    async fn test_resolve_follows_pages() {
        let service = FakeLogService::new()
            .with_group("app/logs-a")
            .with_group("app/logs-b")
            .with_group("app/logs")
            .with_group_page_size(2);

        let (group, query_count) = GroupResolver::new(&service).resolve("app/logs").await.unwrap();

        assert!(group.is_some());
        assert_eq!(query_count, 2);
    }

    #[tokio::test]
    async fn test_resolve_prefix_only_is_not_found() {
        let service = FakeLogService::new().with_group("app/logs");

        let (group, query_count) = GroupResolver::new(&service).resolve("app").await.unwrap();

        assert!(group.is_none());
        assert_eq!(query_count, 1);
    }

    #[tokio::test]
    async fn test_list_with_pattern() {
        let service = FakeLogService::new()
            .with_group("prod-api")
            .with_group("dev-api");
        let filter = GroupNameFilter::new(Some("^prod-")).unwrap();

        let listing = GroupLister::new(&service).list(&filter).await.unwrap();

        assert_eq!(names(&listing), vec!["prod-api"]);
        assert_eq!(listing.query_count, 1);
    }

    #[tokio::test]
    async fn test_list_walks_every_page() {
        let service = FakeLogService::new()
            .with_group("a")
            .with_group("b")
            .with_group("c")
            .with_group_page_size(1);

        let listing = GroupLister::new(&service)
            .list(&GroupNameFilter::default())
            .await
            .unwrap();

        assert_eq!(names(&listing), vec!["a", "b", "c"]);
        assert_eq!(listing.query_count, 3);
        assert_eq!(service.call_count(), 3);
    }
}
