// ABOUTME: Paginated list state driven by page/size/sort/filter changes
// ABOUTME: Every change issues one fetch; only the most recently issued fetch may update the state

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use itms_client::{ClientError, ClientResult, ErrorKind, ResourceClient};
use itms_core::constants::DEFAULT_PAGE_SIZE;
use itms_core::pagination::MIN_PAGE;
use itms_core::{ListQuery, Page, Resource, Sort};

/// Where a list controller gets its pages from
#[async_trait]
pub trait PageSource<R: Resource>: Send + Sync {
    async fn fetch_page(&self, query: &ListQuery<R::Filter>) -> ClientResult<Page<R>>;
}

#[async_trait]
impl<R: Resource> PageSource<R> for ResourceClient<R> {
    async fn fetch_page(&self, query: &ListQuery<R::Filter>) -> ClientResult<Page<R>> {
        self.list(query).await
    }
}

/// Error banner shown above the (possibly stale) rows
#[derive(Debug, Clone, PartialEq)]
pub struct ListError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ClientError> for ListError {
    fn from(err: &ClientError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

/// Everything a list view renders
#[derive(Debug, Clone)]
pub struct ListState<R: Resource> {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
    pub filters: R::Filter,
    pub items: Vec<R>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<ListError>,
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
            filters: R::Filter::default(),
            items: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            loading: false,
            error: None,
        }
    }
}

impl<R: Resource> ListState<R> {
    /// The query that reproduces this view
    pub fn query(&self) -> ListQuery<R::Filter> {
        ListQuery::new(self.page, self.size, self.filters.clone()).with_sort(self.sort.clone())
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > MIN_PAGE
    }
}

/// What happened to one issued fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The response replaced items and totals
    Applied,
    /// The fetch failed; items were kept and the error recorded
    Failed(ClientError),
    /// A newer fetch was issued meanwhile; the response was dropped
    Discarded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }
}

/// Controller behind one paginated list view.
///
/// Setters change the query immediately and return the fetch they issued.
/// Fetches are stamped with a generation at issue time; a response is only
/// applied if no later fetch has been issued since.
pub struct ListController<R: Resource, S: PageSource<R> = ResourceClient<R>> {
    source: S,
    state: watch::Sender<ListState<R>>,
    generation: AtomicU64,
}

impl<R: Resource, S: PageSource<R>> ListController<R, S> {
    pub fn new(source: S) -> Self {
        Self::with_state(source, ListState::default())
    }

    /// Start from a given page size, filter or sort
    pub fn with_state(source: S, initial: ListState<R>) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            source,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ListState<R> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ListState<R>> {
        self.state.subscribe()
    }

    pub fn set_page(&self, page: u32) -> impl Future<Output = FetchOutcome> + Send + '_ {
        self.state.send_modify(|s| s.page = page);
        self.issue()
    }

    /// Change the page size; the view jumps back to the first page
    pub fn set_size(&self, size: u32) -> impl Future<Output = FetchOutcome> + Send + '_ {
        self.state.send_modify(|s| {
            s.size = size;
            s.page = MIN_PAGE;
        });
        self.issue()
    }

    pub fn set_sort(&self, sort: Option<Sort>) -> impl Future<Output = FetchOutcome> + Send + '_ {
        self.state.send_modify(|s| s.sort = sort);
        self.issue()
    }

    /// Replace the filters; the view jumps back to the first page
    pub fn set_filters(
        &self,
        filters: R::Filter,
    ) -> impl Future<Output = FetchOutcome> + Send + '_ {
        self.state.send_modify(|s| {
            s.filters = filters;
            s.page = MIN_PAGE;
        });
        self.issue()
    }

    /// Re-issue the current query
    pub fn refresh(&self) -> impl Future<Output = FetchOutcome> + Send + '_ {
        self.issue()
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn issue(&self) -> impl Future<Output = FetchOutcome> + Send + '_ {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.state.borrow().query();
        self.state.send_modify(|s| s.loading = true);

        tracing::debug!(
            "Fetching {} page {} (generation {})",
            R::NAME,
            query.page,
            generation
        );

        async move {
            let result = self.source.fetch_page(&query).await;
            self.apply(generation, result)
        }
    }

    fn apply(&self, generation: u64, result: ClientResult<Page<R>>) -> FetchOutcome {
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!("Discarding stale {} page (generation {})", R::NAME, generation);
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                self.state.send_modify(|s| {
                    s.page = page.number;
                    s.items = page.content;
                    s.total_elements = page.total_elements;
                    s.total_pages = page.total_pages;
                    s.loading = false;
                    s.error = None;
                });
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!("Failed to load {} list: {}", R::NAME, err);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(ListError::from(&err));
                });
                FetchOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itms_core::models::project::{ProjectFilter, ProjectStatus};
    use itms_core::{ApiError, Project};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn project(id: i64) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "code": format!("PRJ-{}", id),
            "name": format!("Project {}", id),
            "projectType": "SM",
            "status": "IN_PROGRESS",
            "startDate": "2024-01-02",
            "createdAt": "2024-01-01T00:00:00"
        }))
        .unwrap()
    }

    /// Serves pages from memory, optionally holding a page's response until released
    #[derive(Default)]
    struct FakeSource {
        items: Vec<Project>,
        fail: Mutex<bool>,
        gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
        seen: Mutex<Vec<ListQuery<ProjectFilter>>>,
    }

    impl FakeSource {
        fn with_items(count: i64) -> Self {
            Self {
                items: (1..=count).map(project).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PageSource<Project> for FakeSource {
        async fn fetch_page(
            &self,
            query: &ListQuery<ProjectFilter>,
        ) -> ClientResult<Page<Project>> {
            self.seen.lock().unwrap().push(query.clone());
            let gate = self.gates.lock().unwrap().remove(&query.page);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if *self.fail.lock().unwrap() {
                return Err(ClientError::Api {
                    status: 500,
                    error: ApiError::new("C999", "Server exploded"),
                });
            }
            Ok(Page::from_slice(&self.items, query.page, query.size))
        }
    }

    #[tokio::test]
    async fn test_success_replaces_items_and_totals() {
        let controller = ListController::new(FakeSource::with_items(25));

        assert!(controller.set_page(2).await.is_applied());
        let state = controller.state();
        assert_eq!(state.items.len(), 5);
        assert_eq!(state.total_elements, 25);
        assert_eq!(state.total_pages, 3);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.has_next());
        assert!(state.has_previous());
    }

    #[tokio::test]
    async fn test_failure_keeps_items_and_sets_error() {
        let controller = ListController::new(FakeSource::with_items(25));
        controller.refresh().await;
        let before = controller.state().items;

        *controller.source.fail.lock().unwrap() = true;
        let outcome = controller.set_page(1).await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));

        let state = controller.state();
        assert_eq!(state.items.len(), before.len());
        assert_eq!(state.items[0].id, before[0].id);
        assert!(!state.loading);
        assert_eq!(state.error.as_ref().unwrap().message, "Server exploded");
        assert_eq!(state.error.as_ref().unwrap().kind, ErrorKind::Api);

        controller.dismiss_error();
        assert!(controller.state().error.is_none());
    }

    #[tokio::test]
    async fn test_changing_size_resets_page() {
        let controller = ListController::new(FakeSource::with_items(25));
        controller.set_page(2).await;

        controller.set_size(20).await;
        let state = controller.state();
        assert_eq!(state.page, 0);
        assert_eq!(state.size, 20);
        assert_eq!(state.items.len(), 20);
    }

    #[tokio::test]
    async fn test_each_change_issues_exactly_one_fetch() {
        let controller = ListController::new(FakeSource::with_items(3));

        controller.set_page(0).await;
        controller.set_sort(Some(Sort::desc("createdAt"))).await;
        controller
            .set_filters(ProjectFilter {
                status: Some(ProjectStatus::Completed),
                ..Default::default()
            })
            .await;

        let seen = controller.source.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].sort_by.as_deref(), Some("createdAt"));
        assert_eq!(seen[2].filter.status, Some(ProjectStatus::Completed));
        assert_eq!(seen[2].sort_by.as_deref(), Some("createdAt"));
    }

    #[tokio::test]
    async fn test_last_issued_request_wins() {
        let source = FakeSource::with_items(25);
        let (release_first, first_gate) = oneshot::channel();
        let (release_second, second_gate) = oneshot::channel();
        source
            .gates
            .lock()
            .unwrap()
            .extend([(0, first_gate), (1, second_gate)]);
        let controller = ListController::new(source);

        let first = controller.set_page(0);
        let second = controller.set_page(1);

        // The second response arrives before the first
        release_second.send(()).unwrap();
        let second_outcome = second.await;
        release_first.send(()).unwrap();
        let first_outcome = first.await;

        assert!(second_outcome.is_applied());
        assert!(matches!(first_outcome, FetchOutcome::Discarded));

        let state = controller.state();
        assert_eq!(state.page, 1);
        assert_eq!(state.items[0].id, 11);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites_newer_state() {
        let source = FakeSource::with_items(25);
        let (release_first, first_gate) = oneshot::channel();
        source.gates.lock().unwrap().insert(0, first_gate);
        let controller = ListController::new(source);

        let first = controller.set_page(0);
        let second = controller.set_page(1);

        let (first_outcome, second_outcome) = tokio::join!(
            async {
                tokio::task::yield_now().await;
                let _ = release_first.send(());
                first.await
            },
            second
        );

        assert!(matches!(first_outcome, FetchOutcome::Discarded));
        assert!(second_outcome.is_applied());
        assert_eq!(controller.state().page, 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_loading_then_result() {
        let controller = ListController::new(FakeSource::with_items(2));
        let mut rx = controller.subscribe();

        let fetch = controller.refresh();
        assert!(rx.borrow_and_update().loading);

        fetch.await;
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update();
        assert!(!state.loading);
        assert_eq!(state.items.len(), 2);
    }
}
