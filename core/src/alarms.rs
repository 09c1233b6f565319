//! Alarm list view-model.

use std::sync::Arc;

use tokio::sync::watch;

use crate::publisher::{StatePublisher, TaskScope};
use crate::repository::{AlarmRepository, RepoError};
use crate::types::{Alarm, AlarmRequest};

const TAG: &str = "AlarmViewModel";

/// Publishes the user's alarms for a presentation layer.
///
/// Every operation returns immediately and completes on the view-model's own
/// `TaskScope`; dropping the view-model (or calling [`destroy`]) cancels
/// whatever is still running. Mutations reload the list when they succeed.
/// Failures are logged and otherwise invisible to observers.
///
/// [`destroy`]: AlarmViewModel::destroy
pub struct AlarmViewModel {
    repository: Arc<dyn AlarmRepository>,
    alarms: StatePublisher<Vec<Alarm>>,
    scope: TaskScope,
}

impl AlarmViewModel {
    pub fn new(repository: Arc<dyn AlarmRepository>) -> Self {
        Self {
            repository,
            alarms: StatePublisher::new(TAG, Vec::new()),
            scope: TaskScope::new(),
        }
    }

    /// Read-only view of the last successfully loaded alarms.
    pub fn alarms(&self) -> watch::Receiver<Vec<Alarm>> {
        self.alarms.subscribe()
    }

    pub fn current(&self) -> Vec<Alarm> {
        self.alarms.current()
    }

    pub fn load_data(&self) {
        let repository = Arc::clone(&self.repository);
        self.alarms
            .load(&self.scope, async move { repository.get_alarms().await });
    }

    pub fn add_alarm(&self, hour: u32, minute: u32, label: impl Into<String>, days: Vec<bool>) {
        let request = AlarmRequest::new(hour, minute, label, days);
        let repository = Arc::clone(&self.repository);
        let alarms = self.alarms.clone();
        self.scope.spawn(async move {
            match repository.create_alarm(request).await {
                Ok(created) => {
                    tracing::info!(id = %created.id, time = %created.time, "alarm saved");
                    alarms.settle(repository.get_alarms().await);
                }
                Err(err) => report("create", &err),
            }
        });
    }

    pub fn toggle_alarm(&self, id: impl Into<String>, is_active: bool) {
        let id = id.into();
        let repository = Arc::clone(&self.repository);
        let alarms = self.alarms.clone();
        self.scope.spawn(async move {
            match repository.toggle_alarm(id, is_active).await {
                Ok(_) => alarms.settle(repository.get_alarms().await),
                Err(err) => report("toggle", &err),
            }
        });
    }

    pub fn delete_alarm(&self, id: impl Into<String>) {
        let id = id.into();
        let repository = Arc::clone(&self.repository);
        let alarms = self.alarms.clone();
        self.scope.spawn(async move {
            match repository.delete_alarm(id).await {
                Ok(()) => alarms.settle(repository.get_alarms().await),
                Err(err) => report("delete", &err),
            }
        });
    }

    /// Waits until every operation started so far has settled.
    pub async fn settled(&self) {
        self.scope.idle().await;
    }

    /// Cancels in-flight operations. Later calls spawn nothing that runs.
    pub fn destroy(&self) {
        self.scope.cancel();
    }
}

fn report(action: &str, err: &RepoError) {
    tracing::error!(
        target: "momentum::state",
        tag = TAG,
        kind = ?err.kind,
        "failed to {action} alarm: {}",
        err.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::{MockAlarmRepository, RepoError};
    use parking_lot::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::subscriber::set_default;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    fn alarm(id: &str, active: bool) -> Alarm {
        Alarm {
            id: id.into(),
            time: "07:00".into(),
            label: "wake".into(),
            days: vec![false; 7],
            is_active: active,
            user_id: "u1".into(),
        }
    }

    fn view_model(repo: MockAlarmRepository) -> AlarmViewModel {
        AlarmViewModel::new(Arc::new(repo))
    }

    /// Records the messages of error events emitted under the state target.
    #[derive(Clone, Default)]
    struct ErrorLog(Arc<Mutex<Vec<String>>>);

    impl ErrorLog {
        fn messages(&self) -> Vec<String> {
            self.0.lock().clone()
        }
    }

    struct MessageField(String);

    impl Visit for MessageField {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for ErrorLog {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            if meta.target() == "momentum::state" && *meta.level() == tracing::Level::ERROR {
                let mut message = MessageField(String::new());
                event.record(&mut message);
                self.0.lock().push(message.0);
            }
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let vm = view_model(MockAlarmRepository::new());
        assert!(vm.current().is_empty());
        assert!(vm.alarms().borrow().is_empty());
    }

    #[tokio::test]
    async fn successful_load_replaces_the_list() {
        let mut repo = MockAlarmRepository::new();
        repo.expect_get_alarms()
            .times(1)
            .returning(|| Ok(vec![alarm("a1", true)]));

        let vm = view_model(repo);
        vm.load_data();
        vm.settled().await;

        assert_eq!(vm.current(), vec![alarm("a1", true)]);
    }

    #[tokio::test]
    async fn failed_load_keeps_empty_list_and_logs_once() {
        let log = ErrorLog::default();
        let _guard = set_default(Registry::default().with(log.clone()));

        let mut repo = MockAlarmRepository::new();
        repo.expect_get_alarms()
            .times(1)
            .returning(|| Err(RepoError::new(ErrorKind::Transport, "network unreachable")));

        let vm = view_model(repo);
        let mut observer = vm.alarms();
        vm.load_data();
        vm.settled().await;

        assert!(vm.current().is_empty());
        assert!(!observer.has_changed().unwrap());
        assert_eq!(log.messages(), vec!["failed to load data: network unreachable"]);
    }

    #[tokio::test]
    async fn failure_does_not_clear_prior_success() {
        let mut repo = MockAlarmRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_get_alarms()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![alarm("x", true)]));
        repo.expect_get_alarms()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(RepoError::new(ErrorKind::Business, "server error")));

        let vm = view_model(repo);
        vm.load_data();
        vm.load_data();
        vm.settled().await;

        assert_eq!(vm.current(), vec![alarm("x", true)]);
    }

    #[tokio::test]
    async fn reloading_unchanged_data_is_stable() {
        let mut repo = MockAlarmRepository::new();
        repo.expect_get_alarms()
            .times(2)
            .returning(|| Ok(vec![alarm("a1", true), alarm("a2", false)]));

        let vm = view_model(repo);
        vm.load_data();
        vm.settled().await;
        let first = vm.current();
        vm.load_data();
        vm.settled().await;

        assert_eq!(vm.current(), first);
    }

    #[tokio::test]
    async fn toggle_reloads_on_success() {
        let mut repo = MockAlarmRepository::new();
        repo.expect_toggle_alarm()
            .withf(|id, active| id == "a1" && !*active)
            .times(1)
            .returning(|_, _| Ok(alarm("a1", false)));
        repo.expect_get_alarms()
            .times(1)
            .returning(|| Ok(vec![alarm("a1", false)]));

        let vm = view_model(repo);
        vm.toggle_alarm("a1", false);
        vm.settled().await;

        assert_eq!(vm.current(), vec![alarm("a1", false)]);
    }

    #[tokio::test]
    async fn add_alarm_formats_time_and_reloads() {
        let mut repo = MockAlarmRepository::new();
        repo.expect_create_alarm()
            .withf(|req| req.time == "06:05" && req.label == "gym" && req.is_active)
            .times(1)
            .returning(|_| Ok(alarm("new", true)));
        repo.expect_get_alarms()
            .times(1)
            .returning(|| Ok(vec![alarm("new", true)]));

        let vm = view_model(repo);
        vm.add_alarm(6, 5, "gym", vec![false; 7]);
        vm.settled().await;

        assert_eq!(vm.current().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_skips_reload() {
        let mut repo = MockAlarmRepository::new();
        repo.expect_delete_alarm()
            .times(1)
            .returning(|_| Err(RepoError::new(ErrorKind::Business, "alarm not found")));
        repo.expect_get_alarms().times(0);

        let vm = view_model(repo);
        vm.delete_alarm("gone");
        vm.settled().await;

        assert!(vm.current().is_empty());
    }

    #[tokio::test]
    async fn failed_toggle_is_logged_as_a_toggle() {
        let log = ErrorLog::default();
        let _guard = set_default(Registry::default().with(log.clone()));

        let mut repo = MockAlarmRepository::new();
        repo.expect_toggle_alarm()
            .times(1)
            .returning(|_, _| Err(RepoError::new(ErrorKind::Business, "alarm not found")));
        repo.expect_get_alarms().times(0);

        let vm = view_model(repo);
        vm.toggle_alarm("gone", true);
        vm.settled().await;

        assert_eq!(log.messages(), vec!["failed to toggle alarm: alarm not found"]);
    }

    #[tokio::test]
    async fn destroy_cancels_pending_loads() {
        let mut repo = MockAlarmRepository::new();
        repo.expect_get_alarms().returning(|| Ok(vec![alarm("a1", true)]));

        let vm = view_model(repo);
        vm.destroy();
        vm.load_data();
        vm.settled().await;

        assert!(vm.current().is_empty());
    }
}
