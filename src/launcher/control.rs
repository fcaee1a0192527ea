use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::types::{LaunchOutcome, LaunchPhase, LauncherEvent, StopReport};
use crate::config::ReleaseStrategy;
use crate::docker::{CancelToken, ContainerHandle, ContainerRuntime};
use crate::registry::DemoRegistry;

/// Stops and starts demos against a container runtime.
///
/// Holds no authoritative state: every call re-reads the runtime. The
/// last-known container is kept for display only.
pub struct Launcher {
    registry: DemoRegistry,
    runtime: Box<dyn ContainerRuntime>,
    release: ReleaseStrategy,
    last_known: Option<ContainerHandle>,
}

impl Launcher {
    pub fn new<R>(registry: DemoRegistry, runtime: R, release: ReleaseStrategy) -> Self
    where
        R: ContainerRuntime + 'static,
    {
        Self {
            registry,
            runtime: Box::new(runtime),
            release,
            last_known: None,
        }
    }

    pub fn registry(&self) -> &DemoRegistry {
        &self.registry
    }

    /// Container handle from the most recent successful launch.
    pub fn last_known(&self) -> Option<&ContainerHandle> {
        self.last_known.as_ref()
    }

    /// Stop and remove every container belonging to a configured demo.
    ///
    /// Missing containers are skipped. Runtime errors are logged and
    /// collected; the sweep always visits every demo.
    pub fn stop_all_demos(&mut self) -> StopReport {
        info!("stopping all demos");
        let mut report = StopReport::default();

        for demo in self.registry.iter() {
            if !self.teardown(&demo.service_id, &mut report) {
                continue;
            }
            for dependent in &demo.dependents {
                self.teardown(dependent, &mut report);
            }
        }

        self.last_known = None;
        report
    }

    /// Stop and remove one container. Returns whether it existed.
    fn teardown(&self, name: &str, report: &mut StopReport) -> bool {
        let container = match self.runtime.get_container(name) {
            Ok(Some(c)) => c,
            Ok(None) => return false,
            Err(e) => {
                warn!(service = name, error = %e, "container lookup failed");
                report.failures.push((name.to_string(), e.to_string()));
                return false;
            }
        };

        info!(service = name, status = %container.status, "stopping container");
        if let Err(e) = self.runtime.stop_container(&container) {
            warn!(service = name, error = %e, "failed to stop container");
            report.failures.push((name.to_string(), e.to_string()));
            return true;
        }
        if let Err(e) = self.runtime.remove_container(&container) {
            warn!(service = name, error = %e, "failed to remove container");
            report.failures.push((name.to_string(), e.to_string()));
            return true;
        }

        info!(service = name, "container stopped");
        report.stopped.push(name.to_string());
        true
    }

    /// Stop everything, then bring up `selection`.
    pub fn launch_demo(&mut self, selection: Option<&str>) -> LaunchOutcome {
        self.launch_demo_with(selection, &CancelToken::new(), &mut |_| {})
    }

    /// [`launch_demo`](Self::launch_demo) with cancellation and progress
    /// reporting. `observer` sees phase changes and compose output.
    pub fn launch_demo_with(
        &mut self,
        selection: Option<&str>,
        cancel: &CancelToken,
        observer: &mut dyn FnMut(LauncherEvent),
    ) -> LaunchOutcome {
        observer(LauncherEvent::PhaseChanged(LaunchPhase::StoppingAll));
        let report = self.stop_all_demos();

        let Some(name) = selection.map(str::trim).filter(|s| !s.is_empty()) else {
            return LaunchOutcome::NoSelection;
        };

        let demo = match self.registry.resolve(name) {
            Ok(d) => d.clone(),
            Err(e) => {
                warn!(demo = name, "{e}");
                return LaunchOutcome::UnknownDemo {
                    name: name.to_string(),
                };
            }
        };

        observer(LauncherEvent::PhaseChanged(LaunchPhase::Releasing));
        self.wait_for_release(&report);

        observer(LauncherEvent::PhaseChanged(LaunchPhase::Starting {
            demo: demo.display_name.clone(),
        }));
        info!(demo = %demo.display_name, service = %demo.service_id, "launching demo");

        let started = self.runtime.compose_up(&demo.service_id, cancel, &mut |line| {
            debug!(service = %demo.service_id, "{line}");
            observer(LauncherEvent::Log(line.to_string()));
        });

        if let Err(e) = started {
            error!(
                demo = %demo.display_name,
                service = %demo.service_id,
                error = %e,
                "launch failed"
            );
            return LaunchOutcome::Failed {
                demo,
                error: format!("{e:#}"),
            };
        }

        let container = match self.runtime.get_container(&demo.service_id) {
            Ok(found) => found,
            Err(e) => {
                debug!(
                    service = %demo.service_id,
                    error = %e,
                    "could not fetch launched container"
                );
                None
            }
        };
        self.last_known = container.clone();

        info!(demo = %demo.display_name, url = %demo.url, "demo started");
        LaunchOutcome::Started { demo, container }
    }

    fn wait_for_release(&self, report: &StopReport) {
        match self.release {
            ReleaseStrategy::Fixed { delay_ms } => {
                if delay_ms > 0 {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                }
            }
            ReleaseStrategy::Poll {
                interval_ms,
                timeout_ms,
            } => {
                let touched = report.touched();
                let deadline = Instant::now() + Duration::from_millis(timeout_ms);
                loop {
                    if self.all_released(&touched) {
                        return;
                    }
                    if Instant::now() >= deadline {
                        warn!(
                            timeout_ms,
                            services = ?touched,
                            "containers still present after stop; starting anyway"
                        );
                        return;
                    }
                    std::thread::sleep(Duration::from_millis(interval_ms));
                }
            }
        }
    }

    /// True when none of `services` is known to the runtime any more.
    /// Lookup errors count as "not released".
    fn all_released(&self, services: &[&str]) -> bool {
        services
            .iter()
            .all(|service| matches!(self.runtime.get_container(service), Ok(None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::{InMemoryRuntime, RuntimeCall};
    use crate::registry::DemoDescriptor;

    const NO_WAIT: ReleaseStrategy = ReleaseStrategy::Fixed { delay_ms: 0 };

    fn two_demo_registry() -> DemoRegistry {
        DemoRegistry::new(vec![
            DemoDescriptor::new("A", "svc_a", "http://localhost:9001"),
            DemoDescriptor::new("B", "svc_b", "http://localhost:9002"),
        ])
        .unwrap()
    }

    fn launcher(rt: &InMemoryRuntime) -> Launcher {
        Launcher::new(two_demo_registry(), rt.clone(), NO_WAIT)
    }

    #[test]
    fn stop_all_on_empty_runtime_only_looks_up() {
        let rt = InMemoryRuntime::new();
        let report = launcher(&rt).stop_all_demos();
        assert!(report.stopped.is_empty());
        assert!(report.is_clean());
        assert_eq!(
            rt.calls(),
            vec![RuntimeCall::Get("svc_a".into()), RuntimeCall::Get("svc_b".into())]
        );
    }

    #[test]
    fn stop_all_stops_then_removes() {
        let rt = InMemoryRuntime::new();
        rt.start("svc_b");
        let report = launcher(&rt).stop_all_demos();
        assert_eq!(report.stopped, vec!["svc_b".to_string()]);
        assert!(rt.existing().is_empty());
        assert_eq!(
            rt.calls()[1..],
            [
                RuntimeCall::Get("svc_b".into()),
                RuntimeCall::Stop("svc_b".into()),
                RuntimeCall::Remove("svc_b".into()),
            ]
        );
    }

    #[test]
    fn stop_all_ignores_unrelated_containers() {
        let rt = InMemoryRuntime::new();
        rt.start("postgres");
        launcher(&rt).stop_all_demos();
        assert_eq!(rt.running(), vec!["postgres".to_string()]);
    }

    #[test]
    fn launch_starts_selected_service() {
        let rt = InMemoryRuntime::new();
        let mut l = launcher(&rt);
        let outcome = l.launch_demo(Some("A"));
        assert!(outcome.is_started());
        assert!(outcome.message().contains("http://localhost:9001"));
        assert_eq!(rt.running(), vec!["svc_a".to_string()]);
        assert_eq!(l.last_known().map(|c| c.name.as_str()), Some("svc_a"));
    }

    #[test]
    fn launch_trims_selection() {
        let rt = InMemoryRuntime::new();
        assert!(launcher(&rt).launch_demo(Some("  B ")).is_started());
        assert!(rt.is_running("svc_b"));
    }

    #[test]
    fn blank_selection_only_stops() {
        let rt = InMemoryRuntime::new();
        let mut l = launcher(&rt);
        assert_eq!(l.launch_demo(Some("")), LaunchOutcome::NoSelection);
        assert_eq!(l.launch_demo(None), LaunchOutcome::NoSelection);
        assert!(
            rt.calls()
                .iter()
                .all(|c| matches!(c, RuntimeCall::Get(_)))
        );
    }

    #[test]
    fn unknown_selection_starts_nothing() {
        let rt = InMemoryRuntime::new();
        let outcome = launcher(&rt).launch_demo(Some("Z"));
        assert_eq!(outcome, LaunchOutcome::UnknownDemo { name: "Z".into() });
        assert!(!rt.calls().iter().any(|c| matches!(c, RuntimeCall::ComposeUp(_))));
    }

    #[test]
    fn failed_compose_reports_generic_failure() {
        let rt = InMemoryRuntime::new();
        rt.start("svc_b");
        rt.fail_compose_for("svc_a");
        let mut l = launcher(&rt);
        let outcome = l.launch_demo(Some("A"));
        match &outcome {
            LaunchOutcome::Failed { error, .. } => assert!(error.contains("svc_a")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(outcome.message(), "❌ Error launching A. Check logs for details.");
        assert!(rt.running().is_empty());
        assert!(l.last_known().is_none());
    }

    #[test]
    fn cancelled_launch_fails() {
        let rt = InMemoryRuntime::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = launcher(&rt).launch_demo_with(Some("A"), &cancel, &mut |_| {});
        assert_eq!(outcome.status(), "failed");
        assert!(rt.running().is_empty());
    }

    #[test]
    fn observer_sees_phases_in_order() {
        let rt = InMemoryRuntime::new();
        let mut events = Vec::new();
        launcher(&rt).launch_demo_with(Some("A"), &CancelToken::new(), &mut |e| events.push(e));
        assert_eq!(events[0], LauncherEvent::PhaseChanged(LaunchPhase::StoppingAll));
        assert_eq!(events[1], LauncherEvent::PhaseChanged(LaunchPhase::Releasing));
        assert_eq!(
            events[2],
            LauncherEvent::PhaseChanged(LaunchPhase::Starting { demo: "A".into() })
        );
        assert!(matches!(events[3], LauncherEvent::Log(_)));
    }

    #[test]
    fn dependents_torn_down_with_primary() {
        let registry = DemoRegistry::new(vec![
            DemoDescriptor::new("Chat", "chat", "http://c").with_dependents(["model"]),
        ])
        .unwrap();
        let rt = InMemoryRuntime::new().with_compose_deps("chat", ["model"]);
        let mut l = Launcher::new(registry, rt.clone(), NO_WAIT);
        l.launch_demo(Some("Chat"));
        assert_eq!(rt.running(), vec!["chat".to_string(), "model".to_string()]);

        let report = l.stop_all_demos();
        assert_eq!(report.stopped, vec!["chat".to_string(), "model".to_string()]);
        assert!(rt.existing().is_empty());
    }

    #[test]
    fn orphaned_dependent_left_alone() {
        let registry = DemoRegistry::new(vec![
            DemoDescriptor::new("Chat", "chat", "http://c").with_dependents(["model"]),
        ])
        .unwrap();
        let rt = InMemoryRuntime::new();
        rt.start("model");
        Launcher::new(registry, rt.clone(), NO_WAIT).stop_all_demos();
        assert!(rt.is_running("model"));
    }

    #[test]
    fn poll_release_returns_once_clear() {
        let rt = InMemoryRuntime::new();
        rt.start("svc_a");
        let mut l = Launcher::new(
            two_demo_registry(),
            rt.clone(),
            ReleaseStrategy::Poll {
                interval_ms: 1,
                timeout_ms: 1_000,
            },
        );
        let started = Instant::now();
        assert!(l.launch_demo(Some("B")).is_started());
        assert!(started.elapsed() < Duration::from_millis(900));
        assert_eq!(rt.running(), vec!["svc_b".to_string()]);
    }

    #[test]
    fn poll_release_ignores_untouched_sidecar() {
        let registry = DemoRegistry::new(vec![
            DemoDescriptor::new("Chat", "chat", "http://c").with_dependents(["model"]),
            DemoDescriptor::new("A", "svc_a", "http://a"),
        ])
        .unwrap();
        let rt = InMemoryRuntime::new();
        rt.start("model");
        let mut l = Launcher::new(
            registry,
            rt.clone(),
            ReleaseStrategy::Poll {
                interval_ms: 10,
                timeout_ms: 1_500,
            },
        );
        let started = Instant::now();
        assert!(l.launch_demo(Some("A")).is_started());
        assert!(started.elapsed() < Duration::from_millis(1_000));
        assert_eq!(rt.running(), vec!["model".to_string(), "svc_a".to_string()]);
    }

    #[test]
    fn poll_release_gives_up_after_timeout() {
        let rt = InMemoryRuntime::new();
        rt.start("svc_a");
        rt.fail_stop_for("svc_a");
        let mut l = Launcher::new(
            two_demo_registry(),
            rt.clone(),
            ReleaseStrategy::Poll {
                interval_ms: 5,
                timeout_ms: 50,
            },
        );
        let started = Instant::now();
        assert!(l.launch_demo(Some("B")).is_started());
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(rt.running(), vec!["svc_a".to_string(), "svc_b".to_string()]);
    }
}
