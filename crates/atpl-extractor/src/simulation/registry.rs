//! One simulation task per running job.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::jobs::JobStore;

use super::{tick, SimulationConfig, SourceFactory, TickOutcome};

struct RunningSimulation {
    generation: u64,
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Tracks the simulation task of every running job.
///
/// At most one task exists per job. Cancelling removes the entry right away;
/// a finished task removes its own entry unless a newer one replaced it.
#[derive(Clone)]
pub struct SimulationRegistry {
    store: JobStore,
    config: Arc<SimulationConfig>,
    sources: SourceFactory,
    tasks: Arc<Mutex<HashMap<String, RunningSimulation>>>,
    next_generation: Arc<AtomicU64>,
}

impl SimulationRegistry {
    pub fn new(store: JobStore, config: SimulationConfig, sources: SourceFactory) -> Self {
        Self {
            store,
            config: Arc::new(config),
            sources,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<String, RunningSimulation>> {
        match self.tasks.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Simulation registry lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Spawns the tick loop for `job_id`. Returns false if one is already
    /// running. Must be called from within a tokio runtime.
    pub fn launch(&self, job_id: &str) -> bool {
        let mut tasks = self.tasks();
        if let Some(existing) = tasks.get(job_id) {
            if !existing.handle.is_finished() {
                return false;
            }
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            self.clone(),
            job_id.to_string(),
            generation,
            cancel_rx,
        ));

        tasks.insert(
            job_id.to_string(),
            RunningSimulation {
                generation,
                cancel,
                handle,
            },
        );
        log::debug!("Launched simulation for job {} (gen {})", job_id, generation);
        true
    }

    /// Signals the job's task to stop. Returns false if none was running.
    pub fn cancel(&self, job_id: &str) -> bool {
        match self.tasks().remove(job_id) {
            Some(running) => {
                let _ = running.cancel.send(true);
                log::debug!("Cancelled simulation for job {}", job_id);
                true
            }
            None => false,
        }
    }

    /// Cancels every task and waits for them to exit.
    pub async fn cancel_all(&self) {
        let drained: Vec<(String, RunningSimulation)> = self.tasks().drain().collect();
        if drained.is_empty() {
            return;
        }

        log::info!("Stopping {} simulation task(s)", drained.len());
        for (_, running) in &drained {
            let _ = running.cancel.send(true);
        }
        for (job_id, running) in drained {
            if let Err(e) = running.handle.await {
                log::warn!("Simulation task for job {} ended abnormally: {}", job_id, e);
            }
        }
    }

    pub fn is_active(&self, job_id: &str) -> bool {
        self.tasks()
            .get(job_id)
            .is_some_and(|running| !running.handle.is_finished())
    }

    pub fn active_count(&self) -> usize {
        self.tasks()
            .values()
            .filter(|running| !running.handle.is_finished())
            .count()
    }

    fn finished(&self, job_id: &str, generation: u64) {
        let mut tasks = self.tasks();
        if tasks
            .get(job_id)
            .is_some_and(|running| running.generation == generation)
        {
            tasks.remove(job_id);
        }
    }
}

async fn run_loop(
    registry: SimulationRegistry,
    job_id: String,
    generation: u64,
    mut cancel: watch::Receiver<bool>,
) {
    let period = registry.config.tick_interval();
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut source = (registry.sources)();

    loop {
        // Cancellation is checked first so a stale loop never ticks again.
        tokio::select! {
            biased;
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    log::debug!("Simulation for job {} cancelled", job_id);
                    break;
                }
            }
            _ = interval.tick() => {
                match tick(&registry.store, &job_id, source.as_mut(), &registry.config) {
                    Ok(TickOutcome::Continue) => {}
                    Ok(TickOutcome::Finished) => break,
                    Ok(TickOutcome::Halted) => {
                        log::debug!("Simulation for job {} halted", job_id);
                        break;
                    }
                    Err(e) => {
                        log::error!("Simulation error for job {}: {}", job_id, e);
                        if let Err(fail_err) = registry.store.fail(&job_id, &e.to_string()) {
                            log::warn!("Could not mark job {} as failed: {}", job_id, fail_err);
                        }
                        break;
                    }
                }
            }
        }
    }

    registry.finished(&job_id, generation);
}
