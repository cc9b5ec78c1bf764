use crate::error::{ErrorContext, Result};
use crate::filter::DedupFilter;
use crate::generator::{CandidateGenerator, Target};
use crate::producer::produce;
use crate::service::{ActivityFlag, BaseService, Service, ServiceState};
use crate::types::{Config, Request};
use async_trait::async_trait;
use log::{debug, trace, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const SERVICE_NAME: &str = "Brute Forcing Service";

/// Worker stage that turns root domains and discovered names into
/// brute-force candidates.
///
/// Inbound requests are handled on their own tasks so intake never waits on
/// admission, production or a slow downstream consumer.
pub struct BruteForceService {
    base: BaseService,
    worker: Arc<Worker>,
    input: Mutex<Option<mpsc::Receiver<Request>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// State shared by every task the service spawns.
struct Worker {
    config: Arc<Config>,
    // Subdomains that have been worked on by brute forcing
    subdomains: DedupFilter,
    output: mpsc::Sender<Request>,
    active: ActivityFlag,
    dispatch_limit: Semaphore,
    delivery_limit: Arc<Semaphore>,
}

impl BruteForceService {
    pub fn new(
        input: mpsc::Receiver<Request>,
        output: mpsc::Sender<Request>,
        config: Arc<Config>,
    ) -> Self {
        Self::with_filter(input, output, config, DedupFilter::new())
    }

    /// Build the service around an existing filter, e.g. one pre-seeded with
    /// names another run already covered.
    pub fn with_filter(
        input: mpsc::Receiver<Request>,
        output: mpsc::Sender<Request>,
        config: Arc<Config>,
        subdomains: DedupFilter,
    ) -> Self {
        let base = BaseService::new(SERVICE_NAME);

        if config.brute_forcing && config.wordlist.is_empty() {
            warn!("{}: brute forcing enabled with an empty wordlist", SERVICE_NAME);
        }

        let worker = Arc::new(Worker {
            dispatch_limit: Semaphore::new(config.max_in_flight.max(1)),
            delivery_limit: Arc::new(Semaphore::new(config.max_pending_deliveries.max(1))),
            active: base.activity(),
            subdomains,
            output,
            config,
        });

        Self {
            base,
            worker,
            input: Mutex::new(Some(input)),
            handle: Mutex::new(None),
        }
    }

    /// Number of domains and subdomains claimed so far.
    pub fn seen_count(&self) -> usize {
        self.worker.subdomains.len()
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.worker.subdomains.contains(key)
    }
}

#[async_trait]
impl Service for BruteForceService {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn state(&self) -> ServiceState {
        self.base.state()
    }

    fn start(&self) -> Result<()> {
        let runtime = Handle::try_current()
            .in_service(self.name(), || "no tokio runtime available".to_string())?;

        self.base.begin_start()?;

        let input = self
            .input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| self.base.error("inbound channel already taken"))?;

        let task = runtime.spawn(process_requests(
            self.worker.clone(),
            input,
            self.base.quit_signal(),
        ));
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);

        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let was_running = self.base.begin_stop();

        // No further inbound requests once stopped, even if never started.
        drop(self.input.lock().unwrap_or_else(PoisonError::into_inner).take());

        if !was_running {
            return Ok(());
        }

        let task = self.handle.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            task.await
                .in_service(self.name(), || "processing loop failed".to_string())?;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.base.is_active()
    }
}

async fn process_requests(
    worker: Arc<Worker>,
    mut input: mpsc::Receiver<Request>,
    mut quit: watch::Receiver<bool>,
) {
    if *quit.borrow() {
        return;
    }

    let idle = worker.config.idle_timeout;
    let mut ticker = time::interval_at(Instant::now() + idle, idle);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = quit.changed() => {
                if changed.is_err() || *quit.borrow() {
                    break;
                }
            }
            req = input.recv() => {
                let Some(req) = req else {
                    debug!("{}: inbound channel closed", SERVICE_NAME);
                    break;
                };
                worker.active.set(true);
                ticker.reset();

                tokio::spawn(worker.clone().check_for_new_subdomain(req));
            }
            _ = ticker.tick() => {
                if worker.active.swap(false) {
                    debug!("{}: idle", SERVICE_NAME);
                }
            }
        }
    }

    debug!("{}: processing loop exited", SERVICE_NAME);
}

impl Worker {
    async fn check_for_new_subdomain(self: Arc<Self>, req: Request) {
        if !self.config.brute_forcing {
            return;
        }

        let admission = {
            let Ok(_permit) = self.dispatch_limit.acquire().await else {
                return;
            };
            CandidateGenerator::new(&self.subdomains, self.config.recursive).admit(&req)
        };

        // One task per target; the two batches deliver independently.
        for target in admission.targets() {
            tokio::spawn(self.clone().perform_brute_forcing(target));
        }
    }

    async fn perform_brute_forcing(self: Arc<Self>, target: Target) {
        let Ok(_permit) = self.dispatch_limit.acquire().await else {
            return;
        };
        debug!(
            "{}: brute forcing {} (root {})",
            SERVICE_NAME, target.subdomain, target.root
        );

        for req in produce(&target, &self.config.wordlist) {
            // Waiting here pushes backpressure onto this task, not the intake loop.
            let Ok(permit) = self.delivery_limit.clone().acquire_owned().await else {
                return;
            };
            self.send_out(req, permit);
        }
    }

    fn send_out(&self, req: Request, permit: OwnedSemaphorePermit) {
        let output = self.output.clone();
        tokio::spawn(async move {
            trace!("{}: sending {}", SERVICE_NAME, req.name());
            if output.send(req).await.is_err() {
                debug!("{}: downstream closed, candidate dropped", SERVICE_NAME);
            }
            drop(permit);
        });
    }
}
