use crate::domain::{AccessPoint, Fix, LocationCandidate, ProviderAvailability};
use crate::geolocation::{GeolocationResolver, ResolverError};
use crate::last_known_location::LastKnownLocation;
use crate::notifier::{FailureReport, FailureReporter, ReportError};
use crate::platform::{BackgroundService, CapabilityProvider, LocationServiceClient, Permission, Provider, WifiScanner};
use crate::retry::{Interrupted, Sleeper};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn access_point(mac_address: &str) -> AccessPoint {
    AccessPoint {
        ssid: "ssid".to_string(),
        mac_address: mac_address.to_string(),
        signal_strength: -50,
        channel: Some(6),
    }
}

#[derive(Debug)]
pub struct FakeCapabilities {
    availability: Mutex<ProviderAvailability>,
}

impl FakeCapabilities {
    pub fn new(availability: ProviderAvailability) -> Self {
        FakeCapabilities {
            availability: Mutex::new(availability),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut ProviderAvailability)) {
        f(&mut self.availability.lock().unwrap());
    }

    fn current(&self) -> ProviderAvailability {
        *self.availability.lock().unwrap()
    }
}

impl CapabilityProvider for FakeCapabilities {
    fn is_provider_enabled(&self, provider: Provider) -> bool {
        match provider {
            Provider::Gps => self.current().gps_enabled,
            Provider::Network => self.current().network_enabled,
        }
    }

    fn is_wifi_enabled(&self) -> bool {
        self.current().wifi_enabled
    }

    fn has_permission(&self, permission: Permission) -> bool {
        match permission {
            Permission::FineLocation => self.current().fine_location_granted,
            Permission::CoarseLocation => self.current().coarse_location_granted,
        }
    }

    fn is_location_client_reachable(&self) -> bool {
        self.current().location_client_reachable
    }

    fn requires_runtime_permissions(&self) -> bool {
        self.current().runtime_permission_gating
    }
}

#[derive(Debug)]
enum ClientScript {
    ResolvingAt(usize, Fix),
    PopulatedByInit(Fix),
    NeverResolving,
    HangingInit,
    Panicking,
}

#[derive(Debug)]
pub struct ScriptedLocationClient {
    script: ClientScript,
    slot: LastKnownLocation<Fix>,
    polls: AtomicUsize,
    inits: AtomicUsize,
}

impl ScriptedLocationClient {
    fn new(script: ClientScript) -> Self {
        ScriptedLocationClient {
            script,
            slot: LastKnownLocation::new(),
            polls: AtomicUsize::new(0),
            inits: AtomicUsize::new(0),
        }
    }

    /// Reports `fix` from poll `attempt` onwards.
    pub fn resolving_at(attempt: usize, fix: Fix) -> Self {
        Self::new(ClientScript::ResolvingAt(attempt, fix))
    }

    pub fn populated_by_init(fix: Fix) -> Self {
        Self::new(ClientScript::PopulatedByInit(fix))
    }

    pub fn never_resolving() -> Self {
        Self::new(ClientScript::NeverResolving)
    }

    pub fn hanging_init() -> Self {
        Self::new(ClientScript::HangingInit)
    }

    pub fn panicking() -> Self {
        Self::new(ClientScript::Panicking)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationServiceClient for ScriptedLocationClient {
    async fn init(&self) {
        self.inits.fetch_add(1, Ordering::SeqCst);
        match self.script {
            ClientScript::PopulatedByInit(fix) => self.slot.set(fix),
            ClientScript::HangingInit => std::future::pending::<()>().await,
            _ => {}
        }
    }

    fn last_location(&self) -> Option<Fix> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.script {
            ClientScript::ResolvingAt(attempt, fix) if poll >= attempt => Some(fix),
            ClientScript::Panicking => panic!("location service client crashed"),
            _ => self.slot.get(),
        }
    }
}

#[derive(Debug)]
enum ServiceScript {
    ValidAt(usize, LocationCandidate),
    NeverValid,
    Panicking,
}

#[derive(Debug)]
pub struct ScriptedBackgroundService {
    script: ServiceScript,
    polls: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ScriptedBackgroundService {
    fn new(script: ServiceScript) -> Self {
        ScriptedBackgroundService {
            script,
            polls: AtomicUsize::new(0),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn valid_at(attempt: usize, candidate: LocationCandidate) -> Self {
        Self::new(ServiceScript::ValidAt(attempt, candidate))
    }

    pub fn never_valid() -> Self {
        Self::new(ServiceScript::NeverValid)
    }

    pub fn panicking() -> Self {
        Self::new(ServiceScript::Panicking)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl BackgroundService for ScriptedBackgroundService {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn last_location(&self) -> LocationCandidate {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.script {
            ServiceScript::ValidAt(attempt, candidate) if poll >= attempt => candidate,
            ServiceScript::Panicking => panic!("background service crashed"),
            _ => LocationCandidate::invalid(),
        }
    }
}

#[derive(Debug)]
pub struct FakeScanner {
    results: Option<Vec<AccessPoint>>,
}

impl FakeScanner {
    pub fn new(results: Option<Vec<AccessPoint>>) -> Self {
        FakeScanner { results }
    }
}

impl WifiScanner for FakeScanner {
    fn scan_results(&self) -> Option<Vec<AccessPoint>> {
        self.results.clone()
    }
}

#[derive(Debug)]
pub struct FakeResolver {
    results: Vec<Option<LocationCandidate>>,
    received: Mutex<Vec<Vec<AccessPoint>>>,
}

impl FakeResolver {
    fn new(results: Vec<Option<LocationCandidate>>) -> Self {
        FakeResolver {
            results,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn resolving(candidate: LocationCandidate) -> Self {
        Self::new(vec![Some(candidate)])
    }

    /// Answers with `candidates` in order, repeating the last one.
    pub fn resolving_in_turn(candidates: Vec<LocationCandidate>) -> Self {
        Self::new(candidates.into_iter().map(Some).collect())
    }

    pub fn failing() -> Self {
        Self::new(vec![None])
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<Vec<AccessPoint>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeolocationResolver for FakeResolver {
    async fn resolve(&self, access_points: &[AccessPoint]) -> Result<LocationCandidate, ResolverError> {
        let call = {
            let mut received = self.received.lock().unwrap();
            received.push(access_points.to_vec());
            received.len() - 1
        };

        self.results
            .get(call)
            .or(self.results.last())
            .copied()
            .flatten()
            .ok_or_else(|| ResolverError::InvalidLocation("unresolvable".to_string()))
    }
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    failing: bool,
    reports: Mutex<Vec<FailureReport>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        RecordingReporter::default()
    }

    pub fn failing() -> Self {
        RecordingReporter {
            failing: true,
            reports: Mutex::new(Vec::new()),
        }
    }

    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl FailureReporter for RecordingReporter {
    async fn report(&self, report: &FailureReport) -> Result<(), ReportError> {
        self.reports.lock().unwrap().push(report.clone());
        if self.failing {
            return Err(ReportError::Rejected(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(())
    }
}

/// Records requested waits and returns immediately, after giving other tasks a chance to run.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
    interrupt_at: Option<usize>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        RecordingSleeper::default()
    }

    /// Interrupts the `n`th wait (1-based).
    pub fn interrupting_at(n: usize) -> Self {
        RecordingSleeper {
            sleeps: Mutex::new(Vec::new()),
            interrupt_at: Some(n),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };

        if self.interrupt_at == Some(count) {
            return Err(Interrupted);
        }

        tokio::task::yield_now().await;
        Ok(())
    }
}
