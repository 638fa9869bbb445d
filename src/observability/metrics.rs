use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub rides_requested_total: IntCounterVec,
    pub accept_attempts_total: IntCounterVec,
    pub open_rides: IntGauge,
    pub candidate_drivers: Histogram,
    pub notifications_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let rides_requested_total = IntCounterVec::new(
            Opts::new("rides_requested_total", "Ride requests by outcome"),
            &["outcome"],
        )
        .expect("valid rides_requested_total metric");

        let accept_attempts_total = IntCounterVec::new(
            Opts::new("accept_attempts_total", "Accept attempts by outcome"),
            &["outcome"],
        )
        .expect("valid accept_attempts_total metric");

        let open_rides = IntGauge::new("open_rides", "Rides not yet in a terminal status")
            .expect("valid open_rides metric");

        let candidate_drivers = Histogram::with_opts(
            HistogramOpts::new(
                "candidate_drivers",
                "Candidate drivers found per ride request",
            )
            .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
        )
        .expect("valid candidate_drivers metric");

        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Notification deliveries by result"),
            &["result"],
        )
        .expect("valid notifications_total metric");

        registry
            .register(Box::new(rides_requested_total.clone()))
            .expect("register rides_requested_total");
        registry
            .register(Box::new(accept_attempts_total.clone()))
            .expect("register accept_attempts_total");
        registry
            .register(Box::new(open_rides.clone()))
            .expect("register open_rides");
        registry
            .register(Box::new(candidate_drivers.clone()))
            .expect("register candidate_drivers");
        registry
            .register(Box::new(notifications_total.clone()))
            .expect("register notifications_total");

        Self {
            registry,
            rides_requested_total,
            accept_attempts_total,
            open_rides,
            candidate_drivers,
            notifications_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
