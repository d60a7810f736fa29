use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use once_cell::sync::Lazy;

// Global registry and metrics are initialized lazily.
static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::new_custom(Some("gatherflow".to_string()), None).expect("valid registry prefix")
});

fn counter(name: &str, help: &str) -> CounterVec {
    let c = CounterVec::new(Opts::new(name, help), &["job"]).expect("valid counter options");
    REGISTRY.register(Box::new(c.clone())).ok();
    c
}

static JOB_DURATION_MS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new("job_duration_ms", "Job run duration in milliseconds");
    let hist = HistogramVec::new(opts, &["job"]).expect("valid histogram options");
    REGISTRY.register(Box::new(hist.clone())).ok();
    hist
});

static JOB_RUNS: Lazy<CounterVec> = Lazy::new(|| counter("job_runs_total", "Total job runs"));
static JOB_FAILURES: Lazy<CounterVec> =
    Lazy::new(|| counter("job_failures_total", "Job runs that failed or timed out"));
static JOB_SKIPPED: Lazy<CounterVec> =
    Lazy::new(|| counter("job_skipped_total", "Triggers dropped because the job was still running"));
static JOB_ITEMS: Lazy<CounterVec> =
    Lazy::new(|| counter("job_items_total", "Items produced by successful runs"));

/// Observe a job run duration in milliseconds.
pub fn observe_duration(job: &str, duration_ms: f64) {
    JOB_DURATION_MS.with_label_values(&[job]).observe(duration_ms);
}

pub fn inc_run(job: &str) {
    JOB_RUNS.with_label_values(&[job]).inc();
}

pub fn inc_failure(job: &str) {
    JOB_FAILURES.with_label_values(&[job]).inc();
}

pub fn inc_skipped(job: &str) {
    JOB_SKIPPED.with_label_values(&[job]).inc();
}

pub fn add_items(job: &str, items: u64) {
    JOB_ITEMS.with_label_values(&[job]).inc_by(items as f64);
}

/// Gather metrics as text in Prometheus exposition format.
///
/// ```no_run
/// use gatherflow_core::metrics;
/// metrics::inc_run("example_job");
/// println!("{}", metrics::gather_text().unwrap_or_default());
/// ```
pub fn gather_text() -> prometheus::Result<String> {
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    TextEncoder::new().encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
