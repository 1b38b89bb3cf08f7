mod stats;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use invoicing_sdk::{ClientError, InvoicingClient, NewCustomer, NewInvoice, NewInvoiceItem};
use rand::Rng;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::stats::Summary;

const PRODUCTS: &[&str] = &["Gadget", "Widget", "Sprocket", "Flange"];

/// Load generator driving the invoicing REST API
#[derive(Parser)]
#[command(name = "invoicing-bench")]
#[command(about = "Load generator driving the invoicing REST API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Base URL of a running invoicing server
    #[arg(long, default_value = "http://127.0.0.1:8087")]
    base_url: String,

    /// Concurrent simulated users
    #[arg(long, default_value_t = 10)]
    users: usize,

    /// Iterations per user
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Pause between a user's iterations, in milliseconds
    #[arg(long, default_value_t = 100)]
    pause_ms: u64,

    /// Traffic shape to generate
    #[arg(long, value_enum, default_value = "browse")]
    scenario: Scenario,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// List customers, pause, create one with a unique email
    Browse,
    /// Create customers as fast as the pause allows
    CreateCustomers,
    /// One customer per user, then invoices with varied item lists
    Invoices,
}

fn scenario_name(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Browse => "browse",
        Scenario::CreateCustomers => "create-customers",
        Scenario::Invoices => "invoices",
    }
}

/// Everything the workers share for one run.
struct Run {
    client: InvoicingClient,
    pause: Duration,
    iterations: usize,
    email_seq: AtomicU64,
    // Launch millis, embedded in every generated email so that repeated
    // runs against one database never collide on the unique column.
    email_stamp: i64,
}

impl Run {
    fn next_email(&self) -> String {
        let seq = self.email_seq.fetch_add(1, Ordering::Relaxed);
        format!("perf{}_{seq}@example.com", self.email_stamp)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let client = InvoicingClient::new(&cli.base_url).context("building HTTP client")?;
    // Fail fast when the target is not reachable at all.
    client
        .list_customers()
        .await
        .with_context(|| format!("server not reachable at {}", cli.base_url))?;

    let run = Arc::new(Run {
        client,
        pause: Duration::from_millis(cli.pause_ms),
        iterations: cli.iterations,
        email_seq: AtomicU64::new(0),
        email_stamp: Utc::now().timestamp_millis(),
    });

    tracing::info!(
        scenario = scenario_name(cli.scenario),
        users = cli.users,
        iterations = cli.iterations,
        "Starting load generation"
    );

    let started = Instant::now();
    let mut handles = Vec::with_capacity(cli.users);
    for _ in 0..cli.users {
        let run = Arc::clone(&run);
        handles.push(tokio::spawn(async move {
            match cli.scenario {
                Scenario::Browse => browse_worker(&run).await,
                Scenario::CreateCustomers => create_customers_worker(&run).await,
                Scenario::Invoices => invoices_worker(&run).await,
            }
        }));
    }

    let mut latencies = Vec::new();
    let mut failures = 0;
    for handle in handles {
        let (worker_latencies, worker_failures) = handle.await?;
        latencies.extend(worker_latencies);
        failures += worker_failures;
    }

    let summary = Summary::from_samples(latencies, failures, started.elapsed());
    print_summary(scenario_name(cli.scenario), &summary);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// The original simulation: list the customers, think, sign one up.
async fn browse_worker(run: &Run) -> (Vec<Duration>, usize) {
    let mut latencies = Vec::with_capacity(run.iterations * 2);
    let mut failures = 0;
    for _ in 0..run.iterations {
        record(&mut latencies, &mut failures, run.client.list_customers()).await;
        tokio::time::sleep(run.pause).await;
        let new_customer = customer(run.next_email());
        record(
            &mut latencies,
            &mut failures,
            run.client.create_customer(&new_customer),
        )
        .await;
    }
    (latencies, failures)
}

/// Bulk signup, the "generate customers" button as an API consumer.
async fn create_customers_worker(run: &Run) -> (Vec<Duration>, usize) {
    let mut latencies = Vec::with_capacity(run.iterations);
    let mut failures = 0;
    for _ in 0..run.iterations {
        let new_customer = customer(run.next_email());
        record(
            &mut latencies,
            &mut failures,
            run.client.create_customer(&new_customer),
        )
        .await;
        tokio::time::sleep(run.pause).await;
    }
    (latencies, failures)
}

/// The write-heavy shape: each user owns one customer and files invoices
/// against it, reading every invoice back.
async fn invoices_worker(run: &Run) -> (Vec<Duration>, usize) {
    let mut latencies = Vec::with_capacity(run.iterations * 2 + 1);
    let mut failures = 0;

    let started = Instant::now();
    let customer_id = match run.client.create_customer(&customer(run.next_email())).await {
        Ok(created) => {
            latencies.push(started.elapsed());
            created.id
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not create the worker's customer");
            return (latencies, failures + 1);
        }
    };

    for _ in 0..run.iterations {
        let new_invoice = varied_invoice(customer_id);
        let started = Instant::now();
        match run.client.create_invoice(&new_invoice).await {
            Ok(invoice_id) => {
                latencies.push(started.elapsed());
                record(
                    &mut latencies,
                    &mut failures,
                    run.client.invoice_items(invoice_id),
                )
                .await;
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(error = %e, "request failed");
            }
        }
        tokio::time::sleep(run.pause).await;
    }
    (latencies, failures)
}

async fn record<T, F>(latencies: &mut Vec<Duration>, failures: &mut usize, request: F)
where
    F: Future<Output = Result<T, ClientError>>,
{
    let started = Instant::now();
    match request.await {
        Ok(_) => latencies.push(started.elapsed()),
        Err(e) => {
            *failures += 1;
            tracing::warn!(error = %e, "request failed");
        }
    }
}

fn customer(email: String) -> NewCustomer {
    NewCustomer {
        first_name: "Perf".to_owned(),
        last_name: "User".to_owned(),
        email,
    }
}

fn varied_invoice(customer_id: i32) -> NewInvoice {
    let mut rng = rand::rng();
    let count = rng.random_range(1..=3);
    let items = (0..count)
        .map(|_| NewInvoiceItem {
            product_name: PRODUCTS[rng.random_range(0..PRODUCTS.len())].to_owned(),
            price: Decimal::new(rng.random_range(100_i64..=9999), 2),
            quantity: rng.random_range(1_i32..=5),
        })
        .collect();
    NewInvoice {
        customer_id,
        timestamp: Utc::now(),
        items,
    }
}

fn print_summary(scenario: &str, summary: &Summary) {
    println!("scenario:     {scenario}");
    println!("requests:     {}", summary.requests);
    println!("failures:     {}", summary.failures);
    println!("elapsed:      {:.2}s", summary.elapsed.as_secs_f64());
    println!("throughput:   {:.1} req/s", summary.throughput());
    println!("latency min:  {}ms", summary.min.as_millis());
    println!("latency mean: {}ms", summary.mean.as_millis());
    println!("latency p50:  {}ms", summary.p50.as_millis());
    println!("latency p95:  {}ms", summary.p95.as_millis());
    println!("latency p99:  {}ms", summary.p99.as_millis());
    println!("latency max:  {}ms", summary.max.as_millis());
}
