//! `wavefront-check` -- one-shot threshold check against a Wavefront metric.
//!
//! Queries the average of a metric over a recent time window, prints whether
//! it stays below the threshold, writes an `alert` file when it does not and
//! optionally records `passed`/`failed` in a GitLab CI/CD variable.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default                     |
//! |----------------------------|----------|-----------------------------|
//! | `METRIC`                   | yes      | --                          |
//! | `CLUSTER`                  | yes      | --                          |
//! | `API_TOKEN`                | yes      | --                          |
//! | `POD_NAME` / `CPU`         | no       | --                          |
//! | `SERIES_SELECTION`         | no       | `tag`                       |
//! | `THRESHOLD`                | no       | `1.0`                       |
//! | `TIME_WINDOW`              | no       | `30s`                       |
//! | `GRANULARITY`              | no       | `m`, `h` from a 1h window   |
//! | `ALERT_FILE`               | no       | `alert`                     |
//! | `WAVEFRONT_URL`            | no       | `https://try.wavefront.com` |
//! | `HTTP_TIMEOUT_SECONDS`     | no       | `30`                        |
//! | `GITLAB_TOKEN`             | no       | --                          |
//! | `WAVEFRONT_VARIABLE`       | no       | --                          |
//! | `CI_PROJECT_NAME`          | GitLab   | --                          |
//! | `GITLAB_URL`               | no       | `https://gitlab.com`        |
//! | `GITLAB_PROJECT_NAMESPACE` | no       | `vmware-cloud-advocacy`     |
//! | `CONFIG_PATH`              | no       | --                          |
//!
//! With `CONFIG_PATH` set the check itself (metric, cluster, filters,
//! threshold, window) is read from that YAML file instead.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wavefront_check::check_service::CheckService;
use wavefront_check::error::Result;
use wavefront_check::model::Evaluation;

async fn run() -> Result<Evaluation> {
    let service = CheckService::from_env()?;

    service.run().await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavefront_check=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(evaluation) => println!("{}", evaluation),
        Err(e) => {
            tracing::error!(error = %e, "Check failed");
            std::process::exit(e.exit_code());
        }
    }
}
