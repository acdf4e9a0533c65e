use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::instagram::InstagramClient;

/// Initialize and start the scheduler
pub async fn start_scheduler(config: Arc<Config>, client: InstagramClient) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    if client.access_token().await.is_some() {
        info!(
            "Scheduling Instagram token refresh (cron: {})",
            config.token_refresh_schedule
        );

        let job = Job::new_async(config.token_refresh_schedule.as_str(), move |_uuid, _l| {
            let client = client.clone();

            Box::pin(async move {
                info!("⏰ Token refresh triggered");
                if let Err(e) = run_token_refresh(&client).await {
                    error!("Token refresh failed: {}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
    } else {
        warn!("No Instagram access token configured, token refresh not scheduled");
    }

    scheduler.start().await?;
    info!("✓ Scheduler started");

    Ok(scheduler)
}

/// Refresh the long-lived Instagram token in place
pub async fn run_token_refresh(client: &InstagramClient) -> Result<()> {
    client.refresh_access_token().await?;
    Ok(())
}
