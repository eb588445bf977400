use crate::market::Marketplace;
use crate::trader::Trader;
use crate::Result;
use log::error;
use std::future::Future;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

pub struct Scheduler<M> {
    trader: Arc<Trader<M>>,
    scheduler: JobScheduler,
}

impl<M: Marketplace + 'static> Scheduler<M> {
    pub async fn new(trader: Trader<M>) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Scheduler {
            trader: Arc::new(trader),
            scheduler,
        })
    }

    pub async fn schedule_task<F, Fut>(&self, schedule: &str, task: F) -> Result<()>
    where
        F: Fn(Arc<Trader<M>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let trader = Arc::clone(&self.trader);

        self.scheduler
            .add(Job::new_async(schedule, move |_uuid, _l| {
                let fut = task(Arc::clone(&trader));
                Box::pin(async move {
                    if let Err(e) = fut.await {
                        error!("Error executing scheduled task: {e}");
                    }
                })
            })?)
            .await?;

        Ok(())
    }

    async fn schedule_tasks(&self) -> Result<()> {
        let schedule = self.trader.config().update_schedule.clone();
        self.schedule_task(&schedule, |trader| async move {
            let session = trader.sign_in().await?;
            trader.update_listings(&session).await?.log_summary();
            Ok(())
        })
        .await
    }

    /// Runs the scheduled repricing until Ctrl-C.
    pub async fn start(mut self) -> Result<()> {
        self.schedule_tasks().await?;
        self.scheduler.start().await?;
        log::info!(
            "Repricing listings {}, press Ctrl-C to stop",
            self.trader.config().update_schedule
        );

        tokio::signal::ctrl_c().await?;
        log::info!("Shutting down scheduler");
        Ok(self.scheduler.shutdown().await?)
    }
}
