use std::sync::Arc;

use crate::app::error::Result;
use crate::batch::BatchRunner;
use crate::checkpoint::{Checkpointer, GitCheckpointer, NoopCheckpointer};
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::store::CsvStore;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub checkpointer: Arc<dyn Checkpointer>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.api)?);

        let checkpointer: Arc<dyn Checkpointer> = if config.checkpoint.enabled {
            let store = store_for(&config);
            Arc::new(GitCheckpointer::new(
                &config.checkpoint,
                vec![
                    store.output_path().to_path_buf(),
                    store.error_log_path().to_path_buf(),
                ],
            ))
        } else {
            Arc::new(NoopCheckpointer)
        };

        Ok(Self {
            config,
            fetcher,
            checkpointer,
        })
    }

    pub fn store(&self) -> CsvStore {
        store_for(&self.config)
    }

    pub fn batch_runner(&self) -> BatchRunner<CsvStore> {
        BatchRunner::new(
            self.config.batch.clone(),
            self.fetcher.clone(),
            self.checkpointer.clone(),
            self.store(),
        )
    }
}

fn store_for(config: &Config) -> CsvStore {
    CsvStore::new(
        &config.batch.output,
        &config.batch.error_log,
        &config.batch.progress_file,
    )
}
