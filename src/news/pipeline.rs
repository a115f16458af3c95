// src/news/pipeline.rs
//! Sequential fetch chain: articles → reports → blogs.
//!
//! Stage N+1 starts only after stage N's result has been stored. The first
//! failure ends the chain; whatever earlier stages stored stays stored.

use thiserror::Error;

use super::{fetch_list, NewsItem, NewsKind};
use crate::config::Endpoints;
use crate::error::FetchError;
use crate::fetch::JsonFetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsStage {
    pub kind: NewsKind,
    pub url: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind:?} stage failed: {error}")]
pub struct StageFailure {
    pub kind: NewsKind,
    pub error: FetchError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every stage fetched and stored.
    Completed,
    /// The sink declined a result (its screen was dismissed); later stages
    /// were not started.
    Abandoned { at: NewsKind },
}

#[derive(Debug, Clone)]
pub struct NewsPipeline {
    stages: Vec<NewsStage>,
}

impl NewsPipeline {
    pub fn new(stages: Vec<NewsStage>) -> Self {
        Self { stages }
    }

    pub fn from_endpoints(ep: &Endpoints) -> Self {
        Self::new(vec![
            NewsStage {
                kind: NewsKind::Article,
                url: ep.articles.clone(),
            },
            NewsStage {
                kind: NewsKind::Report,
                url: ep.reports.clone(),
            },
            NewsStage {
                kind: NewsKind::Blog,
                url: ep.blogs.clone(),
            },
        ])
    }

    pub fn stages(&self) -> &[NewsStage] {
        &self.stages
    }

    /// Run the stages in order. `store` receives each stage's items and
    /// returns `false` to stop the chain.
    pub async fn run<F>(&self, fetcher: &dyn JsonFetcher, mut store: F) -> Result<PipelineOutcome, StageFailure>
    where
        F: FnMut(NewsKind, Vec<NewsItem>) -> bool + Send,
    {
        for stage in &self.stages {
            tracing::debug!(kind = stage.kind.as_str(), "news stage start");
            let items = fetch_list(fetcher, stage.kind, &stage.url)
                .await
                .map_err(|error| StageFailure {
                    kind: stage.kind,
                    error,
                })?;
            tracing::info!(kind = stage.kind.as_str(), count = items.len(), "news stage stored");
            if !store(stage.kind, items) {
                return Ok(PipelineOutcome::Abandoned { at: stage.kind });
            }
        }
        Ok(PipelineOutcome::Completed)
    }
}
