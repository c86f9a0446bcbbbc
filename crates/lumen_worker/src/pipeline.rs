use std::sync::Arc;

use futures_util::future::join_all;
use lumen_logging::lumen_info;

use crate::fetch::ResourceFetcher;
use crate::sink::NotificationSink;
use crate::translator::{Translator, TranslatorFactory};
use crate::{LoadedResource, ModelResource, PipelineError};

/// Constructs the translation pipeline, reporting resource loads through `sink`.
#[async_trait::async_trait]
pub trait PipelineBuilder: Send + Sync {
    async fn build(&self, sink: &dyn NotificationSink) -> Result<Box<dyn Translator>, PipelineError>;
}

/// Fetches every resource concurrently, then hands them to a factory.
pub struct ResourcePipelineBuilder {
    fetcher: Arc<dyn ResourceFetcher>,
    resources: Vec<ModelResource>,
    factory: Arc<dyn TranslatorFactory>,
}

impl ResourcePipelineBuilder {
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        resources: Vec<ModelResource>,
        factory: Arc<dyn TranslatorFactory>,
    ) -> Self {
        Self {
            fetcher,
            resources,
            factory,
        }
    }
}

#[async_trait::async_trait]
impl PipelineBuilder for ResourcePipelineBuilder {
    async fn build(&self, sink: &dyn NotificationSink) -> Result<Box<dyn Translator>, PipelineError> {
        let fetches = self
            .resources
            .iter()
            .map(|resource| self.fetcher.fetch(resource, sink));
        let results = join_all(fetches).await;

        let mut loaded: Vec<LoadedResource> = Vec::with_capacity(results.len());
        for (resource, result) in self.resources.iter().zip(results) {
            let resource_loaded = result.map_err(|source| PipelineError::Resource {
                file: resource.file.clone(),
                source,
            })?;
            loaded.push(resource_loaded);
        }
        lumen_info!("Loaded {} pipeline resources", loaded.len());

        self.factory.create(&loaded)
    }
}
