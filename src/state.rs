use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::content::ContentStore;
use crate::ingest::Ingestor;
use crate::llm::caption::CaptionWriter;
use crate::llm::chat::{ChatModel, HttpChatModel};
use crate::llm::embeddings::{Embedder, HttpEmbedder};
use crate::search::hybrid::HybridSearcher;
use crate::search::tags::TagStore;
use crate::search::vector::VectorStore;
use crate::search::{TagIndex, VectorIndex};
use crate::tagging::TagExtractor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub records: Arc<ContentStore>,
    pub embedder: Arc<dyn Embedder>,
    pub tagger: TagExtractor,
    pub captions: CaptionWriter,
    pub searcher: HybridSearcher,
    pub ingestor: Ingestor,
}

impl AppState {
    /// Production wiring: HTTP provider clients and file-backed stores.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.llm.request_timeout_secs))
            .build()?;

        let embedder = Arc::new(HttpEmbedder::new(http_client.clone(), config.llm.clone()));
        let chat = Arc::new(HttpChatModel::new(http_client, config.llm.clone()));
        Self::with_providers(config, embedder, chat)
    }

    /// Wire the stores around caller-supplied providers.
    pub fn with_providers(
        config: Config,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let records = Arc::new(ContentStore::open_or_create(&config.content_path())?);
        let vectors: Arc<dyn VectorIndex> = Arc::new(VectorStore::open_or_create(
            &config.vector_path(),
            records.clone(),
            embedder.dimension(),
        )?);
        let tags: Arc<dyn TagIndex> =
            Arc::new(TagStore::open_or_create(&config.tag_index_path(), records.clone())?);
        tracing::info!("Loaded {} content records", records.item_count());

        let tagger = TagExtractor::new(chat.clone());
        let searcher = HybridSearcher::new(
            embedder.clone(),
            chat.clone(),
            vectors.clone(),
            tags.clone(),
            &config.search,
        );
        let ingestor = Ingestor::new(
            tagger.clone(),
            embedder.clone(),
            records.clone(),
            vectors,
            tags,
            &config.search,
        );

        Ok(Self {
            config: Arc::new(config),
            records,
            embedder,
            tagger,
            captions: CaptionWriter::new(chat),
            searcher,
            ingestor,
        })
    }
}
