// file: src/main.rs
// description: commandline application entry point running the RAG demos
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rag_assistant::config::{EmbeddingProvider, SplitterKind};
use rag_assistant::utils::logging::{
    format_assistant, format_info, format_step, format_success, format_user,
    format_warning,
};
use rag_assistant::{
    AiClassifierQueryRouter, Assistant, ChatModel, Config, ContentRetriever, DefaultQueryRouter,
    DefaultRetrievalAugmentor, DocumentSplitter, EmbeddingModel, EmbeddingSearchRequest,
    EmbeddingStoreContentRetriever, EmbeddingStoreIngestor, FixedSizeSplitter, GeminiChatModel,
    InMemoryEmbeddingStore, LanguageModelQueryRouter, MessageWindowChatMemory, QueryRouter,
    TavilyWebSearchEngine, Validator, WebSearchContentRetriever, console, embedding, parser, splitter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::BufReader;
use tracing::{info, warn};

const RAG_DESCRIPTION: &str = "Contains information about fine-tuning Retrieval Augmented \
     Generation (RAG) models, large language models, and natural language processing.";
const REST_DESCRIPTION: &str =
    "Contains information about RESTful APIs, web services, and software architecture.";

#[derive(Parser)]
#[command(name = "rag_assistant")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Retrieval-augmented chat over PDF documents with query routing", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Document to ingest (defaults to the first configured document)
    #[arg(short, long, value_name = "PDF")]
    document: Option<PathBuf>,

    /// Load a store saved by `ingest` instead of ingesting a document
    #[arg(long, value_name = "FILE", conflicts_with = "document")]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Single retriever, chat memory, interactive questions
    Naive {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Language-model router choosing between two described documents
    Routing {
        #[arg(long, default_value = "resources/FineTuningRAG.pdf")]
        rag_document: PathBuf,

        #[arg(long, default_value = "resources/RESTfull.pdf")]
        rest_document: PathBuf,

        #[arg(long, default_value_t = 500)]
        segment_size: usize,

        #[arg(long, default_value_t = 0.7)]
        min_score: f64,

        /// Use the offline hashing model instead of Gemini embeddings
        #[arg(long)]
        local_embeddings: bool,

        /// Questions to ask instead of the built-in ones
        #[arg(short, long = "query")]
        queries: Vec<String>,
    },

    /// Skip retrieval when the model says the question is not about AI
    Classify {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Document retriever and web search consulted together
    Web {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Build an embedding store from documents and save it as JSON
    Ingest {
        /// Documents to ingest (defaults to the configured documents)
        documents: Vec<PathBuf>,

        #[arg(short, long, default_value = "data/store.json")]
        output: PathBuf,
    },

    /// Search a saved embedding store by semantic similarity
    Search {
        /// Search query text
        query: String,

        #[arg(long, default_value = "data/store.json")]
        store: PathBuf,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rag_assistant::utils::logging::init_logger(cli.color, cli.verbose);

    info!("RAG assistant");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Naive { source } => {
            cmd_naive(&config, &source).await?;
        }
        Commands::Routing {
            rag_document,
            rest_document,
            segment_size,
            min_score,
            local_embeddings,
            queries,
        } => {
            cmd_routing(
                &config,
                &rag_document,
                &rest_document,
                segment_size,
                min_score,
                local_embeddings,
                queries,
            )
            .await?;
        }
        Commands::Classify { source } => {
            cmd_classify(&config, &source).await?;
        }
        Commands::Web { source } => {
            cmd_web(&config, &source).await?;
        }
        Commands::Ingest { documents, output } => {
            cmd_ingest(&config, documents, &output).await?;
        }
        Commands::Search {
            query,
            store,
            limit,
            min_score,
        } => {
            cmd_search(&config, &query, &store, limit, min_score).await?;
        }
    }

    Ok(())
}

async fn cmd_naive(config: &Config, source: &SourceArgs) -> Result<()> {
    let embedding_model = embedding::from_config(&config.embedding)?;
    let splitter = splitter::from_config(&config.ingestion)?;
    let store = open_store(config, source, splitter, embedding_model.clone()).await?;
    println!(
        "{}",
        format_step(1, 2, &format_success(&format!("Embeddings stored ({} segments)", store.len())))
    );

    let chat_model = build_chat_model(config)?;
    let retriever = document_retriever(config, store, embedding_model, "document");
    let augmentor =
        DefaultRetrievalAugmentor::new(Arc::new(DefaultQueryRouter::new(vec![retriever])));

    let assistant = assistant_builder(config, chat_model)
        .retrieval_augmentor(augmentor)
        .build();

    println!("{}", format_step(2, 2, "Assistant ready. Type 'quitter' to stop."));
    run_repl(&assistant).await
}

async fn cmd_routing(
    config: &Config,
    rag_document: &Path,
    rest_document: &Path,
    segment_size: usize,
    min_score: f64,
    local_embeddings: bool,
    queries: Vec<String>,
) -> Result<()> {
    let mut embedding_config = config.embedding.clone();
    embedding_config.provider = if local_embeddings {
        EmbeddingProvider::Local
    } else {
        EmbeddingProvider::Gemini
    };
    let embedding_model = embedding::from_config(&embedding_config)?;
    let chat_model = build_chat_model(config)?;

    let mut options: Vec<(Arc<dyn ContentRetriever>, String)> = Vec::new();
    for (path, name, description) in [
        (rag_document, "fine-tuning-rag", RAG_DESCRIPTION),
        (rest_document, "restful", REST_DESCRIPTION),
    ] {
        let splitter = Box::new(FixedSizeSplitter::new(segment_size)?);
        let store = ingest_paths(config, &[path.to_path_buf()], splitter, embedding_model.clone())
            .await?;

        let retriever = EmbeddingStoreContentRetriever::new(Arc::new(store), embedding_model.clone())
            .with_name(name)
            .with_max_results(config.retrieval.max_results)
            .with_min_score(min_score);
        options.push((Arc::new(retriever), description.to_string()));
    }

    let router = LanguageModelQueryRouter::new(chat_model.clone(), options);
    let assistant = Assistant::builder(chat_model)
        .retrieval_augmentor(DefaultRetrievalAugmentor::new(Arc::new(router)))
        .build();

    let queries = if queries.is_empty() {
        vec![
            ("AI", "Qu'est-ce que le réglage fin de RAG ?".to_string()),
            ("RESTful API", "Expliquez les principes de REST.".to_string()),
            ("mixed", "Comment l'IA peut-elle être utilisée avec les API RESTful ?".to_string()),
        ]
    } else {
        queries.into_iter().map(|q| ("custom", q)).collect()
    };

    for (label, query) in queries {
        println!("\n--- Query ({}) ---", label);
        println!("{}", format_user(&query));
        let answer = assistant
            .chat(&query)
            .await
            .with_context(|| format!("Failed to answer: {}", query))?;
        println!("{}", format_assistant(&answer));
    }

    Ok(())
}

async fn cmd_classify(config: &Config, source: &SourceArgs) -> Result<()> {
    let embedding_model = embedding::from_config(&config.embedding)?;
    let splitter = splitter::from_config(&config.ingestion)?;
    let store = open_store(config, source, splitter, embedding_model.clone()).await?;
    println!(
        "{}",
        format_success(&format!("Embeddings stored ({} segments)", store.len()))
    );

    let chat_model = build_chat_model(config)?;
    let retriever = document_retriever(config, store, embedding_model, "document");
    let router = AiClassifierQueryRouter::new(chat_model.clone(), retriever);

    let assistant = assistant_builder(config, chat_model)
        .retrieval_augmentor(DefaultRetrievalAugmentor::new(Arc::new(router)))
        .build();

    println!(
        "{}",
        format_info("Questions not about AI are answered without retrieval. Type 'quitter' to stop.")
    );
    run_repl(&assistant).await
}

async fn cmd_web(config: &Config, source: &SourceArgs) -> Result<()> {
    let embedding_model = embedding::from_config(&config.embedding)?;
    let splitter = splitter::from_config(&config.ingestion)?;
    let store = open_store(config, source, splitter, embedding_model.clone()).await?;

    let chat_model = build_chat_model(config)?;
    let tavily_key = config.require_web_search_key()?.to_string();
    Validator::validate_url(&config.web_search.base_url)?;

    let document = document_retriever(config, store, embedding_model, "document");
    let engine = Arc::new(TavilyWebSearchEngine::from_config(&config.web_search, tavily_key));
    let web: Arc<dyn ContentRetriever> = Arc::new(WebSearchContentRetriever::new(
        engine,
        config.web_search.max_results,
    ));

    let router: Arc<dyn QueryRouter> = Arc::new(DefaultQueryRouter::new(vec![document, web]));
    let assistant = assistant_builder(config, chat_model)
        .retrieval_augmentor(DefaultRetrievalAugmentor::new(router))
        .build();

    println!(
        "{}",
        format_info("Every question consults the document and the web. Type 'quitter' to stop.")
    );
    run_repl(&assistant).await
}

async fn cmd_ingest(config: &Config, documents: Vec<PathBuf>, output: &Path) -> Result<()> {
    let documents = if documents.is_empty() {
        config.ingestion.documents.clone()
    } else {
        documents
    };
    if documents.is_empty() {
        return Err(anyhow::anyhow!("No documents given or configured"));
    }

    let start_time = Instant::now();
    let embedding_model = embedding::from_config(&config.embedding)?;
    let splitter = splitter::from_config(&config.ingestion)?;
    let store = ingest_paths(config, &documents, splitter, embedding_model).await?;

    store
        .save_to_file(output)
        .with_context(|| format!("Failed to save store to {}", output.display()))?;

    info!(
        "Ingestion complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    println!(
        "{}",
        format_success(&format!(
            "Saved {} segments from {} document(s) to {}",
            store.len(),
            documents.len(),
            output.display()
        ))
    );
    Ok(())
}

async fn cmd_search(
    config: &Config,
    query: &str,
    store_path: &Path,
    limit: usize,
    min_score: f64,
) -> Result<()> {
    info!("Searching for: {}", query);

    let store = InMemoryEmbeddingStore::load_from_file(store_path)
        .with_context(|| format!("Failed to load store from {}", store_path.display()))?;
    let embedding_model = embedding::from_config(&config.embedding)?;

    let query_embedding = embedding_model
        .embed(query)
        .await
        .context("Failed to embed query")?;
    let results = store
        .search(&EmbeddingSearchRequest::new(query_embedding, limit, min_score))
        .context("Vector search failed")?;

    if results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Lowering --min-score");
        println!("  - Checking that the store was built with the same embedding model");
        return Ok(());
    }

    println!("\nSearch Results for: \"{}\"\n", query);
    println!("Found {} result(s)\n", results.len());
    println!("{}", "=".repeat(80));

    for (idx, result) in results.iter().enumerate() {
        let Some(segment) = &result.embedded else {
            continue;
        };
        let file_name = segment
            .metadata
            .get(rag_assistant::models::metadata::FILE_NAME)
            .unwrap_or("<unknown>");

        println!("\n{}. {} (Score: {:.4})", idx + 1, file_name, result.score);
        if let Some(index) = segment.index() {
            println!("   Segment: {}", index);
        }

        println!("   Preview:");
        for line in Validator::truncate_text(&segment.text, 300).lines().take(5) {
            println!("     {}", line);
        }
    }

    println!("\n{}", "=".repeat(80));
    info!("Search complete");

    Ok(())
}

fn build_chat_model(config: &Config) -> Result<Arc<dyn ChatModel>> {
    let api_key = config.require_chat_key()?.to_string();
    Validator::validate_url(&config.chat.base_url)?;
    info!("Using chat model {}", config.chat.model);
    Ok(Arc::new(GeminiChatModel::from_config(&config.chat, api_key)))
}

fn assistant_builder(
    config: &Config,
    chat_model: Arc<dyn ChatModel>,
) -> rag_assistant::AssistantBuilder {
    let mut builder = Assistant::builder(chat_model).chat_memory(
        MessageWindowChatMemory::with_max_messages(config.assistant.memory_size),
    );
    if let Some(system_message) = &config.assistant.system_message {
        builder = builder.system_message(system_message.clone());
    }
    builder
}

fn document_retriever(
    config: &Config,
    store: InMemoryEmbeddingStore,
    embedding_model: Arc<dyn EmbeddingModel>,
    name: &str,
) -> Arc<dyn ContentRetriever> {
    Arc::new(
        EmbeddingStoreContentRetriever::new(Arc::new(store), embedding_model)
            .with_name(name)
            .with_max_results(config.retrieval.max_results)
            .with_min_score(config.retrieval.min_score),
    )
}

async fn open_store(
    config: &Config,
    source: &SourceArgs,
    splitter: Box<dyn DocumentSplitter>,
    embedding_model: Arc<dyn EmbeddingModel>,
) -> Result<InMemoryEmbeddingStore> {
    if let Some(path) = &source.store {
        return InMemoryEmbeddingStore::load_from_file(path)
            .with_context(|| format!("Failed to load store from {}", path.display()));
    }

    let document = source
        .document
        .clone()
        .or_else(|| config.ingestion.documents.first().cloned())
        .ok_or_else(|| anyhow::anyhow!("No document given (--document) or configured"))?;

    ingest_paths(config, &[document], splitter, embedding_model).await
}

async fn ingest_paths(
    config: &Config,
    paths: &[PathBuf],
    splitter: Box<dyn DocumentSplitter>,
    embedding_model: Arc<dyn EmbeddingModel>,
) -> Result<InMemoryEmbeddingStore> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        Validator::validate_document_path(path)
            .map_err(|e| rag_assistant::RagError::document_load(path, e))?;
        if Validator::validate_pdf_extension(path).is_err() {
            println!(
                "{}",
                format_warning(&format!("{} is not a PDF, reading it as plain text", path.display()))
            );
        }
        let document_parser = parser::parser_for(path);
        let document = parser::load_document(path, document_parser.as_ref())?;
        documents.push(document);
    }

    if config.ingestion.splitter == SplitterKind::Recursive {
        info!(
            "Splitting recursively ({} chars, {} overlap)",
            config.ingestion.segment_size, config.ingestion.overlap
        );
    }

    let ingestor = EmbeddingStoreIngestor::new(splitter, embedding_model)
        .with_batch_size(config.embedding.batch_size)
        .with_progress(
            config.ingestion.show_progress,
            colored::control::SHOULD_COLORIZE.should_colorize(),
        );

    let mut store = InMemoryEmbeddingStore::new();
    let stats = ingestor.ingest(&documents, &mut store).await?;
    info!(
        "Embedded {} segments from {} document(s) in {} ms ({:.1} segments/s, {:.0} chars/segment)",
        stats.segments_embedded,
        stats.documents_ingested,
        stats.duration_ms,
        stats.segments_per_second(),
        stats.average_segment_chars()
    );

    Ok(store)
}

async fn run_repl(assistant: &Assistant) -> Result<()> {
    let asked = console::run(assistant, BufReader::new(tokio::io::stdin())).await?;
    info!("Session ended after {} question(s)", asked);
    Ok(())
}
