// file: src/pipeline/orchestrator.rs
// description: coordinates extraction, chunking, prompting and model calls into one summary
// reference: orchestrates the single-document summarization workflow

use crate::chunking::ChunkSplitter;
use crate::config::{CombineStrategy, Config};
use crate::error::{Result, SummarizeError};
use crate::extractor::PdfExtractor;
use crate::llm::{GeminiClient, ModelClient};
use crate::models::{Chunk, SourceDocument, Summary, SummaryStats, TextSegment};
use crate::pipeline::progress::ProgressTracker;
use crate::pipeline::prompt::PromptTemplate;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Separator placed between partial results.
pub const PARTIAL_SEPARATOR: &str = "\n\n";

pub struct Summarizer<C> {
    client: C,
    extractor: PdfExtractor,
    splitter: ChunkSplitter,
    strategy: CombineStrategy,
    concurrency: usize,
    progress: Option<Arc<ProgressTracker>>,
}

impl Summarizer<GeminiClient> {
    /// Fails with a configuration error when the credential or chunk sizes
    /// are invalid, before any document is touched.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = GeminiClient::from_config(&config.model)?;
        let splitter = ChunkSplitter::from_config(&config.chunking)?;

        Ok(Self::new(client, splitter)
            .with_strategy(config.summary.strategy)
            .with_concurrency(config.summary.concurrency))
    }
}

impl<C: ModelClient> Summarizer<C> {
    pub fn new(client: C, splitter: ChunkSplitter) -> Self {
        Self {
            client,
            extractor: PdfExtractor::new(),
            splitter,
            strategy: CombineStrategy::default(),
            concurrency: 1,
            progress: None,
        }
    }

    pub fn with_extractor(mut self, extractor: PdfExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_strategy(mut self, strategy: CombineStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Arc<ProgressTracker>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn splitter(&self) -> &ChunkSplitter {
        &self.splitter
    }

    pub async fn summarize_path(&self, path: &Path, instruction: &str) -> Result<Summary> {
        let template = PromptTemplate::new(instruction)?;
        let document = PdfExtractor::load_source(path)?;
        self.run(document, template).await
    }

    /// Summarizes an in-memory PDF buffer.
    pub async fn summarize_document(
        &self,
        document: SourceDocument,
        instruction: &str,
    ) -> Result<Summary> {
        let template = PromptTemplate::new(instruction)?;
        self.run(document, template).await
    }

    /// Summarizes already extracted page segments.
    pub async fn summarize_segments(
        &self,
        source_name: &str,
        segments: &[TextSegment],
        instruction: &str,
    ) -> Result<Summary> {
        let template = PromptTemplate::new(instruction)?;
        self.combine_segments(source_name, None, segments, &template, Instant::now())
            .await
    }

    async fn run(&self, document: SourceDocument, template: PromptTemplate) -> Result<Summary> {
        let started = Instant::now();
        info!("Summarizing {} ({} bytes)", document.name, document.size());
        self.stage("Extracting text");

        let extractor = self.extractor.clone();
        let source_name = document.name.clone();
        let (document, segments) = tokio::task::spawn_blocking(move || {
            let segments = extractor.extract(&document);
            (document, segments)
        })
        .await
        .map_err(|e| {
            SummarizeError::extraction(&source_name, format!("extraction task failed: {}", e))
        })?;
        let segments = segments?;

        self.combine_segments(
            &document.name,
            Some(document.content_hash.clone()),
            &segments,
            &template,
            started,
        )
        .await
    }

    async fn combine_segments(
        &self,
        source_name: &str,
        source_hash: Option<String>,
        segments: &[TextSegment],
        template: &PromptTemplate,
        started: Instant,
    ) -> Result<Summary> {
        self.stage("Splitting text");
        let chunks = self.splitter.split(segments);

        if chunks.is_empty() {
            error!("{} has no extractable text", source_name);
            return Err(SummarizeError::EmptyDocument(source_name.to_string()));
        }

        info!(
            "{}: {} page(s) split into {} chunk(s)",
            source_name,
            segments.len(),
            chunks.len()
        );

        let partials = self.map_chunks(template, &chunks).await?;
        let mut model_calls = partials.len();

        let text = match self.strategy {
            CombineStrategy::Reduce if partials.len() > 1 => {
                model_calls += 1;
                self.reduce(template, &partials).await?
            }
            _ => partials.join(PARTIAL_SEPARATOR),
        };

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        let stats = SummaryStats {
            pages: segments.len(),
            chunks: chunks.len(),
            model_calls,
            input_chars: chunks.iter().map(|c| c.fresh_text().chars().count()).sum(),
            output_chars: text.chars().count(),
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "Summary ready: {} chars from {} model call(s) in {} ms",
            stats.output_chars, stats.model_calls, stats.duration_ms
        );

        Ok(Summary {
            text,
            source_name: source_name.to_string(),
            source_hash,
            model: self.client.model_id().to_string(),
            strategy: self.strategy,
            stats,
        })
    }

    /// One model call per chunk. Results come back in chunk order; the first
    /// failure aborts the remaining calls and discards everything produced.
    async fn map_chunks(&self, template: &PromptTemplate, chunks: &[Chunk]) -> Result<Vec<String>> {
        let total = chunks.len();
        if let Some(progress) = &self.progress {
            progress.start_chunks(total);
        }
        debug!("Prompt template: {:?}", template.template());

        let mut results = stream::iter(chunks.iter().map(|chunk| {
            let prompt = template.compose(chunk);
            async move {
                debug!(
                    "Chunk {}/{} ({}, {} chars)",
                    chunk.index + 1,
                    total,
                    chunk.page_span(),
                    chunk.char_len()
                );
                (chunk.index, self.client.generate(&prompt).await)
            }
        }))
        .buffered(self.concurrency);

        let mut partials = Vec::with_capacity(total);

        while let Some((index, result)) = results.next().await {
            match result {
                Ok(text) => {
                    if let Some(progress) = &self.progress {
                        progress.chunk_completed(text.chars().count());
                    }
                    partials.push(text);
                }
                Err(source) => {
                    if let Some(progress) = &self.progress {
                        progress.chunk_failed();
                        progress.finish();
                    }
                    error!("Chunk {} of {} failed: {}", index + 1, total, source);
                    return Err(SummarizeError::ModelInvocation {
                        chunk: index + 1,
                        total,
                        source,
                    });
                }
            }
        }

        Ok(partials)
    }

    async fn reduce(&self, template: &PromptTemplate, partials: &[String]) -> Result<String> {
        self.stage("Combining partial summaries");
        let prompt = template.render(&partials.join(PARTIAL_SEPARATOR));

        self.client
            .generate(&prompt)
            .await
            .map_err(|source| {
                error!("Reduction pass failed: {}", source);
                SummarizeError::Reduction { source }
            })
    }

    fn stage(&self, message: &str) {
        if let Some(progress) = &self.progress {
            progress.set_stage(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::extractor::pdf::tests::build_pdf;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every prompt and answers with `partial-N` (1-based call count).
    #[derive(Default)]
    struct RecordingClient {
        prompts: Mutex<Vec<String>>,
        fail_on_call: Option<usize>,
    }

    impl RecordingClient {
        fn failing_on(call: usize) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelClient for RecordingClient {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, ModelError> {
            let call = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.to_string());
                prompts.len()
            };

            if self.fail_on_call == Some(call) {
                return Err(ModelError::Model("boom".to_string()));
            }
            Ok(format!("partial-{}", call))
        }

        fn model_id(&self) -> &str {
            "recording"
        }
    }

    /// Echoes the first character of the chunk, finishing later chunks first.
    struct ReversedLatencyClient;

    #[async_trait]
    impl ModelClient for ReversedLatencyClient {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, ModelError> {
            let body = prompt.trim_start_matches("Echo\n\n");
            let first = body.chars().next().unwrap_or('?');
            let delay = match first {
                'a' => 60,
                'b' => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(first.to_string())
        }

        fn model_id(&self) -> &str {
            "echo"
        }
    }

    fn summarizer(
        client: RecordingClient,
        max: usize,
        overlap: usize,
    ) -> Summarizer<RecordingClient> {
        Summarizer::new(client, ChunkSplitter::new(max, overlap).unwrap())
    }

    fn three_chunk_segments() -> Vec<TextSegment> {
        vec![TextSegment::new(1, "aaaaaaaaaabbbbbbbbbbcccccccccc")]
    }

    #[tokio::test]
    async fn test_single_chunk_makes_one_call_with_exact_prompt() {
        let summarizer = summarizer(RecordingClient::default(), 100, 10);
        let segments = vec![TextSegment::new(1, "Hello world")];

        let summary = summarizer
            .summarize_segments("hello.pdf", &segments, "Summarize in one word")
            .await
            .unwrap();

        assert_eq!(
            summarizer.client().prompts(),
            vec!["Summarize in one word\n\nHello world\n\n".to_string()]
        );
        assert_eq!(summary.text, "partial-1");
        assert_eq!(summary.stats.chunks, 1);
        assert_eq!(summary.stats.model_calls, 1);
        assert_eq!(summary.model, "recording");
    }

    #[tokio::test]
    async fn test_empty_instruction_makes_no_calls() {
        let summarizer = summarizer(RecordingClient::default(), 100, 10);
        let segments = vec![TextSegment::new(1, "Hello world")];

        let result = summarizer.summarize_segments("x.pdf", &segments, "").await;
        assert!(matches!(result, Err(SummarizeError::Validation(_))));

        let result = summarizer.summarize_segments("x.pdf", &segments, "   ").await;
        assert!(matches!(result, Err(SummarizeError::Validation(_))));

        assert!(summarizer.client().prompts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_instruction_checked_before_extraction() {
        let summarizer = summarizer(RecordingClient::default(), 100, 10);
        let garbage = SourceDocument::new("garbage.bin", b"not a pdf".to_vec());

        let result = summarizer.summarize_document(garbage, "").await;
        assert!(matches!(result, Err(SummarizeError::Validation(_))));
    }

    #[tokio::test]
    async fn test_multi_chunk_outputs_concatenated_in_order() {
        let summarizer = summarizer(RecordingClient::default(), 10, 0);

        let summary = summarizer
            .summarize_segments("abc.pdf", &three_chunk_segments(), "Summarize")
            .await
            .unwrap();

        assert_eq!(summary.text, "partial-1\n\npartial-2\n\npartial-3");
        assert_eq!(
            summarizer.client().prompts(),
            vec![
                "Summarize\n\naaaaaaaaaa\n\n".to_string(),
                "Summarize\n\nbbbbbbbbbb\n\n".to_string(),
                "Summarize\n\ncccccccccc\n\n".to_string(),
            ]
        );
        assert_eq!(summary.stats.input_chars, 30);
        assert_eq!(summary.strategy, CombineStrategy::Concatenate);
    }

    #[tokio::test]
    async fn test_failure_on_second_chunk_aborts() {
        let summarizer = summarizer(RecordingClient::failing_on(2), 10, 0);

        let err = summarizer
            .summarize_segments("abc.pdf", &three_chunk_segments(), "Summarize")
            .await
            .unwrap_err();

        match err {
            SummarizeError::ModelInvocation {
                chunk,
                total,
                source,
            } => {
                assert_eq!(chunk, 2);
                assert_eq!(total, 3);
                assert_eq!(source, ModelError::Model("boom".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(summarizer.client().prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_reduce_strategy_runs_second_pass() {
        let summarizer =
            summarizer(RecordingClient::default(), 10, 0).with_strategy(CombineStrategy::Reduce);

        let summary = summarizer
            .summarize_segments("abc.pdf", &three_chunk_segments(), "Summarize")
            .await
            .unwrap();

        let prompts = summarizer.client().prompts();
        assert_eq!(prompts.len(), 4);
        assert_eq!(
            prompts[3],
            "Summarize\n\npartial-1\n\npartial-2\n\npartial-3\n\n"
        );
        assert_eq!(summary.text, "partial-4");
        assert_eq!(summary.stats.model_calls, 4);
    }

    #[tokio::test]
    async fn test_reduce_failure_is_reported() {
        let summarizer = summarizer(RecordingClient::failing_on(4), 10, 0)
            .with_strategy(CombineStrategy::Reduce);

        let err = summarizer
            .summarize_segments("abc.pdf", &three_chunk_segments(), "Summarize")
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizeError::Reduction { .. }));
    }

    #[tokio::test]
    async fn test_reduce_strategy_skips_single_chunk() {
        let summarizer =
            summarizer(RecordingClient::default(), 100, 0).with_strategy(CombineStrategy::Reduce);
        let segments = vec![TextSegment::new(1, "short")];

        let summary = summarizer
            .summarize_segments("short.pdf", &segments, "Summarize")
            .await
            .unwrap();

        assert_eq!(summarizer.client().prompts().len(), 1);
        assert_eq!(summary.text, "partial-1");
    }

    #[tokio::test]
    async fn test_empty_document_fails_without_calls() {
        let summarizer = summarizer(RecordingClient::default(), 100, 10);

        let result = summarizer
            .summarize_segments("empty.pdf", &[], "Summarize")
            .await;

        assert!(matches!(result, Err(SummarizeError::EmptyDocument(_))));
        assert!(summarizer.client().prompts().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_chunk_order() {
        let summarizer =
            Summarizer::new(ReversedLatencyClient, ChunkSplitter::new(10, 0).unwrap())
                .with_concurrency(3);

        let summary = summarizer
            .summarize_segments("abc.pdf", &three_chunk_segments(), "Echo")
            .await
            .unwrap();

        assert_eq!(summary.text, "a\n\nb\n\nc");
    }

    #[tokio::test]
    async fn test_progress_tracks_chunks() {
        let progress = Arc::new(ProgressTracker::hidden());
        let summarizer =
            summarizer(RecordingClient::default(), 10, 0).with_progress(Arc::clone(&progress));

        summarizer
            .summarize_segments("abc.pdf", &three_chunk_segments(), "Summarize")
            .await
            .unwrap();

        let snapshot = progress.snapshot();
        assert_eq!(snapshot.chunks_total, 3);
        assert_eq!(snapshot.chunks_completed, 3);
        assert_eq!(snapshot.chars_generated, 27);
    }

    #[tokio::test]
    async fn test_summarize_pdf_document() {
        let summarizer = summarizer(RecordingClient::default(), 1000, 100);
        let document = SourceDocument::new("hello.pdf", build_pdf(&["Hello world"]));
        let hash = document.content_hash.clone();

        let summary = summarizer
            .summarize_document(document, "Summarize in one word")
            .await
            .unwrap();

        let prompts = summarizer.client().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("Summarize in one word\n\n"));
        assert!(prompts[0].contains("Hello world"));
        assert_eq!(summary.source_hash, Some(hash));
        assert_eq!(summary.stats.pages, 1);
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_extraction_error() {
        let summarizer = summarizer(RecordingClient::default(), 100, 10);
        let document = SourceDocument::new("fake.pdf", b"plain text".to_vec());

        let result = summarizer.summarize_document(document, "Summarize").await;

        assert!(matches!(result, Err(SummarizeError::Extraction { .. })));
        assert!(summarizer.client().prompts().is_empty());
    }

    #[test]
    fn test_missing_credential_fails_at_construction() {
        let config = Config::default_config();
        let result = Summarizer::from_config(&config);
        assert!(matches!(result, Err(SummarizeError::Config(_))));
    }

    #[test]
    fn test_from_config_applies_summary_settings() {
        let mut config = Config::default_config();
        config.model.api_key = Some("key".to_string());
        config.summary.strategy = CombineStrategy::Reduce;
        config.summary.concurrency = 4;

        let summarizer = Summarizer::from_config(&config).unwrap();
        assert_eq!(summarizer.strategy, CombineStrategy::Reduce);
        assert_eq!(summarizer.concurrency, 4);
        assert_eq!(summarizer.splitter().max_chunk_size(), 20_000);
    }
}
