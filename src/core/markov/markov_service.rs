use super::markov_model::{MarkovModel, MarkovStats};
use tokio::sync::RwLock;

/// Upper bound on generated sentence length when nothing is configured.
pub const DEFAULT_MAX_WORDS: usize = 50;

/// Shared owner of the process-wide Markov model.
///
/// The model lives only in memory and is rebuilt from the corpus on start,
/// then kept current by live ingestion. Callers pass sanitized text.
pub struct MarkovService {
    model: RwLock<MarkovModel>,
    max_words: usize,
}

impl MarkovService {
    pub fn new(max_words: usize) -> Self {
        Self {
            model: RwLock::new(MarkovModel::new()),
            max_words,
        }
    }

    pub async fn add_line(&self, line: &str) {
        self.model.write().await.add_line(line);
    }

    /// Add many lines at once. Returns how many were non-blank.
    ///
    /// The lines are built into a separate model on the blocking pool and
    /// merged in afterwards, so the write lock is only held for the merge.
    pub async fn load_lines(&self, lines: impl IntoIterator<Item = String>) -> usize {
        let lines: Vec<String> = lines.into_iter().collect();
        let built = tokio::task::spawn_blocking(move || {
            let mut fresh = MarkovModel::new();
            let mut loaded = 0;
            for line in lines.iter().filter(|line| !line.trim().is_empty()) {
                fresh.add_line(line);
                loaded += 1;
            }
            (fresh, loaded)
        })
        .await;

        match built {
            Ok((fresh, loaded)) => {
                self.model.write().await.merge(fresh);
                loaded
            }
            Err(e) => {
                tracing::error!("Building the Markov model failed: {}", e);
                0
            }
        }
    }

    pub async fn generate(&self, seed: Option<&str>) -> String {
        let model = self.model.read().await;
        let mut rng = rand::thread_rng();
        model.generate_sentence(seed, self.max_words, &mut rng)
    }

    pub async fn stats(&self) -> MarkovStats {
        self.model.read().await.stats()
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }
}

impl Default for MarkovService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_lines_skips_blank_lines() {
        let service = MarkovService::default();
        let loaded = service
            .load_lines(vec![
                "one two".to_string(),
                "   ".to_string(),
                String::new(),
                "three".to_string(),
            ])
            .await;

        assert_eq!(loaded, 2);
        assert_eq!(service.stats().await.lines, 2);
    }

    #[tokio::test]
    async fn bulk_load_keeps_lines_learned_before_it() {
        let service = MarkovService::new(10);
        service.add_line("live line").await;

        let loaded = service
            .load_lines(vec!["live line".to_string(), "old history".to_string()])
            .await;

        assert_eq!(loaded, 2);
        let stats = service.stats().await;
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.words, 4);
        assert_eq!(service.generate(Some("old")).await, "old history");
        assert_eq!(service.generate(Some("live")).await, "live line");
    }

    #[tokio::test]
    async fn generation_respects_configured_bound() {
        let service = MarkovService::new(3);
        service.add_line("a b c d e f g").await;

        let sentence = service.generate(Some("a")).await;
        assert_eq!(sentence, "a b c");
        assert_eq!(service.max_words(), 3);
    }

    #[tokio::test]
    async fn empty_service_generates_nothing() {
        let service = MarkovService::default();
        assert_eq!(service.generate(None).await, "");
    }
}
