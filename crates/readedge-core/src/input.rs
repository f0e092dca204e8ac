use std::path::{Path, PathBuf};

use readedge_types::InputMode;

pub const SAMPLE_ARTICLE: &str = "Artificial Intelligence (AI) is transforming the world at an unprecedented pace. From self-driving cars to intelligent virtual assistants, AI is embedding itself into the fabric of our daily lives. While these advancements promise increased efficiency and convenience, they also raise important ethical questions.

One of the most significant concerns is the potential displacement of jobs. As machines become more capable of performing complex tasks, many worry that human workers will become obsolete. However, proponents argue that AI will create new opportunities and industries that we cannot yet imagine.

Furthermore, the issue of bias in AI algorithms is a critical challenge. Since these systems learn from historical data, they can inadvertently perpetuate existing prejudices. It is crucial for developers to ensure fairness and transparency in AI development to build a more equitable future.";

const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Nothing to analyze")]
    EmptyInput,

    #[error("Unsupported file type: {0} (expected .txt or .md)")]
    UnsupportedFile(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The text that a link submission actually sends for analysis
pub fn link_instruction(url: &str) -> String {
    format!("Please analyze the content of this article: {}", url.trim())
}

/// Pending article on the input screen
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    mode: InputMode,
    text: String,
    url: String,
    file: Option<PathBuf>,
}

impl ArticleInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Append pasted text, switching back to text mode
    pub fn append_text(&mut self, text: &str) {
        if self.mode != InputMode::Text {
            self.mode = InputMode::Text;
            self.file = None;
        }
        if !self.text.is_empty() && !text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(text);
    }

    pub fn load_sample(&mut self) {
        self.mode = InputMode::Text;
        self.file = None;
        self.text = SAMPLE_ARTICLE.to_string();
    }

    pub fn set_link(&mut self, url: &str) {
        self.mode = InputMode::Link;
        self.url = url.trim().to_string();
    }

    /// Read a `.txt`/`.md` file fully as text; no size limit
    pub async fn load_file(&mut self, path: &Path) -> Result<(), SubmitError> {
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !supported {
            return Err(SubmitError::UnsupportedFile(path.to_path_buf()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SubmitError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("Loaded {} chars from {}", content.len(), path.display());

        self.mode = InputMode::File;
        self.file = Some(path.to_path_buf());
        self.text = content;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.url.clear();
        self.file = None;
    }

    pub fn can_submit(&self) -> bool {
        match self.mode {
            InputMode::Text | InputMode::File => !self.text.trim().is_empty(),
            InputMode::Link => !self.url.is_empty(),
        }
    }

    /// Text handed to the analysis requester.
    ///
    /// Article text is passed verbatim; a link becomes an instruction to the
    /// backend, nothing is fetched locally.
    pub fn submission(&self) -> Result<String, SubmitError> {
        if !self.can_submit() {
            return Err(SubmitError::EmptyInput);
        }

        Ok(match self.mode {
            InputMode::Text | InputMode::File => self.text.clone(),
            InputMode::Link => link_instruction(&self.url),
        })
    }

    /// Prior text is discarded once a submission has been handed off
    pub fn take_submission(&mut self) -> Result<String, SubmitError> {
        let submission = self.submission()?;
        self.clear();
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_submitted_verbatim() {
        let mut input = ArticleInput::new();
        input.append_text("  The cat sat.  ");
        assert_eq!(input.submission().unwrap(), "  The cat sat.  ");
    }

    #[test]
    fn test_whitespace_only_rejected() {
        let mut input = ArticleInput::new();
        input.append_text("   \n\t");
        assert!(!input.can_submit());
        assert!(matches!(input.submission(), Err(SubmitError::EmptyInput)));
    }

    #[test]
    fn test_link_becomes_instruction() {
        let mut input = ArticleInput::new();
        input.set_link(" https://example.com/article ");
        assert_eq!(input.mode(), InputMode::Link);
        assert_eq!(
            input.submission().unwrap(),
            "Please analyze the content of this article: https://example.com/article"
        );
    }

    #[test]
    fn test_empty_link_rejected() {
        let mut input = ArticleInput::new();
        input.append_text("some text");
        input.set_link("   ");
        assert!(matches!(input.submission(), Err(SubmitError::EmptyInput)));
    }

    #[test]
    fn test_take_submission_discards_text() {
        let mut input = ArticleInput::new();
        input.load_sample();
        let text = input.take_submission().unwrap();
        assert!(text.starts_with("Artificial Intelligence"));
        assert!(input.text().is_empty());
    }

    #[tokio::test]
    async fn test_load_file_rejects_other_extensions() {
        let mut input = ArticleInput::new();
        let result = input.load_file(Path::new("article.pdf")).await;
        assert!(matches!(result, Err(SubmitError::UnsupportedFile(_))));
    }

    #[tokio::test]
    async fn test_load_markdown_file() {
        let path = std::env::temp_dir().join(format!("readedge-{}.md", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "# Title\n\nBody text.").await.unwrap();

        let mut input = ArticleInput::new();
        let result = input.load_file(&path).await;
        tokio::fs::remove_file(&path).await.ok();

        result.unwrap();
        assert_eq!(input.mode(), InputMode::File);
        assert_eq!(input.submission().unwrap(), "# Title\n\nBody text.");
    }
}
