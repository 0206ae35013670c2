//! View-local UI state: the create-post form and the research panel.
//!
//! These models are owned by their view. Other views never read them, and
//! both are reset when their view goes away.

use ap_core::ports::GenerationError;
use ap_core::post::PostDraft;
use ap_core::research::SearchResult;

/// Generation step of the create-post form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeStep {
    Ideas,
    Content,
    Image,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePostForm {
    pub topic: String,
    pub draft: PostDraft,
    pub ideas: Vec<String>,
    pub generating_ideas: bool,
    pub generating_content: bool,
    pub generating_image: bool,
    /// Last generation failure, shown until dismissed or the next attempt.
    pub error: Option<String>,
}

impl CreatePostForm {
    fn busy_flag(&mut self, step: ComposeStep) -> &mut bool {
        match step {
            ComposeStep::Ideas => &mut self.generating_ideas,
            ComposeStep::Content => &mut self.generating_content,
            ComposeStep::Image => &mut self.generating_image,
        }
    }

    pub fn is_busy(&self, step: ComposeStep) -> bool {
        match step {
            ComposeStep::Ideas => self.generating_ideas,
            ComposeStep::Content => self.generating_content,
            ComposeStep::Image => self.generating_image,
        }
    }

    /// Input the step runs on: the topic for ideas, the title otherwise.
    pub fn input_for(&self, step: ComposeStep) -> &str {
        match step {
            ComposeStep::Ideas => &self.topic,
            ComposeStep::Content | ComposeStep::Image => &self.draft.title,
        }
    }

    pub fn can_run(&self, step: ComposeStep) -> bool {
        !self.is_busy(step) && !self.input_for(step).trim().is_empty()
    }

    /// Mark `step` as running and clear the error. Returns the input to send,
    /// or `None` when the step cannot run right now.
    pub fn begin(&mut self, step: ComposeStep) -> Option<String> {
        if !self.can_run(step) {
            return None;
        }
        let input = self.input_for(step).trim().to_string();
        *self.busy_flag(step) = true;
        self.error = None;
        Some(input)
    }

    pub fn finish_ideas(&mut self, result: Result<Vec<String>, GenerationError>) {
        self.generating_ideas = false;
        match result {
            Ok(ideas) => self.ideas = ideas,
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn finish_content(&mut self, result: Result<String, GenerationError>) {
        self.generating_content = false;
        match result {
            Ok(content) => self.draft.content = content,
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn finish_image(&mut self, result: Result<String, GenerationError>) {
        self.generating_image = false;
        match result {
            Ok(uri) => self.draft.image_url = uri,
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Use a generated idea as the title.
    pub fn choose_idea(&mut self, index: usize) -> bool {
        match self.ideas.get(index) {
            Some(idea) => {
                self.draft.title = idea.clone();
                true
            }
            None => false,
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn can_save(&self) -> bool {
        self.draft.can_save()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchTab {
    #[default]
    Research,
    History,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchPanel {
    pub tab: ResearchTab,
    pub query: String,
    pub current: Option<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ResearchPanel {
    /// Start a search. `None` when the query is empty or a search is running.
    pub fn begin_search(&mut self) -> Option<String> {
        if self.loading || self.query.trim().is_empty() {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.current = None;
        Some(self.query.clone())
    }

    pub fn finish_search(&mut self, result: Result<SearchResult, GenerationError>) {
        self.loading = false;
        match result {
            Ok(result) => self.current = Some(result),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Show a history entry as the current result.
    pub fn show(&mut self, entry: SearchResult) {
        self.query = entry.query.clone();
        self.current = Some(entry);
        self.tab = ResearchTab::Research;
    }
}
