//! Headless text console.
//!
//! Maps parsed [`Command`]s onto view-model operations and renders frames
//! as plain text. Holds no state of its own.

pub mod command;
pub mod render;

use anyhow::Context;

use ap_app::view_model::{ComposeStep, CreatePostForm, ResearchTab};
use ap_app::{AppViewModel, Screen};
use ap_core::ids::{PostId, TodoId};
use ap_core::navigation::View;
use ap_core::post::CategoryFilter;
use ap_core::todo::sorted_for_display;

pub use command::{parse_command, Command, CommandError, PostRef, HELP};
pub use render::render_frame;

#[derive(Clone)]
pub struct Console {
    vm: AppViewModel,
}

impl Console {
    pub fn new(vm: AppViewModel) -> Self {
        Self { vm }
    }

    /// Run one command. `Ok(Some(text))` is feedback for the user; frame
    /// changes are picked up through the revision channel instead.
    pub async fn execute(&self, command: Command) -> anyhow::Result<Option<String>> {
        let vm = &self.vm;
        let reply = match command {
            Command::Navigate(view) => {
                vm.navigate(view);
                None
            }
            Command::Open(target) => {
                let id = self.resolve_post(target)?;
                vm.select_post(id);
                None
            }
            Command::Back => {
                vm.back();
                None
            }
            Command::Filter(category) => {
                vm.set_post_filter(match category {
                    Some(name) => CategoryFilter::Category(name),
                    None => CategoryFilter::All,
                });
                None
            }
            Command::TodoAdd(text) => match vm.add_todo(&text).await? {
                Some(_) => None,
                None => Some("Nothing to add.".to_string()),
            },
            Command::TodoToggle(n) => {
                let id = self.resolve_todo(n)?;
                vm.toggle_todo(&id).await?;
                None
            }
            Command::TodoRemove(n) => {
                let id = self.resolve_todo(n)?;
                vm.delete_todo(&id).await?;
                None
            }
            Command::Research(query) => {
                vm.open_research();
                if let Some(query) = query {
                    vm.set_research_tab(ResearchTab::Research);
                    vm.set_research_query(query);
                    if !vm.search().await {
                        return Ok(Some("A search is already running.".to_string()));
                    }
                }
                None
            }
            Command::History(None) => {
                vm.open_research();
                vm.set_research_tab(ResearchTab::History);
                None
            }
            Command::History(Some(n)) => {
                vm.open_research();
                (!vm.show_history_entry(n - 1)).then(|| format!("No history entry {n}."))
            }
            Command::Chart(coin) => {
                vm.select_crypto(coin.as_str().into()).await;
                vm.selected_crypto()
                    .is_none()
                    .then(|| format!("`{coin}` is not in the current market snapshot."))
            }
            Command::Close => {
                if vm.frame().chart.is_some() {
                    vm.close_chart();
                } else {
                    vm.close_research();
                }
                None
            }
            Command::Topic(text) => self.edit(|form| form.topic = text),
            Command::Idea(n) => {
                if vm.route().view != View::CreatePost {
                    return Ok(Some(NOT_EDITING.to_string()));
                }
                (!vm.choose_idea(n - 1)).then(|| format!("No idea {n}."))
            }
            Command::Title(text) => self.edit(|form| form.draft.title = text),
            Command::Category(text) => self.edit(|form| form.draft.category = text),
            Command::ImageUrl(text) => self.edit(|form| form.draft.image_url = text),
            Command::Ideas => self.compose(ComposeStep::Ideas, "Enter a topic first.").await,
            Command::Write => self.compose(ComposeStep::Content, "Enter a title first.").await,
            Command::Image => self.compose(ComposeStep::Image, "Enter a title first.").await,
            Command::Save => {
                let id = vm.save_post().await.context("Post was not saved")?;
                Some(format!("Saved post {id}."))
            }
            Command::Cancel => {
                vm.cancel_create();
                None
            }
            Command::Json => Some(
                serde_json::to_string_pretty(&vm.frame()).context("Failed to serialize frame")?,
            ),
            Command::Help => Some(HELP.to_string()),
            // The input loop stops before dispatching.
            Command::Quit => None,
        };
        Ok(reply)
    }

    fn edit(&self, apply: impl FnOnce(&mut CreatePostForm)) -> Option<String> {
        if self.vm.route().view != View::CreatePost {
            return Some(NOT_EDITING.to_string());
        }
        self.vm.edit_form(apply);
        None
    }

    async fn compose(&self, step: ComposeStep, hint: &str) -> Option<String> {
        if self.vm.route().view != View::CreatePost {
            return Some(NOT_EDITING.to_string());
        }
        if self.vm.run_compose_step(step).await {
            None
        } else if self.vm.create_form().is_busy(step) {
            Some("Already working on it.".to_string())
        } else {
            Some(hint.to_string())
        }
    }

    /// Position `n` in the listing on screen, or an explicit id.
    fn resolve_post(&self, target: PostRef) -> anyhow::Result<PostId> {
        let n = match target {
            PostRef::Id(id) => return Ok(PostId::from(id)),
            PostRef::Index(n) => n,
        };
        let listed: Vec<PostId> = match self.vm.frame().screen {
            Screen::Posts(list) => list.cards.into_iter().map(|card| card.id).collect(),
            Screen::Dashboard(dashboard) => dashboard
                .latest
                .map(|latest| latest.id)
                .into_iter()
                .chain(dashboard.recent.into_iter().map(|row| row.id))
                .collect(),
            _ => Vec::new(),
        };
        listed
            .get(n - 1)
            .cloned()
            .with_context(|| format!("No post {n} on this screen"))
    }

    /// Position `n` in display order (open items first).
    fn resolve_todo(&self, n: usize) -> anyhow::Result<TodoId> {
        sorted_for_display(&self.vm.todos())
            .get(n - 1)
            .map(|todo| todo.id.clone())
            .with_context(|| format!("No todo {n}"))
    }
}

const NOT_EDITING: &str = "Open the editor with `new` first.";
