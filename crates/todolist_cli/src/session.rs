use crate::cli::{CONFIG_OVERRIDE_FLAG, Command, collect_config_overrides};
use crate::render;
use std::io::{IsTerminal, Write};
use todolist_core::clock;
use todolist_core::config::{
    Config, Palette, load_config_with_fallback, merge_overrides, palette_for,
};
use todolist_core::error::AppError;
use todolist_core::model::Task;
use todolist_core::storage::StateStore;
use todolist_core::storage::json_store::{JsonFileStore, store_path};
use todolist_core::store::TaskStore;
use tracing::{info, warn};

/// A mounted task view plus the configuration it was opened with.
pub struct Session<S: StateStore> {
    pub store: TaskStore<S>,
    pub config: Config,
    color: bool,
}

impl Session<JsonFileStore> {
    pub fn open(raw_overrides: &[String]) -> Result<Self, AppError> {
        let overrides = collect_config_overrides(raw_overrides)
            .map_err(|err| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {err}")))?;

        let loaded = load_config_with_fallback();
        if let Some(err) = loaded.error.as_ref() {
            warn!(error = %err, "config unreadable, using defaults");
        }
        let config = merge_overrides(&loaded.config, &overrides);

        let path = store_path(config.store_path.as_deref())?;
        info!(path = %path.display(), "opening task store");
        let store = TaskStore::open(JsonFileStore::new(path))?;

        let color = config.color_enabled() && std::io::stdout().is_terminal();
        Ok(Self::new(store, config, color))
    }
}

impl<S: StateStore> Session<S> {
    pub fn new(store: TaskStore<S>, config: Config, color: bool) -> Self {
        Self {
            store,
            config,
            color,
        }
    }

    pub fn palette(&self) -> Palette {
        palette_for(self.store.theme(), self.color)
    }

    pub fn render_view(&self) -> String {
        let label = clock::label(clock::now_local());
        render::view(&self.store, &self.palette(), &label)
    }

    pub fn execute<W: Write>(
        &mut self,
        command: Command,
        json: bool,
        out: &mut W,
    ) -> Result<(), AppError> {
        match command {
            Command::Add { text } => {
                let added = if text.is_empty() {
                    self.store.submit_draft()?
                } else {
                    self.store.add(&text.join(" "))?
                };
                if let Some(task) = added {
                    report_task(out, json, "Added task", &task)?;
                }
            }
            Command::Draft { text } => {
                self.store.set_draft(text.join(" "));
            }
            Command::Toggle { id } => {
                if let Some(task) = self.store.toggle_complete(id)? {
                    let label = if task.completed {
                        "Completed task"
                    } else {
                        "Reopened task"
                    };
                    report_task(out, json, label, &task)?;
                }
            }
            Command::Delete { id } => {
                if let Some(task) = self.store.delete(id)? {
                    report_task(out, json, "Deleted task", &task)?;
                }
            }
            Command::Edit { id, text: Some(text) } => {
                self.store.start_edit(id, text);
                if let Some(task) = self.store.save_edit()? {
                    report_task(out, json, "Updated task", &task)?;
                }
            }
            Command::Edit { id, text: None } => {
                if self.store.begin_edit(id)
                    && let Some(task) = self.store.get(id)
                {
                    report_task(out, json, "Editing task", task)?;
                }
            }
            Command::Change { text } => {
                self.store.set_edit_text(text.join(" "));
            }
            Command::Save => {
                if let Some(task) = self.store.save_edit()? {
                    report_task(out, json, "Updated task", &task)?;
                }
            }
            Command::Cancel => {
                if let Some(cursor) = self.store.cancel_edit() {
                    if json {
                        writeln!(out, "{}", serde_json::json!({ "cancelled": cursor.id }))?;
                    } else {
                        writeln!(out, "Discarded edit of task {}", cursor.id)?;
                    }
                }
            }
            Command::Filter { filter } => {
                self.store.set_filter(filter.into());
                self.write_view(out, json)?;
            }
            Command::List { filter } => {
                if let Some(filter) = filter {
                    self.store.set_filter(filter.into());
                }
                self.write_view(out, json)?;
            }
            Command::Theme { show } => {
                let theme = if show {
                    self.store.theme()
                } else {
                    self.store.toggle_theme()?
                };
                if json {
                    writeln!(out, "{}", serde_json::json!({ "theme": theme }))?;
                } else {
                    writeln!(out, "Theme: {theme}")?;
                }
            }
            Command::Export { output } => {
                let dir = output.unwrap_or_else(|| self.config.export_dir());
                let path = self.store.export_to(&dir)?;
                let count = self.store.tasks().len();
                if json {
                    writeln!(
                        out,
                        "{}",
                        serde_json::json!({ "path": path.display().to_string(), "tasks": count })
                    )?;
                } else {
                    writeln!(out, "Exported {count} tasks to {}", path.display())?;
                }
            }
            Command::Import { file } => {
                let count = self.store.import_from(&file)?;
                if json {
                    writeln!(out, "{}", serde_json::json!({ "imported": count }))?;
                } else {
                    writeln!(out, "Imported {count} tasks")?;
                }
            }
        }

        Ok(())
    }

    fn write_view<W: Write>(&self, out: &mut W, json: bool) -> Result<(), AppError> {
        if json {
            let tasks = serde_json::to_string(&self.store.filtered_tasks())
                .map_err(|err| AppError::invalid_data(err.to_string()))?;
            writeln!(out, "{tasks}")?;
        } else {
            write!(out, "{}", self.render_view())?;
        }
        Ok(())
    }
}

fn report_task<W: Write>(
    out: &mut W,
    json: bool,
    label: &str,
    task: &Task,
) -> Result<(), AppError> {
    if json {
        let rendered =
            serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
        writeln!(out, "{rendered}")?;
    } else {
        writeln!(out, "{label}: {} ({})", task.text, task.id)?;
    }
    Ok(())
}
