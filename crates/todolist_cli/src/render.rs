use tabled::settings::Style;
use tabled::{Table, Tabled};
use todolist_core::config::Palette;
use todolist_core::intro::IntroScreen;
use todolist_core::model::{Filter, Task};
use todolist_core::storage::StateStore;
use todolist_core::store::TaskStore;

const EMPTY_VIEW: &str = "No tasks to show...";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Task")]
    text: String,
}

pub fn intro(screen: &IntroScreen) -> String {
    format!(
        "{}\n\n{}\n\n>> {} (press Enter)\n\n{}\n",
        screen.title, screen.tagline, screen.call_to_action, screen.footer
    )
}

/// The task screen: header, filter bar, the filtered list and a summary.
pub fn view<S: StateStore>(store: &TaskStore<S>, palette: &Palette, clock_label: &str) -> String {
    let mut out = String::new();
    out.push_str(&palette.accentize("To-Do List"));
    out.push_str(&format!("  [{} mode]\n", store.theme()));
    out.push_str(&palette.mutedize(clock_label));
    out.push('\n');
    out.push_str(&filter_bar(store.filter(), palette));
    out.push('\n');

    let visible = store.filtered_tasks();
    if visible.is_empty() {
        out.push_str(&palette.mutedize(EMPTY_VIEW));
        out.push('\n');
    } else {
        let rows = visible.into_iter().map(|task| row(store, task));
        let mut table = Table::new(rows);
        table.with(Style::psql());
        out.push_str(&table.to_string());
        out.push('\n');
    }

    let counts = store.counts();
    out.push_str(&palette.mutedize(&format!(
        "{} tasks, {} completed, {} pending",
        counts.total, counts.completed, counts.pending
    )));
    out.push('\n');
    out
}

fn row<S: StateStore>(store: &TaskStore<S>, task: &Task) -> TaskRow {
    let text = match store.edit_cursor() {
        Some(cursor) if cursor.id == task.id => format!("{} (editing)", cursor.text),
        _ => task.text.clone(),
    };
    TaskRow {
        id: task.id,
        done: if task.completed { "[x]" } else { "[ ]" },
        text,
    }
}

fn filter_bar(active: Filter, palette: &Palette) -> String {
    let labels: Vec<String> = Filter::ALL
        .iter()
        .map(|filter| {
            if *filter == active {
                palette.accentize(&format!("[{filter}]"))
            } else {
                filter.to_string()
            }
        })
        .collect();
    format!("Filter: {}", labels.join(" "))
}
