use revive_core::filter::FilterPreset;
use revive_core::result::ResultItem;

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    /// Gallery, oldest first.
    pub results: Vec<ResultItem>,
    pub selected: Option<usize>,
    /// Reference of the uploaded image, the default "before".
    pub original_url: Option<String>,

    /// Preview filter for the comparison views.
    pub filter: FilterPreset,

    /// An apply is running on the worker.
    pub applying: bool,

    /// Log messages.
    pub log_messages: Vec<String>,

    pub show_about: bool,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn selected_item(&self) -> Option<&ResultItem> {
        self.selected.and_then(|i| self.results.get(i))
    }
}
