use log::{debug, warn};
use ratatui::widgets::{ListState, TableState};

use crate::config::ConfigApi;
use crate::editor::{ConfigEditor, FormField, PlateOutcome, StatusMessage};
use crate::view::{StreamRow, ViewModel};

/// Application screen state
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Fetching the configuration
    Loading,
    /// Sending the configuration
    Saving,
    /// Streams table and plates list
    Main,
    /// Stream entry form
    Form,
    /// Waiting for the user to approve a delete
    Confirm(PendingDelete),
}

/// Destructive action awaiting confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum PendingDelete {
    Stream {
        device_id: String,
        index: usize,
        prompt: String,
    },
    Plate {
        index: usize,
        prompt: String,
    },
}

impl PendingDelete {
    pub fn prompt(&self) -> &str {
        match self {
            PendingDelete::Stream { prompt, .. } | PendingDelete::Plate { prompt, .. } => prompt,
        }
    }
}

/// Currently focused UI element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Streams,
    Plates,
    PlateInput,
}

/// Application state
pub struct App<A> {
    pub editor: ConfigEditor<A>,
    pub source: String,
    pub screen: Screen,
    pub focus: Focus,
    pub form_field: FormField,
    pub plate_input: String,
    pub should_quit: bool,
    loaded_once: bool,
    pub stream_table_state: TableState,
    pub plate_list_state: ListState,
}

impl<A: ConfigApi> App<A> {
    /// Starts on the loading screen; the first fetch runs after the first draw
    pub fn new(api: A, source: impl Into<String>) -> Self {
        Self {
            editor: ConfigEditor::new(api),
            source: source.into(),
            screen: Screen::Loading,
            focus: Focus::Streams,
            form_field: FormField::DeviceId,
            plate_input: String::new(),
            should_quit: false,
            loaded_once: false,
            stream_table_state: TableState::default(),
            plate_list_state: ListState::default(),
        }
    }

    pub fn view(&self) -> ViewModel {
        self.editor.view()
    }

    /// Get valid status message
    pub fn get_status(&self) -> Option<&StatusMessage> {
        self.editor.get_status()
    }

    /// Check if a network call is pending
    pub fn is_busy(&self) -> bool {
        matches!(self.screen, Screen::Loading | Screen::Saving)
    }

    pub fn start_reload(&mut self) {
        self.screen = Screen::Loading;
    }

    pub fn start_save(&mut self) {
        self.screen = Screen::Saving;
    }

    /// Run the pending network call (called from main loop)
    pub fn execute_pending(&mut self) {
        match self.screen {
            Screen::Loading => {
                if self.editor.load() && self.loaded_once {
                    self.editor
                        .set_status(StatusMessage::info("Configuration reloaded"));
                }
                self.loaded_once = true;
            }
            Screen::Saving => {
                self.editor.save();
            }
            _ => return,
        }
        self.screen = Screen::Main;
        self.clamp_selection();
    }

    pub fn selected_stream(&self) -> Option<StreamRow> {
        let index = self.stream_table_state.selected()?;
        self.view().streams.into_iter().nth(index)
    }

    pub fn selected_plate(&self) -> Option<usize> {
        self.plate_list_state
            .selected()
            .filter(|index| *index < self.editor.config().ignored_plates.len())
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Streams => select_prev(&mut self.stream_table_state),
            Focus::Plates => select_prev_list(&mut self.plate_list_state),
            Focus::PlateInput => {}
        }
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        let view = self.view();
        match self.focus {
            Focus::Streams => {
                let next = next_index(self.stream_table_state.selected(), view.streams.len());
                self.stream_table_state.select(next);
            }
            Focus::Plates => {
                let next = next_index(self.plate_list_state.selected(), view.plates.len());
                self.plate_list_state.select(next);
            }
            Focus::PlateInput => {}
        }
    }

    /// Cycle focus between panes
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Streams => Focus::Plates,
            Focus::Plates => Focus::PlateInput,
            Focus::PlateInput => Focus::Streams,
        };
    }

    pub fn open_add_form(&mut self) {
        self.editor.start_add();
        self.form_field = FormField::DeviceId;
        self.screen = Screen::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(row) = self.selected_stream() else {
            return;
        };
        match self.editor.start_edit(&row.device_id, row.index) {
            Ok(()) => {
                self.form_field = FormField::Name;
                self.screen = Screen::Form;
            }
            Err(e) => warn!("Cannot edit selected row: {}", e),
        }
    }

    pub fn submit_form(&mut self) {
        if self.editor.submit_form().is_ok() {
            self.screen = Screen::Main;
            self.clamp_selection();
        }
    }

    pub fn cancel_form(&mut self) {
        self.editor.cancel_form();
        self.screen = Screen::Main;
    }

    pub fn next_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub fn prev_field(&mut self) {
        self.form_field = self.form_field.prev();
    }

    /// Type into the focused form field or the plate input
    pub fn input_char(&mut self, c: char) {
        let field = self.form_field;
        match self.screen {
            Screen::Form => {
                if let Some(form) = self.editor.form_mut() {
                    form.value_mut(field).push(c);
                }
            }
            Screen::Main if self.focus == Focus::PlateInput => self.plate_input.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        let field = self.form_field;
        match self.screen {
            Screen::Form => {
                if let Some(form) = self.editor.form_mut() {
                    form.value_mut(field).pop();
                }
            }
            Screen::Main if self.focus == Focus::PlateInput => {
                self.plate_input.pop();
            }
            _ => {}
        }
    }

    pub fn add_plate(&mut self) {
        if self.editor.add_plate(&self.plate_input) == PlateOutcome::Added {
            self.plate_input.clear();
            self.clamp_selection();
        }
    }

    /// Ask for confirmation before deleting the selection of the focused pane
    pub fn request_delete(&mut self) {
        let pending = match self.focus {
            Focus::Streams => self.selected_stream().and_then(|row| {
                self.editor
                    .stream_delete_prompt(&row.device_id, row.index)
                    .map(|prompt| PendingDelete::Stream {
                        device_id: row.device_id,
                        index: row.index,
                        prompt,
                    })
            }),
            Focus::Plates => self.selected_plate().and_then(|index| {
                self.editor
                    .plate_delete_prompt(index)
                    .map(|prompt| PendingDelete::Plate { index, prompt })
            }),
            Focus::PlateInput => None,
        };

        if let Some(pending) = pending {
            debug!("Awaiting confirmation: {}", pending.prompt());
            self.screen = Screen::Confirm(pending);
        }
    }

    /// Apply the user's answer to the pending delete
    pub fn resolve_confirm(&mut self, approved: bool) {
        let Screen::Confirm(pending) = self.screen.clone() else {
            return;
        };
        self.screen = Screen::Main;
        let answer = move |_: &str| approved;

        let result = match pending {
            PendingDelete::Stream {
                device_id, index, ..
            } => self.editor.delete_stream(&device_id, index, answer),
            PendingDelete::Plate { index, .. } => self.editor.delete_plate(index, answer),
        };
        if let Err(e) = result {
            warn!("Delete failed: {}", e);
            self.editor.set_status(StatusMessage::error(e.to_string()));
        }
        self.clamp_selection();
    }

    /// Keep selections inside the rebuilt lists
    fn clamp_selection(&mut self) {
        let view = self.view();
        clamp(&mut self.stream_table_state, view.streams.len());
        clamp_list(&mut self.plate_list_state, view.plates.len());
    }
}

fn next_index(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(i) if i + 1 < len => i + 1,
        Some(i) => i.min(len - 1),
        None => 0,
    })
}

fn clamped(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    }
}

fn select_prev(state: &mut TableState) {
    if let Some(i) = state.selected() {
        state.select(Some(i.saturating_sub(1)));
    }
}

fn select_prev_list(state: &mut ListState) {
    if let Some(i) = state.selected() {
        state.select(Some(i.saturating_sub(1)));
    }
}

fn clamp(state: &mut TableState, len: usize) {
    state.select(clamped(state.selected(), len));
}

fn clamp_list(state: &mut ListState, len: usize) {
    state.select(clamped(state.selected(), len));
}
