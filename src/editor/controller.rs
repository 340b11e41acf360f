use log::{debug, error, info, warn};

use super::form::StreamForm;
use super::status::StatusMessage;
use crate::config::{ConfigApi, Configuration, EditTarget};
use crate::error::{AppError, Result};
use crate::view::{self, ViewModel};

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of adding an ignored plate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateOutcome {
    Added,
    Empty,
    Duplicate,
}

/// Owns the in-memory configuration and every mutation applied to it
pub struct ConfigEditor<A> {
    api: A,
    config: Configuration,
    form: Option<StreamForm>,
    status: Option<StatusMessage>,
}

impl<A: ConfigApi> ConfigEditor<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            config: Configuration::new(),
            form: None,
            status: None,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Rebuild both lists from the current configuration
    pub fn view(&self) -> ViewModel {
        view::render(&self.config)
    }

    pub fn form(&self) -> Option<&StreamForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut StreamForm> {
        self.form.as_mut()
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    /// Get valid status message
    pub fn get_status(&self) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|s| s.is_valid())
    }

    /// Replace the configuration with the server's copy.
    ///
    /// On failure the current document is kept and the error is shown.
    pub fn load(&mut self) -> bool {
        match self.api.fetch() {
            Ok(config) => {
                info!(
                    "Loaded configuration: {} streams on {} devices, {} ignored plates",
                    config.stream_count(),
                    config.device_count(),
                    config.ignored_plates.len()
                );
                self.config = config;
                // Indices of an open edit no longer refer to anything
                self.form = None;
                true
            }
            Err(e) => {
                self.report_failure("Failed to load configuration", e);
                false
            }
        }
    }

    /// Send the whole document to the server; the local copy is never touched
    pub fn save(&mut self) -> bool {
        match self.api.store(&self.config) {
            Ok(message) => {
                info!(
                    "Saved configuration ({})",
                    message.as_deref().unwrap_or("no message")
                );
                self.set_status(StatusMessage::success("Configuration saved successfully"));
                true
            }
            Err(e) => {
                self.report_failure("Failed to save configuration", e);
                false
            }
        }
    }

    pub fn start_add(&mut self) {
        debug!("Opening entry form in add mode");
        self.form = Some(StreamForm::blank());
    }

    pub fn start_edit(&mut self, device_id: &str, index: usize) -> Result<()> {
        let stream = self
            .config
            .stream(device_id, index)
            .ok_or_else(|| AppError::EntryNotFound {
                device_id: device_id.to_string(),
                index,
            })?;
        debug!("Opening entry form for {}#{}", device_id, index);
        self.form = Some(StreamForm::for_entry(EditTarget::new(device_id, index), stream));
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Apply the open form to the configuration and close it.
    ///
    /// Parse errors are shown as a status and keep the form open.
    pub fn submit_form(&mut self) -> Result<()> {
        let Some(form) = self.form.as_ref() else {
            return Ok(());
        };

        let applied = form.parse().and_then(|(device_id, stream)| {
            self.config
                .upsert_stream(&device_id, form.edit_target(), stream)
                .map(|_| device_id)
        });

        match applied {
            Ok(device_id) => {
                info!("Stored stream for device '{}'", device_id);
                self.form = None;
                Ok(())
            }
            Err(e) => {
                warn!("Rejected entry form: {}", e);
                self.set_status(StatusMessage::error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn stream_delete_prompt(&self, device_id: &str, index: usize) -> Option<String> {
        self.config
            .stream(device_id, index)
            .map(|stream| format!("Delete stream {} for device {}?", stream.name, device_id))
    }

    /// Remove a stream once confirmed; returns whether anything was removed
    pub fn delete_stream(
        &mut self,
        device_id: &str,
        index: usize,
        mut confirm: impl Confirm,
    ) -> Result<bool> {
        let prompt = self
            .stream_delete_prompt(device_id, index)
            .ok_or_else(|| AppError::EntryNotFound {
                device_id: device_id.to_string(),
                index,
            })?;
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        let removed = self.config.remove_stream(device_id, index)?;
        info!("Deleted stream '{}' from device '{}'", removed.name, device_id);
        Ok(true)
    }

    pub fn add_plate(&mut self, text: &str) -> PlateOutcome {
        let plate = text.trim();
        if plate.is_empty() {
            self.set_status(StatusMessage::error("Please enter a license plate"));
            return PlateOutcome::Empty;
        }
        if !self.config.push_plate(plate) {
            self.set_status(StatusMessage::error("Plate already exists"));
            return PlateOutcome::Duplicate;
        }
        info!("Ignoring plate {}", plate);
        PlateOutcome::Added
    }

    pub fn plate_delete_prompt(&self, index: usize) -> Option<String> {
        self.config
            .ignored_plates
            .get(index)
            .map(|plate| format!("Remove plate {}?", plate))
    }

    pub fn delete_plate(&mut self, index: usize, mut confirm: impl Confirm) -> Result<bool> {
        let prompt = self
            .plate_delete_prompt(index)
            .ok_or(AppError::PlateNotFound(index))?;
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        let removed = self.config.remove_plate(index)?;
        info!("Removed ignored plate {}", removed);
        Ok(true)
    }

    fn report_failure(&mut self, action: &str, e: AppError) {
        let text = if e.is_api() {
            warn!("{}: {}", action, e);
            format!("{}: {}", action, e)
        } else {
            error!("{}: {}", action, e);
            format!("Error: {}", e)
        };
        self.set_status(StatusMessage::error(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamConfig;
    use crate::config::types::tests::stream;
    use crate::editor::form::{FormField, FormMode};
    use crate::editor::status::StatusKind;
    use std::cell::{Cell, RefCell};

    /// In-memory stand-in for the HTTP endpoint
    #[derive(Default)]
    struct MemoryApi {
        stored: RefCell<Configuration>,
        fail_with: Option<String>,
        garbled: bool,
        stores: Cell<usize>,
    }

    impl MemoryApi {
        fn with(config: Configuration) -> Self {
            Self {
                stored: RefCell::new(config),
                ..Self::default()
            }
        }

        /// Replies with a body that is not a JSON envelope
        fn garbled() -> Self {
            Self {
                garbled: true,
                ..Self::default()
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }
    }

    impl ConfigApi for MemoryApi {
        fn fetch(&self) -> Result<Configuration> {
            if self.garbled {
                return Err(garbled_body());
            }
            match &self.fail_with {
                Some(message) => Err(AppError::Api(message.clone())),
                None => Ok(self.stored.borrow().clone()),
            }
        }

        fn store(&self, config: &Configuration) -> Result<Option<String>> {
            self.stores.set(self.stores.get() + 1);
            if self.garbled {
                return Err(garbled_body());
            }
            match &self.fail_with {
                Some(message) => Err(AppError::Api(message.clone())),
                None => {
                    *self.stored.borrow_mut() = config.clone();
                    Ok(Some("Configuration updated".to_string()))
                }
            }
        }
    }

    fn garbled_body() -> AppError {
        serde_json::from_str::<Configuration>("<html>Bad Gateway</html>")
            .unwrap_err()
            .into()
    }

    fn editor() -> ConfigEditor<MemoryApi> {
        ConfigEditor::new(MemoryApi::default())
    }

    fn fill_form(editor: &mut ConfigEditor<MemoryApi>, device_id: &str, s: &StreamConfig) {
        let form = editor.form_mut().unwrap();
        *form.value_mut(FormField::DeviceId) = device_id.to_string();
        *form.value_mut(FormField::Name) = s.name.clone();
        *form.value_mut(FormField::Url) = s.url.clone();
        *form.value_mut(FormField::InitialDelayMs) = s.initial_delay_ms.to_string();
        *form.value_mut(FormField::NumImages) = s.num_images.to_string();
        *form.value_mut(FormField::IntervalMs) = s.interval_ms.to_string();
        *form.value_mut(FormField::VideoDurationS) = s.video_duration_s.to_string();
    }

    fn add_stream(editor: &mut ConfigEditor<MemoryApi>, device_id: &str, s: &StreamConfig) {
        editor.start_add();
        fill_form(editor, device_id, s);
        editor.submit_form().unwrap();
    }

    fn status_text(editor: &ConfigEditor<MemoryApi>) -> &str {
        editor.get_status().map(|s| s.text.as_str()).unwrap_or("")
    }

    // --- load / save ---

    #[test]
    fn test_load_empty_document_renders_empty_lists() {
        let mut editor = ConfigEditor::new(MemoryApi::with(Configuration::new()));
        assert!(editor.load());

        let view = editor.view();
        assert!(view.streams.is_empty());
        assert!(view.plates.is_empty());
        assert!(editor.get_status().is_none());
    }

    #[test]
    fn test_load_failure_keeps_current_config() {
        let mut editor = ConfigEditor::new(MemoryApi::failing("disk on fire"));
        editor.add_plate("KEEP");

        assert!(!editor.load());
        assert_eq!(editor.config().ignored_plates, vec!["KEEP"]);
        let status = editor.get_status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Failed to load configuration: disk on fire");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("front"));
        add_stream(&mut editor, "cam2", &stream("gate"));
        editor.add_plate("ABC123");
        let saved = editor.config().clone();

        assert!(editor.save());
        assert_eq!(status_text(&editor), "Configuration saved successfully");
        assert_eq!(editor.get_status().unwrap().kind, StatusKind::Success);

        assert!(editor.load());
        assert_eq!(editor.config(), &saved);
    }

    #[test]
    fn test_save_failure_reports_and_keeps_config() {
        let mut editor = ConfigEditor::new(MemoryApi::failing("read-only filesystem"));
        editor.add_plate("ABC123");
        let before = editor.config().clone();

        assert!(!editor.save());
        assert_eq!(
            status_text(&editor),
            "Failed to save configuration: read-only filesystem"
        );
        assert_eq!(editor.config(), &before);
    }

    #[test]
    fn test_load_transport_error_keeps_config() {
        let mut editor = ConfigEditor::new(MemoryApi::garbled());
        editor.add_plate("KEEP");
        let before = editor.config().clone();

        assert!(!editor.load());
        let status = editor.get_status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.starts_with("Error: "), "got {:?}", status.text);
        assert_eq!(editor.config(), &before);
    }

    #[test]
    fn test_save_transport_error_status() {
        let mut editor = ConfigEditor::new(MemoryApi::garbled());
        editor.add_plate("ABC123");
        let before = editor.config().clone();

        assert!(!editor.save());
        let status = editor.get_status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.starts_with("Error: "), "got {:?}", status.text);
        assert_eq!(editor.config(), &before);
    }

    #[test]
    fn test_repeated_saves_are_all_sent() {
        let mut editor = editor();
        editor.save();
        editor.save();
        assert_eq!(editor.api.stores.get(), 2);
    }

    // --- entry form ---

    #[test]
    fn test_submit_add_creates_device() {
        let mut editor = editor();
        let front = StreamConfig {
            name: "front".to_string(),
            url: "rtsp://x".to_string(),
            initial_delay_ms: 1000,
            num_images: 5,
            interval_ms: 200,
            video_duration_s: 10,
        };
        add_stream(&mut editor, "cam1", &front);

        assert_eq!(editor.config().streams_by_device["cam1"], vec![front]);
        assert!(editor.form().is_none());
    }

    #[test]
    fn test_start_add_clears_previous_edit() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("front"));
        editor.start_edit("cam1", 0).unwrap();

        editor.start_add();
        let form = editor.form().unwrap();
        assert_eq!(form.mode, FormMode::Add);
        assert_eq!(form.value(FormField::Name), "");
    }

    #[test]
    fn test_start_edit_populates_form() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("front"));

        editor.start_edit("cam1", 0).unwrap();
        let form = editor.form().unwrap();
        assert_eq!(form.edit_target(), Some(&EditTarget::new("cam1", 0)));
        assert_eq!(form.value(FormField::Url), "rtsp://front");
        assert_eq!(form.value(FormField::NumImages), "5");
    }

    #[test]
    fn test_start_edit_missing_entry() {
        let mut editor = editor();
        assert!(editor.start_edit("cam1", 0).is_err());
        assert!(editor.form().is_none());
    }

    #[test]
    fn test_edit_same_device_keeps_position() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("a"));
        add_stream(&mut editor, "cam1", &stream("b"));

        editor.start_edit("cam1", 0).unwrap();
        *editor.form_mut().unwrap().value_mut(FormField::Name) = "a2".to_string();
        editor.submit_form().unwrap();

        let names: Vec<_> = editor.config().streams_by_device["cam1"]
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["a2", "b"]);
    }

    #[test]
    fn test_edit_to_other_device_moves_and_prunes() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("front"));

        editor.start_edit("cam1", 0).unwrap();
        fill_form(&mut editor, "cam2", &stream("moved"));
        editor.submit_form().unwrap();

        assert!(!editor.config().streams_by_device.contains_key("cam1"));
        assert_eq!(
            editor.config().streams_by_device["cam2"],
            vec![stream("moved")]
        );
    }

    #[test]
    fn test_invalid_form_keeps_state() {
        let mut editor = editor();
        editor.start_add();
        fill_form(&mut editor, "cam1", &stream("front"));
        *editor.form_mut().unwrap().value_mut(FormField::IntervalMs) = "fast".to_string();

        assert!(editor.submit_form().is_err());
        assert!(editor.form().is_some());
        assert_eq!(editor.config().stream_count(), 0);
        assert_eq!(status_text(&editor), "Invalid Interval (ms): 'fast'");
    }

    #[test]
    fn test_cancel_form_discards_input() {
        let mut editor = editor();
        editor.start_add();
        fill_form(&mut editor, "cam1", &stream("front"));
        editor.cancel_form();

        assert!(editor.form().is_none());
        assert_eq!(editor.config().stream_count(), 0);
    }

    // --- delete stream ---

    #[test]
    fn test_delete_only_stream_prunes_device() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("front"));

        let mut prompts = Vec::new();
        let deleted = editor
            .delete_stream("cam1", 0, |p: &str| {
                prompts.push(p.to_string());
                true
            })
            .unwrap();

        assert!(deleted);
        assert_eq!(prompts, vec!["Delete stream front for device cam1?"]);
        assert!(!editor.config().streams_by_device.contains_key("cam1"));
    }

    #[test]
    fn test_delete_stream_cancelled_is_noop() {
        let mut editor = editor();
        add_stream(&mut editor, "cam1", &stream("front"));
        let before = editor.config().clone();

        assert!(!editor.delete_stream("cam1", 0, |_: &str| false).unwrap());
        assert_eq!(editor.config(), &before);
    }

    #[test]
    fn test_delete_never_leaves_empty_device() {
        let mut editor = editor();
        for name in ["a", "b", "c"] {
            add_stream(&mut editor, "cam1", &stream(name));
        }
        add_stream(&mut editor, "cam2", &stream("d"));

        while let Some(row) = editor.view().streams.first().cloned() {
            editor
                .delete_stream(&row.device_id, row.index, |_: &str| true)
                .unwrap();
            assert!(editor
                .config()
                .streams_by_device
                .values()
                .all(|streams| !streams.is_empty()));
        }
        assert!(editor.config().streams_by_device.is_empty());
    }

    // --- plates ---

    #[test]
    fn test_add_plate_and_duplicate() {
        let mut editor = editor();
        assert_eq!(editor.add_plate("ABC123"), PlateOutcome::Added);
        assert_eq!(editor.config().ignored_plates, vec!["ABC123"]);

        assert_eq!(editor.add_plate(" ABC123 "), PlateOutcome::Duplicate);
        assert_eq!(editor.config().ignored_plates, vec!["ABC123"]);
        assert_eq!(status_text(&editor), "Plate already exists");
    }

    #[test]
    fn test_add_empty_plate() {
        let mut editor = editor();
        assert_eq!(editor.add_plate("   "), PlateOutcome::Empty);
        assert!(editor.config().ignored_plates.is_empty());
        assert_eq!(status_text(&editor), "Please enter a license plate");
    }

    #[test]
    fn test_delete_plate_with_confirmation() {
        let mut editor = editor();
        editor.add_plate("AAA");
        editor.add_plate("BBB");

        assert!(!editor.delete_plate(0, |_: &str| false).unwrap());
        assert_eq!(editor.config().ignored_plates.len(), 2);

        let mut seen = String::new();
        assert!(editor
            .delete_plate(0, |p: &str| {
                seen = p.to_string();
                true
            })
            .unwrap());
        assert_eq!(seen, "Remove plate AAA?");
        assert_eq!(editor.config().ignored_plates, vec!["BBB"]);
    }

    #[test]
    fn test_delete_plate_out_of_range() {
        let mut editor = editor();
        assert!(matches!(
            editor.delete_plate(0, |_: &str| true),
            Err(AppError::PlateNotFound(0))
        ));
    }
}
