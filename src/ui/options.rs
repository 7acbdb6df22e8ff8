use crate::settings::{Result, SettingsDocument, SettingsStore, SliderScale};
use dialoguer::Input;
use log::debug;

/// Integer slider control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekBar {
    pub progress: u32,
    pub max: u32,
}

impl SeekBar {
    pub fn new(max: u32) -> Self {
        Self { progress: 0, max }
    }

    /// Sets the position, clamped to `max`.
    pub fn set_progress(&mut self, progress: u32) {
        self.progress = progress.min(self.max);
    }
}

/// Options screen: one seek bar per setting.
#[derive(Debug, Clone)]
pub struct OptionsScreen {
    pub gravity_bar: SeekBar,
    pub bounce_bar: SeekBar,
}

impl OptionsScreen {
    pub fn new(slider_max: u32) -> Self {
        Self {
            gravity_bar: SeekBar::new(slider_max),
            bounce_bar: SeekBar::new(slider_max),
        }
    }

    fn gravity_scale(&self) -> SliderScale {
        SliderScale::gravity(self.gravity_bar.max)
    }

    fn bounce_scale(&self) -> SliderScale {
        SliderScale::bounce(self.bounce_bar.max)
    }

    /// Loads the stored settings into the bars.
    pub fn push_options_to_controls(&mut self, store: &SettingsStore) -> Result<SettingsDocument> {
        let doc = store.load()?;
        self.show(&doc);
        Ok(doc)
    }

    pub fn show(&mut self, doc: &SettingsDocument) {
        let gravity = self.gravity_scale().to_slider(doc.gravity);
        let bounce = self.bounce_scale().to_slider(doc.bounce);
        self.gravity_bar.set_progress(gravity);
        self.bounce_bar.set_progress(bounce);
        debug!("Options controls at gravity={} bounce={}", gravity, bounce);
    }

    pub fn pull_options_from_controls(&self) -> SettingsDocument {
        SettingsDocument {
            gravity: self.gravity_scale().to_physical(self.gravity_bar.progress),
            bounce: self.bounce_scale().to_physical(self.bounce_bar.progress),
        }
    }

    /// The "save and exit" button.
    pub fn save_and_exit(&self, store: &SettingsStore) -> Result<SettingsDocument> {
        let doc = self.pull_options_from_controls();
        store.save(&doc)?;
        Ok(doc)
    }
}

/// Asks for a new bar position on the terminal, defaulting to the current
/// one.
pub fn prompt_seek_bar(label: &str, bar: &mut SeekBar) -> dialoguer::Result<()> {
    let max = bar.max;
    let progress: u32 = Input::new()
        .with_prompt(format!("{} (0-{})", label, max))
        .default(bar.progress)
        .validate_with(move |value: &u32| -> std::result::Result<(), String> {
            if *value <= max {
                Ok(())
            } else {
                Err(format!("must be at most {}", max))
            }
        })
        .interact_text()?;
    bar.set_progress(progress);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_then_pull_keeps_step_aligned_values() {
        let mut screen = OptionsScreen::new(100);
        let doc = SettingsDocument {
            gravity: 150.0,
            bounce: 0.5,
        };
        screen.show(&doc);
        assert_eq!(screen.gravity_bar.progress, 50);
        assert_eq!(screen.bounce_bar.progress, 50);
        assert_eq!(screen.pull_options_from_controls(), doc);
    }

    #[test]
    fn test_seek_bar_clamps() {
        let mut bar = SeekBar::new(10);
        bar.set_progress(25);
        assert_eq!(bar.progress, 10);
    }
}
