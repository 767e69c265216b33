use gloo_console::error;
use gloo_utils::window;
use guardian_lib::config::{SPEECH_LOCALE, SPEECH_RATE};
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

/// Reads instructions out loud, one at a time.
pub struct Speaker {
    synth: Option<SpeechSynthesis>,
}

impl Speaker {
    pub fn new() -> Self {
        Self {
            synth: window().speech_synthesis().ok(),
        }
    }

    /// Cancels whatever is being said before starting on `text`.
    pub fn speak(&self, text: &str) {
        let Some(synth) = &self.synth else {
            return;
        };

        synth.cancel();

        match SpeechSynthesisUtterance::new_with_text(text) {
            Ok(utterance) => {
                utterance.set_lang(SPEECH_LOCALE);
                utterance.set_rate(SPEECH_RATE);
                synth.speak(&utterance);
            }
            Err(err) => error!("Failed to create utterance", err),
        }
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }
}
