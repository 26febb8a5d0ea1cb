//! Speech collaborators: text-to-speech output and transcript input.
//!
//! Speaking is fire-and-forget. Callers hand an [`Utterance`] to a
//! [`Speaker`] and carry on; a speaker never reports failure back and never
//! blocks the caller until playback ends.

use std::io::{self, BufRead, Write};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Voice preference for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Voice {
    Male,
    Female,
    #[default]
    Neutral,
}

/// A message to be spoken.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Voice,
    /// Speaking rate multiplier, 1.0 is normal.
    pub rate: f32,
    /// Pitch multiplier, 1.0 is normal.
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Utterance {
            text: text.into(),
            voice: Voice::Neutral,
            rate: 1.0,
            pitch: 1.0,
        }
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    /// Slightly faster and higher, used for the jokey calculator replies.
    pub fn playful(mut self) -> Self {
        self.voice = Voice::Male;
        self.rate = 1.1;
        self.pitch = 1.3;
        self
    }
}

/// One-way speech output.
pub trait Speaker {
    fn speak(&self, utterance: Utterance);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct MutedSpeaker;

impl Speaker for MutedSpeaker {
    fn speak(&self, _utterance: Utterance) {}
}

/// Prints utterances to stdout, for terminals without a speech engine.
#[derive(Debug, Default)]
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, utterance: Utterance) {
        println!("🔊 {}", utterance.text);
    }
}

/// Speaks through an external TTS program (`espeak`, `espeak-ng`, `say`, `spd-say`).
///
/// Starting a new utterance stops the one still playing.
#[derive(Debug)]
pub struct CommandSpeaker {
    program: String,
    default_voice: Voice,
    current: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpeaker {
            program: program.into(),
            default_voice: Voice::Neutral,
            current: Mutex::new(None),
        }
    }

    /// Voice used for utterances that do not ask for one.
    pub fn with_default_voice(mut self, voice: Voice) -> Self {
        self.default_voice = voice;
        self
    }

    /// Command-line arguments for `program`.
    pub fn args_for(program: &str, utterance: &Utterance) -> Vec<String> {
        let name = program.rsplit('/').next().unwrap_or(program);
        match name {
            "espeak" | "espeak-ng" => {
                let variant = match utterance.voice {
                    Voice::Male => "en+m3",
                    Voice::Female => "en+f3",
                    Voice::Neutral => "en",
                };
                vec![
                    "-v".into(),
                    variant.into(),
                    "-s".into(),
                    ((175.0 * utterance.rate).round() as u32).to_string(),
                    "-p".into(),
                    ((50.0 * utterance.pitch).round().min(99.0) as u32).to_string(),
                    utterance.text.clone(),
                ]
            }
            "say" => vec![
                "-r".into(),
                ((180.0 * utterance.rate).round() as u32).to_string(),
                utterance.text.clone(),
            ],
            "spd-say" => {
                let mut args = vec![
                    "-r".into(),
                    (((utterance.rate - 1.0) * 100.0).round() as i32).clamp(-100, 100).to_string(),
                ];
                match utterance.voice {
                    Voice::Male => args.extend(["-t".into(), "male1".into()]),
                    Voice::Female => args.extend(["-t".into(), "female1".into()]),
                    Voice::Neutral => {}
                }
                args.push(utterance.text.clone());
                args
            }
            _ => vec![utterance.text.clone()],
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, mut utterance: Utterance) {
        if utterance.voice == Voice::Neutral {
            utterance.voice = self.default_voice;
        }
        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(mut child) = current.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
        let spawned = Command::new(&self.program)
            .args(Self::args_for(&self.program, &utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => *current = Some(child),
            Err(e) => log::warn!("Could not start speech program '{}': {e}", self.program),
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        // Let the last utterance finish rather than leaving a zombie behind.
        if let Ok(mut current) = self.current.lock() {
            if let Some(mut child) = current.take() {
                let _ = child.wait();
            }
        }
    }
}

/// Speech-to-text input.
pub trait Listener {
    /// Next transcript, or `None` when nothing was heard.
    fn listen(&mut self, prompt: &str) -> Option<String>;
}

/// Reads transcripts as typed lines on stdin.
#[derive(Debug, Default)]
pub struct StdinListener;

impl Listener for StdinListener {
    fn listen(&mut self, prompt: &str) -> Option<String> {
        print!("🎤 {prompt} ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()).filter(|l| !l.is_empty()),
        }
    }
}

/// Test double that records everything it is asked to say.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    pub spoken: std::cell::RefCell<Vec<Utterance>>,
}

#[cfg(test)]
impl RecordingSpeaker {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.borrow().iter().map(|u| u.text.clone()).collect()
    }
}

#[cfg(test)]
impl Speaker for RecordingSpeaker {
    fn speak(&self, utterance: Utterance) {
        self.spoken.borrow_mut().push(utterance);
    }
}

/// Test double that replays canned transcripts.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedListener {
    pub transcripts: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedListener {
    pub fn new<I: IntoIterator<Item = &'static str>>(lines: I) -> Self {
        ScriptedListener {
            transcripts: lines.into_iter().map(String::from).collect(),
        }
    }
}

#[cfg(test)]
impl Listener for ScriptedListener {
    fn listen(&mut self, _prompt: &str) -> Option<String> {
        self.transcripts.pop_front()
    }
}
