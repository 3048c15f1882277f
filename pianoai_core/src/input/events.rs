/// Pitch event from the input collaborator (keyboard, pointer, MIDI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    NoteOn { pitch: String },
    /// Accepted for symmetry with note-on; gameplay does not judge releases.
    NoteOff { pitch: String },
}

impl InputEvent {
    pub fn note_on(pitch: impl Into<String>) -> Self {
        InputEvent::NoteOn {
            pitch: pitch.into(),
        }
    }

    pub fn note_off(pitch: impl Into<String>) -> Self {
        InputEvent::NoteOff {
            pitch: pitch.into(),
        }
    }

    pub fn pitch(&self) -> &str {
        match self {
            InputEvent::NoteOn { pitch } | InputEvent::NoteOff { pitch } => pitch,
        }
    }
}
