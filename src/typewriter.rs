//! Typed-text animation.
//!
//! A small finite-state machine cycles through the role labels of a
//! bundle, typing and deleting characters to produce the looping
//! typewriter line in the hero section. The machine holds only a label
//! index, a character index and a phase; the displayed substring is
//! computed from that state. Time is injected: [`Typewriter::delay_ms`]
//! reports how long the current frame holds and [`Typewriter::advance`]
//! applies exactly one transition, so the whole cycle is testable
//! without timers.
//!
//! The end of a word is deleted down to a single character and the next
//! transition jumps straight to the first character of the following
//! label. The empty string is never a committed frame, which kills the
//! one-tick flicker between words.
//!
//! For the generated site the machine is driven once around its cycle
//! ([`frame_schedule`]) and compiled to CSS `@keyframes`: one stacked
//! `<span>` per frame, each visible during its slice of the loop.

use thiserror::Error;

use crate::config::AnimationConfig;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypewriterError {
    #[error("typing animation needs at least one label")]
    NoLabels,
    #[error("typing animation labels must not be empty")]
    EmptyLabel,
}

/// Animation phase. `Pausing` holds the fully-typed word before
/// deletion begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Pausing,
    Deleting,
}

/// The typing state machine.
///
/// Freshly constructed, the display is empty; the first [`advance`]
/// shows the first character of the first label. From then on the
/// display is never empty.
///
/// [`advance`]: Typewriter::advance
#[derive(Debug, Clone)]
pub struct Typewriter {
    labels: Vec<String>,
    timing: AnimationConfig,
    label_index: usize,
    char_index: usize,
    phase: Phase,
}

impl Typewriter {
    pub fn new(labels: Vec<String>, timing: AnimationConfig) -> Result<Self, TypewriterError> {
        if labels.is_empty() {
            return Err(TypewriterError::NoLabels);
        }
        if labels.iter().any(|label| label.trim().is_empty()) {
            return Err(TypewriterError::EmptyLabel);
        }
        Ok(Self {
            labels,
            timing,
            label_index: 0,
            char_index: 0,
            phase: Phase::Typing,
        })
    }

    /// The currently displayed substring.
    pub fn display(&self) -> String {
        self.labels[self.label_index]
            .chars()
            .take(self.char_index)
            .collect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How long the current frame holds before the next transition.
    pub fn delay_ms(&self) -> u64 {
        match self.phase {
            Phase::Typing => self.timing.typing_speed_ms,
            Phase::Pausing => self.timing.pause_delay_ms,
            Phase::Deleting => self.timing.deleting_speed_ms,
        }
    }

    fn current_len(&self) -> usize {
        self.labels[self.label_index].chars().count()
    }

    fn state(&self) -> (usize, usize, Phase) {
        (self.label_index, self.char_index, self.phase)
    }

    /// Apply exactly one transition.
    pub fn advance(&mut self) {
        match self.phase {
            Phase::Typing => {
                let len = self.current_len();
                if self.char_index < len {
                    self.char_index += 1;
                }
                if self.char_index == len {
                    self.phase = Phase::Pausing;
                }
            }
            Phase::Pausing => {
                self.phase = Phase::Deleting;
            }
            Phase::Deleting => {
                if self.char_index > 1 {
                    self.char_index -= 1;
                } else {
                    // Last character of the old word: jump straight to the
                    // first character of the next one. No empty frame.
                    self.label_index = (self.label_index + 1) % self.labels.len();
                    self.char_index = 1;
                    self.phase = if self.current_len() == 1 {
                        Phase::Pausing
                    } else {
                        Phase::Typing
                    };
                }
            }
        }
    }
}

/// One committed animation frame: the text shown and how long it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub hold_ms: u64,
}

/// Drive the machine once around its cycle and collect the committed
/// frames. Consecutive frames with the same text are merged.
pub fn frame_schedule(
    labels: &[String],
    timing: &AnimationConfig,
) -> Result<Vec<Frame>, TypewriterError> {
    let mut tw = Typewriter::new(labels.to_vec(), timing.clone())?;
    // Step past the empty pre-start state; the loop begins at the first
    // character of the first label.
    tw.advance();
    let start = tw.state();

    let mut frames: Vec<Frame> = Vec::new();
    loop {
        let text = tw.display();
        let hold = tw.delay_ms();
        match frames.last_mut() {
            Some(last) if last.text == text => last.hold_ms += hold,
            _ => frames.push(Frame { text, hold_ms: hold }),
        }
        tw.advance();
        if tw.state() == start {
            break;
        }
    }
    Ok(frames)
}

/// Total duration of one animation cycle.
pub fn cycle_ms(frames: &[Frame]) -> u64 {
    frames.iter().map(|f| f.hold_ms).sum()
}

/// Compile a frame schedule to CSS.
///
/// Each frame becomes a `@keyframes` rule toggling the visibility of the
/// matching `.typed-frame` span during its cumulative slice of the
/// cycle. `step-end` makes the value jump exactly at the slice
/// boundaries, so no two frames ever show at once.
pub fn typing_keyframes_css(frames: &[Frame]) -> String {
    if frames.is_empty() {
        return String::new();
    }
    let total = cycle_ms(frames);
    let mut css = format!(
        ".typed-frame {{\n    animation-duration: {total}ms;\n    \
         animation-timing-function: step-end;\n    \
         animation-iteration-count: infinite;\n}}\n"
    );

    for (i, _) in frames.iter().enumerate() {
        let n = i + 1;
        css.push_str(&format!(
            ".typed-frame:nth-child({n}) {{ animation-name: typed-frame-{n}; }}\n"
        ));
    }

    let mut elapsed: u64 = 0;
    for (i, frame) in frames.iter().enumerate() {
        let n = i + 1;
        let start = elapsed as f64 / total as f64 * 100.0;
        elapsed += frame.hold_ms;
        let end = elapsed as f64 / total as f64 * 100.0;

        css.push_str(&format!("@keyframes typed-frame-{n} {{\n"));
        if start == 0.0 {
            css.push_str("    0% { visibility: visible; }\n");
        } else {
            css.push_str("    0% { visibility: hidden; }\n");
            css.push_str(&format!("    {start:.4}% {{ visibility: visible; }}\n"));
        }
        if end < 100.0 {
            css.push_str(&format!("    {end:.4}% {{ visibility: hidden; }}\n"));
        }
        css.push_str("}\n");
    }
    css
}
