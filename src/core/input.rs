//! Keystroke decoding.
//!
//! Terminals deliver non-printable keys as short escape sequences
//! (`ESC [ A` for Up, `ESC [ 3 ~` for Delete, ...). [`KeyDecoder`] is a small
//! state machine that turns a byte/char stream into [`KeyEvent`]s:
//!
//! ```text
//! Idle --ESC--> Escape --'['--> Csi(params) --final--> Idle
//!                      --'O'--> Ss3         --final--> Idle
//! ```
//!
//! Unrecognized sequences are dropped without producing an event. A partial
//! sequence that sits longer than the timeout is abandoned before the next
//! byte is decoded, so a stray ESC never swallows later input.

use std::time::{Duration, Instant};

use crate::config::ESCAPE_TIMEOUT;
use crate::core::error::InputError;
use crate::models::KeyEvent;

/// Longest CSI parameter string accepted (e.g. `1;5` in `ESC [ 1 ; 5 C`).
const MAX_CSI_PARAMS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
enum DecodeState {
    Idle,
    Escape,
    Csi(String),
    Ss3,
}

/// Escape-sequence aware keystroke decoder.
#[derive(Clone, Debug)]
pub struct KeyDecoder {
    state: DecodeState,
    /// When the pending sequence started
    started: Option<Instant>,
    timeout: Duration,
    /// Previous char was `\r`, so a following `\n` is part of the same Enter
    after_cr: bool,
    /// Trailing bytes of an incomplete UTF-8 character
    utf8: Vec<u8>,
}

impl KeyDecoder {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: DecodeState::Idle,
            started: None,
            timeout,
            after_cr: false,
            utf8: Vec::new(),
        }
    }

    /// True while an escape sequence is partially decoded.
    pub fn is_pending(&self) -> bool {
        self.state != DecodeState::Idle
    }

    /// Decode one char using the current time.
    pub fn decode(&mut self, ch: char) -> Option<KeyEvent> {
        self.decode_at(ch, Instant::now())
    }

    /// Decode one char received at `now`.
    ///
    /// Each call is its own batch: a `\n` here is an Enter even if the
    /// previous call ended with `\r`.
    pub fn decode_at(&mut self, ch: char, now: Instant) -> Option<KeyEvent> {
        self.after_cr = false;
        self.decode_char(ch, now)
    }

    fn decode_char(&mut self, ch: char, now: Instant) -> Option<KeyEvent> {
        self.expire(now);
        match self.step(ch, now) {
            Ok(event) => event,
            Err(e) => {
                log::debug!("dropping input: {}", e);
                None
            }
        }
    }

    /// Decode raw bytes received at `now`.
    ///
    /// Multi-byte UTF-8 characters may be split across calls; invalid bytes
    /// are skipped. `\r\n` is one Enter only within a single batch.
    pub fn decode_bytes_at(&mut self, bytes: &[u8], now: Instant) -> Vec<KeyEvent> {
        self.after_cr = false;
        let mut buf = std::mem::take(&mut self.utf8);
        buf.extend_from_slice(bytes);

        let mut events = Vec::new();
        let mut rest: &[u8] = &buf;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    events.extend(text.chars().filter_map(|ch| self.decode_char(ch, now)));
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    let text = String::from_utf8_lossy(valid);
                    events.extend(text.chars().filter_map(|ch| self.decode_char(ch, now)));

                    match e.error_len() {
                        // Incomplete character, wait for more bytes
                        None => {
                            rest = tail;
                            break;
                        }
                        Some(n) => {
                            log::debug!("skipping {} invalid UTF-8 byte(s)", n);
                            rest = &tail[n..];
                        }
                    }
                }
            }
        }

        self.utf8 = rest.to_vec();
        events
    }

    /// Abandon a partial sequence older than the timeout.
    fn expire(&mut self, now: Instant) {
        if let Some(started) = self.started
            && now.saturating_duration_since(started) > self.timeout
        {
            log::debug!("abandoning stale escape sequence {:?}", self.state);
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.started = None;
    }

    fn step(&mut self, ch: char, now: Instant) -> Result<Option<KeyEvent>, InputError> {
        let after_cr = std::mem::replace(&mut self.after_cr, false);

        match std::mem::replace(&mut self.state, DecodeState::Idle) {
            DecodeState::Idle => Ok(self.decode_idle(ch, after_cr, now)),
            DecodeState::Escape => match ch {
                '[' => {
                    self.state = DecodeState::Csi(String::new());
                    Ok(None)
                }
                'O' => {
                    self.state = DecodeState::Ss3;
                    Ok(None)
                }
                // ESC ESC: restart the sequence
                '\x1b' => {
                    self.begin_escape(now);
                    Ok(None)
                }
                _ => self.malformed(format!("\x1b{}", ch)),
            },
            DecodeState::Csi(mut params) => match ch {
                '0'..='9' | ';' if params.len() < MAX_CSI_PARAMS => {
                    params.push(ch);
                    self.state = DecodeState::Csi(params);
                    Ok(None)
                }
                '~' => match params.as_str() {
                    "1" | "7" => self.finish(KeyEvent::Home),
                    "4" | "8" => self.finish(KeyEvent::End),
                    "3" => self.finish(KeyEvent::Delete),
                    _ => self.malformed(format!("\x1b[{}~", params)),
                },
                // Modifier parameters (ESC [ 1 ; 5 A) are ignored
                'A' | 'B' | 'C' | 'D' | 'H' | 'F' => self.finish(cursor_key(ch)),
                _ => self.malformed(format!("\x1b[{}{}", params, ch)),
            },
            DecodeState::Ss3 => match ch {
                'A' | 'B' | 'C' | 'D' | 'H' | 'F' => self.finish(cursor_key(ch)),
                _ => self.malformed(format!("\x1bO{}", ch)),
            },
        }
    }

    fn decode_idle(&mut self, ch: char, after_cr: bool, now: Instant) -> Option<KeyEvent> {
        match ch {
            '\x1b' => {
                self.begin_escape(now);
                None
            }
            '\r' => {
                self.after_cr = true;
                Some(KeyEvent::Enter)
            }
            '\n' if after_cr => None,
            '\n' => Some(KeyEvent::Enter),
            '\t' => Some(KeyEvent::Tab),
            '\x7f' | '\x08' => Some(KeyEvent::Backspace),
            '\x01' => Some(KeyEvent::Home),
            '\x03' => Some(KeyEvent::Interrupt),
            '\x04' => Some(KeyEvent::EndOfInput),
            '\x05' => Some(KeyEvent::End),
            '\x0c' => Some(KeyEvent::ClearScreen),
            '\x15' => Some(KeyEvent::KillLine),
            c if c.is_control() => {
                log::trace!("ignoring control character {:?}", c);
                None
            }
            c => Some(KeyEvent::Char(c)),
        }
    }

    fn begin_escape(&mut self, now: Instant) {
        self.state = DecodeState::Escape;
        self.started = Some(now);
    }

    fn finish(&mut self, event: KeyEvent) -> Result<Option<KeyEvent>, InputError> {
        self.reset();
        Ok(Some(event))
    }

    fn malformed(&mut self, sequence: String) -> Result<Option<KeyEvent>, InputError> {
        self.reset();
        Err(InputError::MalformedEscapeSequence(sequence))
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new(ESCAPE_TIMEOUT)
    }
}

/// Final byte shared by CSI and SS3 cursor keys.
fn cursor_key(ch: char) -> KeyEvent {
    match ch {
        'A' => KeyEvent::Up,
        'B' => KeyEvent::Down,
        'C' => KeyEvent::Right,
        'D' => KeyEvent::Left,
        'H' => KeyEvent::Home,
        _ => KeyEvent::End,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut KeyDecoder, input: &str) -> Vec<KeyEvent> {
        decoder.decode_bytes_at(input.as_bytes(), Instant::now())
    }

    #[test]
    fn test_printable_and_controls() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(
            decode_all(&mut decoder, "a\t\x7f\x08\x03\x0c\x01\x05\x15\x04"),
            vec![
                KeyEvent::Char('a'),
                KeyEvent::Tab,
                KeyEvent::Backspace,
                KeyEvent::Backspace,
                KeyEvent::Interrupt,
                KeyEvent::ClearScreen,
                KeyEvent::Home,
                KeyEvent::End,
                KeyEvent::KillLine,
                KeyEvent::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_enter_variants() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode_all(&mut decoder, "\r"), vec![KeyEvent::Enter]);
        assert_eq!(decode_all(&mut decoder, "\n"), vec![KeyEvent::Enter]);
        assert_eq!(decode_all(&mut decoder, "\r\n"), vec![KeyEvent::Enter]);
        assert_eq!(
            decode_all(&mut decoder, "\n\n"),
            vec![KeyEvent::Enter, KeyEvent::Enter]
        );
    }

    #[test]
    fn test_lf_after_cr_in_later_call_is_enter() {
        let mut decoder = KeyDecoder::default();
        let now = Instant::now();
        assert_eq!(decoder.decode_at('\r', now), Some(KeyEvent::Enter));
        assert_eq!(decoder.decode_at('\n', now), Some(KeyEvent::Enter));

        assert_eq!(decoder.decode_bytes_at(b"ls\r", now).last(), Some(&KeyEvent::Enter));
        assert_eq!(decoder.decode_bytes_at(b"\n", now), vec![KeyEvent::Enter]);
    }

    #[test]
    fn test_other_controls_ignored() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode_all(&mut decoder, "\x00\x07x"), vec![KeyEvent::Char('x')]);
    }

    #[test]
    fn test_csi_cursor_keys() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(
            decode_all(&mut decoder, "\x1b[A\x1b[B\x1b[C\x1b[D\x1b[H\x1b[F"),
            vec![
                KeyEvent::Up,
                KeyEvent::Down,
                KeyEvent::Right,
                KeyEvent::Left,
                KeyEvent::Home,
                KeyEvent::End,
            ]
        );
    }

    #[test]
    fn test_ss3_cursor_keys() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(
            decode_all(&mut decoder, "\x1bOA\x1bOB\x1bOC\x1bOD\x1bOH\x1bOF"),
            vec![
                KeyEvent::Up,
                KeyEvent::Down,
                KeyEvent::Right,
                KeyEvent::Left,
                KeyEvent::Home,
                KeyEvent::End,
            ]
        );
    }

    #[test]
    fn test_tilde_sequences() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(
            decode_all(&mut decoder, "\x1b[1~\x1b[7~\x1b[4~\x1b[8~\x1b[3~"),
            vec![
                KeyEvent::Home,
                KeyEvent::Home,
                KeyEvent::End,
                KeyEvent::End,
                KeyEvent::Delete,
            ]
        );
    }

    #[test]
    fn test_modifier_params_ignored() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode_all(&mut decoder, "\x1b[1;5C"), vec![KeyEvent::Right]);
    }

    #[test]
    fn test_malformed_sequences_dropped() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode_all(&mut decoder, "\x1b[9~x"), vec![KeyEvent::Char('x')]);
        assert_eq!(decode_all(&mut decoder, "\x1b[Zy"), vec![KeyEvent::Char('y')]);
        assert_eq!(decode_all(&mut decoder, "\x1bOQz"), vec![KeyEvent::Char('z')]);
        assert_eq!(decode_all(&mut decoder, "\x1bqw"), vec![KeyEvent::Char('w')]);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_overlong_params_dropped() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(
            decode_all(&mut decoder, "\x1b[123456789Ak"),
            vec![KeyEvent::Char('A'), KeyEvent::Char('k')]
        );
    }

    #[test]
    fn test_step_reports_malformed() {
        let mut decoder = KeyDecoder::default();
        let now = Instant::now();
        assert_eq!(decoder.step('\x1b', now), Ok(None));
        assert_eq!(decoder.step('[', now), Ok(None));
        assert_eq!(
            decoder.step('Z', now),
            Err(InputError::MalformedEscapeSequence("\x1b[Z".into()))
        );
    }

    #[test]
    fn test_double_escape_restarts() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode_all(&mut decoder, "\x1b\x1b[A"), vec![KeyEvent::Up]);
    }

    #[test]
    fn test_stale_sequence_abandoned() {
        let mut decoder = KeyDecoder::new(Duration::from_millis(50));
        let start = Instant::now();

        assert_eq!(decoder.decode_at('\x1b', start), None);
        assert!(decoder.is_pending());

        let later = start + Duration::from_millis(100);
        assert_eq!(decoder.decode_at('[', later), Some(KeyEvent::Char('[')));
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_sequence_within_timeout_completes() {
        let mut decoder = KeyDecoder::new(Duration::from_millis(50));
        let start = Instant::now();

        decoder.decode_at('\x1b', start);
        decoder.decode_at('[', start + Duration::from_millis(10));
        assert_eq!(
            decoder.decode_at('A', start + Duration::from_millis(20)),
            Some(KeyEvent::Up)
        );
    }

    #[test]
    fn test_decode_bytes_split_utf8() {
        let mut decoder = KeyDecoder::default();
        let now = Instant::now();
        let bytes = "é".as_bytes();

        assert!(decoder.decode_bytes_at(&bytes[..1], now).is_empty());
        assert_eq!(
            decoder.decode_bytes_at(&bytes[1..], now),
            vec![KeyEvent::Char('é')]
        );
    }

    #[test]
    fn test_decode_bytes_invalid_skipped() {
        let mut decoder = KeyDecoder::default();
        let now = Instant::now();
        assert_eq!(
            decoder.decode_bytes_at(b"a\xffb\x1b[D", now),
            vec![KeyEvent::Char('a'), KeyEvent::Char('b'), KeyEvent::Left]
        );
    }
}
