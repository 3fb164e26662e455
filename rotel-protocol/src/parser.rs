//! Incremental stream parser for the device's ASCII protocol
//!
//! The device writes two kinds of sentences into the same stream:
//!
//! ```text
//! volume=45!                 simple: one '=' and a terminating '!'
//! display=010,0123456789     length-prefixed: 3-digit byte count, no terminator
//! display1=04,abcd           length-prefixed: 2-digit byte count
//! display2=04,ab!=           payload bytes are data, even '!' and '='
//! ```
//!
//! Bytes arrive in arbitrary chunks. [`StreamParser::feed`] grows a candidate
//! from the head of its buffer one byte at a time and tests it against the
//! rule table after every byte. The scan position survives between calls, so
//! each byte is examined once no matter how the input was split.
//!
//! A length-prefixed header is recognized anywhere in the candidate. Stray
//! bytes ahead of it (a leftover tail, or a sentence cut off when the bridge
//! started) are dropped once the display command completes.

use crate::command::Command;

/// Length-prefixed rule: `<key>=<width digits><separator><payload>`
#[derive(Debug, Clone, Copy)]
struct LengthPrefixedRule {
    key: &'static str,
    header: &'static [u8],
    width: usize,
}

/// Checked in this order after the simple rule
static LENGTH_PREFIXED_RULES: [LengthPrefixedRule; 3] = [
    LengthPrefixedRule {
        key: "display1",
        header: b"display1=",
        width: 2,
    },
    LengthPrefixedRule {
        key: "display2",
        header: b"display2=",
        width: 2,
    },
    LengthPrefixedRule {
        key: "display",
        header: b"display=",
        width: 3,
    },
];

const TERMINATOR: u8 = b'!';
const ASSIGN: u8 = b'=';

impl LengthPrefixedRule {
    /// Returns the payload once the declared number of bytes is present
    ///
    /// `framed` starts at this rule's header.
    fn payload<'a>(&self, framed: &'a [u8]) -> Option<&'a [u8]> {
        let rest = framed.strip_prefix(self.header)?;
        // length field plus the one separator byte
        if rest.len() <= self.width {
            return None;
        }

        let length = parse_length(&rest[..self.width])?;
        let payload = &rest[self.width + 1..];
        if payload.len() < length {
            return None;
        }

        Some(&payload[..length])
    }
}

/// Parse an all-digit length field; anything else never matches
fn parse_length(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    digits.iter().try_fold(0usize, |acc, digit| {
        acc.checked_mul(10)?.checked_add(usize::from(digit - b'0'))
    })
}

/// Stateful parser turning a chunked byte stream into [`Command`]s
///
/// The buffer always holds exactly the received bytes that have not yet been
/// resolved into a command. A command that never completes stays buffered and
/// holds back everything behind it.
#[derive(Debug, Default)]
pub struct StreamParser {
    buffer: Vec<u8>,
    /// Bytes of the current candidate already examined
    scanned: usize,
    /// Number of `=` in the examined part of the candidate
    assignments: usize,
    /// First length-prefixed header seen in the candidate
    header: Option<HeaderMatch>,
}

/// Where a length-prefixed header sits inside the current candidate
#[derive(Debug, Clone, Copy)]
struct HeaderMatch {
    rule: &'static LengthPrefixedRule,
    offset: usize,
}

impl StreamParser {
    /// Create a parser with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of raw bytes and return every command it completes
    ///
    /// Commands are returned in the order their final byte was seen. Any
    /// unresolved remainder is kept for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Command> {
        self.buffer.extend_from_slice(chunk);

        let mut commands = Vec::new();
        let mut start = 0;

        while start + self.scanned < self.buffer.len() {
            let byte = self.buffer[start + self.scanned];
            self.scanned += 1;
            let candidate = &self.buffer[start..start + self.scanned];
            if byte == ASSIGN {
                self.assignments += 1;
                if self.header.is_none() {
                    self.header = find_header(candidate);
                }
            }

            if let Some(command) = match_candidate(candidate, self.assignments, self.header) {
                if let Some(HeaderMatch { offset, .. }) = self.header.filter(|h| h.offset > 0) {
                    tracing::debug!(
                        skipped = %String::from_utf8_lossy(&candidate[..offset]),
                        "dropped bytes before display header"
                    );
                }
                tracing::trace!(key = %command.key, value = %command.value, "decoded command");
                commands.push(command);
                start += self.scanned;
                self.scanned = 0;
                self.assignments = 0;
                self.header = None;
            }
        }

        self.buffer.drain(..start);
        commands
    }

    /// Convenience wrapper around [`feed`](Self::feed) for text input
    pub fn feed_str(&mut self, chunk: &str) -> Vec<Command> {
        self.feed(chunk.as_bytes())
    }

    /// Bytes received but not yet resolved into a command
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether the buffer is empty
    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard any partially received command
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
        self.assignments = 0;
        self.header = None;
    }
}

/// Header that the candidate's newest `=` completes, if any
fn find_header(candidate: &[u8]) -> Option<HeaderMatch> {
    LENGTH_PREFIXED_RULES
        .iter()
        .find(|rule| candidate.ends_with(rule.header))
        .map(|rule| HeaderMatch {
            rule,
            offset: candidate.len() - rule.header.len(),
        })
}

/// Test a candidate against the rule table, first match wins
///
/// Bytes ahead of a length-prefixed header are dropped with the command.
fn match_candidate(
    candidate: &[u8],
    assignments: usize,
    header: Option<HeaderMatch>,
) -> Option<Command> {
    match header {
        // A length-prefixed payload ends by count only.
        Some(HeaderMatch { rule, offset }) => rule
            .payload(&candidate[offset..])
            .map(|payload| Command::new(rule.key, String::from_utf8_lossy(payload))),
        None => match_simple(candidate, assignments),
    }
}

fn match_simple(candidate: &[u8], assignments: usize) -> Option<Command> {
    let body = candidate.strip_suffix(&[TERMINATOR])?;
    if assignments != 1 {
        return None;
    }

    Some(Command::from_body(&String::from_utf8_lossy(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(commands: &[Command]) -> Vec<(&str, &str)> {
        commands.iter().map(|c| (c.key(), c.value())).collect()
    }

    #[test]
    fn test_terminated_commands() {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str("source=coax2!freq=44.1!");

        assert_eq!(pairs(&commands), vec![("source", "coax2"), ("freq", "44.1")]);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_fixed_length_display() {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str("display=010,0123456789A");

        assert_eq!(pairs(&commands), vec![("display", "0123456789")]);
        assert_eq!(parser.pending(), b"A");
    }

    #[test]
    fn test_fixed_length_split() {
        let mut parser = StreamParser::new();
        assert!(parser.feed_str("display=010,01234").is_empty());
        let commands = parser.feed_str("56789A");

        assert_eq!(pairs(&commands), vec![("display", "0123456789")]);
    }

    #[test]
    fn test_mixed_chunks() {
        let mut parser = StreamParser::new();
        let mut commands = Vec::new();
        for chunk in ["disp", "lay=010,01234", "56789", "source=coax2!fr", "eq=44.1!"] {
            commands.extend(parser.feed_str(chunk));
        }

        assert_eq!(
            pairs(&commands),
            vec![
                ("display", "0123456789"),
                ("source", "coax2"),
                ("freq", "44.1")
            ]
        );
        assert!(parser.is_idle());
    }

    #[rstest]
    #[case("display1=04,abcde", "display1", "abcd", "e")]
    #[case("display2=04,abcd", "display2", "abcd", "")]
    #[case("display2=10,0123456789", "display2", "0123456789", "")]
    #[case("display=005,a!b=c", "display", "a!b=c", "")]
    fn test_length_prefixed_payload(
        #[case] input: &str,
        #[case] key: &str,
        #[case] value: &str,
        #[case] pending: &str,
    ) {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str(input);

        assert_eq!(pairs(&commands), vec![(key, value)]);
        assert_eq!(parser.pending(), pending.as_bytes());
    }

    #[test]
    fn test_payload_delimiters_do_not_end_display() {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str("display1=03,!!!volume=1!");

        assert_eq!(
            pairs(&commands),
            vec![("display1", "!!!"), ("volume", "1")]
        );
    }

    #[test]
    fn test_zero_length_display() {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str("display=000,mute=on!");

        assert_eq!(pairs(&commands), vec![("display", ""), ("mute", "on")]);
    }

    #[rstest]
    #[case("display=0x5,abcde")]
    #[case("display1=-1,abc")]
    #[case("display2=+3,abc!")]
    fn test_malformed_length_stays_buffered(#[case] input: &str) {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str(input);

        assert!(commands.is_empty());
        assert_eq!(parser.pending(), input.as_bytes());
    }

    #[test]
    fn test_display_waits_for_declared_length() {
        let mut parser = StreamParser::new();
        assert!(parser.feed_str("display=012,hello!").is_empty());
        assert!(parser.feed_str("wor").is_empty());
        let commands = parser.feed_str("ld!");

        assert_eq!(pairs(&commands), vec![("display", "hello!world!")]);
    }

    #[test]
    fn test_incomplete_simple_command_is_retained() {
        let mut parser = StreamParser::new();
        assert!(parser.feed_str("volume=4").is_empty());
        assert_eq!(parser.pending(), b"volume=4");

        let commands = parser.feed_str("5!");
        assert_eq!(pairs(&commands), vec![("volume", "45")]);
    }

    #[test]
    fn test_empty_chunk_is_harmless() {
        let mut parser = StreamParser::new();
        parser.feed_str("bass=+0");
        assert!(parser.feed(&[]).is_empty());
        assert_eq!(parser.feed_str("2!"), vec![Command::new("bass", "+02")]);
    }

    #[test]
    fn test_unknown_keys_are_forwarded() {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str("speaker=a!");

        assert_eq!(commands, vec![Command::new("speaker", "a")]);
    }

    #[test]
    fn test_clear_discards_partial_command() {
        let mut parser = StreamParser::new();
        parser.feed_str("display=010,0123");
        parser.clear();

        assert!(parser.is_idle());
        assert_eq!(parser.feed_str("tone=on!"), vec![Command::new("tone", "on")]);
    }

    #[test]
    fn test_leftover_tail_before_display_is_dropped() {
        let mut parser = StreamParser::new();
        parser.feed_str("display=010,0123456789A");
        assert_eq!(parser.pending(), b"A");

        let commands = parser.feed_str("display=010,abcdefghij");
        assert_eq!(pairs(&commands), vec![("display", "abcdefghij")]);
        assert!(parser.is_idle());

        let commands = parser.feed_str("volume=45!source=cd!");
        assert_eq!(pairs(&commands), vec![("volume", "45"), ("source", "cd")]);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_recovers_when_started_mid_sentence() {
        let mut parser = StreamParser::new();
        let commands = parser.feed_str("45!display=005,hellovolume=45!");

        assert_eq!(pairs(&commands), vec![("display", "hello"), ("volume", "45")]);
        assert!(parser.is_idle());
    }

    #[rstest]
    #[case("xy", "display1=02,ab", "display1", "ab")]
    #[case("!!", "display2=01,z", "display2", "z")]
    #[case("bass=+0", "display=003,a!b", "display", "a!b")]
    fn test_junk_before_header_split_across_feeds(
        #[case] junk: &str,
        #[case] sentence: &str,
        #[case] key: &str,
        #[case] value: &str,
    ) {
        let mut parser = StreamParser::new();
        let mut commands = parser.feed_str(junk);
        for byte in sentence.as_bytes() {
            commands.extend(parser.feed(std::slice::from_ref(byte)));
        }

        assert_eq!(pairs(&commands), vec![(key, value)]);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length(b"010"), Some(10));
        assert_eq!(parse_length(b"00"), Some(0));
        assert_eq!(parse_length(b"1a"), None);
        assert_eq!(parse_length(b""), None);
    }
}
