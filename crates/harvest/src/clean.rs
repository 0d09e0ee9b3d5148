//! Text normalization for extracted paper text.
//!
//! Cleaning is a fixed sequence of [`Step`]s, each a pure `&str -> String`
//! rewrite. Later steps rely on earlier ones having run (digits are only
//! collapsed after the abstract window has been cut, punctuation is only
//! filtered after URLs and emails are gone), so the order in [`Step::ALL`] is
//! part of the output format.
//!
//! # Examples
//!
//! ```
//! use harvest::clean::clean;
//!
//! assert_eq!(clean("Visit http://example.com/page now"), "Visit now");
//! assert_eq!(clean("Cost is $x+y$ dollars"), "Cost is dollars");
//! assert_eq!(clean("end of page\n42\nnext section"), "end of page next section");
//! ```

use super::*;

lazy_static! {
  static ref SECTION_WINDOW: Regex = Regex::new(r"(?is)ABSTRACT(.*?)CONCLUSION").unwrap();
  static ref URL: Regex = Regex::new(r"http\S+").unwrap();
  static ref EMAIL: Regex = Regex::new(r"\S+@\S+").unwrap();
  static ref INLINE_MATH: Regex = Regex::new(r"\$[^$]+\$").unwrap();
  static ref BREAKS_AND_DIGITS: Regex = Regex::new(r"(\n+|\d+)").unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Punctuation kept by [`Step::FilterPunctuation`]; they mark sentence ends.
const KEPT_PUNCTUATION: [char; 2] = ['.', '?'];

/// One text rewrite in the normalization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
  /// Keep only the text between the first `ABSTRACT` and the following
  /// `CONCLUSION` (case-insensitive, across lines). Without a match the text
  /// is left alone.
  SectionWindow,
  /// Delete every token starting with `http`, up to the next whitespace.
  StripUrls,
  /// Delete every whitespace-delimited token containing `@`.
  StripEmails,
  /// Delete every `$...$` span.
  StripInlineMath,
  /// Replace each run of newlines and each run of digits with one space.
  CollapseBreaksAndDigits,
  /// Drop ASCII punctuation except `.` and `?`.
  FilterPunctuation,
  /// Squeeze whitespace runs to one space and trim the ends.
  CollapseWhitespace,
}

impl Step {
  /// The full sequence, in the order it must run.
  pub const ALL: [Step; 7] = [
    Step::SectionWindow,
    Step::StripUrls,
    Step::StripEmails,
    Step::StripInlineMath,
    Step::CollapseBreaksAndDigits,
    Step::FilterPunctuation,
    Step::CollapseWhitespace,
  ];

  /// Applies this step to `text`.
  pub fn apply(self, text: &str) -> String {
    match self {
      Step::SectionWindow => SECTION_WINDOW
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map_or_else(|| text.to_string(), |m| m.as_str().to_string()),
      Step::StripUrls => URL.replace_all(text, "").into_owned(),
      Step::StripEmails => EMAIL.replace_all(text, "").into_owned(),
      Step::StripInlineMath => INLINE_MATH.replace_all(text, "").into_owned(),
      Step::CollapseBreaksAndDigits => BREAKS_AND_DIGITS.replace_all(text, " ").into_owned(),
      Step::FilterPunctuation => text
        .chars()
        .filter(|c| !c.is_ascii_punctuation() || KEPT_PUNCTUATION.contains(c))
        .collect(),
      Step::CollapseWhitespace => WHITESPACE.replace_all(text, " ").trim().to_string(),
    }
  }
}

/// Applies a sequence of [`Step`]s to raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNormalizer {
  /// Steps, run front to back.
  steps: Vec<Step>,
}

impl Default for TextNormalizer {
  fn default() -> Self { Self { steps: Step::ALL.to_vec() } }
}

impl TextNormalizer {
  /// A normalizer running the full [`Step::ALL`] sequence.
  pub fn new() -> Self { Self::default() }

  /// A normalizer running only `steps`, in the given order.
  ///
  /// Output of anything other than [`Step::ALL`] is not comparable with texts
  /// cleaned by [`TextNormalizer::new`].
  pub fn with_steps(steps: impl IntoIterator<Item = Step>) -> Self {
    Self { steps: steps.into_iter().collect() }
  }

  /// The steps this normalizer runs.
  pub fn steps(&self) -> &[Step] { &self.steps }

  /// Cleans `raw`.
  pub fn clean(&self, raw: &str) -> String {
    self.steps.iter().fold(raw.to_string(), |text, step| step.apply(&text))
  }

  /// Cleans every text in an extracted-text map, keeping the keys.
  pub fn clean_all(&self, extracted: &ExtractedText) -> CleanedText {
    extracted
      .iter()
      .map(|(identifier, raw)| {
        let cleaned = self.clean(raw);
        debug!("Cleaned {identifier}: {} -> {} chars", raw.len(), cleaned.len());
        (identifier.clone(), cleaned)
      })
      .collect()
  }
}

/// Cleans `raw` with the full normalization sequence.
pub fn clean(raw: &str) -> String { TextNormalizer::new().clean(raw) }
