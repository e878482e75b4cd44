use serde::Serialize;
use utoipa::ToSchema;

/// The six sections of a "2l" summary, in prompt order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct TwoLSummary {
    pub key_pointers: String,
    pub summary: String,
    pub final_summary: String,
    pub explain_like_five: String,
    pub one_word: String,
    pub good_or_bad: String,
}

impl TwoLSummary {
    /// Every field set to `value`; used to flag rows whose summary failed.
    pub fn filled(value: &str) -> Self {
        let value = value.to_string();
        Self {
            key_pointers: value.clone(),
            summary: value.clone(),
            final_summary: value.clone(),
            explain_like_five: value.clone(),
            one_word: value.clone(),
            good_or_bad: value,
        }
    }

    pub fn into_values(self) -> [String; 6] {
        [
            self.key_pointers,
            self.summary,
            self.final_summary,
            self.explain_like_five,
            self.one_word,
            self.good_or_bad,
        ]
    }

    fn slot(&mut self, index: usize) -> Option<&mut String> {
        match index {
            1 => Some(&mut self.key_pointers),
            2 => Some(&mut self.summary),
            3 => Some(&mut self.final_summary),
            4 => Some(&mut self.explain_like_five),
            5 => Some(&mut self.one_word),
            6 => Some(&mut self.good_or_bad),
            _ => None,
        }
    }
}

/// Map the model's numbered lines (`1.` .. `6.`) onto the six fields.
///
/// Lines are trimmed before matching; a repeated number overwrites the earlier
/// value and missing numbers leave the field empty.
pub fn parse_2l(response: &str) -> TwoLSummary {
    let mut parsed = TwoLSummary::default();

    for line in response.lines() {
        let line = line.trim();
        let mut chars = line.chars();
        let (Some(digit), Some('.')) = (chars.next(), chars.next()) else {
            continue;
        };
        let Some(index) = digit.to_digit(10) else {
            continue;
        };

        if let Some(slot) = parsed.slot(index as usize) {
            // Text after the first '.', which is the one following the digit
            *slot = line[2..].trim().to_string();
        }
    }

    parsed
}
