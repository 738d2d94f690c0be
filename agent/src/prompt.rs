//! Request payload for the advisory backend.

use crate::market::AssetQuote;
use std::fmt::Write;

/// Closing instruction appended to every prompt.
pub const ADVICE_INSTRUCTION: &str =
    "Provide investment advice based on the above data and user message.";

/// Combine the user's message with the current quotes.
///
/// The data block is always present, even when `snapshot` is empty, so the
/// backend sees an explicit absence of data rather than a missing section.
pub fn build_prompt(user_message: &str, snapshot: &[AssetQuote]) -> String {
    let mut prompt = format!("User message: {user_message}\n\n");
    prompt.push_str("Crypto data:\n");
    for quote in snapshot {
        // Writing into a String cannot fail
        let _ = writeln!(prompt, "{quote}");
    }
    prompt.push('\n');
    prompt.push_str(ADVICE_INSTRUCTION);
    prompt
}
