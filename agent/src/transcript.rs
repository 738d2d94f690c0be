//! Ordered conversation log with a fixed greeting at index 0.

use crate::message::Message;

/// Greeting shown at the top of every session.
pub const GREETING: &str = "I help you build the best trading portfolio";

/// Content of the placeholder that stands in for a pending reply.
pub const PLACEHOLDER: &str = "Thinking ...";

/// The session transcript.
///
/// Index 0 is the greeting and is never removed. Messages are only appended,
/// or replaced in place through [`Transcript::replace`].
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(Message::system(GREETING))
    }
}

impl Transcript {
    pub fn new(greeting: Message) -> Self {
        Self {
            messages: vec![greeting],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the greeting is always present.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn greeting(&self) -> &Message {
        &self.messages[0]
    }

    /// Everything after the greeting, in order.
    pub fn conversation(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// Append `user` followed by a placeholder and return the placeholder index.
    pub fn append_exchange(&mut self, user: Message) -> usize {
        self.messages.push(user);
        self.messages.push(Message::system(PLACEHOLDER));
        self.messages.len() - 1
    }

    /// Replace the message at `index`. The greeting cannot be replaced.
    ///
    /// Returns false if `index` does not point at a replaceable message.
    pub fn replace(&mut self, index: usize, message: Message) -> bool {
        if index == 0 {
            return false;
        }
        match self.messages.get_mut(index) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn test_starts_with_greeting() {
        let transcript = Transcript::default();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.greeting().content(), GREETING);
        assert_eq!(transcript.greeting().role(), Role::System);
        assert!(transcript.conversation().is_empty());
    }

    #[test]
    fn test_append_exchange_adds_user_and_placeholder() {
        let mut transcript = Transcript::default();
        let idx = transcript.append_exchange(Message::user("hi"));

        assert_eq!(idx, 2);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.messages()[1].content(), "hi");
        assert_eq!(transcript.messages()[2].content(), PLACEHOLDER);
        assert_eq!(transcript.conversation().len(), 2);
    }

    #[test]
    fn test_replace_is_positional() {
        let mut transcript = Transcript::default();
        let first = transcript.append_exchange(Message::user("same"));
        transcript.replace(first, Message::system("same"));
        let second = transcript.append_exchange(Message::user("same"));

        assert!(transcript.replace(second, Message::system("answer")));
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript.messages()[first].content(), "same");
        assert_eq!(transcript.messages()[second].content(), "answer");
    }

    #[test]
    fn test_replace_rejects_greeting_and_out_of_range() {
        let mut transcript = Transcript::default();
        assert!(!transcript.replace(0, Message::system("nope")));
        assert!(!transcript.replace(7, Message::system("nope")));
        assert_eq!(transcript.greeting().content(), GREETING);
        assert_eq!(transcript.len(), 1);
    }
}
