use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use medimind_types::Message;

/// Messages (five exchanges) included by [`recent_context_prompt`]
pub const RECENT_CONTEXT_MESSAGES: usize = 10;

/// Messages included by [`image_context_prefix`]
pub const IMAGE_CONTEXT_MESSAGES: usize = 6;

/// System persona naming the user and the assistant
pub fn build_persona(user_name: &str, assistant_name: &str) -> String {
    format!(
        "Hello, I am {user_name}, You are a very accurate and advanced AI chatbot named {assistant_name} which also has real-time up-to-date information from the internet.
*** Do not tell time until I ask, do not talk too much, just answer the question.***
*** Reply in all language***
*** Do not provide notes in the output, just answer the question and never mention your training data. ***
"
    )
}

/// Current wall-clock day, date and time for the model
pub fn realtime_information() -> String {
    realtime_information_at(&Local::now())
}

pub fn realtime_information_at<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Please use this real-time information if needed, \n{}\n",
        now.format("Day: %A, Date: %d %B %Y, Time: %H hours %M minutes %S seconds.")
    )
}

/// Assembles the message list sent for a text completion
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    persona: String,
}

impl ContextBuilder {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Persona, fresh realtime note, then the whole log in order. The new
    /// query is expected to be the last entry of `log` already.
    pub fn build(&self, log: &[Message]) -> Vec<Message> {
        self.build_with_realtime(log, realtime_information())
    }

    pub fn build_with_realtime(&self, log: &[Message], realtime: String) -> Vec<Message> {
        let mut messages = Vec::with_capacity(log.len() + 2);
        messages.push(Message::system(self.persona.clone()));
        messages.push(Message::system(realtime));
        messages.extend_from_slice(log);
        messages
    }
}

fn tail(history: &[Message], n: usize) -> &[Message] {
    &history[history.len().saturating_sub(n)..]
}

/// Query wrapped with a recap of the last five exchanges of `history`
pub fn recent_context_prompt(history: &[Message], query: &str) -> String {
    let mut prompt = String::from("Previous conversation:\n");
    for msg in tail(history, RECENT_CONTEXT_MESSAGES) {
        prompt.push_str(&format!("{}: {}\n", msg.role.prompt_label(), msg.content));
    }
    prompt.push_str(&format!(" Current query: {} ", query));
    prompt.push_str(
        " Please respond to the current query with consideration of the conversation history.",
    );
    prompt
}

/// Recap prepended to image analysis prompts; empty for short histories
pub fn image_context_prefix(history: &[Message]) -> String {
    if history.len() < 2 {
        return String::new();
    }
    let recap = tail(history, IMAGE_CONTEXT_MESSAGES)
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join(" ");
    format!("Based on our previous conversation: {}. ", recap)
}
