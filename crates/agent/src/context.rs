//! Prompt assembly for conversation runs

use chrono::Utc;

use campusbuddy_provider::{Message, ToolCallDef};

use crate::mode::ChatMode;

/// Builds the system prompt and transcript for one run
pub struct PromptBuilder;

impl PromptBuilder {
    /// Mode-specific system prompt. Embeds today's date so the model can
    /// resolve relative dates before calling the schedule tool.
    pub fn system_prompt(mode: &ChatMode) -> String {
        let today = Utc::now().format("%Y-%m-%d (%A)");

        let policy = match mode {
            ChatMode::Guest => {
                "The caller is not signed in. You may only share public information, \
                 such as upcoming campus events. If asked about grades, schedules, \
                 payments, enrolments, or anything else personal, explain that they \
                 need to sign in to the student portal first."
            }
            ChatMode::CourseTutor => {
                "You are tutoring within a single module. Ground every answer in the \
                 module's uploaded materials using the material tools, and say so \
                 plainly when the materials do not cover a question."
            }
            ChatMode::AdminSupport => {
                "The caller is a signed-in student. Use the tools to read their own \
                 records before answering questions about them. Academic averages at \
                 this university are WAMs (weighted average marks), not GPAs; always \
                 say WAM. Resolve relative dates like 'next Monday' to concrete \
                 YYYY-MM-DD values yourself before calling the schedule tool, and \
                 always pass both start_date and end_date."
            }
        };

        format!(
            r#"# CampusBuddy

You are CampusBuddy, the university's assistant. You answer questions about
schedules, modules, payments, course materials, and campus life, using the
available tools to fetch real data rather than guessing.

## Today
{}

## Policy
{}

Be accurate and concise. If a tool returns an error or no data, tell the
caller what you could not find instead of inventing an answer."#,
            today, policy
        )
    }

    /// Full transcript for a run: system prompt, prior turns, current message
    pub fn build_messages(
        mode: &ChatMode,
        history: Vec<Message>,
        current_message: &str,
    ) -> Vec<Message> {
        let mut messages = vec![Message::system(Self::system_prompt(mode))];
        messages.extend(history);
        messages.push(Message::user(current_message));

        messages
    }

    /// Append a tool turn answering `tool_call_id`
    pub fn add_tool_result(
        messages: &mut Vec<Message>,
        tool_call_id: &str,
        name: &str,
        result: &str,
    ) {
        messages.push(Message::tool(tool_call_id, name, result));
    }

    /// Append the model's own turn, preserving its invocation list
    pub fn add_assistant_message(
        messages: &mut Vec<Message>,
        content: Option<&str>,
        tool_calls: Option<Vec<ToolCallDef>>,
    ) {
        let mut msg = Message::assistant(content.unwrap_or(""));
        if let Some(calls) = tool_calls {
            msg.tool_calls = Some(calls);
        }
        messages.push(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_mode_policy() {
        let guest = PromptBuilder::system_prompt(&ChatMode::Guest);
        assert!(guest.contains("sign in"));

        let admin = PromptBuilder::system_prompt(&ChatMode::AdminSupport);
        assert!(admin.contains("WAM"));
        assert!(admin.contains("start_date"));

        let tutor = PromptBuilder::system_prompt(&ChatMode::CourseTutor);
        assert!(tutor.contains("materials"));
    }

    #[test]
    fn build_messages_orders_system_history_current() {
        let history = vec![
            Message::user("earlier question"),
            Message::assistant("earlier answer"),
        ];
        let messages =
            PromptBuilder::build_messages(&ChatMode::AdminSupport, history, "new question");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, Some("earlier question".to_string()));
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, Some("new question".to_string()));
    }

    #[test]
    fn transcript_helpers_append_in_place() {
        let mut messages = vec![Message::system("s")];

        PromptBuilder::add_assistant_message(
            &mut messages,
            None,
            Some(vec![ToolCallDef::new(
                "call_1",
                "get_profile",
                serde_json::json!({}),
            )]),
        );
        PromptBuilder::add_tool_result(&mut messages, "call_1", "get_profile", "{\"wam\":3.8}");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, "assistant");
        assert!(messages[1].tool_calls.is_some());
        assert_eq!(messages[2].role, "tool");
        assert_eq!(messages[2].tool_call_id, Some("call_1".to_string()));
    }
}
