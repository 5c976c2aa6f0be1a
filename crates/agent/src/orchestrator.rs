//! Conversation orchestrator
//!
//! Drives the bounded model/tool loop for one chat message: send the
//! transcript and the mode's visible tools to the model, execute any
//! requested tools, feed results back, and stop on a final answer or the
//! turn ceiling.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use campusbuddy_config::Config;
use campusbuddy_provider::{ChatParams, Message, Provider, ToolCallDef, ToolChoice};
use campusbuddy_session::{GuestLimit, SessionManager};
use campusbuddy_store::CampusStore;

use crate::context::PromptBuilder;
use crate::mode::{Caller, ChatMode, ExecutionContext};
use crate::tools::{register_campus_tools, ToolRegistry};
use crate::AgentError;

/// Shown to callers when a run fails; internal detail stays in the logs.
pub const FAILURE_REPLY: &str =
    "Sorry, something went wrong while answering that. Please try again later.";

/// Shown to guests who hit the message limit.
pub const GUEST_LIMIT_REPLY: &str =
    "You've reached the guest message limit for now. Please try again later, or sign in.";

/// One incoming chat message
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub caller: Caller,
    pub mode: ChatMode,
    /// Conversation tag within the caller's sessions
    pub conversation: String,
    pub content: String,
}

impl ChatRequest {
    pub fn new(
        caller: Caller,
        mode: ChatMode,
        conversation: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            caller,
            mode,
            conversation: conversation.into(),
            content: content.into(),
        }
    }

    /// Session key: {caller}:{conversation}
    pub fn session_key(&self) -> String {
        format!("{}:{}", self.caller.key(), self.conversation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Final,
    Aborted,
}

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub status: ReplyStatus,
    pub content: String,
    /// Abort reason, safe to surface (never raw upstream error text)
    pub reason: Option<String>,
}

impl ChatReply {
    fn final_answer(content: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Final,
            content: content.into(),
            reason: None,
        }
    }

    fn aborted(content: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Aborted,
            content: content.into(),
            reason: Some(reason.into()),
        }
    }
}

/// The agent: tool catalog, provider handle, and session storage
pub struct ChatAgent<P: Provider> {
    provider: Arc<P>,
    model: String,
    max_turns: u32,
    max_tokens: u32,
    temperature: f32,
    tools: ToolRegistry,
    session_manager: Arc<Mutex<SessionManager>>,
    guest_limit: GuestLimit,
    max_history_messages: usize,
}

impl<P: Provider> ChatAgent<P> {
    /// Create an agent with default settings
    pub fn new(
        provider: P,
        store: Arc<dyn CampusStore>,
        model: impl Into<String>,
        sessions_dir: PathBuf,
    ) -> Self {
        let mut agent = Self::with_config(provider, store, &Config::default(), sessions_dir);
        agent.model = model.into();
        agent
    }

    /// Create an agent from configuration
    pub fn with_config(
        provider: P,
        store: Arc<dyn CampusStore>,
        config: &Config,
        sessions_dir: PathBuf,
    ) -> Self {
        let mut tools = ToolRegistry::new();
        register_campus_tools(&mut tools, store);

        let session_manager = Arc::new(Mutex::new(SessionManager::with_max_messages(
            sessions_dir,
            config.session_max_messages(),
        )));

        Self {
            provider: Arc::new(provider),
            model: config.default_model(),
            max_turns: config.max_turns(),
            max_tokens: config.assistant.max_tokens,
            temperature: config.assistant.temperature,
            tools,
            session_manager,
            guest_limit: GuestLimit::new(config.guest.max_messages, config.guest.window_hours),
            max_history_messages: config.history_messages(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Process one chat message end to end
    pub async fn process_message(&self, request: ChatRequest) -> ChatReply {
        let ctx = ExecutionContext::new(request.caller.clone(), request.mode);
        let session_key = request.session_key();

        info!(
            trace = %ctx.trace_id,
            mode = ctx.mode.as_str(),
            session = %session_key,
            "processing message"
        );

        // Guest limit is evaluated against the session's own messages;
        // refused messages are not recorded, so the window can roll over.
        if ctx.mode == ChatMode::Guest {
            let mut manager = self.session_manager.lock().await;
            let session = manager.get_or_create(&session_key).await;
            if !self.guest_limit.allows(session) {
                warn!(trace = %ctx.trace_id, session = %session_key, "guest limit reached");
                return ChatReply::aborted(GUEST_LIMIT_REPLY, "guest message limit reached");
            }
        }

        let history = {
            let mut manager = self.session_manager.lock().await;
            let session = manager.get_or_create(&session_key).await;
            session.get_history(self.max_history_messages)
        };

        let messages = PromptBuilder::build_messages(&ctx.mode, history, &request.content);

        match self.run_loop(messages, &ctx).await {
            Ok(content) => {
                self.record_exchange(&session_key, &ctx, &request.content, &content)
                    .await;
                ChatReply::final_answer(content)
            }
            Err(e) => {
                error!(trace = %ctx.trace_id, error = %e, "run failed");

                let reason = match &e {
                    AgentError::LoopExceeded => "conversation loop exceeded",
                    _ => "model call failed",
                };

                self.record_exchange(&session_key, &ctx, &request.content, FAILURE_REPLY)
                    .await;
                ChatReply::aborted(FAILURE_REPLY, reason)
            }
        }
    }

    /// Persist the user/assistant exchange and the session's mode tag
    async fn record_exchange(
        &self,
        session_key: &str,
        ctx: &ExecutionContext,
        user_content: &str,
        assistant_content: &str,
    ) {
        let mut manager = self.session_manager.lock().await;
        let session = manager.get_or_create(session_key).await;

        session.add_message("user", user_content);
        session.add_message("assistant", assistant_content);
        session.metadata.insert(
            "mode".to_string(),
            serde_json::json!(ctx.mode.as_str()),
        );

        let session = session.clone();
        if let Err(e) = manager.save(&session).await {
            warn!(session = %session_key, "failed to save session: {}", e);
        }
    }

    /// The bounded model/tool loop
    async fn run_loop(
        &self,
        mut messages: Vec<Message>,
        ctx: &ExecutionContext,
    ) -> crate::Result<String> {
        let mut turn = 0;

        loop {
            turn += 1;
            if turn > self.max_turns {
                return Err(AgentError::LoopExceeded);
            }

            debug!(trace = %ctx.trace_id, turn, "model turn");

            let params = ChatParams {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: self.tools.definitions_for(&ctx.mode),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: ToolChoice::Auto,
            };

            let response = self
                .provider
                .chat(params)
                .await
                .map_err(|e| AgentError::Provider(e.to_string()))?;

            if !response.has_tool_calls() {
                return Ok(response
                    .content
                    .unwrap_or_else(|| "Done.".to_string()));
            }

            let tool_call_defs: Vec<ToolCallDef> = response
                .tool_calls
                .iter()
                .map(|tc| ToolCallDef::new(&tc.id, &tc.name, tc.arguments.clone()))
                .collect();

            PromptBuilder::add_assistant_message(
                &mut messages,
                response.content.as_deref(),
                Some(tool_call_defs),
            );

            // Answer every invocation, in model order, one tool turn each.
            // Tool failures become structured content; the loop continues.
            for tool_call in &response.tool_calls {
                let arg_size = tool_call.arguments.to_string().len();

                let result = self
                    .tools
                    .execute(ctx, &tool_call.name, tool_call.arguments.clone())
                    .await
                    .map(|value| value.to_string())
                    .unwrap_or_else(|e| {
                        serde_json::json!({ "error": e.to_string() }).to_string()
                    });

                debug!(
                    trace = %ctx.trace_id,
                    turn,
                    tool = %tool_call.name,
                    arg_size,
                    result_size = result.len(),
                    "tool executed"
                );

                PromptBuilder::add_tool_result(&mut messages, &tool_call.id, &tool_call.name, &result);
            }
        }
    }
}
