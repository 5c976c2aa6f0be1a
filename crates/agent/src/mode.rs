//! Chat modes and the tool visibility table

use uuid::Uuid;

/// Tools visible to guests: public information only.
const GUEST_TOOLS: &[&str] = &["get_public_events"];

/// Tools visible in course-tutor mode: the module's materials only.
const TUTOR_TOOLS: &[&str] = &["list_materials", "read_material", "search_materials"];

/// Tools visible in the default/admin-support mode: the caller's own
/// records. Material tools are deliberately absent here.
const CALLER_TOOLS: &[&str] = &[
    "get_profile",
    "get_enrolled_modules",
    "get_schedule",
    "get_module_info",
    "get_payments",
    "get_public_events",
];

/// Caller-context tag controlling which tools a conversation can reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Guest,
    CourseTutor,
    AdminSupport,
}

impl ChatMode {
    /// Parse a mode tag. Unrecognized tags fall back to the default
    /// admin-support subset.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "guest" => ChatMode::Guest,
            "course_tutor" => ChatMode::CourseTutor,
            _ => ChatMode::AdminSupport,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Guest => "guest",
            ChatMode::CourseTutor => "course_tutor",
            ChatMode::AdminSupport => "admin_support",
        }
    }

    /// The tool names visible in this mode, in catalog order
    pub fn visible_tool_names(&self) -> &'static [&'static str] {
        match self {
            ChatMode::Guest => GUEST_TOOLS,
            ChatMode::CourseTutor => TUTOR_TOOLS,
            ChatMode::AdminSupport => CALLER_TOOLS,
        }
    }

    pub fn allows(&self, tool_name: &str) -> bool {
        self.visible_tool_names().contains(&tool_name)
    }
}

/// Who is asking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Guest,
    Student(String),
}

impl Caller {
    pub fn student_id(&self) -> Option<&str> {
        match self {
            Caller::Guest => None,
            Caller::Student(id) => Some(id),
        }
    }

    /// Stable identifier used in session keys
    pub fn key(&self) -> &str {
        match self {
            Caller::Guest => "guest",
            Caller::Student(id) => id,
        }
    }
}

/// Per-message execution context: caller identity, mode, and a trace id
/// used only for diagnostics. Lives for one orchestration run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub caller: Caller,
    pub mode: ChatMode,
    pub trace_id: String,
}

impl ExecutionContext {
    pub fn new(caller: Caller, mode: ChatMode) -> Self {
        Self {
            caller,
            mode,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn guest() -> Self {
        Self::new(Caller::Guest, ChatMode::Guest)
    }

    pub fn student(id: impl Into<String>, mode: ChatMode) -> Self {
        Self::new(Caller::Student(id.into()), mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tags_round_trip() {
        assert_eq!(ChatMode::from_tag("guest"), ChatMode::Guest);
        assert_eq!(ChatMode::from_tag("course_tutor"), ChatMode::CourseTutor);
        assert_eq!(ChatMode::from_tag("admin_support"), ChatMode::AdminSupport);
        assert_eq!(ChatMode::Guest.as_str(), "guest");
    }

    #[test]
    fn unrecognized_tag_falls_back_to_admin_support() {
        assert_eq!(ChatMode::from_tag("superuser"), ChatMode::AdminSupport);
        assert_eq!(ChatMode::from_tag(""), ChatMode::AdminSupport);
    }

    #[test]
    fn guest_sees_only_public_events() {
        assert_eq!(ChatMode::Guest.visible_tool_names(), ["get_public_events"]);
        assert!(!ChatMode::Guest.allows("get_profile"));
        assert!(!ChatMode::Guest.allows("get_payments"));
    }

    #[test]
    fn tutor_sees_only_material_tools() {
        let names = ChatMode::CourseTutor.visible_tool_names();
        assert_eq!(
            names,
            ["list_materials", "read_material", "search_materials"]
        );
        assert!(!ChatMode::CourseTutor.allows("get_public_events"));
    }

    #[test]
    fn admin_support_sees_caller_tools_but_no_materials() {
        let names = ChatMode::AdminSupport.visible_tool_names();
        assert_eq!(names.len(), 6);
        assert!(ChatMode::AdminSupport.allows("get_profile"));
        assert!(ChatMode::AdminSupport.allows("get_schedule"));
        assert!(!ChatMode::AdminSupport.allows("read_material"));
        assert!(!ChatMode::AdminSupport.allows("search_materials"));
    }

    #[test]
    fn caller_identity() {
        let guest = Caller::Guest;
        assert!(guest.student_id().is_none());
        assert_eq!(guest.key(), "guest");

        let student = Caller::Student("s1000001".to_string());
        assert_eq!(student.student_id(), Some("s1000001"));
        assert_eq!(student.key(), "s1000001");
    }

    #[test]
    fn contexts_get_distinct_trace_ids() {
        let a = ExecutionContext::guest();
        let b = ExecutionContext::guest();
        assert_ne!(a.trace_id, b.trace_id);
    }
}
