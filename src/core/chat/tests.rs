use std::sync::Arc;

use super::*;
use crate::api::sessions::SessionService;
use crate::api::ApiError;
use crate::core::message::LineStyle;
use crate::core::page::CommandExecutor;
use crate::ui::executors::ChatExecutor;
use crate::utils::test_utils::{create_test_session, MockSessionService, ServiceCall};

struct Harness {
    terminal: ChatTerminal,
    service: Arc<MockSessionService>,
    executor: ChatExecutor,
}

impl Harness {
    /// Two stored sessions; the unnamed session 2 is the most recent and becomes current.
    async fn new() -> Self {
        let mut session = create_test_session(1, "session_1");
        session.display_name = Some("notes".to_string());
        Self::started(vec![session, create_test_session(2, "session_2")]).await
    }

    async fn started(sessions: Vec<ChatSession>) -> Self {
        let service = Arc::new(MockSessionService::new(sessions));
        let executor = ChatExecutor::new(service.clone());
        let mut harness = Self {
            terminal: ChatTerminal::default(),
            service,
            executor,
        };
        let command = harness.terminal.startup();
        harness.run(command).await;
        harness
    }

    async fn run(&mut self, mut command: Option<ChatCommand>) {
        while let Some(cmd) = command.take() {
            let outcome = self.executor.execute(cmd).await;
            command = self.terminal.apply_outcome(outcome);
        }
    }

    async fn send(&mut self, text: &str) {
        let command = self.terminal.submit(text);
        self.run(command).await;
    }

    fn texts(&self) -> Vec<String> {
        self.terminal.transcript().texts()
    }

    fn last_texts(&self, n: usize) -> Vec<String> {
        let texts = self.texts();
        texts[texts.len().saturating_sub(n)..].to_vec()
    }
}

#[test]
fn starts_with_banner_and_hint() {
    let terminal = ChatTerminal::default();
    assert_eq!(
        terminal.transcript().texts(),
        vec![
            BANNER.to_string(),
            String::new(),
            HINT.to_string(),
            String::new()
        ]
    );
    assert_eq!(terminal.current_model(), DEFAULT_MODEL);
}

#[tokio::test]
async fn startup_resumes_the_last_session() {
    let mut harness = Harness::started(vec![create_test_session(4, "session_4")]).await;
    assert_eq!(harness.terminal.session().map(|s| s.id), Some(4));
    assert!(harness
        .terminal
        .transcript()
        .contains_text("✨ Session initialized (ID: 4)"));
    assert!(!harness.terminal.is_busy());
    assert!(harness.terminal.take_log_lines().len() >= 4);
}

#[tokio::test]
async fn startup_creates_a_session_when_none_exist() {
    let harness = Harness::started(Vec::new()).await;
    assert_eq!(
        harness.service.calls(),
        vec![ServiceCall::LastSession, ServiceCall::CreateSession(None)]
    );
    assert_eq!(harness.terminal.session().map(|s| s.id), Some(1));
}

#[tokio::test]
async fn startup_failure_is_reported() {
    let mut terminal = ChatTerminal::default();
    let command = terminal.startup().expect("init command");
    terminal.apply_outcome(ChatOutcome::err(
        command.call_id,
        ApiError::Transport("connection refused".into()),
    ));
    assert!(terminal
        .transcript()
        .contains_text("✗ Failed to initialize: Request failed: connection refused"));
    assert!(terminal.session().is_none());
}

#[tokio::test]
async fn messages_echo_then_show_the_reply() {
    let mut harness = Harness::new().await;
    harness.send("  hello there ").await;
    assert_eq!(
        harness.last_texts(4),
        vec!["> hello there", "", "echo: hello there", ""]
    );
    let reply = &harness.terminal.transcript().lines()[harness.terminal.transcript().len() - 2];
    assert_eq!(reply.primary_style(), LineStyle::Assistant);
    assert!(harness
        .service
        .calls()
        .contains(&ServiceCall::SendMessage(2, "hello there".into())));
}

#[tokio::test]
async fn busy_terminal_ignores_input() {
    let mut harness = Harness::new().await;
    let command = harness.terminal.submit("first");
    assert!(command.is_some());
    assert!(harness.terminal.is_busy());
    assert_eq!(harness.terminal.view().busy_label, "Thinking...");

    assert!(harness.terminal.submit("second").is_none());
    harness.terminal.on_key(KeyInput::Char('x'));
    assert_eq!(harness.terminal.input(), "");

    harness.run(command).await;
    assert!(!harness.terminal.is_busy());
}

#[tokio::test]
async fn blank_input_does_nothing() {
    let mut harness = Harness::new().await;
    let before = harness.texts().len();
    assert!(harness.terminal.submit("   ").is_none());
    assert_eq!(harness.texts().len(), before);
}

#[tokio::test]
async fn message_errors_are_reported() {
    let mut harness = Harness::new().await;
    harness
        .service
        .fail_next(ApiError::Transport("timed out".into()));
    harness.send("hi").await;
    assert_eq!(
        harness.last_texts(1),
        vec!["✗ Error: Request failed: timed out"]
    );
}

#[tokio::test]
async fn stale_outcomes_are_ignored() {
    let mut harness = Harness::new().await;
    let before = harness.texts();
    harness
        .terminal
        .apply_outcome(ChatOutcome::ok(99, ChatReply::Message("late".into())));
    assert_eq!(harness.texts(), before);
}

#[tokio::test]
async fn save_updates_the_display_name() {
    let mut harness = Harness::new().await;
    harness.send("/save   ideas").await;
    assert_eq!(
        harness.last_texts(4),
        vec!["> /save   ideas", "", "✅ Session saved as 'ideas'", ""]
    );
    assert_eq!(
        harness.terminal.session().and_then(|s| s.display_name.clone()),
        Some("ideas".to_string())
    );
}

#[tokio::test]
async fn usage_errors_stay_local() {
    let mut harness = Harness::new().await;
    let calls = harness.service.calls().len();
    for (input, usage) in [
        ("/save", "Usage: /save <name>"),
        ("/delete", "Usage: /delete <name>"),
        ("/resume", "Usage: /resume <name>"),
    ] {
        harness.send(input).await;
        assert_eq!(harness.last_texts(1), vec![usage]);
    }
    assert_eq!(harness.service.calls().len(), calls);
}

#[tokio::test]
async fn current_session_cannot_be_deleted() {
    let mut harness = Harness::started(vec![{
        let mut session = create_test_session(1, "session_1");
        session.display_name = Some("notes".into());
        session
    }])
    .await;
    harness.send("/delete notes").await;
    assert_eq!(
        harness.last_texts(1),
        vec!["✗ Cannot delete the current session. Switch to another session first."]
    );
    assert_eq!(harness.service.sessions().len(), 1);
}

#[tokio::test]
async fn delete_and_list_sessions() {
    let mut harness = Harness::new().await;
    harness.send("/delete notes").await;
    assert_eq!(harness.last_texts(2), vec!["🗑️  Session 'notes' deleted", ""]);

    harness.send("/new work").await;
    harness.send("/role pirate").await;
    harness.send("/list").await;
    assert_eq!(
        harness.last_texts(4),
        vec![
            "📚 Saved Sessions:",
            "─────────────────",
            "• work (ID: 3) 🎭 pirate",
            ""
        ]
    );
}

#[tokio::test]
async fn list_reports_no_sessions() {
    let mut harness = Harness::new().await;
    for name in ["notes", "session_2"] {
        harness.service.delete_session(name).await.unwrap();
    }
    harness.send("/list").await;
    assert_eq!(harness.last_texts(2), vec!["No saved sessions found", ""]);
}

#[tokio::test]
async fn new_session_becomes_current() {
    let mut harness = Harness::new().await;
    harness.send("/new").await;
    assert_eq!(harness.terminal.session().map(|s| s.id), Some(3));
    assert!(harness
        .terminal
        .transcript()
        .contains_text("✨ Created new session (ID: 3)"));
    assert!(harness
        .service
        .calls()
        .contains(&ServiceCall::CreateSession(None)));
}

#[tokio::test]
async fn resume_switches_sessions() {
    let mut harness = Harness::new().await;
    harness.send("/resume notes").await;
    assert_eq!(harness.terminal.session().map(|s| s.id), Some(1));
    assert!(harness
        .terminal
        .transcript()
        .contains_text("🔄 Switched to session: 'notes'"));
    assert!(harness.terminal.transcript().contains_text("📝 Session ID: 1"));
}

#[tokio::test]
async fn role_is_shown_and_set() {
    let mut harness = Harness::new().await;
    harness.send("/role").await;
    assert_eq!(
        harness.last_texts(2),
        vec![
            "🎭 No role set (Claude will respond as default assistant)",
            ""
        ]
    );

    harness.send("/role ship's cook").await;
    assert_eq!(harness.last_texts(2), vec!["🎭 Role set to: 'ship's cook'", ""]);
    assert!(harness
        .service
        .calls()
        .contains(&ServiceCall::SetRole(2, Some("ship's cook".into()))));

    harness.send("/role").await;
    assert_eq!(
        harness.last_texts(2),
        vec!["🎭 Current role: 'ship's cook'", ""]
    );
    assert!(harness.terminal.view().status.unwrap().contains("ship's cook"));
}

#[tokio::test]
async fn model_list_marks_the_current_model() {
    let mut harness = Harness::new().await;
    harness.send("/model").await;
    let texts = harness.texts();
    assert!(texts.contains(&format!("🤖 Current model: {DEFAULT_MODEL}")));
    assert!(texts.contains(&"→ 1. claude-sonnet-4-20250514 - Claude Sonnet 4".to_string()));
    assert!(texts.contains(&"  2. claude-opus-4-20250514 - Claude Opus 4".to_string()));
}

#[tokio::test]
async fn model_selection_by_number() {
    let mut harness = Harness::new().await;
    harness.send("/model 2").await;
    assert_eq!(harness.last_texts(2), vec!["🤖 Model set to: 'Claude Opus 4'", ""]);
    assert_eq!(harness.terminal.current_model(), "claude-opus-4-20250514");
    assert_eq!(
        harness.service.calls()[1..],
        [
            ServiceCall::ListModels,
            ServiceCall::SetModel(2, "claude-opus-4-20250514".into())
        ]
    );
}

#[tokio::test]
async fn model_selection_rejects_bad_numbers() {
    let mut harness = Harness::new().await;
    harness.send("/model two").await;
    assert_eq!(
        harness.last_texts(1),
        vec!["✗ Please provide a valid number. Use '/model' to see available options."]
    );

    harness.send("/model 3").await;
    assert_eq!(
        harness.last_texts(1),
        vec!["✗ Invalid model number. Use '/model' to see available options."]
    );
    harness.send("/model 0").await;
    assert_eq!(
        harness.last_texts(1),
        vec!["✗ Invalid model number. Use '/model' to see available options."]
    );
    assert!(!harness
        .service
        .calls()
        .iter()
        .any(|call| matches!(call, ServiceCall::SetModel(..))));
}

#[tokio::test]
async fn help_is_not_echoed() {
    let mut harness = Harness::new().await;
    harness.send("/help").await;
    let texts = harness.texts();
    assert!(!texts.contains(&"> /help".to_string()));
    assert!(texts.contains(&"📚 Available Commands:".to_string()));
    assert!(texts.contains(&"─────────────────────".to_string()));
    assert!(texts.contains(&format!(
        "{:<20} {}",
        "/save <name>", "Save the current session with a name"
    )));
}

#[tokio::test]
async fn unknown_commands_point_at_help() {
    let mut harness = Harness::new().await;
    harness.send("/dance now").await;
    assert_eq!(
        harness.last_texts(3),
        vec![
            "> /dance now",
            "✗ Unknown command: /dance",
            "Type /help to see available commands"
        ]
    );
}

#[tokio::test]
async fn clear_empties_the_transcript() {
    let mut harness = Harness::new().await;
    harness.send("/clear").await;
    assert!(harness.terminal.transcript().is_empty());
}

#[test]
fn suggestions_follow_the_typed_prefix() {
    let mut terminal = ChatTerminal::default();
    terminal.on_key(KeyInput::Char('/'));
    assert!(terminal.suggestions().is_empty());

    terminal.on_key(KeyInput::Char('r'));
    let suggestions = terminal.suggestions();
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions[0].starts_with("/resume <name>"));
    assert!(suggestions[1].starts_with("/role [name]"));

    terminal.on_key(KeyInput::Char('o'));
    assert_eq!(terminal.suggestions().len(), 1);

    terminal.on_key(KeyInput::Esc);
    assert_eq!(terminal.input(), "");
    assert!(terminal.suggestions().is_empty());
}

#[test]
fn message_without_session_is_refused() {
    let mut terminal = ChatTerminal::default();
    assert!(terminal.submit("hello").is_none());
    assert_eq!(
        terminal.transcript().texts()[4..],
        ["> hello".to_string(), "✗ Error: No active session".to_string()]
    );
}
