//! Line-oriented front-end over the notes view model.
//!
//! # Responsibility
//! - Keep reading commands while earlier intents wait on the service.
//! - Route delete confirmations back through the same input stream.
//! - Redraw when a request settles or the notification slot changes.
//!
//! # Invariants
//! - No line is read while a spawned delete is about to ask its question.
//! - Quitting waits for issued requests; it never cancels them.

use async_trait::async_trait;
use log::{error, info, warn};
use notes_core::view::display_content;
use notes_core::{
    Confirm, IntentOutcome, NoteRemote, NotesView, NotificationEvent, SyncController, SyncError,
};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};

const HELP: &str = "commands: list | add <text> | toggle <row> | delete <row> | filter | help | quit";
const NOTIFICATION_MAX_CHARS: usize = 120;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(String),
    Toggle(usize),
    Delete(usize),
    Filter,
    Help,
    Quit,
}

/// Parses one input line into a command.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" | "list" | "ls" => Ok(Command::List),
        "add" | "new" => Ok(Command::Add(rest.to_string())),
        "toggle" | "t" => parse_row(rest).map(Command::Toggle),
        "delete" | "del" | "rm" => parse_row(rest).map(Command::Delete),
        "filter" | "f" => Ok(Command::Filter),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; {HELP}")),
    }
}

fn parse_row(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .ok_or_else(|| format!("expected a row number, got `{value}`"))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

/// Question raised by a running delete, answered by the next input line.
struct ConfirmRequest {
    prompt: String,
    reply: oneshot::Sender<bool>,
}

/// Confirmation answered by the input loop.
///
/// Answers "no" when the loop has gone away.
struct LoopConfirm {
    requests: mpsc::UnboundedSender<ConfirmRequest>,
    asked: AtomicBool,
}

impl LoopConfirm {
    fn new(requests: mpsc::UnboundedSender<ConfirmRequest>) -> Self {
        Self {
            requests,
            asked: AtomicBool::new(false),
        }
    }

    fn was_asked(&self) -> bool {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirm for LoopConfirm {
    async fn confirm(&self, question: &str) -> bool {
        self.asked.store(true, Ordering::SeqCst);
        let (reply, answer) = oneshot::channel();
        let request = ConfirmRequest {
            prompt: question.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            return false;
        }
        answer.await.unwrap_or(false)
    }
}

/// Result of one spawned intent.
enum Settled {
    Create {
        content: String,
        outcome: IntentOutcome,
    },
    Toggle(Result<IntentOutcome, SyncError>),
    Delete {
        asked: bool,
        result: Result<IntentOutcome, SyncError>,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Session<R: NoteRemote + 'static> {
    controller: Arc<SyncController<R>>,
    view: NotesView,
    tasks: JoinSet<Settled>,
    requests: mpsc::UnboundedSender<ConfirmRequest>,
    pending: VecDeque<ConfirmRequest>,
    // Spawned deletes that have neither asked nor settled yet.
    questions_due: usize,
}

impl<R: NoteRemote + 'static> Session<R> {
    fn new(
        controller: Arc<SyncController<R>>,
        requests: mpsc::UnboundedSender<ConfirmRequest>,
    ) -> Self {
        Self {
            controller,
            view: NotesView::new(),
            tasks: JoinSet::new(),
            requests,
            pending: VecDeque::new(),
            questions_due: 0,
        }
    }

    fn accepts_input(&self) -> bool {
        self.questions_due == 0
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        if let Some(request) = self.pending.pop_front() {
            let _ = request.reply.send(is_yes(line));
            self.prompt_next();
            return Flow::Continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                self.prompt_next();
                return Flow::Continue;
            }
        };

        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                println!("{HELP}");
                self.prompt_next();
                return Flow::Continue;
            }
            Command::List => {}
            Command::Filter => {
                self.view.toggle_filter();
            }
            Command::Add(text) => self.spawn_create(text),
            Command::Toggle(row) => self.spawn_toggle(row),
            Command::Delete(row) => {
                // The question follows once the task runs.
                if self.spawn_delete(row) {
                    return Flow::Continue;
                }
            }
        }

        // Let freshly spawned intents reach the service so the busy marker counts them.
        tokio::task::yield_now().await;
        self.redraw();
        Flow::Continue
    }

    fn spawn_create(&mut self, text: String) {
        self.view.set_draft(text);
        let content = self.view.draft().to_string();
        let controller = Arc::clone(&self.controller);
        self.tasks.spawn(async move {
            let outcome = controller.create(&content).await;
            Settled::Create { content, outcome }
        });
    }

    fn spawn_toggle(&mut self, row: usize) {
        let Some(id) = self.view.note_at(&self.controller.snapshot(), row) else {
            println!("no row {row}");
            return;
        };
        let controller = Arc::clone(&self.controller);
        self.tasks.spawn(async move { Settled::Toggle(controller.toggle_importance(&id).await) });
    }

    fn spawn_delete(&mut self, row: usize) -> bool {
        let Some(id) = self.view.note_at(&self.controller.snapshot(), row) else {
            println!("no row {row}");
            return false;
        };
        let controller = Arc::clone(&self.controller);
        let confirm = LoopConfirm::new(self.requests.clone());
        self.questions_due += 1;
        self.tasks.spawn(async move {
            let result = controller.delete(&id, &confirm).await;
            Settled::Delete {
                asked: confirm.was_asked(),
                result,
            }
        });
        true
    }

    fn ask(&mut self, request: ConfirmRequest) {
        self.questions_due = self.questions_due.saturating_sub(1);
        self.pending.push_back(request);
        if self.pending.len() == 1 {
            println!();
            self.prompt_next();
        }
    }

    fn settle(&mut self, joined: Result<Settled, JoinError>) {
        match joined {
            Ok(Settled::Create { content, outcome }) => {
                self.view.settle_submit(&content, outcome);
                if outcome == IntentOutcome::Committed {
                    println!("saved");
                }
            }
            Ok(Settled::Toggle(result)) => report(result),
            Ok(Settled::Delete { asked, result }) => {
                if !asked {
                    self.questions_due = self.questions_due.saturating_sub(1);
                }
                report(result);
            }
            Err(err) => {
                error!("event=intent_task_failed module=cli error={err}");
                self.questions_due = 0;
            }
        }
    }

    fn redraw(&self) {
        let store = self.controller.snapshot();
        let notification = self
            .controller
            .notifier()
            .current()
            .map(|message| display_content(&message, NOTIFICATION_MAX_CHARS));
        println!(
            "{}",
            self.view
                .render(&store, notification.as_deref(), self.controller.in_flight())
        );
        self.prompt_next();
    }

    fn prompt_next(&self) {
        match self.pending.front() {
            Some(request) => prompt(&format!("{} [y/N] ", request.prompt)),
            None => prompt("> "),
        }
    }

    /// Declines open questions and waits for every issued request.
    async fn shutdown(mut self, incoming: mpsc::UnboundedReceiver<ConfirmRequest>) {
        drop(incoming);
        self.pending.clear();
        if !self.tasks.is_empty() {
            info!(
                "event=cli_draining module=cli pending={}",
                self.tasks.len()
            );
        }
        while let Some(joined) = self.tasks.join_next().await {
            self.settle(joined);
        }
    }
}

fn report(result: Result<IntentOutcome, SyncError>) {
    if let Err(err) = result {
        eprintln!("error: {err}");
    }
}

/// Runs the read-eval-render loop until `quit` or end of input.
///
/// Intents run as spawned tasks, so commands keep being read while the
/// service is slow.
pub async fn run<R, I>(controller: Arc<SyncController<R>>, input: I) -> io::Result<()>
where
    R: NoteRemote + 'static,
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut events = controller.notifier().subscribe();
    let mut events_open = true;
    let (requests, mut incoming) = mpsc::unbounded_channel();
    let mut session = Session::new(controller, requests);
    session.redraw();

    loop {
        tokio::select! {
            line = lines.next_line(), if session.accepts_input() => {
                let Some(line) = line? else {
                    break;
                };
                if session.handle_line(&line).await == Flow::Quit {
                    break;
                }
            }
            Some(request) = incoming.recv() => session.ask(request),
            Some(joined) = session.tasks.join_next(), if !session.tasks.is_empty() => {
                session.settle(joined);
                session.redraw();
            }
            event = events.recv(), if events_open => match event {
                Ok(NotificationEvent::Shown(_)) | Ok(NotificationEvent::Cleared) => session.redraw(),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("event=notification_events_lagged module=cli skipped={skipped}");
                    session.redraw();
                }
                Err(RecvError::Closed) => events_open = false,
            },
        }
    }

    session.shutdown(incoming).await;
    Ok(())
}
