use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::shell::{CompletedCommand, Dispatch, DispatchOutcome, Output, ShellSession};

/// Terminal UI state wrapped around one shell session
pub struct App {
    pub session: ShellSession,
    /// Lines scrolled up from the bottom of the history pane
    pub scroll_offset: u16,
    pub should_quit: bool,
    /// Prompt shown before each command, e.g. `visitor@termfolio:$ ~ `
    pub prompt: String,
    /// Handlers still running on their own tasks
    running: usize,
    completed_tx: mpsc::UnboundedSender<CompletedCommand>,
    completed_rx: mpsc::UnboundedReceiver<CompletedCommand>,
}

impl App {
    pub fn new(session: ShellSession, prompt: String) -> Self {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        Self {
            session,
            scroll_offset: 0,
            should_quit: false,
            prompt,
            running: 0,
            completed_tx,
            completed_rx,
        }
    }

    /// Never waits on a handler; results arrive through [`App::drain_completed`]
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.session.interrupt(),
            KeyCode::Char('l') if ctrl => {
                self.session.clear_history();
                self.scroll_offset = 0;
            }
            KeyCode::Char('t') if ctrl => {
                self.session.toggle_mode();
            }
            KeyCode::Char('d') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if !ctrl => self.session.push_char(c),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Tab => {
                self.session.complete_input();
            }
            KeyCode::Up => self.session.recall_up(),
            KeyCode::Down => self.session.recall_down(),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_add(10),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let line = self.session.input().to_string();
        match self.session.begin(&line) {
            Dispatch::Done(outcome) => self.committed(outcome),
            Dispatch::Pending(pending) => {
                tracing::debug!(line = pending.line(), "running command in background");
                self.running += 1;
                let tx = self.completed_tx.clone();
                tokio::spawn(async move {
                    // Receiver only goes away when the app does
                    let _ = tx.send(pending.run().await);
                });
            }
        }
    }

    /// Commit every handler result that has arrived, in arrival order
    pub fn drain_completed(&mut self) {
        while let Ok(completed) = self.completed_rx.try_recv() {
            self.complete(completed);
        }
    }

    /// Wait until no handler is running
    pub async fn wait_for_commands(&mut self) {
        while self.running > 0 {
            match self.completed_rx.recv().await {
                Some(completed) => self.complete(completed),
                None => break,
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.running > 0
    }

    fn complete(&mut self, completed: CompletedCommand) {
        self.running = self.running.saturating_sub(1);
        let outcome = self.session.finish(completed);
        self.committed(outcome);
    }

    fn committed(&mut self, outcome: DispatchOutcome) {
        if let DispatchOutcome::Appended { entry } = &outcome {
            if entry.output == Output::Restart {
                self.session.restart();
            }
        }
        self.scroll_offset = 0;
    }

    /// Green while the input is empty or names a runnable command
    pub fn input_is_valid(&self) -> bool {
        let input = self.session.input();
        input.is_empty() || self.session.is_recognized(input)
    }
}
