//! # Game Runner
//!
//! Drives one match on the current-thread runtime.
//!
//! ## Tasks
//!
//! - `TickTask`: the 1 Hz tick, stops itself at game over
//! - renderer: prints every published `DisplayState`
//! - the operator loop (this module): reads commands, asks for
//!   confirmations, and waits for the operator to close the clock after
//!   game over
//!
//! The engine lives behind one `tokio::sync::Mutex`. Confirmation prompts
//! are answered with the lock released; the goal is then applied in one
//! locked step, and only if the stage and kind are still the ones the
//! operator was asked about.

mod terminal;
mod tick;

pub use terminal::{Command, HELP, is_yes, render_line, spawn_stdin_reader};
pub use tick::TickTask;

use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use uwh_core::{
    DisplayState, GameEngine, ResultSink, ResultStore, SaveOutcome, ScoreOutcome, Side,
    Stage, StageKind, UwhError,
};

/// The engine as shared by the tick task and the operator loop.
pub type SharedEngine = Arc<Mutex<GameEngine<ResultStore>>>;

/// Something the tick task reports to the operator loop.
#[derive(Debug)]
pub enum GameEvent {
    StageChanged { from: Stage, to: Stage },
    Finished(SaveOutcome),
    Failed(UwhError),
}

/// How the operator loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Game over and the operator closed the clock.
    Closed,
    /// The operator quit before game over. Nothing was saved.
    Quit,
}

/// Publish a fresh snapshot of `engine`.
pub fn publish<S: ResultSink>(display: &watch::Sender<DisplayState>, engine: &GameEngine<S>) {
    display.send_replace(DisplayState::capture(
        engine,
        Instant::now(),
        Local::now().time(),
    ));
}

/// Print every published snapshot until the sender goes away.
pub fn spawn_renderer(mut display: watch::Receiver<DisplayState>, json_mode: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        while display.changed().await.is_ok() {
            let state = display.borrow_and_update().clone();
            if json_mode {
                match serde_json::to_string(&state) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!("Cannot encode display state: {}", e),
                }
            } else {
                println!("{}", render_line(&state));
            }
        }
    })
}

// =============================================================================
// OPERATOR LOOP
// =============================================================================

fn goal_question(side: Side, stage: Stage, kind: Option<StageKind>) -> String {
    let during = match kind {
        Some(StageKind::Timeout) => "a timeout",
        _ => stage.label(),
    };
    format!("Goal for {} during {}. Record it? [y/N]", side, during)
}

/// Run the match until the operator closes the clock or quits.
///
/// `lines` carries what the operator types, one line per message. A closed
/// channel means the input is gone; the clock keeps running to game over.
pub async fn run_game(
    engine: SharedEngine,
    display: watch::Sender<DisplayState>,
    lines: mpsc::Receiver<String>,
    json_mode: bool,
) -> Result<RunEnd, UwhError> {
    let (events_tx, events) = mpsc::unbounded_channel();
    let renderer = spawn_renderer(display.subscribe(), json_mode);

    let mut operator = Operator::new(engine, display, lines, events_tx, json_mode);
    let result = operator.run(events).await;

    operator.tick.stop();
    renderer.abort();
    result
}

struct Operator {
    engine: SharedEngine,
    display: watch::Sender<DisplayState>,
    lines: mpsc::Receiver<String>,
    tick: TickTask,
    input_open: bool,
    json_mode: bool,
}

impl Operator {
    fn new(
        engine: SharedEngine,
        display: watch::Sender<DisplayState>,
        lines: mpsc::Receiver<String>,
        events: mpsc::UnboundedSender<GameEvent>,
        json_mode: bool,
    ) -> Self {
        let tick = TickTask::spawn(Arc::clone(&engine), display.clone(), events);
        Self {
            engine,
            display,
            lines,
            tick,
            input_open: true,
            json_mode,
        }
    }

    async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<GameEvent>,
    ) -> Result<RunEnd, UwhError> {
        self.say(HELP);

        loop {
            let over = self.engine.lock().await.is_over();
            if over && !self.input_open {
                return Ok(RunEnd::Closed);
            }

            tokio::select! {
                line = self.lines.recv(), if self.input_open => {
                    let Some(line) = line else {
                        tracing::warn!("Operator input closed; the clock keeps running");
                        self.input_open = false;
                        continue;
                    };
                    if let Some(end) = self.handle_line(&line, over).await? {
                        return Ok(end);
                    }
                }
                Some(event) = events.recv() => match event {
                    GameEvent::StageChanged { to, .. } => self.say(&format!("== {} ==", to)),
                    GameEvent::Finished(outcome) => self.announce_game_over(Some(&outcome)).await,
                    GameEvent::Failed(e) => return Err(e),
                },
                _ = tokio::signal::ctrl_c() => {
                    if over || !self.input_open {
                        return Ok(RunEnd::Closed);
                    }
                    if self.confirm_quit().await? {
                        return Ok(RunEnd::Quit);
                    }
                }
            }
        }
    }

    async fn handle_line(&mut self, line: &str, over: bool) -> Result<Option<RunEnd>, UwhError> {
        if over {
            if is_yes(line) {
                return Ok(Some(RunEnd::Closed));
            }
            self.say("Game over. Close the clock? [y/N]");
            return Ok(None);
        }

        match Command::parse(line) {
            Command::Goal(side) => self.goal(side).await?,
            Command::Timeout => self.toggle_timeout().await,
            Command::Quit => {
                if self.confirm_quit().await? {
                    return Ok(Some(RunEnd::Quit));
                }
            }
            Command::Help => self.say(HELP),
            Command::Nothing => {}
            Command::Unknown => self.say(&format!("Unknown command. {}", HELP)),
        }
        Ok(None)
    }

    /// Record a goal, asking first when the puck is not live.
    ///
    /// The answer only holds for the stage and kind it was given in. If the
    /// clock moved on while the question was open, nothing is recorded and
    /// the operator enters the goal again.
    async fn goal(&mut self, side: Side) -> Result<(), UwhError> {
        let shared = Arc::clone(&self.engine);

        let asked = {
            let engine = shared.lock().await;
            engine
                .requires_confirmation()
                .then(|| (engine.stage(), engine.kind()))
        };
        let answer = match asked {
            Some((stage, kind)) => self.ask(&goal_question(side, stage, kind)).await?,
            None => true,
        };

        let mut engine = shared.lock().await;
        let current = (engine.stage(), engine.kind());
        let moved = match asked {
            Some(asked) => asked != current,
            None => engine.requires_confirmation(),
        };
        if moved {
            drop(engine);
            self.say(&format!(
                "The clock moved on to {}; goal not recorded. Enter it again.",
                current.0
            ));
            return Ok(());
        }

        // A recorded golden goal ends the match: stop the tick before the save.
        if current.0 == Stage::GoldenGoal && answer {
            self.tick.stop();
        }

        let outcome = engine.add_score(side, &mut |stage: Stage, kind: StageKind| {
            answer && asked == Some((stage, Some(kind)))
        })?;
        publish(&self.display, &*engine);

        match outcome {
            ScoreOutcome::Added { .. } => {}
            ScoreOutcome::Declined => self.say("Goal not recorded."),
            ScoreOutcome::Rejected => self.say("The game is over; goal not recorded."),
        }

        if outcome.is_added() && engine.is_over() {
            let saved = engine.save_outcome().cloned();
            drop(engine);
            self.announce_game_over(saved.as_ref()).await;
        }
        Ok(())
    }

    async fn toggle_timeout(&mut self) {
        let now = Instant::now();
        let mut engine = self.engine.lock().await;

        let message = if engine.is_paused() {
            engine
                .resume(now)
                .map(|paused| format!("Play resumed after {} s.", paused))
        } else {
            engine
                .call_timeout(now)
                .map(|()| "Timeout. Type t again to resume.".to_string())
        };
        publish(&self.display, &*engine);
        drop(engine);

        match message {
            Ok(message) => self.say(&message),
            Err(e) => self.say(&e.to_string()),
        }
    }

    async fn announce_game_over(&mut self, saved: Option<&SaveOutcome>) {
        let engine = self.engine.lock().await;
        let scores = *engine.scores();
        let config = engine.config().clone();
        drop(engine);

        self.say(&format!(
            "Game over: {} {} - {} {}",
            config.white_team(),
            scores.white(),
            scores.black(),
            config.black_team()
        ));

        if let Some(outcome) = saved {
            if let Some(recovery) = &outcome.recovered {
                match &recovery.backup {
                    Some(path) => self.say(&format!(
                        "The result file was unreadable and has been reset; old contents kept in {}",
                        path.display()
                    )),
                    None => self.say("The result file was empty or unreadable and has been reset."),
                }
            }
            match outcome.conflict_message() {
                Some(message) => self.say(&message),
                None => self.say(&format!("Result saved for {}.", config.game_id().label())),
            }
        }

        if self.input_open {
            self.say("Close the clock? [y/N]");
        }
    }

    async fn confirm_quit(&mut self) -> Result<bool, UwhError> {
        self.ask("Quit now? The result will NOT be saved. [y/N]").await
    }

    /// Ask a yes/no question on the terminal. A closed input is a no.
    async fn ask(&mut self, question: &str) -> Result<bool, UwhError> {
        if !self.input_open {
            return Ok(false);
        }
        self.say(question);

        match self.lines.recv().await {
            Some(answer) => Ok(is_yes(&answer)),
            None => {
                self.input_open = false;
                Ok(false)
            }
        }
    }

    fn say(&self, message: &str) {
        if self.json_mode {
            tracing::info!("{}", message);
        } else {
            println!("{}", message);
        }
    }
}
