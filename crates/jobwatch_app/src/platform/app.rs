use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Result};
use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use jobwatch_core::{
    update, AppState, Effect, InputGroup, Msg, RunId, RunOutcome, SelectedFile, Severity,
};
use jobwatch_engine::{write_transcript, Transcript};
use log::LevelFilter;

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::files::load_files;
use super::ui::{prompt, render};

/// Runs one job from selection to settled outcome. Returns whether it succeeded.
pub fn run_app(cli: Cli) -> Result<bool> {
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_overrides(&cli);
    let level = config.level_filter();
    engine_logging::initialize(config.log_destination(), level.unwrap_or(LevelFilter::Info));
    if level.is_none() {
        engine_warn!("Unknown log level {:?}, using info", config.log_level);
    }
    engine_info!("jobwatch starting, endpoint={}", config.endpoint);

    let selections = load_selections(&cli)?;
    let mut session = Session::new(
        EffectRunner::new(config.stream_settings()),
        io::stdout().lock(),
    );
    let Some(run_id) = session.run(selections, cli.assume_yes, io::stdin().lock())? else {
        return Ok(false);
    };
    if let Some(dir) = &config.transcript_dir {
        session.write_transcript(dir, run_id);
    }
    Ok(session.succeeded())
}

fn load_selections(cli: &Cli) -> Result<Vec<(InputGroup, Vec<SelectedFile>)>> {
    let format: Vec<_> = cli.format.iter().cloned().collect();
    Ok(vec![
        (InputGroup::Primary, load_files(&cli.primary)?),
        (InputGroup::Secondary, load_files(&cli.secondary)?),
        (InputGroup::Format, load_files(&format)?),
    ])
}

struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    view: render::TerminalView,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            view: render::TerminalView::new(),
            out,
        }
    }

    /// Selects the files, passes the input gate and follows the run to its end.
    /// `None` when no run was started.
    fn run<R: BufRead>(
        &mut self,
        selections: Vec<(InputGroup, Vec<SelectedFile>)>,
        assume_yes: bool,
        input: R,
    ) -> Result<Option<RunId>> {
        for (group, files) in selections {
            if files.is_empty() {
                continue;
            }
            self.dispatch(Msg::FilesSelected { group, files })?;
            if self.has_error_banner() {
                return Ok(None);
            }
        }
        let selection = render::render_selection(&self.state.view());
        self.print_lines(selection)?;

        let mut effects = self.dispatch(Msg::StartClicked)?;
        if matches!(self.state.outcome(), Some(RunOutcome::WarningPending(_))) {
            let confirmed = assume_yes || prompt::confirm_continue(input, &mut self.out)?;
            if !confirmed {
                self.print_lines(vec!["Not started.".to_string()])?;
                return Ok(None);
            }
            effects = self.dispatch(Msg::ContinueClicked)?;
        }
        if !self.state.is_processing() {
            bail!("the run did not start");
        }

        let run_id = self.drive(effects)?;
        let status = render::render_snapshot(self.state.snapshot().fields());
        self.print_lines(vec![status])?;
        Ok(Some(run_id))
    }

    fn dispatch(&mut self, msg: Msg) -> Result<Vec<Effect>> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let lines = if state.consume_dirty() {
            self.view.render(&state.view(), state.log().lines())
        } else {
            Vec::new()
        };
        self.state = state;
        self.print_lines(lines)?;
        Ok(effects)
    }

    /// Feeds engine events through `update` until the run settles.
    fn drive(&mut self, mut effects: Vec<Effect>) -> Result<RunId> {
        loop {
            if let Some(run_id) = self.runner.apply(effects) {
                return Ok(run_id);
            }
            let Some(msg) = self.runner.next_msg() else {
                bail!("engine stopped before the run finished");
            };
            effects = self.dispatch(msg)?;
        }
    }

    fn succeeded(&self) -> bool {
        self.state.outcome() == Some(&RunOutcome::Succeeded)
    }

    fn write_transcript(&self, dir: &Path, run_id: RunId) {
        let transcript = Transcript {
            run_id,
            finished_utc: Utc::now().to_rfc3339(),
            outcome: render::outcome_label(self.state.outcome()),
            log: self.state.log().lines().to_vec(),
            snapshot: self.state.snapshot().to_value(),
        };
        let file_name = Utc::now().format("run-%Y%m%dT%H%M%SZ.json").to_string();
        match write_transcript(dir, &file_name, &transcript) {
            Ok(path) => engine_info!("Transcript written to {:?}", path),
            Err(err) => engine_error!("Failed to write transcript into {:?}: {}", dir, err),
        }
    }

    fn has_error_banner(&self) -> bool {
        self.state
            .view()
            .banner
            .is_some_and(|banner| banner.severity == Severity::Error)
    }

    fn print_lines(&mut self, lines: Vec<String>) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}
