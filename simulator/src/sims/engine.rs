//! Event loop of the muon telescope simulation.
//!
//! The engine generates a fixed number of muons, keeps the ones that trigger
//! the telescope, stamps them with a Poisson arrival time and hands them to an
//! [`EventSink`]. It moves through three states:
//!
//! ```text
//! Idle --start--> Running --step x num_events--> Running --finish--> Finished
//!                    |
//!                    +--error--> Aborted
//! ```
//!
//! Run statistics can only be read once the engine is `Finished`. A failure
//! while generating or delivering an event leaves the engine `Aborted`, with
//! no statistics reported. Starting again from `Finished` or `Aborted` resets
//! the statistics and the clock; the random generator carries on where it
//! stopped.

use std::fmt;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};

use super::clock::{ArrivalClock, ElapsedTimeScale};
use super::record::{
    EventRecord, RunStatistics, RunSummary, EVENT_SCHEMA_VERSION, MC_RUN_NUMBER, MC_STATUS_OK,
};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::flux::MuonFluxService;
use crate::hardware::stations::StationRegistry;
use crate::hardware::telescope::{MuonSample, Telescope};
use crate::io::sink::EventSink;

/// Lifecycle state of a [`SimulationEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    /// Looping; `iteration` is the index of the next muon to generate.
    Running { iteration: u64 },
    Finished,
    /// The last run failed partway; its statistics are discarded.
    Aborted,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Running { iteration } => write!(f, "running (iteration {iteration})"),
            EngineState::Finished => write!(f, "finished"),
            EngineState::Aborted => write!(f, "aborted"),
        }
    }
}

/// Result of a single loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Triggered(EventRecord),
    Missed,
}

pub struct SimulationEngine {
    telescope: Telescope,
    flux: MuonFluxService,
    num_events: u64,
    seed: u64,
    rng: StdRng,
    time_scale: ElapsedTimeScale,
    state: EngineState,
    stats: RunStatistics,
    clock: ArrivalClock,
    previous_elapsed_time: f64,
}

impl SimulationEngine {
    /// Validate `config`, resolve its station in `registry` and build an
    /// idle engine.
    pub fn new(config: &SimulationConfig, registry: &StationRegistry) -> SimResult<Self> {
        config.validate()?;
        let telescope = Telescope::from_selection(&config.station, registry)?;
        let flux = MuonFluxService::new(config.flux)?;
        let seed = config.seed.unwrap_or_else(|| thread_rng().next_u64());
        Ok(Self::from_parts(
            telescope,
            flux,
            config.num_events,
            seed,
            config.elapsed_time_scale,
        ))
    }

    /// Build an engine from already constructed components.
    pub fn from_parts(
        telescope: Telescope,
        flux: MuonFluxService,
        num_events: u64,
        seed: u64,
        time_scale: ElapsedTimeScale,
    ) -> Self {
        Self {
            telescope,
            flux,
            num_events,
            seed,
            rng: StdRng::seed_from_u64(seed),
            time_scale,
            state: EngineState::Idle,
            stats: RunStatistics::default(),
            clock: ArrivalClock::new(),
            previous_elapsed_time: 0.0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn telescope(&self) -> &Telescope {
        &self.telescope
    }

    pub fn flux(&self) -> &MuonFluxService {
        &self.flux
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_events(&self) -> u64 {
        self.num_events
    }

    fn state_violation(&self, operation: &'static str) -> SimError {
        SimError::StateViolation {
            operation,
            state: self.state.to_string(),
        }
    }

    /// Change a zenith distribution parameter; only allowed while idle.
    pub fn set_theta_dist_parameter(&mut self, index: usize, value: f64) -> SimResult<()> {
        if self.state != EngineState::Idle {
            return Err(self.state_violation("change flux parameters"));
        }
        self.flux.set_theta_dist_parameter(index, value)
    }

    /// Enter the `Running` state with fresh statistics.
    pub fn start(&mut self) -> SimResult<()> {
        if let EngineState::Running { .. } = self.state {
            return Err(self.state_violation("start a run"));
        }
        self.stats = RunStatistics::default();
        self.clock.reset();
        self.previous_elapsed_time = 0.0;
        self.state = EngineState::Running { iteration: 0 };
        debug!(
            "Run started: {} events on {}, seed {}",
            self.num_events, self.telescope, self.seed
        );
        Ok(())
    }

    /// Iterations left in the current run.
    pub fn remaining(&self) -> u64 {
        match self.state {
            EngineState::Idle => self.num_events,
            EngineState::Running { iteration } => self.num_events - iteration,
            EngineState::Finished | EngineState::Aborted => 0,
        }
    }

    /// Generate one muon; a triggered one is annotated and sent to `sink`.
    ///
    /// Any failure past the state check aborts the run.
    pub fn step<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> SimResult<StepOutcome> {
        let iteration = match self.state {
            EngineState::Running { iteration } if iteration < self.num_events => iteration,
            _ => return Err(self.state_violation("step")),
        };

        let outcome = self.generate(iteration, sink);
        if let Err(e) = &outcome {
            warn!("Run aborted at iteration {iteration}: {e}");
            self.state = EngineState::Aborted;
        }
        outcome
    }

    fn generate<S: EventSink + ?Sized>(
        &mut self,
        iteration: u64,
        sink: &mut S,
    ) -> SimResult<StepOutcome> {
        let muon = self.telescope.shoot_muon(&self.flux, &mut self.rng)?;
        self.stats.record_generated();
        self.state = EngineState::Running {
            iteration: iteration + 1,
        };

        if !muon.triggered {
            return Ok(StepOutcome::Missed);
        }

        let record = self.annotate(iteration, &muon)?;
        self.stats.record_triggered(record.elapsed_time);
        self.previous_elapsed_time = record.elapsed_time;
        sink.record(&record)?;
        Ok(StepOutcome::Triggered(record))
    }

    fn annotate(&mut self, iteration: u64, muon: &MuonSample) -> SimResult<EventRecord> {
        self.clock
            .advance(self.flux.random_inter_arrival_time(&mut self.rng));
        let seconds = self.clock.seconds();
        let nanoseconds = self.clock.nanoseconds();
        let elapsed_time = self.time_scale.elapsed(seconds, nanoseconds);
        let delta_time = if self.stats.num_triggered() == 0 {
            0.0
        } else {
            elapsed_time - self.previous_elapsed_time
        };

        Ok(EventRecord {
            run_number: MC_RUN_NUMBER,
            event_number: iteration,
            status_code: MC_STATUS_OK,
            seconds,
            nanoseconds,
            elapsed_time,
            delta_time,
            theta: muon.track.theta(),
            phi: muon.track.phi(),
            x_top: muon.entry.x,
            y_top: muon.entry.y,
            x_bottom: muon.exit.x,
            y_bottom: muon.exit.y,
            track_length: muon
                .track
                .length_between(self.telescope.z_top(), self.telescope.z_bottom())?,
        })
    }

    /// Close the run after the last iteration.
    pub fn finish(&mut self) -> SimResult<&RunStatistics> {
        match self.state {
            EngineState::Running { iteration } if iteration == self.num_events => {
                self.state = EngineState::Finished;
                debug!("Simulated clock stopped at {:.9} s", self.clock.as_secs_f64());
                Ok(&self.stats)
            }
            _ => Err(self.state_violation("finish")),
        }
    }

    /// Statistics of the last run; fails unless the engine is `Finished`.
    pub fn statistics(&self) -> SimResult<&RunStatistics> {
        match self.state {
            EngineState::Finished => Ok(&self.stats),
            _ => Err(self.state_violation("read run statistics")),
        }
    }

    /// Summary of the finished run.
    ///
    /// Fails with [`SimError::NoEventsTriggered`] if nothing triggered.
    pub fn summary(&self) -> SimResult<RunSummary> {
        let stats = self.statistics()?;
        let trigger_rate_hz = stats.trigger_rate()?;
        Ok(RunSummary {
            schema_version: EVENT_SCHEMA_VERSION,
            station: self.telescope.name().to_string(),
            seed: self.seed,
            num_events: self.num_events,
            num_generated: stats.num_generated(),
            num_triggered: stats.num_triggered(),
            fraction_triggered: stats.fraction_triggered(),
            trigger_rate_hz,
            elapsed_time: stats.last_elapsed_time().unwrap_or(0.0),
            theta_exponent: self.flux.model().theta_exponent(),
            rate_hz: self.flux.model().rate_hz(),
            elapsed_time_scale: self.time_scale,
        })
    }

    /// Run the full event loop and deliver the summary to `sink`.
    pub fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> SimResult<RunSummary> {
        self.run_with_progress(sink, |_| {})
    }

    /// Like [`run`](Self::run), calling `progress` with the number of
    /// completed iterations after each one.
    pub fn run_with_progress<S, F>(&mut self, sink: &mut S, mut progress: F) -> SimResult<RunSummary>
    where
        S: EventSink + ?Sized,
        F: FnMut(u64),
    {
        info!("Simulating {}...", self.telescope);
        self.start()?;
        info!("Entering the event loop...");
        for i in 0..self.num_events {
            self.step(sink)?;
            progress(i + 1);
        }
        let stats = self.finish()?;
        info!(
            "Done. {} event(s) generated, {} triggered ({:.2} %) in {:.3} s.",
            stats.num_generated(),
            stats.num_triggered(),
            stats.fraction_triggered() * 100.0,
            stats.last_elapsed_time().unwrap_or(0.0)
        );

        let summary = self.summary()?;
        info!("Average trigger rate: {:.3} Hz", summary.trigger_rate_hz);
        sink.summary(&summary)?;
        Ok(summary)
    }
}
