// src/session.rs

use crate::accrual::SessionAccrual;
use crate::clock::Clock;
use crate::errors::{DepositError, SessionError};
use crate::format::format_cents;
use crate::models::{Difficulty, DifficultyConfig, Preferences, SessionState};
use crate::persistence::Ledger;
use crate::settlement::{settle_deposit, DepositReceipt};
use crate::sound::AmbientSound;
use log::{debug, info, warn};

/// What happened when a session was torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Nothing unsaved; the session was discarded.
    Clean,
    /// The balance was deposited without asking.
    AutoDeposited(DepositReceipt),
    /// The user must confirm; the session is left untouched.
    NeedsConfirmation { unsaved_cents: u64, message: String },
}

/// One focus session: `idle -> running <-> paused -> idle`.
///
/// The tier is captured at start; preference changes made while the
/// session is active take effect on the next one.
pub struct FocusSession<S: AmbientSound> {
    state: SessionState,
    accrual: SessionAccrual,
    tier: Option<(Difficulty, DifficultyConfig)>,
    sound: S,
}

impl<S: AmbientSound> FocusSession<S> {
    pub fn new(sound: S) -> Self {
        FocusSession {
            state: SessionState::Idle,
            accrual: SessionAccrual::new(),
            tier: None,
            sound,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn accrual(&self) -> &SessionAccrual {
        &self.accrual
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.tier.map(|(d, _)| d)
    }

    pub fn config(&self) -> Option<&DifficultyConfig> {
        self.tier.as_ref().map(|(_, cfg)| cfg)
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    pub fn start(&mut self, prefs: &Preferences) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::invalid("start", self.state));
        }
        let difficulty = prefs.difficulty;
        self.tier = Some((difficulty, difficulty.config()));
        self.accrual = SessionAccrual::new();
        self.state = SessionState::Running;
        info!("[Session] Started at {} difficulty", difficulty);

        if let Err(e) = self.sound.play(prefs.music, prefs.volume) {
            warn!("[Sound] Failed to start {}: {}", prefs.music, e);
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::invalid("pause", self.state));
        }
        self.state = SessionState::Paused;
        self.sound.pause();
        debug!("[Session] Paused at {}s", self.accrual.focused_seconds);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Paused {
            return Err(SessionError::invalid("resume", self.state));
        }
        self.state = SessionState::Running;
        if let Err(e) = self.sound.resume() {
            warn!("[Sound] Failed to resume: {}", e);
        }
        debug!("[Session] Resumed at {}s", self.accrual.focused_seconds);
        Ok(())
    }

    /// Start from idle, pause while running, resume while paused.
    pub fn toggle(&mut self, prefs: &Preferences) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Idle => self.start(prefs)?,
            SessionState::Running => self.pause()?,
            SessionState::Paused => self.resume()?,
        }
        Ok(self.state)
    }

    /// Credits one elapsed second. Ignored unless running.
    pub fn tick(&mut self) -> bool {
        match (self.state, self.tier.as_ref()) {
            (SessionState::Running, Some((_, cfg))) => {
                self.accrual = self.accrual.tick(cfg);
                true
            }
            _ => false,
        }
    }

    /// Settles the session into the ledger and returns to idle.
    ///
    /// Settlement runs against the latest stored ledger, so deposits made
    /// elsewhere while this session ran are kept. A zero balance is
    /// rejected and leaves both the session and the ledger as they were.
    pub fn deposit(
        &mut self,
        ledger: &mut Ledger,
        clock: &impl Clock,
    ) -> Result<DepositReceipt, SessionError> {
        if self.accrual.is_empty() {
            return Err(DepositError::NothingToDeposit.into());
        }
        let accrual = &self.accrual;
        let receipt = ledger.transact(|state| {
            settle_deposit(state, accrual, clock).map(|s| (s.state, s.receipt))
        })?;

        self.state = SessionState::Idle;
        self.reset();
        Ok(receipt)
    }

    /// Throws the session away without touching the ledger.
    pub fn abandon(&mut self) {
        if self.state != SessionState::Idle || !self.accrual.is_empty() {
            info!(
                "[Session] Discarded {} cents after {}s",
                self.accrual.session_cents, self.accrual.focused_seconds
            );
        }
        self.state = SessionState::Idle;
        self.reset();
    }

    /// Guards against leaving with an unsaved balance.
    pub fn on_exit(&mut self, ledger: &mut Ledger, clock: &impl Clock) -> ExitOutcome {
        let unsaved_cents = self.accrual.session_cents;
        if unsaved_cents == 0 {
            self.abandon();
            return ExitOutcome::Clean;
        }

        ledger.refresh();
        if ledger.state().preferences.auto_deposit_on_exit {
            match self.deposit(ledger, clock) {
                Ok(receipt) => return ExitOutcome::AutoDeposited(receipt),
                Err(e) => warn!("[Session] Auto-deposit failed: {}", e),
            }
        }

        ExitOutcome::NeedsConfirmation {
            unsaved_cents,
            message: format!(
                "You have {} unsaved. Deposit before leaving?",
                format_cents(unsaved_cents)
            ),
        }
    }

    fn reset(&mut self) {
        self.accrual = SessionAccrual::new();
        self.tier = None;
        self.sound.stop();
    }
}

impl<S: AmbientSound> Drop for FocusSession<S> {
    fn drop(&mut self) {
        self.sound.dispose();
    }
}
