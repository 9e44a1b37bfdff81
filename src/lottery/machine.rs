//! The draw lifecycle: Idle -> Spinning -> Drawing -> Revealed, and back to
//! Spinning on continue or cancel.
//!
//! Every transition that animates closes the gate first and reopens it from
//! the cue of its final tween, so keys pressed mid-flight are dropped.
use cgmath::{Vector3, vec3};
use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::{HashSet, VecDeque};
use std::f32::consts::PI;

use crate::config::{Config, Theme};
use crate::core::input::Intent;
use crate::lottery::error::DrawError;
use crate::lottery::geometry::{self, Formation, Size};
use crate::lottery::model::DrawRound;
use crate::lottery::notice::Notice;
use crate::lottery::roster::{PrizeBoard, Roster};
use crate::lottery::scene::{CAMERA_HOME, CardMode, Stage};
use crate::lottery::{pool, quota};
use crate::ui::anim::{self, Scheduler, Subject, TweenId};
use crate::ui::components::confetti::Confetti;

const SHUFFLE_INTERVAL: f32 = 0.2;
const SHUFFLE_CARDS: usize = 4;

const INIT_TRANSFORM_SECONDS: f32 = 1.0;
const LAYOUT_TRANSFORM_SECONDS: f32 = 1.0;

const SLOW_SPIN_Y: f32 = PI * 0.1 * 1000.0;
const SLOW_SPIN_SECONDS: f32 = 2000.0;
const FAST_SPIN_Y: f32 = PI * 10.0 * 1000.0;
const FAST_SPIN_SECONDS: f32 = 3000.0;
const SPIN_STOP_SECONDS: f32 = 1.0;

const REVEAL_Z: f32 = 1000.0;
const REVEAL_MOVE_SECONDS: f32 = 1.2;
const REVEAL_TURN_SECONDS: f32 = 0.9;
const CAMERA_SECONDS: f32 = 1.0;

const ZERO: Vector3<f32> = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Spinning,
    Drawing,
    Revealed,
}

/// The transition currently holding the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flight {
    Enter,
    Layout,
    Reveal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Open,
    Busy(Flight),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cue {
    /// Sync tween of a layout transform.
    LayoutSettled { then: Option<Status> },
    RevealLanded,
    CameraHome,
    CameraSettled,
}

pub struct DrawMachine {
    status: Status,
    gate: Gate,
    formation: Formation,
    stage: Stage,
    anim: Scheduler<Cue>,
    spin: Option<TweenId>,
    roster: Roster,
    board: PrizeBoard,
    theme: Theme,
    row_count: usize,
    window: Size,
    round: Option<DrawRound>,
    lucky_slots: Vec<usize>,
    // time since the last relabel, None when stopped
    shuffle: Option<f32>,
    confetti: Confetti,
    notices: VecDeque<Notice>,
    dirty: bool,
    rng: StdRng,
}

impl DrawMachine {
    /// Scatter the cards and start moving them into the table.
    pub fn new(roster: Roster, board: PrizeBoard, config: &Config, mut rng: StdRng) -> Self {
        let stage = Stage::build(roster.persons(), config.row_count, &config.theme, &mut rng);
        let window = Size::new(config.display_width as f32, config.display_height as f32);
        info!("Stage built: {} cards for {} people.", stage.len(), roster.len());

        let mut m = Self {
            status: Status::Idle,
            gate: Gate::Open,
            formation: Formation::Table,
            stage,
            anim: Scheduler::new(),
            spin: None,
            roster,
            board,
            theme: config.theme.clone(),
            row_count: config.row_count.max(1),
            window,
            round: None,
            lucky_slots: Vec::new(),
            shuffle: Some(0.0),
            confetti: Confetti::new(window),
            notices: VecDeque::new(),
            dirty: false,
            rng,
        };
        m.transform(Formation::Table, INIT_TRANSFORM_SECONDS, Cue::LayoutSettled { then: None });
        m
    }

    pub fn status(&self) -> Status { self.status }
    pub fn gate(&self) -> Gate { self.gate }
    pub fn formation(&self) -> Formation { self.formation }
    pub fn stage(&self) -> &Stage { &self.stage }
    pub fn roster(&self) -> &Roster { &self.roster }
    pub fn board(&self) -> &PrizeBoard { &self.board }
    pub fn round(&self) -> Option<&DrawRound> { self.round.as_ref() }
    pub fn lucky_slots(&self) -> &[usize] { &self.lucky_slots }
    pub fn confetti(&self) -> &Confetti { &self.confetti }
    pub fn is_shuffling(&self) -> bool { self.shuffle.is_some() }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// True once after each change to the records, so the host knows to persist.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Window size used to place revealed cards and confetti. Zero sizes
    /// (a minimised window) are ignored.
    pub fn resize(&mut self, window: Size) {
        if window.width <= 0.0 || window.height <= 0.0 {
            return;
        }
        debug!("Window now {}x{}.", window.width, window.height);
        self.window = window;
        self.confetti.resize(window);
    }

    fn notify(&mut self, notice: Notice) {
        info!("{}", notice);
        self.notices.push_back(notice);
    }

    /// Route an operator intent by status. Anything not legal in the current
    /// status, and everything while the gate is busy, is ignored.
    pub fn handle_intent(&mut self, intent: Intent) -> Result<(), DrawError> {
        if let Gate::Busy(flight) = self.gate {
            debug!("Ignoring {:?}: {:?} in flight.", intent, flight);
            return Ok(());
        }
        match (self.status, intent) {
            (Status::Idle, Intent::Confirm) => self.enter(),
            (Status::Idle, Intent::Layout(f)) => self.layout(f),
            (Status::Spinning, Intent::Confirm) => return self.start(),
            (Status::Drawing, Intent::Confirm) => return self.stop(),
            (Status::Revealed, Intent::Confirm) => self.continue_round(),
            (Status::Revealed, Intent::Cancel) => self.cancel_round(),
            (Status::Idle | Status::Spinning, Intent::NextPrize) => self.select_prize(true),
            (Status::Idle | Status::Spinning, Intent::PrevPrize) => self.select_prize(false),
            (Status::Idle | Status::Spinning, Intent::UndoWinner) => self.undo_winner(),
            (Status::Idle | Status::Spinning, Intent::ResetWinners) => self.reset_winners(),
            (status, intent) => debug!("Ignoring {:?} while {:?}.", intent, status),
        }
        Ok(())
    }

    /// Advance the shuffle, confetti and tweens by `dt` seconds, then act on
    /// whatever cues completed.
    pub fn update(&mut self, dt: f32) {
        self.tick_shuffle(dt);
        self.confetti.update(dt, &mut self.rng);

        let cues = self.anim.tick(&mut self.stage, dt);
        let epoch = self.anim.epoch();
        for cue in cues {
            if self.anim.epoch() != epoch {
                debug!("Tweens were cancelled mid-batch; dropping remaining cues.");
                break;
            }
            self.on_cue(cue);
        }
    }

    fn on_cue(&mut self, cue: Cue) {
        debug!("Cue {:?}", cue);
        match cue {
            Cue::LayoutSettled { then: None } => {
                if self.gate == Gate::Busy(Flight::Layout) {
                    self.gate = Gate::Open;
                }
            }
            Cue::LayoutSettled { then: Some(status) } => self.finish_enter(status),
            Cue::RevealLanded => {
                let Some(round) = self.round.as_mut() else { return; };
                round.landed += 1;
                if round.landed == round.winners.len() {
                    self.confetti.fire(&mut self.rng);
                    self.anim.add(anim::linear(CAMERA_SECONDS).position(Subject::Camera, CAMERA_HOME).cue(Cue::CameraHome));
                }
            }
            Cue::CameraHome => {
                self.anim.add(anim::linear(CAMERA_SECONDS).rotation(Subject::Camera, ZERO).cue(Cue::CameraSettled));
            }
            Cue::CameraSettled => {
                self.stage.camera.position = CAMERA_HOME;
                self.stage.camera.rotation = ZERO;
                self.gate = Gate::Open;
                self.status = Status::Revealed;
                info!("Round revealed.");
            }
        }
    }

    // ---- transitions ----

    fn enter(&mut self) {
        self.anim.cancel_all();
        self.spin = None;
        self.shuffle = Some(0.0);

        for &n in &self.theme.pattern_list {
            if n >= 1 && n <= self.stage.len() {
                self.stage.show(n - 1, None, &self.theme, CardMode::Sphere, &mut self.rng);
            }
        }

        self.gate = Gate::Busy(Flight::Enter);
        self.transform(Formation::Sphere, 1.0, Cue::LayoutSettled { then: Some(Status::Spinning) });
        info!("Entering the draw: cards forming a sphere.");
    }

    fn finish_enter(&mut self, status: Status) {
        let lucky = std::mem::take(&mut self.lucky_slots);
        for slot in lucky {
            self.stage.show(slot, None, &self.theme, CardMode::Sphere, &mut self.rng);
        }
        self.gate = Gate::Open;
        self.status = status;
        self.roll_stage(vec3(0.0, SLOW_SPIN_Y, 0.0), SLOW_SPIN_SECONDS);
        info!("Spinning; ready to draw.");
    }

    fn layout(&mut self, formation: Formation) {
        self.anim.cancel_all();
        self.spin = None;
        self.gate = Gate::Busy(Flight::Layout);
        self.transform(formation, LAYOUT_TRANSFORM_SECONDS, Cue::LayoutSettled { then: None });
        info!("Idle layout -> {:?}", formation);
    }

    fn start(&mut self) -> Result<(), DrawError> {
        let Some(prize) = self.board.current().filter(|p| !p.is_used).cloned() else {
            self.notify(Notice::LotteryOver);
            return Err(DrawError::PrizeExhausted);
        };

        let needed = quota::remaining_for_round(&prize);
        let eligible = pool::eligible_pool(&self.roster, &prize);
        if eligible.len() < needed {
            let available = eligible.len();
            self.notify(Notice::NotEnoughPeople { prize: prize.name.clone(), needed, available });
            return Err(DrawError::InsufficientCandidates { needed, available });
        }

        let n = quota::round_size(&prize);
        let total = self.stage.len();
        let used = self.lucky_slots.len();
        if total.saturating_sub(used) < n {
            self.notify(Notice::NoFreeSlot { total });
            return Err(DrawError::CapacityExhausted { used, total });
        }

        let (winners, _) = pool::draw_random_subset(eligible, n, &mut self.rng);
        debug!(
            "Drew {:?} for '{}'.",
            winners.iter().map(|w| w.id).collect::<Vec<_>>(),
            prize.name
        );
        self.round = Some(DrawRound {
            prize_id: prize.id.clone(),
            winners,
            slots: Vec::new(),
            round_size: n,
            landed: 0,
        });

        self.shuffle = None;
        self.roll_stage(vec3(0.0, FAST_SPIN_Y, 0.0), FAST_SPIN_SECONDS);
        self.status = Status::Drawing;
        self.notify(Notice::Drawing { prize: prize.name, count: n });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DrawError> {
        let Some(winners) = self.round.as_ref().map(|r| r.winners.clone()) else {
            warn!("Drawing without a round; nothing to reveal.");
            return Ok(());
        };

        let total = self.stage.len();
        let mut used: HashSet<usize> = self.lucky_slots.iter().copied().collect();
        let free = total.saturating_sub(used.len());
        if free < winners.len() {
            self.notify(Notice::NoFreeSlot { total });
            return Err(DrawError::CapacityExhausted { used: used.len(), total });
        }

        let mut slots = Vec::with_capacity(winners.len());
        for _ in 0..winners.len() {
            let slot = pool::select_unused_slot(&used, total, &mut self.rng)?;
            used.insert(slot);
            slots.push(slot);
        }

        let lucky_size = Size::new(self.theme.card_width, self.theme.card_height).scaled(2.0);
        for (i, (winner, &slot)) in winners.iter().zip(&slots).enumerate() {
            self.stage.show(slot, Some(winner), &self.theme, CardMode::Lucky, &mut self.rng);
            let (x, y) = geometry::element_position(i, winners.len(), lucky_size, self.window);
            self.anim.add(
                anim::exponential_in_out(REVEAL_MOVE_SECONDS)
                    .position(Subject::Card(slot), vec3(x, y, REVEAL_Z))
                    .cue(Cue::RevealLanded),
            );
            self.anim.add(anim::exponential_in_out(REVEAL_TURN_SECONDS).rotation(Subject::Card(slot), ZERO));
        }

        self.lucky_slots = slots.clone();
        if let Some(round) = self.round.as_mut() {
            round.slots = slots;
        }
        self.roll_stage(ZERO, SPIN_STOP_SECONDS);
        self.gate = Gate::Busy(Flight::Reveal);
        info!(
            "Revealing {} winner(s): {}",
            winners.len(),
            winners.iter().map(|w| w.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        if winners.is_empty() {
            self.anim.add(anim::sleep(0.0).cue(Cue::CameraSettled));
        }
        Ok(())
    }

    fn continue_round(&mut self) {
        if let Some(round) = self.round.take() {
            match self.board.prizes().iter().find(|p| p.id == round.prize_id).cloned() {
                Some(prize) => {
                    let when = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                    let next = quota::commit(&prize, &round.winners, round.round_size, &when, &mut self.roster);
                    self.board.update_prize(next);
                    self.dirty = true;
                }
                None => warn!("Prize '{}' vanished before commit; round dropped.", round.prize_id),
            }
        }
        self.enter();
    }

    fn cancel_round(&mut self) {
        if let Some(round) = self.round.take() {
            info!("Round for '{}' cancelled; {} winner(s) discarded.", round.prize_id, round.winners.len());
        }
        self.status = Status::Idle;
        self.enter();
    }

    fn select_prize(&mut self, forward: bool) {
        let Some(name) = self.board.cycle(forward).map(|p| p.name.clone()) else {
            debug!("No prizes to choose from.");
            return;
        };
        self.dirty = true;
        self.notify(Notice::PrizeSelected { prize: name });
    }

    /// Clear the newest winner's wins and hand each of those prizes one
    /// place back.
    fn undo_winner(&mut self) {
        let Some(id) = self.roster.already().last().map(|p| p.id) else {
            debug!("No winners to put back.");
            return;
        };
        let Some(person) = self.roster.get(id).cloned() else {
            warn!("Winner {} is missing from the roster.", id);
            return;
        };
        self.roster.move_already_to_not(id);
        for prize_id in &person.prize_ids {
            match self.board.prizes().iter().find(|p| &p.id == prize_id) {
                Some(prize) => {
                    let back = quota::release(prize, 1);
                    self.board.update_prize(back);
                }
                None => warn!("{} won unknown prize '{}'.", person.name, prize_id),
            }
        }
        self.dirty = true;
        self.notify(Notice::WinnerReturned { name: person.name });
    }

    fn reset_winners(&mut self) {
        let cleared = self.roster.already().len();
        self.roster.reset_winners();
        self.board.reset_usage();
        self.dirty = true;
        info!("Cleared {} win record(s) and every prize counter.", cleared);
        self.notify(Notice::WinnersReset);
    }

    // ---- helpers ----

    /// Move every card to `formation` with per-card jitter in `[d, 2d)`, plus
    /// a sync tween of `2d` carrying `cue`.
    fn transform(&mut self, formation: Formation, d: f32, cue: Cue) {
        let card = Size::new(self.theme.card_width, self.theme.card_height);
        let targets = geometry::layout(formation, self.stage.len(), self.row_count, card);
        for (i, pose) in targets.iter().enumerate() {
            let move_for = d + self.rng.random::<f32>() * d;
            let turn_for = d + self.rng.random::<f32>() * d;
            self.anim.add(
                anim::exponential_in_out(move_for)
                    .position(Subject::Card(i), pose.position)
                    .scale(Subject::Card(i), pose.scale),
            );
            self.anim.add(anim::exponential_in_out(turn_for).rotation(Subject::Card(i), pose.rotation));
        }
        self.anim.add(anim::sleep(d * 2.0).cue(cue));
        self.formation = formation;
    }

    fn roll_stage(&mut self, to: Vector3<f32>, seconds: f32) {
        if let Some(id) = self.spin.take() {
            self.anim.cancel(id);
        }
        self.spin = Some(self.anim.add(anim::linear(seconds).rotation(Subject::Stage, to)));
    }

    fn tick_shuffle(&mut self, dt: f32) {
        let Some(acc) = self.shuffle.as_mut() else { return; };
        *acc += dt.max(0.0);
        if *acc < SHUFFLE_INTERVAL {
            return;
        }
        *acc = 0.0;
        if self.stage.is_empty() || self.roster.is_empty() {
            return;
        }
        for _ in 0..SHUFFLE_CARDS {
            let slot = self.rng.random_range(0..self.stage.len());
            if self.lucky_slots.contains(&slot) {
                continue;
            }
            let who = self.rng.random_range(0..self.roster.len());
            let person = self.roster.persons()[who].clone();
            let mode = self.stage.slots[slot].face.mode;
            self.stage.show(slot, Some(&person), &self.theme, mode, &mut self.rng);
        }
    }
}
