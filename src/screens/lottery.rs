// src/screens/lottery.rs
use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::event::KeyEvent;

use crate::config::Config;
use crate::core::input::{self, Intent};
use crate::lottery::geometry::Size;
use crate::lottery::machine::{DrawMachine, Gate, Status};
use crate::lottery::notice::Notice;
use crate::screens::ScreenAction;
use crate::store::Records;

// how long a notice stays in the title bar
const NOTICE_SECONDS: f32 = 4.0;

pub struct State {
    pub machine: DrawMachine,
    top_title: String,
    notice: Option<(Notice, f32)>,
}

pub fn init(records: Records, config: &Config) -> State {
    let (roster, board) = records.into_parts();
    State {
        machine: DrawMachine::new(roster, board, config, StdRng::from_os_rng()),
        top_title: config.top_title.clone(),
        notice: None,
    }
}

pub fn update(state: &mut State, delta_time: f32) -> ScreenAction {
    state.machine.update(delta_time);

    if let Some((_, left)) = &mut state.notice {
        *left -= delta_time;
        if *left <= 0.0 {
            state.notice = None;
        }
    }
    if let Some(latest) = state.machine.drain_notices().pop() {
        state.notice = Some((latest, NOTICE_SECONDS));
    }

    if state.machine.take_dirty() { ScreenAction::Save } else { ScreenAction::None }
}

pub fn handle_key_press(state: &mut State, event: &KeyEvent) -> ScreenAction {
    match input::intent_from_event(event) {
        Some(intent) => apply(state, intent),
        None => ScreenAction::None,
    }
}

pub fn resize(state: &mut State, width: u32, height: u32) {
    state.machine.resize(Size::new(width as f32, height as f32));
}

fn apply(state: &mut State, intent: Intent) -> ScreenAction {
    if let Err(e) = state.machine.handle_intent(intent) {
        warn!("{:?} refused: {}", intent, e);
    }
    ScreenAction::None
}

/// One-line summary for the window title.
pub fn title(state: &State) -> String {
    let m = &state.machine;
    let prize = match m.board().current() {
        Some(p) => format!("{} {}/{}", p.name, p.used_count, p.count),
        None => "no prizes".to_string(),
    };
    let busy = if matches!(m.gate(), Gate::Busy(_)) { " ..." } else { "" };
    let status = match m.status() {
        Status::Idle => "Press Space to begin",
        Status::Spinning => "Space: draw",
        Status::Drawing => "Space: reveal",
        Status::Revealed => "Space: next round | Esc: discard",
    };
    let shuffling = if m.is_shuffling() { ", shuffling" } else { "" };
    let mut title = format!(
        "{} | {} | {}{} | {:?} x{}{}",
        state.top_title,
        prize,
        status,
        busy,
        m.formation(),
        m.stage().len(),
        shuffling
    );
    if m.confetti().is_active() {
        title.push_str(&format!(" | confetti {}", m.confetti().particles().len()));
    }
    if m.status() == Status::Revealed {
        if let Some(round) = m.round() {
            let names: Vec<&str> = round.winners.iter().map(|w| w.name.as_str()).collect();
            title.push_str(&format!(" | Winners: {}", names.join(", ")));
        }
    }
    if let Some((notice, _)) = &state.notice {
        title.push_str(&format!(" | {}", notice));
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lottery::model::Prize;
    use winit::keyboard::KeyCode;

    fn state() -> State {
        let mut records = Records::sample();
        records.persons.truncate(2);
        records.prizes = vec![Prize::new("p", "Bike", 5)];
        let config = Config { row_count: 2, ..Config::default() };
        let (roster, board) = records.into_parts();
        State {
            machine: DrawMachine::new(roster, board, &config, StdRng::seed_from_u64(9)),
            top_title: config.top_title.clone(),
            notice: None,
        }
    }

    fn handle_key_code(state: &mut State, code: KeyCode) -> ScreenAction {
        match input::intent_from_keycode(code) {
            Some(intent) => apply(state, intent),
            None => ScreenAction::None,
        }
    }

    fn run(s: &mut State, seconds: f32) -> Vec<ScreenAction> {
        let frames = (seconds * 60.0) as usize;
        (0..frames).map(|_| update(s, 1.0 / 60.0)).collect()
    }

    #[test]
    fn refused_draw_shows_a_notice() {
        let mut s = state();
        handle_key_code(&mut s, KeyCode::Space);
        run(&mut s, 3.0);
        assert_eq!(s.machine.status(), Status::Spinning);

        handle_key_code(&mut s, KeyCode::Space);
        update(&mut s, 0.0);
        let t = title(&s);
        assert!(t.contains("Not enough people for Bike"), "{}", t);
        assert!(t.contains("Bike 0/5"));

        run(&mut s, NOTICE_SECONDS + 0.5);
        assert!(!title(&s).contains("Not enough"));
    }

    #[test]
    fn revealed_winners_are_named_in_the_title() {
        let mut records = Records::sample();
        records.persons.truncate(12);
        records.prizes = vec![Prize::new("p", "Bike", 2)];
        let config = Config { row_count: 2, ..Config::default() };
        let (roster, board) = records.into_parts();
        let mut s = State {
            machine: DrawMachine::new(roster, board, &config, StdRng::seed_from_u64(3)),
            top_title: config.top_title.clone(),
            notice: None,
        };
        resize(&mut s, 1600, 900);
        for _ in 0..3 {
            handle_key_code(&mut s, KeyCode::Space);
            run(&mut s, 5.0);
        }
        assert_eq!(s.machine.status(), Status::Revealed);
        let t = title(&s);
        for w in &s.machine.round().unwrap().winners {
            assert!(t.contains(&w.name), "{}", t);
        }

        // committing the round asks the host to save
        handle_key_code(&mut s, KeyCode::Space);
        assert!(run(&mut s, 0.1).contains(&ScreenAction::Save));
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        let mut s = state();
        assert_eq!(handle_key_code(&mut s, KeyCode::KeyZ), ScreenAction::None);
        assert_eq!(s.machine.gate(), Gate::Open);
        let t = title(&s);
        assert!(t.contains("Press Space"));
        assert!(t.contains("Table x14, shuffling"), "{}", t);
    }
}
