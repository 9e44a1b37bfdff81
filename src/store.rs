//! Participants and prizes on disk, as one JSON document.
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::lottery::model::{Participant, Prize, PrizeId};
use crate::lottery::roster::{PrizeBoard, Roster};

const SAMPLE_PEOPLE: u32 = 120;
const SAMPLE_DEPARTMENTS: [&str; 5] = ["Engineering", "Design", "Sales", "Finance", "Operations"];

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO Error: {}", e),
            StoreError::Json(e) => write!(f, "Malformed records: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Records {
    #[serde(default)]
    pub persons: Vec<Participant>,
    #[serde(default)]
    pub already: Vec<Participant>,
    #[serde(default)]
    pub prizes: Vec<Prize>,
    #[serde(default)]
    pub current_prize: Option<PrizeId>,
}

impl Records {
    /// A demo roster and prize list, used when no records file exists yet.
    pub fn sample() -> Self {
        let persons = (0..SAMPLE_PEOPLE)
            .map(|i| {
                Participant::new(
                    i,
                    &format!("{:04}", i + 1),
                    &format!("Guest {}", i + 1),
                    SAMPLE_DEPARTMENTS[i as usize % SAMPLE_DEPARTMENTS.len()],
                    "Staff",
                )
            })
            .collect();
        let mut prizes = vec![
            Prize::new("special", "Special Prize", 1),
            Prize::new("first", "First Prize", 3),
            Prize::new("second", "Second Prize", 5),
            Prize::new("third", "Third Prize", 12).with_sub_batches(&[4, 4, 4]),
            Prize::new("lucky", "Lucky Draw", 20).drawing_from_all(),
        ];
        for (i, p) in prizes.iter_mut().enumerate() {
            p.sort = i as i32;
        }
        Self { persons, already: Vec::new(), prizes, current_prize: None }
    }

    /// A list nobody has won from yet is taken as a fresh import, so its
    /// ids are renumbered `0..n`.
    pub fn into_parts(self) -> (Roster, PrizeBoard) {
        let fresh = self.already.is_empty() && self.persons.iter().all(|p| !p.is_win);
        let roster = if fresh {
            Roster::from_import(self.persons)
        } else {
            Roster::from_records(self.persons, self.already)
        };
        (roster, PrizeBoard::new(self.prizes, self.current_prize))
    }

    pub fn from_parts(roster: &Roster, board: &PrizeBoard) -> Self {
        Self {
            persons: roster.persons().to_vec(),
            already: roster.already().to_vec(),
            prizes: board.prizes().to_vec(),
            current_prize: board.current_id().map(str::to_string),
        }
    }
}

/// Reads the records file; a missing file yields the sample records.
pub fn load(path: &Path) -> Result<Records, StoreError> {
    if !path.exists() {
        info!("No records at {:?}; starting from sample data.", path);
        return Ok(Records::sample());
    }
    let bytes = fs::read(path)?;
    let records: Records = serde_json::from_slice(&bytes)?;
    info!(
        "Loaded {} people ({} already won) and {} prizes from {:?}.",
        records.persons.len(),
        records.already.len(),
        records.prizes.len(),
        path
    );
    Ok(records)
}

pub fn save(path: &Path, records: &Records) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    // write-then-rename so a crash never leaves half a file
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    if let Err(e) = fs::rename(&tmp, path) {
        warn!("Rename of {:?} failed ({}); writing in place.", tmp, e);
        fs::copy(&tmp, path)?;
        let _ = fs::remove_file(&tmp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("luckystage-{}-{}", std::process::id(), name))
    }

    #[test]
    fn sample_has_people_and_prizes() {
        let r = Records::sample();
        assert_eq!(r.persons.len(), 120);
        assert!(r.prizes.iter().any(|p| p.sub_batches_enabled()));
        let (_, board) = r.into_parts();
        assert_eq!(board.current_id(), Some("special"));
    }

    #[test]
    fn fresh_list_gets_renumbered() {
        let json = r#"{"persons": [{"id": 5, "name": "A"}, {"id": 5, "name": "B"}, {"id": 9, "name": "C"}]}"#;
        let r: Records = serde_json::from_str(json).unwrap();
        let (roster, _) = r.into_parts();
        assert_eq!(roster.persons().iter().map(|p| p.id).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn missing_file_gives_sample() {
        let r = load(&scratch("nope/records.json")).unwrap();
        assert_eq!(r, Records::sample());
    }

    #[test]
    fn save_then_load_keeps_wins() {
        let dir = scratch("roundtrip");
        let path = dir.join("records.json");
        let (mut roster, board) = Records::sample().into_parts();
        let prize = board.current().cloned().unwrap();
        let winner = vec![roster.persons()[7].clone()];
        roster.record_winners(&winner, &prize, "2024-12-31 23:59:59");

        save(&path, &Records::from_parts(&roster, &board)).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back.already.len(), 1);
        assert_eq!(back.persons[7].prize_times, vec!["2024-12-31 23:59:59".to_string()]);
        assert_eq!(back.current_prize.as_deref(), Some("special"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn reads_legacy_field_names() {
        let json = r#"{
            "persons": [{"id": 0, "name": "Ada", "isWin": true, "prizeId": ["a"], "prizeName": ["A"], "prizeTime": ["t"]}],
            "prizes": [{"id": "a", "name": "A", "count": 4, "isUsedCount": 1,
                        "separateCount": {"enable": true, "countList": [{"count": 2, "isUsedCount": 1}]}}]
        }"#;
        let r: Records = serde_json::from_str(json).unwrap();
        assert!(r.persons[0].has_won("a"));
        assert_eq!(r.persons[0].prize_names, vec!["A".to_string()]);
        assert_eq!(r.persons[0].prize_times, vec!["t".to_string()]);
        assert_eq!(r.prizes[0].used_count, 1);
        assert_eq!(r.prizes[0].separate.count_list[0].used_count, 1);
        assert!(r.current_prize.is_none());

        let out = serde_json::to_string(&r).unwrap();
        assert!(out.contains("\"prizeId\"") && out.contains("\"prizeName\"") && out.contains("\"prizeTime\""));
        assert!(!out.contains("prizeIds"));
    }

    #[test]
    fn garbage_is_a_json_error() {
        let path = scratch("bad.json");
        fs::write(&path, b"{ nope").unwrap();
        assert!(matches!(load(&path), Err(StoreError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
