use serde::{Deserialize, Serialize};

pub type ParticipantId = u32;
pub type PrizeId = String;

/// One person in the raffle. The three win vectors always have equal
/// length, which is non-zero exactly when `is_win` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub is_win: bool,
    #[serde(default, rename = "prizeName")]
    pub prize_names: Vec<String>,
    #[serde(default, rename = "prizeTime")]
    pub prize_times: Vec<String>,
    #[serde(default, rename = "prizeId")]
    pub prize_ids: Vec<PrizeId>,
}

impl Participant {
    pub fn new(id: ParticipantId, uid: &str, name: &str, department: &str, identity: &str) -> Self {
        Self {
            id,
            uid: uid.to_string(),
            name: name.to_string(),
            department: department.to_string(),
            identity: identity.to_string(),
            is_win: false,
            prize_names: Vec::new(),
            prize_times: Vec::new(),
            prize_ids: Vec::new(),
        }
    }

    pub fn has_won(&self, prize_id: &str) -> bool {
        self.prize_ids.iter().any(|p| p == prize_id)
    }

    pub fn record_win(&mut self, prize: &Prize, when: &str) {
        self.is_win = true;
        self.prize_names.push(prize.name.clone());
        self.prize_times.push(when.to_string());
        self.prize_ids.push(prize.id.clone());
    }

    pub fn clear_wins(&mut self) {
        self.is_win = false;
        self.prize_names.clear();
        self.prize_times.clear();
        self.prize_ids.clear();
    }
}

/// A "single draw" chunk of a prize's quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubBatchQuota {
    #[serde(default)]
    pub id: String,
    pub count: u32,
    #[serde(default, rename = "isUsedCount")]
    pub used_count: u32,
}

impl SubBatchQuota {
    pub fn new(count: u32) -> Self {
        Self { id: String::new(), count, used_count: 0 }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.used_count >= self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparateCount {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub count_list: Vec<SubBatchQuota>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    pub id: PrizeId,
    pub name: String,
    #[serde(default)]
    pub sort: i32,
    /// Draw from everyone who has not won *this* prize, instead of from
    /// everyone who has not won anything.
    #[serde(default)]
    pub is_all: bool,
    pub count: u32,
    #[serde(default, rename = "isUsedCount")]
    pub used_count: u32,
    #[serde(default)]
    pub is_used: bool,
    #[serde(default, rename = "separateCount")]
    pub separate: SeparateCount,
    #[serde(default)]
    pub desc: String,
}

impl Prize {
    pub fn new(id: &str, name: &str, count: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sort: 0,
            is_all: false,
            count: count.max(1),
            used_count: 0,
            is_used: false,
            separate: SeparateCount::default(),
            desc: String::new(),
        }
    }

    pub fn with_sub_batches(mut self, counts: &[u32]) -> Self {
        self.separate = SeparateCount {
            enable: true,
            count_list: counts.iter().map(|&c| SubBatchQuota::new(c)).collect(),
        };
        self
    }

    pub fn drawing_from_all(mut self) -> Self {
        self.is_all = true;
        self
    }

    pub fn sub_batches_enabled(&self) -> bool {
        self.separate.enable && !self.separate.count_list.is_empty()
    }
}

/// Winners of the round in flight, between start and continue/cancel.
#[derive(Debug, Clone, Default)]
pub struct DrawRound {
    pub prize_id: PrizeId,
    pub winners: Vec<Participant>,
    /// Card slot assigned to each winner, parallel to `winners`. Empty
    /// until the reveal.
    pub slots: Vec<usize>,
    pub round_size: usize,
    /// Reveal position tweens that have landed.
    pub landed: usize,
}
