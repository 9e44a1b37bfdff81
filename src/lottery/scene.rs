//! The card arena: one `SceneObject` per slot, plus the camera and the
//! scene root. A renderer reads these fields directly every frame.
use cgmath::{Vector3, vec3};
use rand::Rng;

use crate::config::Theme;
use crate::lottery::geometry::Size;
use crate::lottery::model::{Participant, ParticipantId};
use crate::ui::anim::{Animatable, Channel, Subject};
use crate::ui::color;

/// Rows in the table formation.
pub const TABLE_ROWS: usize = 7;
pub const CAMERA_HOME: Vector3<f32> = Vector3 { x: 0.0, y: 0.0, z: 3000.0 };
const SCATTER: f32 = 2000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardMode {
    /// Table styling: pattern slots get the highlight colour.
    Default,
    Sphere,
    /// A revealed winner.
    Lucky,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardFace {
    pub uid: String,
    pub name: String,
    pub department: String,
    pub identity: String,
    pub background: [f32; 4],
    pub border: [f32; 4],
    pub size: Size,
    pub text_size: f32,
    pub mode: CardMode,
}

impl Default for CardFace {
    fn default() -> Self {
        Self {
            uid: String::new(),
            name: String::new(),
            department: String::new(),
            identity: String::new(),
            background: [0.0; 4],
            border: [0.0; 4],
            size: Size::new(0.0, 0.0),
            text_size: 0.0,
            mode: CardMode::Default,
        }
    }
}

/// Restyle a card. Text fields are only replaced when `person` has them,
/// so a restyle without a person keeps the current label.
pub fn style_card<R: Rng + ?Sized>(
    face: &mut CardFace,
    person: Option<&Participant>,
    index: usize,
    theme: &Theme,
    mode: CardMode,
    rng: &mut R,
) {
    let (size, text_size) = match mode {
        CardMode::Lucky => (Size::new(theme.card_width * 2.0, theme.card_height * 2.0), theme.text_size * 2.0),
        _ => (Size::new(theme.card_width, theme.card_height), theme.text_size),
    };
    let base = if mode == CardMode::Lucky { theme.lucky_card_color } else { theme.card_color };

    face.background = match mode {
        CardMode::Default if theme.pattern_list.contains(&(index + 1)) => {
            color::with_alpha(theme.pattern_color, rng.random_range(0.8..1.0))
        }
        CardMode::Default | CardMode::Sphere => color::with_alpha(base, rng.random_range(0.25..0.75)),
        CardMode::Lucky => color::with_alpha(base, 0.8),
    };
    face.border = color::with_alpha(base, 0.25);
    face.size = size;
    face.text_size = text_size;
    face.mode = mode;

    if let Some(p) = person {
        if !p.uid.is_empty() { face.uid = p.uid.clone(); }
        if !p.name.is_empty() { face.name = p.name.clone(); }
        if !p.department.is_empty() || !p.identity.is_empty() {
            face.department = p.department.clone();
            face.identity = p.identity.clone();
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Participant whose record this slot was built from.
    pub occupant: Option<ParticipantId>,
    pub face: CardFace,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Camera {
    pub fn home() -> Self {
        Self { position: CAMERA_HOME, rotation: vec3(0.0, 0.0, 0.0) }
    }
}

#[derive(Clone, Debug)]
pub struct Stage {
    pub slots: Vec<SceneObject>,
    pub camera: Camera,
    /// Root rotation; spinning the formation spins this.
    pub rotation: Vector3<f32>,
}

impl Stage {
    /// `row_count * 7` cards, cycling through `persons` when there are fewer
    /// people than slots, scattered randomly before the first layout.
    pub fn build<R: Rng + ?Sized>(persons: &[Participant], row_count: usize, theme: &Theme, rng: &mut R) -> Self {
        let total = if persons.is_empty() { 0 } else { row_count.max(1) * TABLE_ROWS };
        let mut slots = Vec::with_capacity(total);
        for i in 0..total {
            let person = &persons[i % persons.len()];
            let mut face = CardFace::default();
            style_card(&mut face, Some(person), i, theme, CardMode::Default, rng);
            slots.push(SceneObject {
                position: vec3(
                    rng.random_range(-SCATTER..SCATTER),
                    rng.random_range(-SCATTER..SCATTER),
                    rng.random_range(-SCATTER..SCATTER),
                ),
                rotation: vec3(0.0, 0.0, 0.0),
                scale: vec3(1.0, 1.0, 1.0),
                occupant: Some(person.id),
                face,
            });
        }
        Self { slots, camera: Camera::home(), rotation: vec3(0.0, 0.0, 0.0) }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Put a (possibly different) person on a slot and restyle it.
    pub fn show<R: Rng + ?Sized>(
        &mut self,
        slot: usize,
        person: Option<&Participant>,
        theme: &Theme,
        mode: CardMode,
        rng: &mut R,
    ) {
        let Some(obj) = self.slots.get_mut(slot) else { return; };
        if let Some(p) = person {
            obj.occupant = Some(p.id);
        }
        style_card(&mut obj.face, person, slot, theme, mode, rng);
    }
}

impl Animatable for Stage {
    fn channel_mut(&mut self, subject: Subject, channel: Channel) -> Option<&mut Vector3<f32>> {
        match subject {
            Subject::Card(i) => {
                let obj = self.slots.get_mut(i)?;
                Some(match channel {
                    Channel::Position => &mut obj.position,
                    Channel::Rotation => &mut obj.rotation,
                    Channel::Scale => &mut obj.scale,
                })
            }
            Subject::Camera => match channel {
                Channel::Position => Some(&mut self.camera.position),
                Channel::Rotation => Some(&mut self.camera.rotation),
                Channel::Scale => None,
            },
            // the root only spins
            Subject::Stage => match channel {
                Channel::Rotation => Some(&mut self.rotation),
                Channel::Position | Channel::Scale => None,
            },
        }
    }
}
