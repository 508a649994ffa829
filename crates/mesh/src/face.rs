use cubeview_common::Axis;
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// The six faces of a cubie, in the order they appear in the mesh template.
///
/// Names follow move notation: `Front` is the -Z side, `Back` the +Z side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Up,
    Down,
    Right,
    Left,
    Front,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Right,
        Face::Left,
        Face::Front,
        Face::Back,
    ];

    /// Position of this face within a cubie's block of 6 faces.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Face> {
        Self::ALL.get(index).copied()
    }

    pub fn axis(self) -> Axis {
        match self {
            Face::Up | Face::Down => Axis::Y,
            Face::Right | Face::Left => Axis::X,
            Face::Front | Face::Back => Axis::Z,
        }
    }

    /// `+1` if the outward normal points along the positive axis, else `-1`.
    pub fn sign(self) -> i32 {
        match self {
            Face::Up | Face::Right | Face::Back => 1,
            Face::Down | Face::Left | Face::Front => -1,
        }
    }

    /// Outward unit normal as an integer vector.
    pub fn normal_i(self) -> IVec3 {
        self.axis().unit_i() * self.sign()
    }

    pub fn normal(self) -> Vec3 {
        self.normal_i().as_vec3()
    }

    /// The face whose outward normal is `normal`, if it is axis-aligned and unit.
    pub fn from_normal(normal: IVec3) -> Option<Face> {
        Self::ALL.into_iter().find(|f| f.normal_i() == normal)
    }

    /// Sticker color this face shows when it lies on the puzzle's surface.
    pub fn puzzle_color(self) -> FaceColor {
        match self {
            Face::Up => FaceColor::Yellow,
            Face::Down => FaceColor::White,
            Face::Right => FaceColor::Red,
            Face::Left => FaceColor::Orange,
            Face::Front => FaceColor::Green,
            Face::Back => FaceColor::Blue,
        }
    }

    /// Move-notation letter.
    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Down => 'D',
            Face::Right => 'R',
            Face::Left => 'L',
            Face::Front => 'F',
            Face::Back => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        Self::ALL.into_iter().find(|f| f.letter() == letter)
    }
}

/// Color tag stored per vertex; the discriminant is the shader's color id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceColor {
    Green = 0,
    Blue = 1,
    Orange = 2,
    Red = 3,
    Yellow = 4,
    White = 5,
    /// Faces hidden inside the puzzle.
    Black = 6,
}

impl FaceColor {
    pub fn id(self) -> f32 {
        self as u32 as f32
    }

    pub fn from_id(id: f32) -> Option<FaceColor> {
        const COLORS: [FaceColor; 7] = [
            FaceColor::Green,
            FaceColor::Blue,
            FaceColor::Orange,
            FaceColor::Red,
            FaceColor::Yellow,
            FaceColor::White,
            FaceColor::Black,
        ];
        if id < 0.0 || id.fract() != 0.0 {
            return None;
        }
        COLORS.get(id as usize).copied()
    }

    /// Linear RGB used by the renderers.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            FaceColor::Green => [0.0, 0.61, 0.28],
            FaceColor::Blue => [0.0, 0.27, 0.68],
            FaceColor::Orange => [1.0, 0.35, 0.0],
            FaceColor::Red => [0.72, 0.07, 0.2],
            FaceColor::Yellow => [1.0, 0.84, 0.0],
            FaceColor::White => [1.0, 1.0, 1.0],
            FaceColor::Black => [0.05, 0.05, 0.05],
        }
    }
}
